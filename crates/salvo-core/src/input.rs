//! Input subscription.
//!
//! Device events reach the simulation through an [`InputBus`]: an explicit
//! registry of named [`InputHandler`]s owned by the caller and passed by
//! reference to [`Simulation::handle_input`](crate::Simulation::handle_input).
//! Handlers translate raw events into [`ControlIntent`]s and never touch
//! simulation state themselves.
//!
//! # Example
//!
//! ```
//! use salvo_core::input::{InputBus, InputEvent, Key, KeyboardControls};
//! use salvo_core::intent::ControlIntent;
//!
//! let mut bus = InputBus::new();
//! bus.add("keyboard", KeyboardControls);
//!
//! let intents = bus.dispatch(&InputEvent::KeyDown(Key::Space), 0.016);
//! assert_eq!(intents, vec![ControlIntent::Charge]);
//! ```

use serde::{Deserialize, Serialize};

use crate::intent::ControlIntent;

// =============================================================================
// Events
// =============================================================================

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// The `A` key
    A,
    /// The `S` key
    S,
    /// Space bar
    Space,
    /// Any other key, by platform scancode
    Other(u32),
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary button
    Left,
    /// Middle button or wheel click
    Middle,
    /// Secondary button
    Right,
}

/// A discrete device event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Key pressed (or auto-repeated)
    KeyDown(Key),
    /// Key released
    KeyUp(Key),
    /// Mouse button pressed at a screen position
    MouseDown {
        /// Button
        button: MouseButton,
        /// Screen x
        x: f32,
        /// Screen y
        y: f32,
    },
    /// Mouse button released at a screen position
    MouseUp {
        /// Button
        button: MouseButton,
        /// Screen x
        x: f32,
        /// Screen y
        y: f32,
    },
    /// Pointer moved
    MouseMove {
        /// Screen x
        x: f32,
        /// Screen y
        y: f32,
    },
}

// =============================================================================
// Handlers
// =============================================================================

/// Translates device events into control intents.
///
/// Closures of the form `FnMut(&InputEvent, f32) -> Vec<ControlIntent>`
/// implement this trait, so small handlers need no named type.
pub trait InputHandler {
    /// Handles one event. `dt` is the time since the last frame.
    fn handle(&mut self, event: &InputEvent, dt: f32) -> Vec<ControlIntent>;
}

impl<F> InputHandler for F
where
    F: FnMut(&InputEvent, f32) -> Vec<ControlIntent>,
{
    fn handle(&mut self, event: &InputEvent, dt: f32) -> Vec<ControlIntent> {
        self(event, dt)
    }
}

/// The default keyboard layout.
///
/// | key | intent |
/// |---|---|
/// | Left | walk left |
/// | Right | walk right |
/// | Up | jump |
/// | A | aim left |
/// | S | aim right |
/// | Space | charge |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardControls;

impl KeyboardControls {
    /// Intent bound to `key`, if any.
    #[must_use]
    pub const fn intent_for(key: Key) -> Option<ControlIntent> {
        match key {
            Key::Left => Some(ControlIntent::WalkLeft),
            Key::Right => Some(ControlIntent::WalkRight),
            Key::Up => Some(ControlIntent::Jump),
            Key::A => Some(ControlIntent::AimLeft),
            Key::S => Some(ControlIntent::AimRight),
            Key::Space => Some(ControlIntent::Charge),
            Key::Other(_) => None,
        }
    }
}

impl InputHandler for KeyboardControls {
    fn handle(&mut self, event: &InputEvent, _dt: f32) -> Vec<ControlIntent> {
        match event {
            InputEvent::KeyDown(key) => Self::intent_for(*key).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// Bus
// =============================================================================

/// Named input handlers, dispatched in registration order.
#[derive(Default)]
pub struct InputBus {
    handlers: Vec<(String, Box<dyn InputHandler>)>,
}

impl InputBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registers `handler` under `name`.
    ///
    /// A handler already registered under the same name is replaced in place
    /// and keeps its dispatch position.
    pub fn add(&mut self, name: impl Into<String>, handler: impl InputHandler + 'static) {
        let name = name.into();
        let handler: Box<dyn InputHandler> = Box::new(handler);
        match self.handlers.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = handler,
            None => self.handlers.push((name, handler)),
        }
    }

    /// Removes the handler registered under `name`. Returns whether one was.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(n, _)| n != name);
        self.handlers.len() != before
    }

    /// Returns true if a handler is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.iter().any(|(n, _)| n == name)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered names in dispatch order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|(n, _)| n.as_str())
    }

    /// Passes `event` to every handler and concatenates their intents.
    pub fn dispatch(&mut self, event: &InputEvent, dt: f32) -> Vec<ControlIntent> {
        let mut intents = Vec::new();
        for (_, handler) in &mut self.handlers {
            intents.extend(handler.handle(event, dt));
        }
        intents
    }
}

impl std::fmt::Debug for InputBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBus")
            .field("handlers", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod keyboard_tests {
        use super::*;

        #[test]
        fn maps_default_layout() {
            let mut keys = KeyboardControls;
            let cases = [
                (Key::Left, ControlIntent::WalkLeft),
                (Key::Right, ControlIntent::WalkRight),
                (Key::Up, ControlIntent::Jump),
                (Key::A, ControlIntent::AimLeft),
                (Key::S, ControlIntent::AimRight),
                (Key::Space, ControlIntent::Charge),
            ];
            for (key, intent) in cases {
                assert_eq!(keys.handle(&InputEvent::KeyDown(key), 0.1), vec![intent]);
            }
        }

        #[test]
        fn ignores_releases_and_unbound_keys() {
            let mut keys = KeyboardControls;
            assert!(keys.handle(&InputEvent::KeyUp(Key::Space), 0.1).is_empty());
            assert!(keys
                .handle(&InputEvent::KeyDown(Key::Other(41)), 0.1)
                .is_empty());
            assert!(keys
                .handle(&InputEvent::MouseMove { x: 1.0, y: 2.0 }, 0.1)
                .is_empty());
        }
    }

    mod bus_tests {
        use super::*;

        #[test]
        fn dispatches_in_registration_order() {
            let mut bus = InputBus::new();
            bus.add("first", |_: &InputEvent, _: f32| vec![ControlIntent::Jump]);
            bus.add("keyboard", KeyboardControls);

            let intents = bus.dispatch(&InputEvent::KeyDown(Key::A), 0.1);
            assert_eq!(intents, vec![ControlIntent::Jump, ControlIntent::AimLeft]);
        }

        #[test]
        fn same_name_replaces_in_place() {
            let mut bus = InputBus::new();
            bus.add("a", |_: &InputEvent, _: f32| vec![ControlIntent::Jump]);
            bus.add("b", |_: &InputEvent, _: f32| vec![ControlIntent::Charge]);
            bus.add("a", |_: &InputEvent, _: f32| vec![ControlIntent::WalkLeft]);

            assert_eq!(bus.len(), 2);
            assert_eq!(bus.names().collect::<Vec<_>>(), vec!["a", "b"]);
            assert_eq!(
                bus.dispatch(&InputEvent::KeyUp(Key::Up), 0.1),
                vec![ControlIntent::WalkLeft, ControlIntent::Charge]
            );
        }

        #[test]
        fn remove_by_name() {
            let mut bus = InputBus::new();
            bus.add("keyboard", KeyboardControls);
            assert!(bus.contains("keyboard"));
            assert!(bus.remove("keyboard"));
            assert!(!bus.remove("keyboard"));
            assert!(bus.is_empty());
            assert!(bus
                .dispatch(&InputEvent::KeyDown(Key::Space), 0.1)
                .is_empty());
        }

        #[test]
        fn closures_keep_state() {
            let mut bus = InputBus::new();
            let mut presses = 0;
            bus.add("counter", move |event: &InputEvent, _: f32| {
                if matches!(event, InputEvent::KeyDown(_)) {
                    presses += 1;
                }
                if presses >= 2 {
                    vec![ControlIntent::Jump]
                } else {
                    Vec::new()
                }
            });
            assert!(bus.dispatch(&InputEvent::KeyDown(Key::Up), 0.1).is_empty());
            assert_eq!(
                bus.dispatch(&InputEvent::KeyDown(Key::Up), 0.1),
                vec![ControlIntent::Jump]
            );
        }
    }
}
