//! Presentation pass.
//!
//! [`present`] reads a [`Simulation`] after a frame has advanced and issues
//! draw calls to a [`Renderer`]. It never mutates the simulation, and the
//! renderer owns everything about pixels: windows, textures, fonts and the
//! sprite cache keyed by [`SpriteId`].
//!
//! All coordinates handed to the renderer are viewport coordinates.

use glam::Vec2;
use rubble::Cell;
use serde::{Deserialize, Serialize};

use crate::entity::{Body, BodyInner, Facing, UnitState};
use crate::simulation::Simulation;

// =============================================================================
// Renderer interface
// =============================================================================

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Color {
    /// Builds a colour from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Open sky
    pub const SKY: Self = Self::rgb(0x00, 0xFF, 0xFF);
    /// Terrain and debris
    pub const GROUND: Self = Self::rgb(0x00, 0x64, 0x00);
    /// Shells, aim marker and enemy health
    pub const RED: Self = Self::rgb(0xFF, 0x00, 0x00);
    /// Primary team health
    pub const BLUE: Self = Self::rgb(0x00, 0x00, 0xFF);
    /// Charge bar
    pub const MAGENTA: Self = Self::rgb(0xFF, 0x00, 0xFF);
    /// Overlay text
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
}

/// An axis-aligned rectangle in viewport or texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Builds a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Sprites the game draws. Loading them is the renderer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    /// Four-frame soldier sheet
    Soldier,
    /// Grave marker of a dead unit
    Grave,
    /// Finale aircraft
    Aircraft,
}

/// Drawing primitives supplied by the host.
pub trait Renderer {
    /// One pixel.
    fn point(&mut self, at: Vec2, color: Color);
    /// A straight line.
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    /// A filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// A closed polygon through already transformed points.
    fn wireframe(&mut self, points: &[Vec2], color: Color);
    /// A sprite stretched over `dest`, optionally clipped from its sheet and
    /// mirrored horizontally.
    fn sprite(&mut self, sprite: SpriteId, dest: Rect, clip: Option<Rect>, flip: bool);
    /// A line of text with its top-left corner at `at`.
    fn text(&mut self, text: &str, at: Vec2, color: Color);
}

// =============================================================================
// Models
// =============================================================================

/// Unit square drawn for debris.
pub const DEBRIS_MODEL: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// Rocket outline drawn for shells, unit sized.
pub const MISSILE_MODEL: [Vec2; 12] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.4, 0.4),
    Vec2::new(0.8, 0.4),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.8, -0.4),
    Vec2::new(0.4, -0.4),
    Vec2::new(0.0, 0.0),
    Vec2::new(-0.4, -0.4),
    Vec2::new(-1.0, -0.4),
    Vec2::new(-0.8, 0.0),
    Vec2::new(-1.0, 0.4),
    Vec2::new(-0.4, 0.4),
];

/// Width of one soldier frame on its sheet.
pub const SOLDIER_FRAME_WIDTH: f32 = 64.0;

/// Height of one soldier frame on its sheet.
pub const SOLDIER_FRAME_HEIGHT: f32 = 205.0;

/// Frames on the soldier sheet.
pub const SOLDIER_FRAMES: u64 = 4;

/// Health and charge bars are this many pixels long when full.
pub const BAR_LENGTH: f32 = 22.0;

/// Distance of the aim marker from the unit.
pub const AIM_LENGTH: f32 = 30.0;

/// Size of the finale aircraft on screen.
pub const AIRCRAFT_SIZE: Vec2 = Vec2::new(128.0, 48.0);

/// Screen row the finale aircraft flies along.
pub const AIRCRAFT_ALTITUDE: f32 = 40.0;

/// Rotates `model` by `angle`, scales it by `scale` and moves it to `at`.
#[must_use]
pub fn transform_model(model: &[Vec2], at: Vec2, angle: f32, scale: f32) -> Vec<Vec2> {
    let rotation = Vec2::from_angle(angle);
    model
        .iter()
        .map(|p| at + rotation.rotate(*p) * scale)
        .collect()
}

/// Sheet clip for a soldier. Walking units cycle frames, others stand.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn soldier_clip(horizontal_speed: f32, frame: u64) -> Rect {
    let speed = horizontal_speed.abs();
    let index = if speed > 4.0 && speed < 6.0 {
        (frame / 2) % SOLDIER_FRAMES
    } else {
        0
    };
    Rect::new(
        index as f32 * SOLDIER_FRAME_WIDTH,
        0.0,
        SOLDIER_FRAME_WIDTH,
        SOLDIER_FRAME_HEIGHT,
    )
}

// =============================================================================
// Pass
// =============================================================================

/// Draws one frame of `sim`.
pub fn present<R: Renderer + ?Sized>(sim: &Simulation, renderer: &mut R) {
    let camera = sim.camera();
    draw_landscape(sim, renderer);

    let turn = sim.turn();
    if let Some(body) = sim.controlled().and_then(|id| sim.bodies().get(id)) {
        if let Some(unit) = body.as_unit() {
            let direction = Vec2::from_angle(unit.aim_angle);
            let marker = camera.to_screen(body.physics.position + direction * AIM_LENGTH);
            renderer.fill_rect(
                Rect::new(marker.x.trunc(), marker.y.trunc(), 4.0, 4.0),
                Color::RED,
            );
        }

        if turn.show_countdown {
            #[allow(clippy::cast_possible_truncation)]
            let seconds = turn.countdown as i32;
            renderer.text(&seconds.to_string(), Vec2::new(3.0, 6.0), Color::BLACK);
        }

        let screen = camera.to_screen(body.physics.position);
        draw_bar(renderer, screen, 20.0, sim.charge_level(), Color::MAGENTA);
    }

    if let Some(outcome) = turn.outcome {
        let at = Vec2::new(camera.viewport.x / 4.0, camera.viewport.y / 2.0 - 20.0);
        renderer.text(outcome.message(), at, Color::BLACK);
    }

    if turn.finale.flying {
        renderer.sprite(
            SpriteId::Aircraft,
            Rect::new(
                turn.finale.plane_x,
                AIRCRAFT_ALTITUDE,
                AIRCRAFT_SIZE.x,
                AIRCRAFT_SIZE.y,
            ),
            None,
            false,
        );
    }

    for body in sim.bodies().bodies_sorted() {
        draw_body(sim, body, renderer);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn draw_landscape<R: Renderer + ?Sized>(sim: &Simulation, renderer: &mut R) {
    let camera = sim.camera();
    let terrain = sim.terrain();
    let origin = camera.position.round();
    let width = camera.viewport.x as i32;
    let height = camera.viewport.y as i32;
    for y in 0..height {
        for x in 0..width {
            let cell = terrain.get(x + origin.x as i32, y + origin.y as i32);
            let color = match cell {
                Cell::Sky => Color::SKY,
                Cell::Ground => Color::GROUND,
            };
            renderer.point(Vec2::new(x as f32, y as f32), color);
        }
    }
}

fn draw_body<R: Renderer + ?Sized>(sim: &Simulation, body: &Body, renderer: &mut R) {
    let physics = &body.physics;
    let screen = sim.camera().to_screen(physics.position);
    match body.inner() {
        BodyInner::Debris => {
            let points = transform_model(&DEBRIS_MODEL, screen, physics.heading(), physics.radius);
            renderer.wireframe(&points, Color::GROUND);
        }
        BodyInner::Projectile => {
            let points =
                transform_model(&MISSILE_MODEL, screen, physics.heading(), physics.radius);
            renderer.wireframe(&points, Color::RED);
        }
        BodyInner::Unit(unit) => draw_unit(sim, body, unit, screen, renderer),
    }
}

fn draw_unit<R: Renderer + ?Sized>(
    sim: &Simulation,
    body: &Body,
    unit: &UnitState,
    screen: Vec2,
    renderer: &mut R,
) {
    let radius = body.physics.radius;
    let dest = Rect::new(
        screen.x - radius,
        screen.y - radius,
        radius * 2.0,
        radius * 2.0,
    );
    if !unit.playable {
        renderer.sprite(SpriteId::Grave, dest, None, false);
        return;
    }

    let clip = soldier_clip(body.physics.velocity.x, sim.frame());
    renderer.sprite(
        SpriteId::Soldier,
        dest,
        Some(clip),
        unit.facing == Facing::Right,
    );
    let color = if unit.team == 0 { Color::BLUE } else { Color::RED };
    draw_bar(renderer, screen, -23.0, unit.health, color);
}

/// Four rows of `BAR_LENGTH * level` points starting 5 px left of `anchor`,
/// `offset` px below it.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn draw_bar<R: Renderer + ?Sized>(
    renderer: &mut R,
    anchor: Vec2,
    offset: f32,
    level: f32,
    color: Color,
) {
    let length = (BAR_LENGTH * level).ceil().max(0.0) as i32;
    for i in 0..length {
        for row in 0..4 {
            let at = anchor + Vec2::new(i as f32 - 5.0, offset + row as f32);
            renderer.point(at, color);
        }
    }
}
