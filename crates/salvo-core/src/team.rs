//! Teams and turn rotation.
//!
//! A [`Team`] is an ordered list of unit handles with a cursor marking the
//! member that played last. The [`Roster`] holds every team and the index of
//! the team whose turn it is.

use serde::{Deserialize, Serialize};

use crate::arena::BodyArena;
use crate::entity::BodyId;

/// Units fighting on the same side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    members: Vec<BodyId>,
    /// Index of the member that played last; `None` before the first turn.
    cursor: Option<usize>,
}

impl Team {
    /// Creates a team from its members in play order.
    #[must_use]
    pub fn new(members: Vec<BodyId>) -> Self {
        Self {
            members,
            cursor: None,
        }
    }

    /// Member handles in play order.
    #[must_use]
    pub fn members(&self) -> &[BodyId] {
        &self.members
    }

    /// Number of members, living or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the team has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Health of a member, or zero if the handle no longer resolves.
    #[must_use]
    pub fn member_health(bodies: &BodyArena, id: BodyId) -> f32 {
        bodies
            .get(id)
            .and_then(|b| b.as_unit())
            .map_or(0.0, |u| u.health)
    }

    /// A team is alive while at least one member has health left.
    #[must_use]
    pub fn is_alive(&self, bodies: &BodyArena) -> bool {
        self.members
            .iter()
            .any(|id| Self::member_health(bodies, *id) > 0.0)
    }

    /// Advances the cursor to the next living member and returns it.
    ///
    /// Dead members are skipped. Returns `None` if nobody is alive, leaving
    /// the cursor untouched.
    pub fn next_member(&mut self, bodies: &BodyArena) -> Option<BodyId> {
        let len = self.members.len();
        let start = self.cursor.map_or(0, |c| c + 1);
        for offset in 0..len {
            let index = (start + offset) % len;
            let id = self.members[index];
            if Self::member_health(bodies, id) > 0.0 {
                self.cursor = Some(index);
                return Some(id);
            }
        }
        None
    }

    /// Living member with the most health. Ties go to the earliest member.
    #[must_use]
    pub fn healthiest(&self, bodies: &BodyArena) -> Option<BodyId> {
        let mut best: Option<(BodyId, f32)> = None;
        for id in &self.members {
            let health = Self::member_health(bodies, *id);
            if health > 0.0 && best.map_or(true, |(_, h)| health > h) {
                best = Some((*id, health));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Result of passing the turn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Another living team plays next
    Next {
        /// Team index
        team: usize,
        /// Its next living member
        unit: BodyId,
    },
    /// Rotation came back to the team that started it: that team won
    Winner {
        /// Winning team index
        team: usize,
    },
    /// No team has a living member
    NoneAlive,
}

/// Every team of the round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    teams: Vec<Team>,
    current: usize,
}

impl Roster {
    /// Creates a roster; team 0 plays first.
    #[must_use]
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams, current: 0 }
    }

    /// All teams.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// One team.
    #[must_use]
    pub fn team(&self, index: usize) -> Option<&Team> {
        self.teams.get(index)
    }

    /// One team, mutably.
    #[must_use]
    pub fn team_mut(&mut self, index: usize) -> Option<&mut Team> {
        self.teams.get_mut(index)
    }

    /// Number of teams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Returns true if there are no teams.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Index of the team whose turn it is.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Indices of teams that still have a living member.
    #[must_use]
    pub fn living_teams(&self, bodies: &BodyArena) -> Vec<usize> {
        (0..self.teams.len())
            .filter(|t| self.teams[*t].is_alive(bodies))
            .collect()
    }

    /// Passes the turn to the next living team in round-robin order.
    ///
    /// Rotation starts at the team after the current one and wraps. If the
    /// first living team found is the current team itself, every other team
    /// is dead and the current team has won.
    pub fn rotate(&mut self, bodies: &BodyArena) -> Rotation {
        let count = self.teams.len();
        let start = self.current;
        for step in 1..=count {
            let index = (start + step) % count;
            if !self.teams[index].is_alive(bodies) {
                continue;
            }
            self.current = index;
            if index == start {
                return Rotation::Winner { team: index };
            }
            return match self.teams[index].next_member(bodies) {
                Some(unit) => Rotation::Next { team: index, unit },
                None => Rotation::NoneAlive,
            };
        }
        Rotation::NoneAlive
    }
}
