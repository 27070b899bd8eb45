//! Combat units and teams
//!
//! A unit is one combatant on the battlefield. Units reference their target
//! by `UnitId` only; the handle is looked up in the roster and liveness
//! checked every tick, so a dead or removed target never lingers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Side of the battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    pub fn opponent(&self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }

    /// Single-letter prefix used in unit labels (`b3`, `r12`)
    pub fn prefix(&self) -> char {
        match self {
            Team::Blue => 'b',
            Team::Red => 'r',
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Blue => write!(f, "blue"),
            Team::Red => write!(f, "red"),
        }
    }
}

/// Unique identifier for units within one battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Combat statistics fixed at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub max_health: f32,
    /// Damage per simulated second while in range
    pub attack: f32,
    /// Attack reach in pixels
    pub range: f32,
    /// Pixels per frame at the nominal frame rate
    pub speed: f32,
}

/// A single combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub team: Team,
    pub position: Vec2,
    pub health: f32,
    pub stats: UnitStats,
    /// Remaining waypoints, next waypoint first
    pub path: Vec<Vec2>,
    /// Weak handle to the current enemy target
    pub target: Option<UnitId>,
    /// Cosmetic; set by commands, read by the renderer
    pub selected: bool,
}

impl Unit {
    /// Create a unit at full health with no orders
    pub fn new(id: UnitId, team: Team, position: Vec2, stats: UnitStats) -> Self {
        Self {
            id,
            team,
            position,
            health: stats.max_health,
            stats,
            path: Vec::new(),
            target: None,
            selected: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    /// Display label such as `b1` or `r7`
    pub fn label(&self) -> String {
        format!("{}{}", self.team.prefix(), self.id.0)
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.position.distance(point)
    }

    /// Remaining health as a fraction of maximum, clamped to `[0, 1]`
    pub fn health_ratio(&self) -> f32 {
        if self.stats.max_health <= 0.0 {
            return 0.0;
        }
        (self.health.max(0.0) / self.stats.max_health).min(1.0)
    }

    /// Subtract damage, clamping health at zero. Returns true if this hit
    /// killed the unit.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.is_alive();
        self.health = (self.health - amount.max(0.0)).max(0.0);
        was_alive && self.is_dead()
    }

    /// Replace the current path and drop any target. Used by direct commands.
    pub fn command_path(&mut self, path: Vec<Vec2>) {
        self.path = path;
        self.target = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> UnitStats {
        UnitStats {
            max_health: 120.0,
            attack: 14.0,
            range: 24.0,
            speed: 0.9,
        }
    }

    #[test]
    fn test_new_unit_full_health() {
        let unit = Unit::new(UnitId(1), Team::Blue, Vec2::new(10.0, 20.0), stats());

        assert_eq!(unit.health, 120.0);
        assert!(unit.is_alive());
        assert!(unit.path.is_empty());
        assert!(unit.target.is_none());
        assert_eq!(unit.label(), "b1");
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut unit = Unit::new(UnitId(2), Team::Red, Vec2::ZERO, stats());

        assert!(!unit.take_damage(100.0));
        assert!(unit.take_damage(50.0));
        assert_eq!(unit.health, 0.0);
        assert!(unit.is_dead());

        // Hitting a corpse is not a second kill
        assert!(!unit.take_damage(10.0));
        assert_eq!(unit.health, 0.0);
    }

    #[test]
    fn test_negative_damage_does_not_heal() {
        let mut unit = Unit::new(UnitId(3), Team::Red, Vec2::ZERO, stats());
        unit.take_damage(-30.0);
        assert_eq!(unit.health, 120.0);
    }

    #[test]
    fn test_health_ratio() {
        let mut unit = Unit::new(UnitId(4), Team::Blue, Vec2::ZERO, stats());
        unit.take_damage(60.0);
        assert!((unit.health_ratio() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_command_path_clears_target() {
        let mut unit = Unit::new(UnitId(5), Team::Blue, Vec2::ZERO, stats());
        unit.target = Some(UnitId(9));

        unit.command_path(vec![Vec2::new(30.0, 30.0)]);

        assert_eq!(unit.path.len(), 1);
        assert!(unit.target.is_none());
    }

    #[test]
    fn test_team_opponent() {
        assert_eq!(Team::Blue.opponent(), Team::Red);
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Red.to_string(), "red");
    }
}
