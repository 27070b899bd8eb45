//! Serializable view of the battle for renderers and the HUD

use serde::{Deserialize, Serialize};

use crate::battle::units::{Team, Unit, UnitId};
use crate::core::types::Tick;

/// Snapshot of a single unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub label: String,
    pub team: Team,
    pub x: f32,
    pub y: f32,
    /// Clamped to `[0, max_health]`
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    pub selected: bool,
    pub waypoints_remaining: usize,
    pub target: Option<UnitId>,
}

impl From<&Unit> for UnitSnapshot {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            label: unit.label(),
            team: unit.team,
            x: unit.position.x,
            y: unit.position.y,
            health: unit.health.clamp(0.0, unit.stats.max_health),
            max_health: unit.stats.max_health,
            alive: unit.is_alive(),
            selected: unit.selected,
            waypoints_remaining: unit.path.len(),
            target: unit.target,
        }
    }
}

/// Living unit counts per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStrength {
    pub blue_alive: usize,
    pub red_alive: usize,
}

impl TeamStrength {
    pub fn from_units(units: &[Unit]) -> Self {
        let mut strength = Self::default();
        for unit in units.iter().filter(|u| u.is_alive()) {
            match unit.team {
                Team::Blue => strength.blue_alive += 1,
                Team::Red => strength.red_alive += 1,
            }
        }
        strength
    }

    pub fn alive(&self, team: Team) -> usize {
        match team {
            Team::Blue => self.blue_alive,
            Team::Red => self.red_alive,
        }
    }
}

/// Complete battle snapshot after a tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub tick: Tick,
    /// Simulated seconds elapsed (scaled by the speed multiplier)
    pub sim_time: f32,
    pub units: Vec<UnitSnapshot>,
    pub strength: TeamStrength,
}

impl BattleSnapshot {
    pub fn capture(units: &[Unit], tick: Tick, sim_time: f32) -> Self {
        Self {
            tick,
            sim_time,
            units: units.iter().map(UnitSnapshot::from).collect(),
            strength: TeamStrength::from_units(units),
        }
    }

    /// Serialize snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::units::UnitStats;
    use crate::core::types::Vec2;

    fn unit(id: u32, team: Team) -> Unit {
        let stats = UnitStats {
            max_health: 120.0,
            attack: 14.0,
            range: 24.0,
            speed: 0.9,
        };
        Unit::new(UnitId(id), team, Vec2::new(id as f32, 0.0), stats)
    }

    #[test]
    fn test_strength_counts_living_only() {
        let mut units = vec![unit(1, Team::Blue), unit(2, Team::Blue), unit(3, Team::Red)];
        units[1].take_damage(500.0);

        let strength = TeamStrength::from_units(&units);
        assert_eq!(strength.alive(Team::Blue), 1);
        assert_eq!(strength.alive(Team::Red), 1);
    }

    #[test]
    fn test_snapshot_clamps_negative_health() {
        let mut units = vec![unit(1, Team::Red)];
        units[0].health = -3.0;

        let snapshot = BattleSnapshot::capture(&units, 5, 0.5);
        assert_eq!(snapshot.units[0].health, 0.0);
        assert!(!snapshot.units[0].alive);
        assert_eq!(snapshot.units[0].label, "r1");
    }

    #[test]
    fn test_snapshot_serializes() {
        let units = vec![unit(1, Team::Blue)];
        let json = BattleSnapshot::capture(&units, 1, 0.016).to_json().unwrap();

        assert!(json.contains("\"label\":\"b1\""));
        assert!(json.contains("\"team\":\"Blue\""));
    }
}
