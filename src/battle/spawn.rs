//! Battlefield setup: grid construction and initial roster
//!
//! Blue deploys near the left edge, red mirrors it near the right edge.
//! Both use the same staggered block: six units per row with small per-slot
//! jitter so the ranks do not look machine-aligned.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    SPAWN_COLUMN_SPACING, SPAWN_EDGE_OFFSET, SPAWN_ROW_SPACING, SPAWN_TOP_OFFSET,
    SPAWN_UNITS_PER_ROW, SPAWN_X_JITTER, SPAWN_Y_JITTER,
};
use crate::battle::grid::BattleGrid;
use crate::battle::units::{Team, Unit, UnitId, UnitStats};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::Vec2;

/// Purchased upgrade levels supplied by the economy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevels {
    pub attack: u32,
    pub health: u32,
    pub speed: u32,
}

/// How many units each side fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub blue_count: u32,
    pub red_count: u32,
    #[serde(default)]
    pub upgrades: UpgradeLevels,
}

impl SpawnRequest {
    pub fn new(blue_count: u32, red_count: u32) -> Self {
        Self {
            blue_count,
            red_count,
            upgrades: UpgradeLevels::default(),
        }
    }

    pub fn with_upgrades(mut self, upgrades: UpgradeLevels) -> Self {
        self.upgrades = upgrades;
        self
    }

    pub fn total(&self) -> u32 {
        self.blue_count + self.red_count
    }
}

/// Stats for a freshly spawned unit of `team`
///
/// Health upgrades apply to everyone; attack and speed upgrades only to the
/// player's team.
pub fn unit_stats(config: &SimulationConfig, team: Team, upgrades: &UpgradeLevels) -> UnitStats {
    let is_player = team == config.player_team;
    let max_health = config.base_health + upgrades.health as f32 * config.health_per_upgrade;
    let attack = config.base_attack
        + if is_player {
            upgrades.attack as f32 * config.attack_per_upgrade
        } else {
            0.0
        };
    let speed = config.base_speed
        + if is_player {
            upgrades.speed as f32 * config.speed_per_upgrade
        } else {
            0.0
        };

    UnitStats {
        max_health,
        attack,
        range: config.base_range,
        speed,
    }
}

/// Starting position of the `index`-th unit of `team`
pub fn spawn_position(team: Team, index: u32, battlefield_width: f32) -> Vec2 {
    let column = (index % SPAWN_UNITS_PER_ROW) as f32;
    let row = (index / SPAWN_UNITS_PER_ROW) as f32;
    let x_jitter = (index % 3) as f32 * SPAWN_X_JITTER;
    let y_jitter = (index % 4) as f32 * SPAWN_Y_JITTER;

    let offset = SPAWN_EDGE_OFFSET + column * SPAWN_COLUMN_SPACING + x_jitter;
    let x = match team {
        Team::Blue => offset,
        Team::Red => battlefield_width - offset,
    };
    let y = SPAWN_TOP_OFFSET + row * SPAWN_ROW_SPACING + y_jitter;

    Vec2::new(x, y)
}

/// Build the initial roster. Blue units come first, ids run from 1 across
/// both teams.
pub fn spawn_roster(config: &SimulationConfig, request: &SpawnRequest) -> Vec<Unit> {
    let mut units = Vec::with_capacity(request.total() as usize);
    let mut next_id = 1u32;

    for (team, count) in [(Team::Blue, request.blue_count), (Team::Red, request.red_count)] {
        let stats = unit_stats(config, team, &request.upgrades);
        for i in 0..count {
            let position = spawn_position(team, i, config.battlefield_width);
            units.push(Unit::new(UnitId(next_id), team, position, stats));
            next_id += 1;
        }
    }

    units
}

/// Build the standard obstacle grid sized from the config
pub fn build_grid(config: &SimulationConfig) -> Result<BattleGrid> {
    let grid = BattleGrid::with_standard_obstacles(
        config.grid_cols(),
        config.grid_rows(),
        config.cell_width,
        config.cell_height,
    )?;
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_size_and_order() {
        let config = SimulationConfig::default();
        let units = spawn_roster(&config, &SpawnRequest::new(3, 2));

        assert_eq!(units.len(), 5);
        let labels: Vec<String> = units.iter().map(|u| u.label()).collect();
        assert_eq!(labels, vec!["b1", "b2", "b3", "r4", "r5"]);
        assert!(units.iter().all(|u| u.health == u.stats.max_health));
    }

    #[test]
    fn test_empty_request() {
        let config = SimulationConfig::default();
        assert!(spawn_roster(&config, &SpawnRequest::new(0, 0)).is_empty());

        let only_red = spawn_roster(&config, &SpawnRequest::new(0, 4));
        assert!(only_red.iter().all(|u| u.team == Team::Red));
    }

    #[test]
    fn test_spawn_positions_staggered_and_mirrored() {
        assert_eq!(spawn_position(Team::Blue, 0, 900.0), Vec2::new(80.0, 120.0));
        assert_eq!(spawn_position(Team::Blue, 1, 900.0), Vec2::new(112.0, 123.0));
        assert_eq!(spawn_position(Team::Blue, 7, 900.0), Vec2::new(112.0, 163.0));
        assert_eq!(spawn_position(Team::Red, 0, 900.0), Vec2::new(820.0, 120.0));
        assert_eq!(spawn_position(Team::Red, 1, 900.0), Vec2::new(788.0, 123.0));
    }

    #[test]
    fn test_spawn_positions_unique() {
        let config = SimulationConfig::default();
        let units = spawn_roster(&config, &SpawnRequest::new(30, 30));

        for (i, a) in units.iter().enumerate() {
            for b in units.iter().skip(i + 1) {
                assert!(a.position.distance(b.position) > 1.0);
            }
        }
    }

    #[test]
    fn test_upgrades_favor_player_team() {
        let config = SimulationConfig::default();
        let upgrades = UpgradeLevels {
            attack: 2,
            health: 1,
            speed: 3,
        };

        let blue = unit_stats(&config, Team::Blue, &upgrades);
        let red = unit_stats(&config, Team::Red, &upgrades);

        assert_eq!(blue.max_health, 132.0);
        assert_eq!(red.max_health, 132.0);
        assert_eq!(blue.attack, 22.0);
        assert_eq!(red.attack, 14.0);
        assert!((blue.speed - 1.14).abs() < 1e-5);
        assert!((red.speed - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_build_grid_from_config() {
        let grid = build_grid(&SimulationConfig::default()).unwrap();
        assert_eq!(grid.cols(), 45);
        assert_eq!(grid.rows(), 30);
        assert_eq!(grid.obstacle_count(), 6);
    }
}
