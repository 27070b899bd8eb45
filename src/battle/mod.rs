//! Battle system - grid skirmish between two teams
//!
//! Units path around obstacles on a coarse grid, lock onto the nearest
//! enemy, close to attack range and trade damage until one side is gone.
//! The player can redirect their team with click or formation commands.

pub mod command;
pub mod constants;
pub mod execution;
pub mod formation_layout;
pub mod grid;
pub mod movement;
pub mod pathfinding;
pub mod resolution;
pub mod snapshot;
pub mod spawn;
pub mod targeting;
pub mod units;

// Re-exports for convenient access
pub use command::{issue_command, CommandInput, CommandOutcome, CommandState};
pub use constants::*;
pub use execution::{
    BattleEvent, BattleEventLog, BattleEventType, BattleOutcome, BattleState, FrameClock,
    HitEvent, TickInput, TickReport,
};
pub use formation_layout::{
    compute_formation_positions, compute_formation_targets, FormationKind, FormationSpacing,
};
pub use grid::{standard_obstacle_layout, BattleGrid, GridCoord, GridError};
pub use movement::{follow_path, step_distance, step_toward, MovementResult};
pub use pathfinding::{find_cell_path, find_path};
pub use resolution::{attack_damage, in_attack_range, resolve_attack, AttackOutcome};
pub use snapshot::{BattleSnapshot, TeamStrength, UnitSnapshot};
pub use spawn::{build_grid, spawn_position, spawn_roster, unit_stats, SpawnRequest, UpgradeLevels};
pub use targeting::{find_nearest_enemy, live_target_index};
pub use units::{Team, Unit, UnitId, UnitStats};
