//! Battle system constants - all tunable defaults in one place
//!
//! `SimulationConfig::default()` is built from these values.

// Battlefield scale (pixels)
pub const BATTLEFIELD_WIDTH: f32 = 900.0;
pub const BATTLEFIELD_HEIGHT: f32 = 600.0;
pub const CELL_WIDTH: f32 = 20.0;
pub const CELL_HEIGHT: f32 = 20.0;

// Obstacle pattern: pillars every N columns, inset from both edges,
// on two rows offset above and below the horizontal midline
pub const OBSTACLE_EDGE_INSET: i32 = 8;
pub const OBSTACLE_COLUMN_STRIDE: i32 = 10;
pub const OBSTACLE_ROW_OFFSET: i32 = 3;

// Time
pub const MAX_FRAME_DELTA_MS: f32 = 40.0;
pub const MOTION_FRAMES_PER_SECOND: f32 = 60.0;

// Base unit stats
pub const BASE_UNIT_HEALTH: f32 = 120.0;
pub const BASE_UNIT_ATTACK: f32 = 14.0;
pub const BASE_UNIT_RANGE: f32 = 24.0;
pub const BASE_UNIT_SPEED: f32 = 0.9;

// Upgrade increments per level
pub const HEALTH_PER_UPGRADE: f32 = 12.0;
pub const ATTACK_PER_UPGRADE: f32 = 4.0;
pub const SPEED_PER_UPGRADE: f32 = 0.08;

// Combat
pub const BLUE_DAMAGE_MULTIPLIER: f32 = 1.0;
pub const RED_DAMAGE_MULTIPLIER: f32 = 0.9;
pub const HIT_EFFECT_SPREAD: f32 = 12.0;

// Movement
pub const WAYPOINT_REACHED_DISTANCE: f32 = 6.0;

// Formations (pixels)
pub const LINE_SPACING: f32 = 28.0;
pub const COLUMN_SPACING: f32 = 26.0;
pub const WEDGE_LAYER_SPREAD: f32 = 22.0;
pub const WEDGE_LEFT_STAGGER: f32 = 6.0;
pub const WEDGE_LAYER_DEPTH: f32 = 20.0;

// Spawn layout (pixels)
pub const SPAWN_EDGE_OFFSET: f32 = 80.0;
pub const SPAWN_TOP_OFFSET: f32 = 120.0;
pub const SPAWN_UNITS_PER_ROW: u32 = 6;
pub const SPAWN_COLUMN_SPACING: f32 = 28.0;
pub const SPAWN_ROW_SPACING: f32 = 34.0;
pub const SPAWN_X_JITTER: f32 = 4.0;
pub const SPAWN_Y_JITTER: f32 = 3.0;

// Corpses and rewards
pub const CORPSE_REMOVAL_CHANCE: f64 = 0.02;
pub const CREDITS_PER_REMOVAL: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battlefield_divides_into_whole_cells() {
        assert_eq!(BATTLEFIELD_WIDTH % CELL_WIDTH, 0.0);
        assert_eq!(BATTLEFIELD_HEIGHT % CELL_HEIGHT, 0.0);
    }

    #[test]
    fn test_red_penalty_is_ten_percent() {
        assert!((BLUE_DAMAGE_MULTIPLIER - RED_DAMAGE_MULTIPLIER - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_waypoint_threshold_smaller_than_cell() {
        assert!(WAYPOINT_REACHED_DISTANCE < CELL_WIDTH / 2.0);
        assert!(WAYPOINT_REACHED_DISTANCE < CELL_HEIGHT / 2.0);
    }

    #[test]
    fn test_removal_chance_is_probability() {
        assert!((0.0..=1.0).contains(&CORPSE_REMOVAL_CHANCE));
    }
}
