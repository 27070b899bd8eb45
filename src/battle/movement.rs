//! Unit movement along waypoints
//!
//! Motion is integrated per tick: a unit covers `speed * frames_per_second * dt`
//! pixels toward its next waypoint or its target.

use crate::battle::units::Unit;
use crate::core::types::Vec2;

/// Result of a movement tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementResult {
    pub moved: bool,
    pub reached_waypoint: bool,
}

/// Pixels a unit covers this tick
pub fn step_distance(unit: &Unit, frames_per_second: f32, dt: f32) -> f32 {
    unit.stats.speed * frames_per_second * dt
}

/// Move a point straight toward `destination` by `distance`
///
/// No clamping at the destination; the caller's arrival threshold absorbs
/// any overshoot. A point already on the destination does not move.
pub fn step_toward(position: &mut Vec2, destination: Vec2, distance: f32) {
    let direction = (destination - *position).normalize_or_zero();
    *position += direction * distance;
}

/// Advance a unit along its path by one tick
///
/// A waypoint within `arrive_distance` is consumed instead of moving; the
/// unit moves again on the next tick. Units without a path do nothing.
pub fn follow_path(unit: &mut Unit, step: f32, arrive_distance: f32) -> MovementResult {
    let mut result = MovementResult::default();

    let Some(&next) = unit.path.first() else {
        return result;
    };

    if unit.distance_to(next) < arrive_distance {
        unit.path.remove(0);
        result.reached_waypoint = true;
    } else {
        step_toward(&mut unit.position, next, step);
        result.moved = true;
    }

    result
}
