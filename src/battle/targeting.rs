//! Enemy target selection
//!
//! A unit keeps its target for as long as that target lives. Only when the
//! handle is empty, dangling, or points at a corpse does it scan the roster
//! for the nearest living enemy.

use crate::battle::units::{Unit, UnitId};

/// Index of a unit in the roster by id
pub fn unit_index(units: &[Unit], id: UnitId) -> Option<usize> {
    units.iter().position(|u| u.id == id)
}

/// Resolve a unit's target handle to a roster index, if the target is alive
pub fn live_target_index(units: &[Unit], unit: &Unit) -> Option<usize> {
    let target_id = unit.target?;
    let idx = unit_index(units, target_id)?;
    units[idx].is_alive().then_some(idx)
}

/// Find the nearest living enemy of `units[attacker_idx]`
///
/// Euclidean distance; on equal distance the unit earliest in the roster
/// wins. Returns `None` when the opposing team has no living units.
pub fn find_nearest_enemy(units: &[Unit], attacker_idx: usize) -> Option<usize> {
    let attacker = units.get(attacker_idx)?;

    let mut best: Option<(usize, f32)> = None;
    for (idx, candidate) in units.iter().enumerate() {
        if candidate.team == attacker.team || candidate.is_dead() {
            continue;
        }

        let dist = attacker.distance_to(candidate.position);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((idx, dist)),
        }
    }

    best.map(|(idx, _)| idx)
}
