//! Combat resolution between an attacker and its target
//!
//! Damage is continuous: `attack * dt * team_multiplier` per tick while the
//! target is inside attack range. Red units hit 10% softer than blue.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::units::Unit;
use crate::core::types::Vec2;

/// Outcome of one attack tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub damage: f32,
    /// True if this attack took the target from alive to dead
    pub killed: bool,
    /// Where the hit effect should appear, jittered around the target
    pub effect_position: Vec2,
}

/// Damage dealt by `attacker` over `dt` seconds
pub fn attack_damage(attacker: &Unit, team_multiplier: f32, dt: f32) -> f32 {
    attacker.stats.attack * dt * team_multiplier
}

/// Whether `target_position` is within the attacker's reach
pub fn in_attack_range(attacker: &Unit, target_position: Vec2) -> bool {
    attacker.distance_to(target_position) <= attacker.stats.range
}

/// Random point inside a `spread`-wide square centered on `center`
pub fn hit_effect_position<R: Rng + ?Sized>(center: Vec2, spread: f32, rng: &mut R) -> Vec2 {
    let dx = (rng.gen::<f32>() - 0.5) * spread;
    let dy = (rng.gen::<f32>() - 0.5) * spread;
    center + Vec2::new(dx, dy)
}

/// Apply one tick of the attacker's damage to the target
pub fn resolve_attack<R: Rng + ?Sized>(
    attacker: &Unit,
    target: &mut Unit,
    team_multiplier: f32,
    dt: f32,
    effect_spread: f32,
    rng: &mut R,
) -> AttackOutcome {
    let damage = attack_damage(attacker, team_multiplier, dt);
    let killed = target.take_damage(damage);
    let effect_position = hit_effect_position(target.position, effect_spread, rng);

    AttackOutcome {
        damage,
        killed,
        effect_position,
    }
}
