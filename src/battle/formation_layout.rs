//! Formation layout computation
//!
//! Converts a group of units, an anchor point and a formation kind into one
//! destination point per unit. Pure: nothing is mutated here. Callers pair
//! unit `i` with `targets[i % targets.len()]`.

use serde::{Deserialize, Serialize};

use crate::battle::units::Unit;
use crate::core::config::SimulationConfig;
use crate::core::types::Vec2;

/// Layout pattern for multi-unit move commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormationKind {
    /// Horizontal row centered on the anchor
    #[default]
    Line,
    /// Chevron opening backwards from the anchor
    Wedge,
    /// Single file stacked below the anchor
    Column,
}

impl FormationKind {
    pub const ALL: [FormationKind; 3] = [FormationKind::Line, FormationKind::Wedge, FormationKind::Column];
}

impl std::str::FromStr for FormationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "line" => Ok(FormationKind::Line),
            "wedge" => Ok(FormationKind::Wedge),
            "column" => Ok(FormationKind::Column),
            other => Err(format!("unknown formation '{}'", other)),
        }
    }
}

/// Spacing parameters for the formation shapes (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationSpacing {
    pub line: f32,
    pub column: f32,
    pub wedge_spread: f32,
    pub wedge_left_stagger: f32,
    pub wedge_depth: f32,
}

impl FormationSpacing {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            line: config.line_spacing,
            column: config.column_spacing,
            wedge_spread: config.wedge_layer_spread,
            wedge_left_stagger: config.wedge_left_stagger,
            wedge_depth: config.wedge_layer_depth,
        }
    }
}

impl Default for FormationSpacing {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

/// Compute one destination per unit for the given formation
pub fn compute_formation_targets(
    units: &[&Unit],
    anchor: Vec2,
    kind: FormationKind,
    spacing: &FormationSpacing,
) -> Vec<Vec2> {
    compute_formation_positions(units.len(), anchor, kind, spacing)
}

/// Compute `unit_count` formation points around `anchor`
///
/// An empty group yields no points.
pub fn compute_formation_positions(
    unit_count: usize,
    anchor: Vec2,
    kind: FormationKind,
    spacing: &FormationSpacing,
) -> Vec<Vec2> {
    match kind {
        FormationKind::Line => compute_line_positions(anchor, spacing.line, unit_count),
        FormationKind::Column => compute_column_positions(anchor, spacing.column, unit_count),
        FormationKind::Wedge => compute_wedge_positions(anchor, spacing, unit_count),
    }
}

fn compute_line_positions(anchor: Vec2, spacing: f32, unit_count: usize) -> Vec<Vec2> {
    let start_x = anchor.x - (unit_count as f32 - 1.0) / 2.0 * spacing;

    (0..unit_count)
        .map(|i| Vec2::new(start_x + i as f32 * spacing, anchor.y))
        .collect()
}

fn compute_column_positions(anchor: Vec2, spacing: f32, unit_count: usize) -> Vec<Vec2> {
    (0..unit_count)
        .map(|i| Vec2::new(anchor.x, anchor.y + i as f32 * spacing))
        .collect()
}

fn compute_wedge_positions(anchor: Vec2, spacing: &FormationSpacing, unit_count: usize) -> Vec<Vec2> {
    let mut positions = Vec::with_capacity(unit_count);
    let layers = unit_count.div_ceil(2);

    for layer in 0..layers {
        let spread = layer as f32 * spacing.wedge_spread;
        let y = anchor.y + layer as f32 * spacing.wedge_depth;

        // Right arm first, then the left arm pushed out a little further
        positions.push(Vec2::new(anchor.x + spread, y));
        if positions.len() < unit_count {
            positions.push(Vec2::new(anchor.x - (spread + spacing.wedge_left_stagger), y));
        }
    }

    positions
}
