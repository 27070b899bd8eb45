//! Player commands: click-to-move and formation moves
//!
//! Commands are applied between ticks. A plain command sends the nearest
//! living player unit to the point; a formation command lays every living
//! player unit out around the point using the active formation kind.
//! Either way the commanded units drop their current target.

use serde::{Deserialize, Serialize};

use crate::battle::formation_layout::{compute_formation_targets, FormationKind, FormationSpacing};
use crate::battle::grid::BattleGrid;
use crate::battle::pathfinding::find_path;
use crate::battle::units::{Team, Unit, UnitId};
use crate::core::types::Vec2;

/// A click on the battlefield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommandInput {
    pub point: Vec2,
    /// Move the whole team in formation instead of one unit
    pub formation_mode: bool,
}

impl CommandInput {
    pub fn move_to(point: Vec2) -> Self {
        Self {
            point,
            formation_mode: false,
        }
    }

    pub fn formation_to(point: Vec2) -> Self {
        Self {
            point,
            formation_mode: true,
        }
    }
}

/// Command-surface state that persists between commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandState {
    /// Formation used by the next formation command
    pub formation: FormationKind,
}

impl CommandState {
    pub fn select_formation(&mut self, kind: FormationKind) {
        self.formation = kind;
    }
}

/// What a command did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// The team has no living units to command
    NoUnits,
    Single { unit_id: UnitId },
    Formation { kind: FormationKind, unit_ids: Vec<UnitId> },
}

/// Apply a command to the living units of `team`
pub fn issue_command(
    units: &mut [Unit],
    grid: &BattleGrid,
    team: Team,
    formation: FormationKind,
    spacing: &FormationSpacing,
    input: &CommandInput,
) -> CommandOutcome {
    let commandable: Vec<usize> = units
        .iter()
        .enumerate()
        .filter(|(_, u)| u.team == team && u.is_alive())
        .map(|(idx, _)| idx)
        .collect();

    if commandable.is_empty() {
        return CommandOutcome::NoUnits;
    }

    if input.formation_mode {
        let group: Vec<&Unit> = commandable.iter().map(|&idx| &units[idx]).collect();
        let targets = compute_formation_targets(&group, input.point, formation, spacing);

        let mut unit_ids = Vec::with_capacity(commandable.len());
        for (i, &idx) in commandable.iter().enumerate() {
            let destination = targets
                .get(i % targets.len().max(1))
                .copied()
                .unwrap_or(input.point);
            let path = find_path(grid, units[idx].position, destination);
            units[idx].command_path(path);
            units[idx].selected = true;
            unit_ids.push(units[idx].id);
        }

        tracing::debug!(
            "{:?} formation command to ({:.0}, {:.0}) for {} {} units",
            formation,
            input.point.x,
            input.point.y,
            unit_ids.len(),
            team
        );

        return CommandOutcome::Formation {
            kind: formation,
            unit_ids,
        };
    }

    // Nearest unit wins; ties go to roster order
    let mut pick = commandable[0];
    let mut best = units[pick].distance_to(input.point);
    for &idx in commandable.iter().skip(1) {
        let dist = units[idx].distance_to(input.point);
        if dist < best {
            best = dist;
            pick = idx;
        }
    }

    for &idx in &commandable {
        units[idx].selected = idx == pick;
    }

    let path = find_path(grid, units[pick].position, input.point);
    units[pick].command_path(path);

    tracing::debug!(
        "{} ordered to ({:.0}, {:.0})",
        units[pick].label(),
        input.point.x,
        input.point.y
    );

    CommandOutcome::Single {
        unit_id: units[pick].id,
    }
}
