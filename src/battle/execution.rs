//! Battle execution loop
//!
//! Each running tick: targeting -> movement -> combat (per unit, roster
//! order) -> corpse cleanup -> outcome check. A paused tick only advances
//! the frame counter.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::command::{issue_command, CommandInput, CommandOutcome, CommandState};
use crate::battle::formation_layout::{FormationKind, FormationSpacing};
use crate::battle::grid::BattleGrid;
use crate::battle::movement::{follow_path, step_distance, step_toward};
use crate::battle::pathfinding::find_path;
use crate::battle::resolution::{in_attack_range, resolve_attack};
use crate::battle::snapshot::{BattleSnapshot, TeamStrength};
use crate::battle::spawn::{build_grid, spawn_roster, SpawnRequest};
use crate::battle::targeting::{find_nearest_enemy, live_target_index, unit_index};
use crate::battle::units::{Team, Unit, UnitId};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{Tick, Vec2};

/// Per-frame input from the host loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Milliseconds since the previous frame, uncapped
    pub wall_clock_delta_ms: f32,
    pub speed_multiplier: f32,
    /// False while the player has the simulation paused
    pub running: bool,
}

impl TickInput {
    pub fn new(wall_clock_delta_ms: f32, speed_multiplier: f32) -> Self {
        Self {
            wall_clock_delta_ms,
            speed_multiplier,
            running: true,
        }
    }

    pub fn paused(wall_clock_delta_ms: f32) -> Self {
        Self {
            wall_clock_delta_ms,
            speed_multiplier: 1.0,
            running: false,
        }
    }

    /// Simulated seconds for this frame: the raw delta is capped at
    /// `max_delta_ms` first, then scaled by the speed multiplier.
    pub fn scaled_dt(&self, max_delta_ms: f32) -> f32 {
        let capped = self.wall_clock_delta_ms.clamp(0.0, max_delta_ms);
        capped / 1000.0 * self.speed_multiplier.max(0.0)
    }
}

/// Converts monotonic frame timestamps into `TickInput`s
///
/// The clock advances on every frame, paused or not, so the first frame
/// after a resume sees a normal delta rather than the whole pause.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start measuring from `now_ms`
    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            last_ms: Some(now_ms),
        }
    }

    pub fn frame(&mut self, now_ms: f64, speed_multiplier: f32, running: bool) -> TickInput {
        let delta = self
            .last_ms
            .map(|last| (now_ms - last).max(0.0))
            .unwrap_or(0.0);
        self.last_ms = Some(now_ms);

        TickInput {
            wall_clock_delta_ms: delta as f32,
            speed_multiplier,
            running,
        }
    }
}

/// Battle outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleOutcome {
    #[default]
    Undecided,
    Victory(Team),
    /// Neither side has a living unit
    Draw,
}

impl BattleOutcome {
    pub fn from_strength(strength: &TeamStrength) -> Self {
        match (strength.blue_alive > 0, strength.red_alive > 0) {
            (true, true) => BattleOutcome::Undecided,
            (true, false) => BattleOutcome::Victory(Team::Blue),
            (false, true) => BattleOutcome::Victory(Team::Red),
            (false, false) => BattleOutcome::Draw,
        }
    }
}

/// Log entry for battle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub tick: Tick,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    BattleStarted { blue: usize, red: usize },
    TargetAcquired { unit_id: UnitId, target_id: UnitId },
    UnitKilled { unit_id: UnitId, killer_id: UnitId },
    CorpseRemoved { unit_id: UnitId },
    BattleEnded { outcome: BattleOutcome },
}

/// Log of events from a single tick
#[derive(Debug, Clone, Default)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, tick: Tick) {
        self.events.push(BattleEvent {
            tick,
            event_type,
            description,
        });
    }
}

/// A landed attack, for hit effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    pub attacker_id: UnitId,
    pub target_id: UnitId,
    pub damage: f32,
    pub position: Vec2,
}

/// Everything a frame produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: Tick,
    /// Simulated seconds applied this frame; zero when paused
    pub dt: f32,
    /// Reward credits for corpses removed this frame
    pub credits: u32,
    pub removed: Vec<UnitId>,
    pub events: Vec<BattleEvent>,
    pub hits: Vec<HitEvent>,
    pub snapshot: BattleSnapshot,
}

/// Complete battle state
///
/// Owned by the host. Commands and ticks both take `&mut self`, so a
/// command can never land in the middle of a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub config: SimulationConfig,
    pub grid: BattleGrid,
    pub units: Vec<Unit>,
    pub commands: CommandState,

    // Time
    pub tick: Tick,
    pub frame: u64,
    pub sim_time: f32,
    pub outcome: BattleOutcome,

    // Rewards
    pub credits_earned: u64,
    pub corpses_removed: u64,

    // Log
    pub battle_log: Vec<BattleEvent>,
}

impl BattleState {
    pub fn new(config: SimulationConfig, grid: BattleGrid, units: Vec<Unit>) -> Result<Self> {
        config.validate()?;

        let mut state = Self {
            config,
            grid,
            units,
            commands: CommandState::default(),
            tick: 0,
            frame: 0,
            sim_time: 0.0,
            outcome: BattleOutcome::Undecided,
            credits_earned: 0,
            corpses_removed: 0,
            battle_log: Vec::new(),
        };
        state.log_start();
        Ok(state)
    }

    /// Build the standard battlefield and roster for a spawn request
    pub fn from_spawn(config: SimulationConfig, request: &SpawnRequest) -> Result<Self> {
        config.validate()?;
        let grid = build_grid(&config)?;
        let units = spawn_roster(&config, request);
        Self::new(config, grid, units)
    }

    /// Replace the roster with a fresh one; the grid is kept
    pub fn respawn(&mut self, request: &SpawnRequest) {
        self.units = spawn_roster(&self.config, request);
        self.tick = 0;
        self.sim_time = 0.0;
        self.outcome = BattleOutcome::Undecided;
        self.battle_log.clear();
        self.log_start();
    }

    fn log_start(&mut self) {
        let strength = self.strength();
        tracing::info!(
            "Battle set up: {} blue vs {} red on {}x{} grid with {} obstacles",
            strength.blue_alive,
            strength.red_alive,
            self.grid.cols(),
            self.grid.rows(),
            self.grid.obstacle_count()
        );
        self.log_event(
            BattleEventType::BattleStarted {
                blue: strength.blue_alive,
                red: strength.red_alive,
            },
            format!(
                "{} blue vs {} red",
                strength.blue_alive, strength.red_alive
            ),
        );
    }

    /// Log a battle event
    pub fn log_event(&mut self, event_type: BattleEventType, description: String) {
        self.battle_log.push(BattleEvent {
            tick: self.tick,
            event_type,
            description,
        });
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        unit_index(&self.units, id).map(|idx| &self.units[idx])
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        unit_index(&self.units, id).map(move |idx| &mut self.units[idx])
    }

    pub fn strength(&self) -> TeamStrength {
        TeamStrength::from_units(&self.units)
    }

    pub fn is_finished(&self) -> bool {
        self.outcome != BattleOutcome::Undecided
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::capture(&self.units, self.tick, self.sim_time)
    }

    /// Set the formation used by subsequent formation commands
    pub fn select_formation(&mut self, kind: FormationKind) {
        self.commands.select_formation(kind);
    }

    /// Apply a player command between ticks
    pub fn command(&mut self, input: &CommandInput) -> CommandOutcome {
        let spacing = FormationSpacing::from_config(&self.config);
        issue_command(
            &mut self.units,
            &self.grid,
            self.config.player_team,
            self.commands.formation,
            &spacing,
            input,
        )
    }

    /// Run one frame
    pub fn run_tick<R: Rng + ?Sized>(&mut self, input: &TickInput, rng: &mut R) -> TickReport {
        self.frame += 1;

        if !input.running {
            tracing::trace!("Frame {} paused", self.frame);
            return TickReport {
                tick: self.tick,
                snapshot: self.snapshot(),
                ..TickReport::default()
            };
        }

        let dt = input.scaled_dt(self.config.max_frame_delta_ms);
        self.tick += 1;
        self.sim_time += dt;

        let mut events = BattleEventLog::new();
        let mut hits = Vec::new();

        // ===== PHASE 1: UNITS =====
        self.phase_units(dt, rng, &mut events, &mut hits);

        // ===== PHASE 2: CORPSES =====
        let removed = self.phase_cleanup(rng, &mut events);
        let credits = removed.len() as u32 * self.config.credits_per_removal;
        self.credits_earned += credits as u64;
        self.corpses_removed += removed.len() as u64;

        // ===== PHASE 3: OUTCOME =====
        self.phase_outcome(&mut events);

        self.battle_log.extend(events.events.iter().cloned());

        TickReport {
            tick: self.tick,
            dt,
            credits,
            removed,
            events: events.events,
            hits,
            snapshot: self.snapshot(),
        }
    }

    fn phase_units<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        rng: &mut R,
        events: &mut BattleEventLog,
        hits: &mut Vec<HitEvent>,
    ) {
        // Sequential on purpose: a unit killed earlier in the pass does not
        // act later in the same pass
        for idx in 0..self.units.len() {
            if self.units[idx].is_dead() {
                continue;
            }
            self.acquire_target(idx, events);
            self.advance_unit(idx, dt, rng, events, hits);
        }
    }

    fn acquire_target(&mut self, idx: usize, events: &mut BattleEventLog) {
        if live_target_index(&self.units, &self.units[idx]).is_some() {
            return;
        }

        let Some(enemy_idx) = find_nearest_enemy(&self.units, idx) else {
            self.units[idx].target = None;
            return;
        };

        let target_id = self.units[enemy_idx].id;
        let path = find_path(&self.grid, self.units[idx].position, self.units[enemy_idx].position);
        let description = format!(
            "{} targets {}",
            self.units[idx].label(),
            self.units[enemy_idx].label()
        );

        let unit = &mut self.units[idx];
        unit.target = Some(target_id);
        unit.path = path;

        tracing::debug!("{}", description);
        events.push(
            BattleEventType::TargetAcquired {
                unit_id: unit.id,
                target_id,
            },
            description,
            self.tick,
        );
    }

    fn advance_unit<R: Rng + ?Sized>(
        &mut self,
        idx: usize,
        dt: f32,
        rng: &mut R,
        events: &mut BattleEventLog,
        hits: &mut Vec<HitEvent>,
    ) {
        let step = step_distance(&self.units[idx], self.config.motion_frames_per_second, dt);

        // Path following preempts pursuit until the path drains
        if !self.units[idx].path.is_empty() {
            follow_path(&mut self.units[idx], step, self.config.waypoint_reached_distance);
            return;
        }

        let Some(target_idx) = live_target_index(&self.units, &self.units[idx]) else {
            return;
        };

        let target_position = self.units[target_idx].position;
        if !in_attack_range(&self.units[idx], target_position) {
            step_toward(&mut self.units[idx].position, target_position, step);
            return;
        }

        let multiplier = self.config.damage_multiplier(self.units[idx].team);
        let spread = self.config.hit_effect_spread;
        let (attacker, target) = attacker_and_target(&mut self.units, idx, target_idx);
        let outcome = resolve_attack(attacker, target, multiplier, dt, spread, rng);

        hits.push(HitEvent {
            attacker_id: attacker.id,
            target_id: target.id,
            damage: outcome.damage,
            position: outcome.effect_position,
        });

        if outcome.killed {
            tracing::debug!("{} killed by {}", target.label(), attacker.label());
            events.push(
                BattleEventType::UnitKilled {
                    unit_id: target.id,
                    killer_id: attacker.id,
                },
                format!("{} killed by {}", target.label(), attacker.label()),
                self.tick,
            );
        }
    }

    /// Remove each corpse with the configured chance. Returns removed ids.
    fn phase_cleanup<R: Rng + ?Sized>(&mut self, rng: &mut R, events: &mut BattleEventLog) -> Vec<UnitId> {
        let chance = self.config.corpse_removal_chance;
        let mut removed = Vec::new();

        self.units.retain(|unit| {
            if unit.is_dead() && rng.gen_bool(chance) {
                removed.push(unit.id);
                false
            } else {
                true
            }
        });

        for &unit_id in &removed {
            tracing::debug!("Corpse {} removed", unit_id.0);
            events.push(
                BattleEventType::CorpseRemoved { unit_id },
                format!("Corpse {} removed", unit_id.0),
                self.tick,
            );
        }

        removed
    }

    fn phase_outcome(&mut self, events: &mut BattleEventLog) {
        if self.is_finished() {
            return;
        }

        let outcome = BattleOutcome::from_strength(&self.strength());
        if outcome == BattleOutcome::Undecided {
            return;
        }

        self.outcome = outcome;
        tracing::info!("Battle ended at tick {}: {:?}", self.tick, outcome);
        events.push(
            BattleEventType::BattleEnded { outcome },
            format!("Battle ended: {:?}", outcome),
            self.tick,
        );
    }
}

/// Borrow the attacker immutably and its target mutably from one roster
fn attacker_and_target(units: &mut [Unit], attacker: usize, target: usize) -> (&Unit, &mut Unit) {
    debug_assert_ne!(attacker, target);
    if attacker < target {
        let (left, right) = units.split_at_mut(target);
        (&left[attacker], &mut right[0])
    } else {
        let (left, right) = units.split_at_mut(attacker);
        (&right[0], &mut left[target])
    }
}
