//! Simulation configuration with documented constants
//!
//! Every tunable the battle uses is collected here. Defaults come from
//! `battle::constants`; a TOML file only needs to name the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::*;
use crate::battle::units::Team;
use crate::core::error::{Result, SkirmishError};

/// Configuration for the battle simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === BATTLEFIELD ===
    /// Battlefield width in pixels. Column count is `floor(width / cell_width)`.
    pub battlefield_width: f32,
    /// Battlefield height in pixels. Row count is `floor(height / cell_height)`.
    pub battlefield_height: f32,
    pub cell_width: f32,
    pub cell_height: f32,

    // === TIME ===
    /// Raw wall-clock delta is capped at this many milliseconds before the
    /// speed multiplier is applied.
    pub max_frame_delta_ms: f32,

    /// Movement speeds are expressed in pixels per frame at this frame rate.
    ///
    /// A unit with speed 0.9 covers `0.9 * 60 = 54` px per simulated second.
    pub motion_frames_per_second: f32,

    // === UNITS ===
    pub base_health: f32,
    pub base_attack: f32,
    pub base_range: f32,
    pub base_speed: f32,
    pub health_per_upgrade: f32,
    pub attack_per_upgrade: f32,
    pub speed_per_upgrade: f32,

    /// Team whose units take commands and receive attack/speed upgrades
    pub player_team: Team,

    // === COMBAT ===
    pub blue_damage_multiplier: f32,
    pub red_damage_multiplier: f32,
    /// Width of the square around a struck unit where hit effects appear
    pub hit_effect_spread: f32,

    // === MOVEMENT ===
    /// A waypoint closer than this is consumed from the path
    pub waypoint_reached_distance: f32,

    // === FORMATIONS ===
    pub line_spacing: f32,
    pub column_spacing: f32,
    pub wedge_layer_spread: f32,
    pub wedge_left_stagger: f32,
    pub wedge_layer_depth: f32,

    // === CORPSES ===
    /// Chance per tick that each dead unit is removed from the roster
    pub corpse_removal_chance: f64,

    /// Credits reported to the economy for each removed corpse
    pub credits_per_removal: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            battlefield_width: BATTLEFIELD_WIDTH,
            battlefield_height: BATTLEFIELD_HEIGHT,
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,

            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            motion_frames_per_second: MOTION_FRAMES_PER_SECOND,

            base_health: BASE_UNIT_HEALTH,
            base_attack: BASE_UNIT_ATTACK,
            base_range: BASE_UNIT_RANGE,
            base_speed: BASE_UNIT_SPEED,
            health_per_upgrade: HEALTH_PER_UPGRADE,
            attack_per_upgrade: ATTACK_PER_UPGRADE,
            speed_per_upgrade: SPEED_PER_UPGRADE,
            player_team: Team::Blue,

            blue_damage_multiplier: BLUE_DAMAGE_MULTIPLIER,
            red_damage_multiplier: RED_DAMAGE_MULTIPLIER,
            hit_effect_spread: HIT_EFFECT_SPREAD,

            waypoint_reached_distance: WAYPOINT_REACHED_DISTANCE,

            line_spacing: LINE_SPACING,
            column_spacing: COLUMN_SPACING,
            wedge_layer_spread: WEDGE_LAYER_SPREAD,
            wedge_left_stagger: WEDGE_LEFT_STAGGER,
            wedge_layer_depth: WEDGE_LAYER_DEPTH,

            corpse_removal_chance: CORPSE_REMOVAL_CHANCE,
            credits_per_removal: CREDITS_PER_REMOVAL,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Number of grid columns that fit the battlefield width
    pub fn grid_cols(&self) -> u32 {
        (self.battlefield_width / self.cell_width).floor() as u32
    }

    /// Number of grid rows that fit the battlefield height
    pub fn grid_rows(&self) -> u32 {
        (self.battlefield_height / self.cell_height).floor() as u32
    }

    /// Damage multiplier applied to attacks made by `team`
    pub fn damage_multiplier(&self, team: Team) -> f32 {
        match team {
            Team::Blue => self.blue_damage_multiplier,
            Team::Red => self.red_damage_multiplier,
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.cell_width <= 0.0 || self.cell_height <= 0.0 {
            return Err(SkirmishError::InvalidConfig(format!(
                "cell size must be positive, got {}x{}",
                self.cell_width, self.cell_height
            )));
        }

        if self.grid_cols() == 0 || self.grid_rows() == 0 {
            return Err(SkirmishError::InvalidConfig(format!(
                "battlefield {}x{} holds no whole cells",
                self.battlefield_width, self.battlefield_height
            )));
        }

        if self.max_frame_delta_ms <= 0.0 {
            return Err(SkirmishError::InvalidConfig(
                "max_frame_delta_ms must be positive".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.corpse_removal_chance) {
            return Err(SkirmishError::InvalidConfig(format!(
                "corpse_removal_chance ({}) must be within [0, 1]",
                self.corpse_removal_chance
            )));
        }

        if self.base_health <= 0.0 {
            return Err(SkirmishError::InvalidConfig(
                "base_health must be positive".into(),
            ));
        }

        let stats = [
            ("base_attack", self.base_attack),
            ("base_range", self.base_range),
            ("base_speed", self.base_speed),
            ("waypoint_reached_distance", self.waypoint_reached_distance),
            ("blue_damage_multiplier", self.blue_damage_multiplier),
            ("red_damage_multiplier", self.red_damage_multiplier),
        ];
        if let Some((name, value)) = stats.iter().find(|(_, v)| *v < 0.0) {
            return Err(SkirmishError::InvalidConfig(format!(
                "{} must not be negative, got {}",
                name, value
            )));
        }

        Ok(())
    }
}
