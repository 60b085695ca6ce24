//! Environment and trainer configuration.
//!
//! # Design
//!
//! Every tunable that was a scattered constant in earlier prototypes lives
//! on one of two plain structs with `Default` impls carrying the canonical
//! values.  Applications override fields with struct-update syntax:
//!
//! ```rust
//! use rg_core::EnvConfig;
//! let cfg = EnvConfig { sensor_count: 12, ..EnvConfig::default() };
//! assert!(cfg.validate().is_ok());
//! ```
//!
//! `validate()` is fail-fast and called by every construction site
//! (environment, trainer), so an invalid config can never reach the frame
//! loop.

use thiserror::Error;

/// Configuration validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum { field: &'static str, min: usize, value: usize },

    #[error("{field} must be in [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("batch_size {batch} exceeds replay_capacity {capacity}")]
    BatchExceedsCapacity { batch: usize, capacity: usize },

    #[error("proximity reward ray index {index} out of range for {sensor_count} sensors")]
    ProximityRayOutOfRange { index: usize, sensor_count: usize },

    #[error("proximity reward needs at least one ray index")]
    EmptyProximityRays,
}

/// Shorthand result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

// ── ProximityReward ───────────────────────────────────────────────────────────

/// Optional clearance term added to the base speed reward.
///
/// For each listed ray reporting distance `d` against sensor radius `R`, the
/// term contributes `(d - R) / R` (a penalty in `[-1, 0)`) when an obstacle
/// is in range, or `bonus` when the ray is clear.  The sum is divided by the
/// number of listed rays so covering several directions never outweighs the
/// speed term.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProximityReward {
    /// Rays that participate (probe 0 points straight ahead).
    pub ray_indices: Vec<usize>,
    /// Reward granted per clear ray before re-normalization.
    pub bonus: f32,
}

impl Default for ProximityReward {
    /// Front ray only, small clearance bonus.
    fn default() -> Self {
        Self { ray_indices: vec![0], bonus: 0.5 }
    }
}

// ── EnvConfig ─────────────────────────────────────────────────────────────────

/// Environment configuration: vehicle model, sensor geometry, arena bounds,
/// and reward shaping.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvConfig {
    /// Speed cap, units per frame.  The signed scalar speed is clamped to
    /// `[-max_speed, max_speed]` every frame.
    pub max_speed: f32,

    /// Acceleration magnitude applied by `Forward`/`Brake`, units/frame².
    pub speed_rate: f32,

    /// Heading change applied by `Left`/`Right`, radians per frame.
    pub rotation_rate: f32,

    /// Multiplicative per-frame speed loss: `speed *= 1 - drag_coefficient`.
    pub drag_coefficient: f32,

    /// Constant per-frame speed loss toward zero, units/frame.  Never flips
    /// the sign of the speed.
    pub friction_coefficient: f32,

    /// Number of sensor rays.  The observation has `sensor_count + 1`
    /// elements.
    pub sensor_count: usize,

    /// Ray reach in arena units.  A miss reports exactly this value.
    pub sensor_radius: f32,

    /// Speeds below this earn the flat `-1.0` stall penalty instead of the
    /// proportional speed reward.
    pub stop_threshold: f32,

    /// Arena extent.  Four border walls are always built from these bounds
    /// so the agent cannot leave the world.
    pub arena_width:    f32,
    pub arena_height:   f32,
    pub wall_thickness: f32,

    /// End the episode when the agent hits an obstacle.  Off by default:
    /// episodes end on step cutoff or external signal, and a collision just
    /// stops the vehicle.
    pub terminate_on_collision: bool,

    /// Optional clearance term added to the reward.  `None` = speed-only.
    pub proximity_reward: Option<ProximityReward>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            max_speed:              7.0,
            speed_rate:             0.15,
            rotation_rate:          0.06,
            drag_coefficient:       0.02,
            friction_coefficient:   0.0,
            sensor_count:           20,
            sensor_radius:          200.0,
            stop_threshold:         0.1,
            arena_width:            1920.0,
            arena_height:           1080.0,
            wall_thickness:         40.0,
            terminate_on_collision: false,
            proximity_reward:       None,
        }
    }
}

impl EnvConfig {
    /// Check every field for sanity.  Construction sites call this before
    /// touching the world, so the frame loop never sees a bad value.
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("max_speed", self.max_speed),
            ("speed_rate", self.speed_rate),
            ("rotation_rate", self.rotation_rate),
            ("sensor_radius", self.sensor_radius),
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("wall_thickness", self.wall_thickness),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        for (field, value) in [
            ("drag_coefficient", self.drag_coefficient),
            ("friction_coefficient", self.friction_coefficient),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { field, value });
            }
        }
        if !self.stop_threshold.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "stop_threshold",
                value: self.stop_threshold,
            });
        }
        if self.sensor_count < 1 {
            return Err(ConfigError::BelowMinimum {
                field: "sensor_count",
                min:   1,
                value: self.sensor_count,
            });
        }
        if let Some(prox) = &self.proximity_reward {
            if prox.ray_indices.is_empty() {
                return Err(ConfigError::EmptyProximityRays);
            }
            for &index in &prox.ray_indices {
                if index >= self.sensor_count {
                    return Err(ConfigError::ProximityRayOutOfRange {
                        index,
                        sensor_count: self.sensor_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Observation width for this configuration (`sensor_count + 1`).
    #[inline]
    pub fn observation_len(&self) -> usize {
        self.sensor_count + 1
    }
}

// ── TrainConfig ───────────────────────────────────────────────────────────────

/// Training-loop configuration: episode shape, cadences, replay geometry,
/// exploration cycling, and checkpointing.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainConfig {
    /// Steps per episode before the cutoff fires.
    pub episode_steps: u64,

    /// Train the online network every this many steps (K1).
    pub train_interval: u64,

    /// Copy online weights into the target network every this many steps (K2).
    pub target_sync_interval: u64,

    /// Replay ring capacity.  Oldest transitions are overwritten once full.
    pub replay_capacity: usize,

    /// Transitions per training batch.
    pub batch_size: usize,

    /// Recency-weighting exponent passed to replay sampling.  0 = uniform.
    pub sample_alpha: f32,

    /// Exploration rate the trainer jumps epsilon back up to once the decay
    /// schedule bottoms out at its floor.  Set equal to the floor to disable
    /// the re-exploration cycle.
    pub epsilon_reset: f32,

    /// Run identifier — names the checkpoint subdirectory.
    pub run_id: String,

    /// Root directory for checkpoints (`<dir>/<run_id>/model_<ep>_<avg>`).
    pub checkpoint_dir: std::path::PathBuf,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            episode_steps:        5000,
            train_interval:       3,
            target_sync_interval: 18,
            replay_capacity:      1500,
            batch_size:           64,
            sample_alpha:         0.6,
            epsilon_reset:        0.2,
            run_id:               "run".to_string(),
            checkpoint_dir:       std::path::PathBuf::from("model"),
            seed:                 42,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.episode_steps < 1 {
            return Err(ConfigError::BelowMinimum {
                field: "episode_steps",
                min:   1,
                value: self.episode_steps as usize,
            });
        }
        if self.train_interval < 1 {
            return Err(ConfigError::BelowMinimum {
                field: "train_interval",
                min:   1,
                value: self.train_interval as usize,
            });
        }
        if self.target_sync_interval < 1 {
            return Err(ConfigError::BelowMinimum {
                field: "target_sync_interval",
                min:   1,
                value: self.target_sync_interval as usize,
            });
        }
        if self.replay_capacity < 1 {
            return Err(ConfigError::BelowMinimum {
                field: "replay_capacity",
                min:   1,
                value: self.replay_capacity,
            });
        }
        if self.batch_size < 1 {
            return Err(ConfigError::BelowMinimum {
                field: "batch_size",
                min:   1,
                value: self.batch_size,
            });
        }
        if self.batch_size > self.replay_capacity {
            return Err(ConfigError::BatchExceedsCapacity {
                batch:    self.batch_size,
                capacity: self.replay_capacity,
            });
        }
        if !self.sample_alpha.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "sample_alpha",
                value: self.sample_alpha,
            });
        }
        if self.sample_alpha < 0.0 {
            return Err(ConfigError::Negative {
                field: "sample_alpha",
                value: self.sample_alpha,
            });
        }
        if !(0.0..=1.0).contains(&self.epsilon_reset) {
            return Err(ConfigError::OutOfUnitRange {
                field: "epsilon_reset",
                value: self.epsilon_reset,
            });
        }
        Ok(())
    }
}
