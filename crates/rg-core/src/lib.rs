//! `rg-core` — foundational types for the `raygym` RL training harness.
//!
//! This crate is a dependency of every other `rg-*` crate.  It intentionally
//! has no `rg-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `BodyId`                                              |
//! | [`vec2`]        | `Vec2` planar vector math                             |
//! | [`frame`]       | `Frame` counter                                       |
//! | [`action`]      | `Action` enum (the discrete control alphabet)         |
//! | [`observation`] | `Observation`, `Transition`                           |
//! | [`config`]      | `EnvConfig`, `TrainConfig`, validation                |
//! | [`rng`]         | `RunRng` (deterministic seeded streams)               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to the public value types   |
//! |         | so configs and recorded transitions can be written to disk.|

pub mod action;
pub mod config;
pub mod frame;
pub mod ids;
pub mod observation;
pub mod rng;
pub mod vec2;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use action::Action;
pub use config::{ConfigError, ConfigResult, EnvConfig, ProximityReward, TrainConfig};
pub use frame::Frame;
pub use ids::BodyId;
pub use observation::{Observation, Transition};
pub use rng::RunRng;
pub use vec2::Vec2;
