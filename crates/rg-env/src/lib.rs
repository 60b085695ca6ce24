//! Gym-style driving environment.
//!
//! | Module  | Contents                                             |
//! |---------|------------------------------------------------------|
//! | `env`   | [`Environment`]: step / reset / state / reward       |
//! | `error` | [`EnvError`] and the crate-wide result alias         |
//!
//! The environment owns its physics backend behind the
//! [`PhysicsWorld`](rg_world::PhysicsWorld) seam.  [`Environment::from_scene`]
//! picks the shipped planar backend; tests and custom integrations can slot
//! in their own via [`Environment::with_world`].

mod env;
mod error;

pub use env::{EnvSignal, Environment};
pub use error::{EnvError, EnvResult};
