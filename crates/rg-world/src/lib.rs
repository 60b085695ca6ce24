//! `rg-world` — planar bodies, car-model kinematics, and ray casting.
//!
//! # Design
//!
//! The environment and sensor crates consume the world through the
//! [`PhysicsWorld`] trait, so the physics backend can be swapped without
//! touching the RL contract.  The shipped [`PlanarWorld`] implements the
//! minimum an arena needs: a car-like vehicle (signed scalar speed along a
//! heading), static obstacle containment by revert-and-stop, rigid child
//! attachment for probes and markers, and nearest-hit ray casting pruned by
//! an R-tree over obstacle edges.
//!
//! | Module       | Contents                                            |
//! |--------------|-----------------------------------------------------|
//! | [`body`]     | `BodyKind`, `Shape`, `Pose`, `Body`                 |
//! | [`intent`]   | `ControlIntent`                                     |
//! | [`geometry`] | segment/ray intersection, point-in-polygon, `Aabb`  |
//! | [`index`]    | R-tree edge index used to prune ray tests           |
//! | [`world`]    | the `PhysicsWorld` trait                            |
//! | [`planar`]   | `PlanarWorld`, the shipped implementation           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                               |
//! |------------|------------------------------------------------------|
//! | `serde`    | Adds serde derives to `BodyKind`/`Shape`/`Pose`.     |
//! | `parallel` | Casts sensor rays across Rayon workers.              |

pub mod body;
pub mod error;
pub mod geometry;
pub mod index;
pub mod intent;
pub mod planar;
pub mod world;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use body::{Body, BodyKind, Pose, Shape};
pub use error::{WorldError, WorldResult};
pub use intent::ControlIntent;
pub use planar::PlanarWorld;
pub use world::PhysicsWorld;
