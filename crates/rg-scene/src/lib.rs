//! `rg-scene` — scene description model and JSON loader.
//!
//! A *scene* is the static furniture of an arena: obstacle polygons plus
//! exactly one agent spawn.  Scenes come from JSON files written by external
//! editors or from [`SceneBuilder`] in code; both paths run the same
//! validation, so a [`Scene`] in hand is always well-formed.
//!
//! | Module         | Contents                                        |
//! |----------------|-------------------------------------------------|
//! | [`descriptor`] | `BodyClass`, `BodyDescriptor`, `Scene`          |
//! | [`loader`]     | JSON wire format, `load_scene{,_reader}`        |
//! | [`builder`]    | `SceneBuilder` for programmatic construction    |
//! | [`error`]      | `SceneError`, `SceneResult`                     |

pub mod builder;
pub mod descriptor;
pub mod error;
pub mod loader;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::SceneBuilder;
pub use descriptor::{BodyClass, BodyDescriptor, Scene};
pub use error::{SceneError, SceneResult};
pub use loader::{load_scene, load_scene_reader};
