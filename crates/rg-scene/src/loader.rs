//! JSON scene loader.
//!
//! # Wire format
//!
//! One top-level object with a `bodies` array; one record per body:
//!
//! ```json
//! {"bodies": [
//!   {"type": 0, "size": 40.0, "shape": 4, "dir": 0.785, "x": -500.0, "y": 120.0},
//!   {"type": 1, "size": 20.0, "shape": 3, "dir": 0.0,   "x": 0.0,    "y": 0.0}
//! ]}
//! ```
//!
//! | Field   | Meaning                                            |
//! |---------|----------------------------------------------------|
//! | `type`  | 0 = obstacle, 1 = agent (exactly one per file)     |
//! | `size`  | circumradius of the regular polygon                |
//! | `shape` | vertex count (≥ 3)                                 |
//! | `dir`   | initial rotation/heading, radians                  |
//! | `x`,`y` | centre position, arena coordinates                 |
//!
//! Loading is fail-fast: a malformed record, a non-finite number, or an
//! agent count other than one rejects the whole file.  No partial scene is
//! ever returned.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use rg_core::Vec2;

use crate::descriptor::{BodyClass, BodyDescriptor, Scene};
use crate::{SceneError, SceneResult};

// ── Wire records ──────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct SceneFile {
    bodies: Vec<BodyRecord>,
}

#[derive(Serialize, Deserialize)]
struct BodyRecord {
    #[serde(rename = "type")]
    class: u8,
    size:  f32,
    shape: u32,
    dir:   f32,
    x:     f32,
    y:     f32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and validate a scene from a JSON file.
pub fn load_scene(path: &Path) -> SceneResult<Scene> {
    let file = std::fs::File::open(path).map_err(SceneError::Io)?;
    load_scene_reader(std::io::BufReader::new(file))
}

/// Like [`load_scene`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or for scenes embedded as
/// string constants in application binaries.
pub fn load_scene_reader<R: Read>(reader: R) -> SceneResult<Scene> {
    let file: SceneFile =
        serde_json::from_reader(reader).map_err(|e| SceneError::Parse(e.to_string()))?;

    let bodies = file
        .bodies
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let class = BodyClass::from_wire(record.class).ok_or_else(|| {
                SceneError::Parse(format!(
                    "body {index}: unknown type {} (expected 0 or 1)",
                    record.class
                ))
            })?;
            Ok(BodyDescriptor {
                class,
                size:     record.size,
                sides:    record.shape,
                heading:  record.dir,
                position: Vec2::new(record.x, record.y),
            })
        })
        .collect::<SceneResult<Vec<_>>>()?;

    Scene::from_descriptors(bodies)
}

impl Scene {
    /// Serialize back to the wire format, agent last.  Symmetric with the
    /// loader so edited scenes survive a round trip.
    pub fn to_json(&self) -> SceneResult<String> {
        let records = self
            .obstacles
            .iter()
            .chain(std::iter::once(&self.agent))
            .map(|body| BodyRecord {
                class: body.class.to_wire(),
                size:  body.size,
                shape: body.sides,
                dir:   body.heading,
                x:     body.position.x,
                y:     body.position.y,
            })
            .collect();

        serde_json::to_string(&SceneFile { bodies: records })
            .map_err(|e| SceneError::Parse(e.to_string()))
    }
}
