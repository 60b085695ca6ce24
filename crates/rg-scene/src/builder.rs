//! Programmatic scene construction.

use rg_core::Vec2;

use crate::descriptor::{BodyClass, BodyDescriptor, Scene};
use crate::SceneResult;

/// Construct a [`Scene`] incrementally, then call [`build`](Self::build).
///
/// Runs the same validation as the JSON loader, so a builder-made scene and
/// a loaded scene are interchangeable.
///
/// # Example
///
/// ```
/// use rg_core::Vec2;
/// use rg_scene::SceneBuilder;
///
/// let scene = SceneBuilder::new()
///     .obstacle(40.0, 4, 0.0, Vec2::new(-300.0, 0.0))
///     .obstacle(60.0, 6, 0.3, Vec2::new(250.0, 100.0))
///     .agent(20.0, 3, 0.0, Vec2::ZERO)
///     .build()
///     .unwrap();
/// assert_eq!(scene.obstacles.len(), 2);
/// ```
pub struct SceneBuilder {
    bodies: Vec<BodyDescriptor>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self { bodies: Vec::new() }
    }

    /// Add a static obstacle: regular polygon with `sides` vertices on a
    /// circle of radius `size`, rotated by `heading` radians.
    pub fn obstacle(mut self, size: f32, sides: u32, heading: f32, position: Vec2) -> Self {
        self.bodies.push(BodyDescriptor {
            class: BodyClass::Obstacle,
            size,
            sides,
            heading,
            position,
        });
        self
    }

    /// Add the agent spawn.  `build` fails unless called exactly once.
    pub fn agent(mut self, size: f32, sides: u32, heading: f32, position: Vec2) -> Self {
        self.bodies.push(BodyDescriptor {
            class: BodyClass::Agent,
            size,
            sides,
            heading,
            position,
        });
        self
    }

    /// Validate and produce the scene.
    pub fn build(self) -> SceneResult<Scene> {
        Scene::from_descriptors(self.bodies)
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}
