//! Validated in-memory scene representation.

use rg_core::Vec2;

use crate::{SceneError, SceneResult};

/// What a scene body becomes when the world is built.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BodyClass {
    /// Static polygon the agent collides with and senses.
    Obstacle,
    /// The controllable vehicle.  Exactly one per scene.
    Agent,
}

impl BodyClass {
    /// Wire encoding used by the JSON scene format (0 = obstacle, 1 = agent).
    pub fn from_wire(tag: u8) -> Option<BodyClass> {
        match tag {
            0 => Some(BodyClass::Obstacle),
            1 => Some(BodyClass::Agent),
            _ => None,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            BodyClass::Obstacle => 0,
            BodyClass::Agent    => 1,
        }
    }
}

/// One body record: a regular polygon with `sides` vertices on a circle of
/// radius `size`, rotated to `heading` and centred at `position`.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyDescriptor {
    pub class:    BodyClass,
    pub size:     f32,
    pub sides:    u32,
    pub heading:  f32,
    pub position: Vec2,
}

impl BodyDescriptor {
    /// Geometry sanity check shared by the loader and the builder.
    pub(crate) fn validate(&self, index: usize) -> SceneResult<()> {
        if self.sides < 3 {
            return Err(SceneError::Parse(format!(
                "body {index}: polygon needs at least 3 sides, got {}",
                self.sides
            )));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(SceneError::Parse(format!(
                "body {index}: size must be finite and positive, got {}",
                self.size
            )));
        }
        if !self.heading.is_finite() {
            return Err(SceneError::Parse(format!(
                "body {index}: heading must be finite, got {}",
                self.heading
            )));
        }
        if !self.position.is_finite() {
            return Err(SceneError::Parse(format!(
                "body {index}: position must be finite, got {}",
                self.position
            )));
        }
        Ok(())
    }
}

/// A validated scene: obstacles plus exactly one agent.
///
/// Construct through [`crate::load_scene`] or [`crate::SceneBuilder`]; the
/// separation of `agent` from `obstacles` is itself the one-agent invariant.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub obstacles: Vec<BodyDescriptor>,
    pub agent:     BodyDescriptor,
}

impl Scene {
    /// Partition raw descriptors into a scene, enforcing the one-agent rule
    /// and per-body geometry checks.  The obstacle order of the input is
    /// preserved.
    pub(crate) fn from_descriptors(bodies: Vec<BodyDescriptor>) -> SceneResult<Scene> {
        for (index, body) in bodies.iter().enumerate() {
            body.validate(index)?;
        }

        let agent_count = bodies.iter().filter(|b| b.class == BodyClass::Agent).count();
        if agent_count != 1 {
            return Err(SceneError::AgentCount { found: agent_count });
        }

        let mut agent = None;
        let mut obstacles = Vec::with_capacity(bodies.len() - 1);
        for body in bodies {
            match body.class {
                BodyClass::Agent    => agent = Some(body),
                BodyClass::Obstacle => obstacles.push(body),
            }
        }

        // agent_count == 1 guarantees the Some.
        let agent = agent.ok_or(SceneError::AgentCount { found: 0 })?;
        Ok(Scene { obstacles, agent })
    }

    pub fn body_count(&self) -> usize {
        self.obstacles.len() + 1
    }
}
