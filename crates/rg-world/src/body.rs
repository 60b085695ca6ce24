//! Body model: tagged kinds, shapes, poses.

use rg_core::{BodyId, Vec2};

use crate::{ControlIntent, WorldError, WorldResult};

/// What a body is to the physics, chosen at creation and fixed for life.
///
/// | Kind             | Moves | Collides | Sensed by rays |
/// |------------------|-------|----------|----------------|
/// | `StaticObstacle` | no    | yes      | yes            |
/// | `DynamicAgent`   | yes   | yes      | no             |
/// | `AttachedProbe`  | with parent | no | no             |
/// | `VisualMarker`   | with parent | no | no             |
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyKind {
    /// Immovable collision geometry: walls, pillars, scene furniture.
    StaticObstacle,
    /// The steerable vehicle.  Accepts [`ControlIntent`]s.
    DynamicAgent,
    /// Massless ray emitter rigidly attached to a parent; records the
    /// nearest hit along its heading each frame.
    AttachedProbe,
    /// Massless decoration rigidly attached to a parent.  No physics at all.
    VisualMarker,
}

/// Collision/sensing outline of a body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// No extent.  Used by probes.
    Point,
    /// Regular polygon: `sides` vertices on a circle of radius `radius`.
    Regular { sides: u32, radius: f32 },
    /// Axis-aligned box in the body's local frame (rotates with the pose).
    Rect { half_extents: Vec2 },
}

impl Shape {
    pub const POINT: Shape = Shape::Point;

    /// Regular polygon, validated: at least 3 sides, positive finite radius.
    pub fn regular(sides: u32, radius: f32) -> WorldResult<Shape> {
        if sides < 3 {
            return Err(WorldError::InvalidShape(format!(
                "regular polygon needs at least 3 sides, got {sides}"
            )));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(WorldError::InvalidShape(format!(
                "polygon radius must be finite and positive, got {radius}"
            )));
        }
        Ok(Shape::Regular { sides, radius })
    }

    /// Rectangle from full width/height, validated positive and finite.
    pub fn rect(width: f32, height: f32) -> WorldResult<Shape> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(WorldError::InvalidShape(format!(
                "rect extent must be finite and positive, got {width}x{height}"
            )));
        }
        Ok(Shape::Rect { half_extents: Vec2::new(width * 0.5, height * 0.5) })
    }

    /// World-space vertices for this shape under `pose`, counter-clockwise.
    /// `Point` has none.
    pub fn vertices(&self, pose: Pose) -> Vec<Vec2> {
        match *self {
            Shape::Point => Vec::new(),
            Shape::Regular { sides, radius } => {
                let step = std::f32::consts::TAU / sides as f32;
                (0..sides)
                    .map(|k| {
                        pose.position + Vec2::from_angle(pose.heading + step * k as f32) * radius
                    })
                    .collect()
            }
            Shape::Rect { half_extents: h } => [
                Vec2::new(h.x, h.y),
                Vec2::new(-h.x, h.y),
                Vec2::new(-h.x, -h.y),
                Vec2::new(h.x, -h.y),
            ]
            .into_iter()
            .map(|corner| pose.position + corner.rotated(pose.heading))
            .collect(),
        }
    }
}

/// Position plus heading.  Headings are radians, 0 = +x axis, CCW positive.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vec2,
    pub heading:  f32,
}

impl Pose {
    #[inline]
    pub fn new(position: Vec2, heading: f32) -> Self {
        Self { position, heading }
    }

    /// Unit vector along the heading.
    #[inline]
    pub fn direction(self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// One body in the world.  Construct with the kind-specific constructors;
/// the bookkeeping fields (queued intent, attachment, ray record) are
/// managed by the world and not exposed.
#[derive(Clone, Debug)]
pub struct Body {
    pub kind:  BodyKind,
    pub pose:  Pose,
    pub shape: Shape,

    /// Signed scalar speed along the heading, units/frame.  Car model:
    /// velocity is always `pose.direction() * speed`.
    pub(crate) speed:     f32,
    pub(crate) max_speed: f32,

    /// `INVALID` when not attached.
    pub(crate) parent: BodyId,
    /// Positional offset in the parent's local frame.
    pub(crate) local_offset: Vec2,
    /// Heading offset from the parent (rigid attachment only).
    pub(crate) heading_offset: f32,
    /// Rigid children also track the parent's heading; loose ones keep their own.
    pub(crate) rigid: bool,

    /// Ray reach, probes only.
    pub(crate) ray_radius: f32,
    /// Nearest hit recorded by the latest advance.  Write-only during the
    /// sweep: a frame that misses leaves the previous record in place, which
    /// is why the sensor must clear before each advance.
    pub(crate) ray_hit: Option<f32>,

    /// Raised when this frame's movement was reverted by a collision.
    pub(crate) collided: bool,

    /// Intent queued for the next advance.  Last write wins.
    pub(crate) queued: Option<ControlIntent>,
}

impl Body {
    fn base(kind: BodyKind, shape: Shape, pose: Pose) -> Body {
        Body {
            kind,
            pose,
            shape,
            speed:          0.0,
            max_speed:      0.0,
            parent:         BodyId::INVALID,
            local_offset:   Vec2::ZERO,
            heading_offset: 0.0,
            rigid:          false,
            ray_radius:     0.0,
            ray_hit:        None,
            collided:       false,
            queued:         None,
        }
    }

    /// Static collision geometry.
    pub fn obstacle(shape: Shape, pose: Pose) -> Body {
        Body::base(BodyKind::StaticObstacle, shape, pose)
    }

    /// The steerable vehicle.  `max_speed` caps the signed scalar speed.
    pub fn agent(shape: Shape, pose: Pose, max_speed: f32) -> Body {
        let mut b = Body::base(BodyKind::DynamicAgent, shape, pose);
        b.max_speed = max_speed;
        b
    }

    /// Non-physical decoration, typically attached to the agent.
    pub fn marker(shape: Shape, pose: Pose) -> Body {
        Body::base(BodyKind::VisualMarker, shape, pose)
    }

    /// Ray emitter.  Created by [`crate::PhysicsWorld::add_probe`], which
    /// also wires up the rigid attachment.
    pub(crate) fn probe(pose: Pose, ray_radius: f32) -> Body {
        let mut b = Body::base(BodyKind::AttachedProbe, Shape::POINT, pose);
        b.ray_radius = ray_radius;
        b
    }
}
