//! The shipped physics backend.
//!
//! # Vehicle model
//!
//! Dynamic agents are car-like: the state is a pose plus a signed scalar
//! speed, and velocity is always `direction(heading) * speed`.  Rotating
//! therefore turns the velocity with the body — there is no lateral drift.
//! Each frame, in order:
//!
//! 1. apply the queued intent (accelerate adds to speed, rotate turns the
//!    heading),
//! 2. clamp speed to `±max_speed`,
//! 3. multiply speed by `1 − drag`,
//! 4. subtract friction toward zero (never flipping the sign),
//! 5. translate along the heading.
//!
//! # Collision containment
//!
//! After translating, an agent outline that overlaps any static obstacle has
//! its translation reverted, its speed zeroed, and its collided flag raised
//! for this frame.  This is deliberately not a solver: the arena only needs
//! "you cannot pass through walls", and anything fancier would change the
//! training dynamics the harness is meant to reproduce.

use rg_core::{BodyId, Frame, Vec2};

use crate::body::{Body, BodyKind, Pose};
use crate::geometry::{polygons_overlap, Aabb};
use crate::index::{EdgeIndex, EdgeSeg};
use crate::intent::ControlIntent;
use crate::world::PhysicsWorld;
use crate::{WorldError, WorldResult};

/// Cached world-space outline of a static obstacle.
struct ObstaclePoly {
    verts: Vec<Vec2>,
    aabb:  Aabb,
}

/// Planar arena world: dense body storage, cached obstacle outlines, and an
/// R-tree over obstacle edges for ray casting.
pub struct PlanarWorld {
    bodies:    Vec<Body>,
    obstacles: Vec<ObstaclePoly>,
    index:     EdgeIndex,
    drag:      f32,
    friction:  f32,
    frame:     Frame,
}

impl PlanarWorld {
    /// `drag` is the multiplicative per-frame speed loss in `[0, 1]`;
    /// `friction` the constant per-frame loss toward zero.
    pub fn new(drag: f32, friction: f32) -> Self {
        Self {
            bodies:    Vec::new(),
            obstacles: Vec::new(),
            index:     EdgeIndex::empty(),
            drag,
            friction,
            frame:     Frame::ZERO,
        }
    }

    /// Number of obstacle edges visible to ray casting.
    pub fn edge_count(&self) -> usize {
        self.index.edge_count()
    }

    fn check_id(&self, body: BodyId) -> WorldResult<()> {
        if body.index() < self.bodies.len() {
            Ok(())
        } else {
            Err(WorldError::UnknownBody(body))
        }
    }

    /// Obstacles never move, so their world-space edges are computed once
    /// here and the index rebuilt by bulk load.
    fn rebuild_index(&mut self) {
        let edges = self
            .obstacles
            .iter()
            .flat_map(|obs| {
                let n = obs.verts.len();
                (0..n).map(move |i| EdgeSeg { a: obs.verts[i], b: obs.verts[(i + 1) % n] })
            })
            .collect();
        self.index = EdgeIndex::build(edges);
    }
}

impl PhysicsWorld for PlanarWorld {
    fn add_body(&mut self, body: Body) -> WorldResult<BodyId> {
        let id = BodyId(self.bodies.len() as u32);
        if body.kind == BodyKind::StaticObstacle {
            let verts = body.shape.vertices(body.pose);
            // A point obstacle has no outline; it is inert and skipped.
            if verts.len() >= 3 {
                let aabb = Aabb::from_points(&verts);
                self.obstacles.push(ObstaclePoly { verts, aabb });
                self.rebuild_index();
            }
        }
        self.bodies.push(body);
        Ok(id)
    }

    fn attach(&mut self, parent: BodyId, child: BodyId, rigid: bool) -> WorldResult<()> {
        self.check_id(parent)?;
        self.check_id(child)?;
        if parent == child
            || matches!(
                self.bodies[child.index()].kind,
                BodyKind::StaticObstacle | BodyKind::DynamicAgent
            )
        {
            return Err(WorldError::InvalidAttachment { parent, child });
        }

        let parent_pose = self.bodies[parent.index()].pose;
        let body = &mut self.bodies[child.index()];
        body.parent = parent;
        body.local_offset =
            (body.pose.position - parent_pose.position).rotated(-parent_pose.heading);
        body.heading_offset = body.pose.heading - parent_pose.heading;
        body.rigid = rigid;
        Ok(())
    }

    fn add_probe(
        &mut self,
        parent: BodyId,
        angle_offset: f32,
        radius: f32,
    ) -> WorldResult<BodyId> {
        self.check_id(parent)?;
        let parent_pose = self.bodies[parent.index()].pose;
        let pose = Pose::new(parent_pose.position, parent_pose.heading + angle_offset);
        let id = self.add_body(Body::probe(pose, radius))?;
        self.attach(parent, id, true)?;
        Ok(id)
    }

    fn apply(&mut self, body: BodyId, intent: ControlIntent) -> WorldResult<()> {
        self.check_id(body)?;
        let b = &mut self.bodies[body.index()];
        if b.kind != BodyKind::DynamicAgent {
            return Err(WorldError::NotSteerable(body));
        }
        b.queued = Some(intent);
        Ok(())
    }

    fn advance(&mut self) {
        // ── Integrate dynamic agents ──────────────────────────────────────
        for i in 0..self.bodies.len() {
            if self.bodies[i].kind != BodyKind::DynamicAgent {
                continue;
            }
            let body = &mut self.bodies[i];
            body.collided = false;

            match body.queued.take() {
                Some(ControlIntent::Accelerate(a)) => body.speed += a,
                Some(ControlIntent::Rotate(r)) => body.pose.heading += r,
                None => {}
            }

            body.speed = body.speed.clamp(-body.max_speed, body.max_speed);
            body.speed *= 1.0 - self.drag;
            if self.friction > 0.0 {
                body.speed = (body.speed.abs() - self.friction).max(0.0).copysign(body.speed);
            }

            let previous = body.pose.position;
            body.pose.position += body.pose.direction() * body.speed;

            let verts = body.shape.vertices(body.pose);
            if verts.len() >= 3 {
                let aabb = Aabb::from_points(&verts);
                let hit = self
                    .obstacles
                    .iter()
                    .any(|obs| obs.aabb.intersects(&aabb) && polygons_overlap(&verts, &obs.verts));
                if hit {
                    body.pose.position = previous;
                    body.speed = 0.0;
                    body.collided = true;
                }
            }
        }

        // ── Snap attached children to their parents ───────────────────────
        // Children always carry a larger ID than their parent (attach-time
        // ordering), so one forward pass settles chains too.
        for i in 0..self.bodies.len() {
            let parent = self.bodies[i].parent;
            if parent == BodyId::INVALID {
                continue;
            }
            let parent_pose = self.bodies[parent.index()].pose;
            let child = &mut self.bodies[i];
            child.pose.position =
                parent_pose.position + child.local_offset.rotated(parent_pose.heading);
            if child.rigid {
                child.pose.heading = parent_pose.heading + child.heading_offset;
            }
        }

        // ── Cast probe rays and record hits ───────────────────────────────
        // Write-only: misses leave the previous record in place.  The sensor
        // clears records before each advance; skipping that clear is exactly
        // how values go stale.
        let casts: Vec<(usize, Vec2, f32, f32)> = self
            .bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.kind == BodyKind::AttachedProbe)
            .map(|(i, b)| (i, b.pose.position, b.pose.heading, b.ray_radius))
            .collect();

        #[cfg(feature = "parallel")]
        let hits: Vec<(usize, f32)> = {
            use rayon::prelude::*;
            casts
                .par_iter()
                .filter_map(|&(i, origin, heading, radius)| {
                    self.index
                        .cast_ray(origin, Vec2::from_angle(heading), radius)
                        .map(|d| (i, d))
                })
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let hits: Vec<(usize, f32)> = casts
            .iter()
            .filter_map(|&(i, origin, heading, radius)| {
                self.index
                    .cast_ray(origin, Vec2::from_angle(heading), radius)
                    .map(|d| (i, d))
            })
            .collect();

        for (i, d) in hits {
            self.bodies[i].ray_hit = Some(d);
        }

        self.frame = self.frame + 1;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    fn frame(&self) -> Frame {
        self.frame
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn pose(&self, body: BodyId) -> Pose {
        self.bodies[body.index()].pose
    }

    fn position(&self, body: BodyId) -> Vec2 {
        self.bodies[body.index()].pose.position
    }

    fn heading(&self, body: BodyId) -> f32 {
        self.bodies[body.index()].pose.heading
    }

    fn speed(&self, body: BodyId) -> f32 {
        self.bodies[body.index()].speed
    }

    fn velocity(&self, body: BodyId) -> Vec2 {
        let b = &self.bodies[body.index()];
        b.pose.direction() * b.speed
    }

    fn probe_hit(&self, body: BodyId) -> Option<f32> {
        self.bodies[body.index()].ray_hit
    }

    fn clear_probe_hit(&mut self, body: BodyId) {
        self.bodies[body.index()].ray_hit = None;
    }

    fn cast_ray(&self, origin: Vec2, angle: f32, max_dist: f32) -> Option<f32> {
        self.index.cast_ray(origin, Vec2::from_angle(angle), max_dist)
    }

    fn collided(&self, body: BodyId) -> bool {
        self.bodies[body.index()].collided
    }

    fn place(&mut self, body: BodyId, pose: Pose) -> WorldResult<()> {
        self.check_id(body)?;
        self.bodies[body.index()].pose = pose;
        Ok(())
    }

    fn set_speed(&mut self, body: BodyId, speed: f32) -> WorldResult<()> {
        self.check_id(body)?;
        let b = &mut self.bodies[body.index()];
        if b.kind != BodyKind::DynamicAgent {
            return Err(WorldError::NotSteerable(body));
        }
        b.speed = speed;
        Ok(())
    }
}
