//! The `PhysicsWorld` trait — the seam between physics and the RL contract.

use rg_core::{BodyId, Frame, Vec2};

use crate::{Body, ControlIntent, Pose, WorldResult};

/// Pluggable physics backend.
///
/// The environment and sensor crates drive the world exclusively through
/// this trait, so a richer engine (continuous collision, dynamic obstacles)
/// can replace [`crate::PlanarWorld`] without touching the RL contract.
///
/// # Conventions
///
/// - Query methods take a valid `BodyId` and **panic** on an out-of-range
///   one, like slice indexing.  IDs only come from this world's `add_*`
///   methods, so an invalid ID is a caller bug, not a runtime condition.
/// - Mutating methods return [`crate::WorldError`] for semantic misuse
///   (steering a wall, attaching a body to itself).
/// - One `advance()` is one frame.  Intents queued since the previous
///   advance apply at its start; last write wins.
pub trait PhysicsWorld {
    // ── Construction ──────────────────────────────────────────────────────

    /// Add a body and return its ID.  Obstacle edges become visible to ray
    /// casting immediately.
    fn add_body(&mut self, body: Body) -> WorldResult<BodyId>;

    /// Attach `child` to `parent`.  The child keeps its current positional
    /// offset in the parent's local frame; `rigid` children also track the
    /// parent's heading (keeping their current angular offset), loose ones
    /// keep their own heading.
    fn attach(&mut self, parent: BodyId, child: BodyId, rigid: bool) -> WorldResult<()>;

    /// Create a ray probe rigidly attached to `parent` at the parent's
    /// position, headed `angle_offset` radians from the parent's heading,
    /// reaching `radius` units.
    fn add_probe(&mut self, parent: BodyId, angle_offset: f32, radius: f32)
        -> WorldResult<BodyId>;

    // ── Control ───────────────────────────────────────────────────────────

    /// Queue a control intent for the next advance.  Only `DynamicAgent`
    /// bodies are steerable.
    fn apply(&mut self, body: BodyId, intent: ControlIntent) -> WorldResult<()>;

    /// Integrate one frame: apply queued intents, move dynamic bodies,
    /// resolve collisions, update attached children, and record probe hits.
    ///
    /// Probe records are write-only during the sweep — a probe that misses
    /// keeps its previous record.  Clear probes via [`Self::clear_probe_hit`]
    /// before advancing (the sensor's reset does this) or their values go
    /// stale.
    fn advance(&mut self);

    // ── Queries ───────────────────────────────────────────────────────────

    /// Frames advanced since construction.
    fn frame(&self) -> Frame;

    fn body_count(&self) -> usize;

    fn pose(&self, body: BodyId) -> Pose;

    fn position(&self, body: BodyId) -> Vec2;

    fn heading(&self, body: BodyId) -> f32;

    /// Signed scalar speed along the heading (car model).
    fn speed(&self, body: BodyId) -> f32;

    /// Velocity vector: `direction(heading) * speed`.
    fn velocity(&self, body: BodyId) -> Vec2;

    /// The probe's recorded nearest hit, if any.  Non-probe bodies always
    /// report `None`.
    fn probe_hit(&self, body: BodyId) -> Option<f32>;

    /// Erase the probe's recorded hit.  No-op on non-probe bodies.
    fn clear_probe_hit(&mut self, body: BodyId);

    /// Nearest obstacle crossing along a ray, or `None` within `max_dist`.
    /// Tests static obstacles only.
    fn cast_ray(&self, origin: Vec2, angle: f32, max_dist: f32) -> Option<f32>;

    /// Did the latest advance revert this body's movement due to a
    /// collision?
    fn collided(&self, body: BodyId) -> bool;

    // ── Teleport-style restore (environment reset) ────────────────────────

    /// Set a body's pose directly, skipping integration.  Attached children
    /// snap along on the next advance.
    fn place(&mut self, body: BodyId, pose: Pose) -> WorldResult<()>;

    /// Set the signed scalar speed directly.  Only `DynamicAgent` bodies
    /// carry speed.
    fn set_speed(&mut self, body: BodyId, speed: f32) -> WorldResult<()>;
}
