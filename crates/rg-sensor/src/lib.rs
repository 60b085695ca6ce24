//! `rg-sensor` — the ray-field distance sensor.
//!
//! A [`RayFieldSensor`] is a ring of ray probes rigidly attached to one
//! agent body.  Probe `k` points `2πk/ray_count` radians from the agent's
//! heading (probe 0 straight ahead), so the ring turns with the vehicle and
//! the ray order never changes.
//!
//! # Frame protocol
//!
//! Probe hit records persist until cleared: the world's sweep only writes
//! hits, never misses.  The sampling cycle is therefore
//!
//! 1. [`RayFieldSensor::reset`] — clear all records,
//! 2. advance the world — probes that hit record fresh distances,
//! 3. [`RayFieldSensor::sample`] — read records; cleared-and-missed probes
//!    report the full radius.
//!
//! Skipping step 1 leaves stale distances in the records.  The environment
//! enforces the order inside its `step`; drive the sensor manually only in
//! tests and custom harnesses.

use rg_core::BodyId;
use rg_world::{PhysicsWorld, WorldError};

use thiserror::Error;


#[derive(Debug, Error)]
pub enum SensorError {
    #[error("a ray field needs at least one ray")]
    NoRays,

    #[error(transparent)]
    World(#[from] WorldError),
}

pub type SensorResult<T> = Result<T, SensorError>;

/// Ring of distance probes around one agent.
///
/// Immutable after [`attach`](Self::attach): ray count, radius, and probe
/// order are fixed for the sensor's lifetime, which keeps observation
/// layouts stable across an entire training run.
#[derive(Debug)]
pub struct RayFieldSensor {
    probes: Vec<BodyId>,
    radius: f32,
}

impl RayFieldSensor {
    /// Create `ray_count` probes fanned around `agent` and attach them
    /// rigidly.  Probe `k` is offset `2πk/ray_count` from the agent heading.
    pub fn attach<W: PhysicsWorld>(
        world:     &mut W,
        agent:     BodyId,
        ray_count: usize,
        radius:    f32,
    ) -> SensorResult<RayFieldSensor> {
        if ray_count == 0 {
            return Err(SensorError::NoRays);
        }

        let step = std::f32::consts::TAU / ray_count as f32;
        let mut probes = Vec::with_capacity(ray_count);
        for k in 0..ray_count {
            probes.push(world.add_probe(agent, step * k as f32, radius)?);
        }
        Ok(RayFieldSensor { probes, radius })
    }

    /// Read every probe's recorded distance, in ring order.
    ///
    /// A probe with no record reports exactly `radius`.  That makes a miss
    /// indistinguishable from an obstacle sitting precisely at the radius —
    /// a deliberate property of the observation encoding: learners see one
    /// continuous "how far is the nearest thing, capped" channel per ray.
    pub fn sample<W: PhysicsWorld>(&self, world: &W) -> Vec<f32> {
        self.probes
            .iter()
            .map(|&probe| world.probe_hit(probe).unwrap_or(self.radius))
            .collect()
    }

    /// Clear every probe's record.  Run once per frame, before the advance.
    pub fn reset<W: PhysicsWorld>(&self, world: &mut W) {
        for &probe in &self.probes {
            world.clear_probe_hit(probe);
        }
    }

    #[inline]
    pub fn ray_count(&self) -> usize {
        self.probes.len()
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Width of an observation built from this sensor (`ray_count + 1`,
    /// the trailing element being the agent's speed).
    #[inline]
    pub fn observation_len(&self) -> usize {
        self.probes.len() + 1
    }

    /// The probe IDs in ring order.  Exposed for debugging overlays.
    pub fn probes(&self) -> &[BodyId] {
        &self.probes
    }
}
