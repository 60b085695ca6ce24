//! The driving environment and its frame loop.
//!
//! [`Environment`] assembles a walled arena from a [`Scene`], rings the agent
//! with a ray-field sensor, and exposes the classic agent-loop surface:
//! [`step`], [`reset`], [`get_state`], [`get_reward`].
//!
//! # Frame protocol
//!
//! Every step runs the same four phases in order:
//!
//! 1. clear the ray records left by the previous frame,
//! 2. queue the control intent for the chosen action,
//! 3. advance the world one frame,
//! 4. sample the sensor ring into the cached observation.
//!
//! Probes are write-only during the sweep, so phase 1 is what separates a
//! genuine miss from last frame's hit.  Construction and [`reset`] both end
//! with a priming frame (no intent), so the cached observation is live before
//! the first step.
//!
//! [`step`]: Environment::step
//! [`reset`]: Environment::reset
//! [`get_state`]: Environment::get_state
//! [`get_reward`]: Environment::get_reward

use std::path::Path;

use rg_core::{Action, BodyId, EnvConfig, Observation, Vec2};
use rg_scene::{Scene, load_scene};
use rg_sensor::RayFieldSensor;
use rg_world::{Body, ControlIntent, PhysicsWorld, PlanarWorld, Pose, Shape};

use crate::error::{EnvError, EnvResult};

/// Out-of-band control for the episode loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvSignal {
    /// End the episode and the whole run.  [`Environment::running`] turns
    /// false and stays false.
    Quit,
    /// End the episode only.  The driver is expected to call
    /// [`Environment::reset`] before stepping again.
    Restart,
}

/// A single-agent arena with a ray-field observation.
///
/// Generic over the physics backend so the loop logic can run against
/// lightweight test worlds; [`from_scene`](Self::from_scene) picks the
/// shipped [`PlanarWorld`].
pub struct Environment<W: PhysicsWorld> {
    world:  W,
    config: EnvConfig,
    agent:  BodyId,
    sensor: RayFieldSensor,
    /// Pose the agent returns to on reset.
    spawn:    Pose,
    last_obs: Observation,
    running:  bool,
    over:     bool,
}

impl Environment<PlanarWorld> {
    /// Build the shipped planar backend from a scene file.
    pub fn from_scene_file(path: &Path, config: EnvConfig) -> EnvResult<Self> {
        let scene = load_scene(path)?;
        Self::from_scene(&scene, config)
    }

    /// Build the shipped planar backend from an in-memory scene.
    pub fn from_scene(scene: &Scene, config: EnvConfig) -> EnvResult<Self> {
        let world = PlanarWorld::new(config.drag_coefficient, config.friction_coefficient);
        Self::with_world(world, scene, config)
    }
}

impl<W: PhysicsWorld> Environment<W> {
    /// Populate an empty backend from `scene` and run the priming frame.
    ///
    /// Body order: four border walls, then the scene obstacles in file
    /// order, then the agent with its sensor ring and nose marker.  The
    /// border walls are centred on the arena bounds, so the free interior
    /// shrinks by half a wall on every side.
    pub fn with_world(mut world: W, scene: &Scene, config: EnvConfig) -> EnvResult<Self> {
        config.validate()?;

        let (aw, ah, t) = (config.arena_width, config.arena_height, config.wall_thickness);
        // The horizontal pair is widened by a full wall so the corners close.
        let across = Shape::rect(aw + 2.0 * t, t)?;
        let upright = Shape::rect(t, ah + 2.0 * t)?;
        for (shape, x, y) in [
            (across, 0.0, ah * 0.5),
            (across, 0.0, -ah * 0.5),
            (upright, aw * 0.5, 0.0),
            (upright, -aw * 0.5, 0.0),
        ] {
            world.add_body(Body::obstacle(shape, Pose::new(Vec2::new(x, y), 0.0)))?;
        }

        for d in &scene.obstacles {
            let shape = Shape::regular(d.sides, d.size)?;
            world.add_body(Body::obstacle(shape, Pose::new(d.position, d.heading)))?;
        }

        let a = &scene.agent;
        let spawn = Pose::new(a.position, a.heading);
        let agent = world.add_body(Body::agent(
            Shape::regular(a.sides, a.size)?,
            spawn,
            config.max_speed,
        ))?;

        let sensor =
            RayFieldSensor::attach(&mut world, agent, config.sensor_count, config.sensor_radius)?;

        // Nose marker riding the leading vertex, carried rigidly by the
        // agent.  Rendering overlays use it to show the heading.
        let nose_pose = Pose::new(spawn.position + spawn.direction() * a.size, spawn.heading);
        let nose = world.add_body(Body::marker(Shape::POINT, nose_pose))?;
        world.attach(agent, nose, true)?;

        let mut env = Environment {
            world,
            config,
            agent,
            sensor,
            spawn,
            last_obs: Observation::from_parts(Vec::new(), 0.0),
            running: true,
            over: false,
        };
        env.frame(None)?;
        Ok(env)
    }

    /// One frame of the protocol: clear ray records, queue the intent (if
    /// any), advance, sample.
    fn frame(&mut self, intent: Option<ControlIntent>) -> EnvResult<()> {
        self.sensor.reset(&mut self.world);
        if let Some(intent) = intent {
            self.world.apply(self.agent, intent)?;
        }
        self.world.advance();
        self.last_obs = Observation::from_parts(
            self.sensor.sample(&self.world),
            self.world.speed(self.agent),
        );
        if self.config.terminate_on_collision && self.world.collided(self.agent) {
            self.over = true;
        }
        Ok(())
    }

    /// Apply `action`, advance one frame, and return `(reward, observation)`.
    ///
    /// | Action    | Intent                         |
    /// |-----------|--------------------------------|
    /// | `Forward` | accelerate by `+speed_rate`    |
    /// | `Brake`   | accelerate by `-speed_rate`    |
    /// | `Left`    | rotate by `+rotation_rate`     |
    /// | `Right`   | rotate by `-rotation_rate`     |
    ///
    /// Headings grow counter-clockwise, so `Left` is the positive turn.
    pub fn step(&mut self, action: Action) -> EnvResult<(f32, Observation)> {
        let intent = match action {
            Action::Forward => ControlIntent::Accelerate(self.config.speed_rate),
            Action::Brake => ControlIntent::Accelerate(-self.config.speed_rate),
            Action::Left => ControlIntent::Rotate(self.config.rotation_rate),
            Action::Right => ControlIntent::Rotate(-self.config.rotation_rate),
        };
        self.frame(Some(intent))?;
        Ok((self.get_reward(), self.last_obs.clone()))
    }

    /// [`step`](Self::step) by numeric action index, for drivers that work
    /// in the wire encoding.  An out-of-alphabet index is rejected before
    /// anything touches the world.
    pub fn step_index(&mut self, index: usize) -> EnvResult<(f32, Observation)> {
        match Action::from_index(index) {
            Some(action) => self.step(action),
            None => Err(EnvError::InvalidAction(index)),
        }
    }

    /// Put the agent back at its spawn pose with unit speed, clear the
    /// episode-over flag, and run a priming frame.  Returns the fresh
    /// observation.
    pub fn reset(&mut self) -> EnvResult<Observation> {
        self.over = false;
        self.world.place(self.agent, self.spawn)?;
        self.world.set_speed(self.agent, 1.0)?;
        self.frame(None)?;
        Ok(self.last_obs.clone())
    }

    /// The observation cached by the most recent frame.
    pub fn get_state(&self) -> Observation {
        self.last_obs.clone()
    }

    /// Reward for the cached frame.
    ///
    /// Speed at or above `stop_threshold` earns `speed / max_speed`; anything
    /// slower, reverse included, earns a flat `-1.0`.  When a proximity term
    /// is configured its mean over the watched rays is added: `(d - R) / R`
    /// for a ray seeing an obstacle at distance `d`, or the clear-path bonus
    /// for a ray seeing nothing inside `R`.
    pub fn get_reward(&self) -> f32 {
        let speed = self.last_obs.speed();
        let base = if speed >= self.config.stop_threshold {
            speed / self.config.max_speed
        } else {
            -1.0
        };
        base + self.proximity_term()
    }

    fn proximity_term(&self) -> f32 {
        let Some(prox) = &self.config.proximity_reward else {
            return 0.0;
        };
        let radius = self.config.sensor_radius;
        let sum: f32 = prox
            .ray_indices
            .iter()
            .map(|&k| {
                let d = self.last_obs.ray(k);
                if d < radius { (d - radius) / radius } else { prox.bonus }
            })
            .sum();
        sum / prox.ray_indices.len() as f32
    }

    /// Deliver an out-of-band control signal.
    pub fn signal(&mut self, signal: EnvSignal) {
        self.over = true;
        if signal == EnvSignal::Quit {
            self.running = false;
        }
    }

    /// Mark the current episode finished.  Drivers call this at their step
    /// cutoff so the transition they record last is terminal.
    pub fn set_over(&mut self) {
        self.over = true;
    }

    /// False once a `Quit` signal has been delivered.
    pub fn running(&self) -> bool {
        self.running
    }

    /// True from episode end until the next [`reset`](Self::reset).
    pub fn over(&self) -> bool {
        self.over
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Width of the observation vector (`sensor_count + 1`).
    pub fn observation_len(&self) -> usize {
        self.sensor.observation_len()
    }

    pub fn max_speed(&self) -> f32 {
        self.config.max_speed
    }

    /// Signed scalar speed of the agent after the last frame.
    pub fn agent_speed(&self) -> f32 {
        self.world.speed(self.agent)
    }

    pub fn agent_position(&self) -> Vec2 {
        self.world.position(self.agent)
    }

    /// The agent's body ID in the underlying world.
    pub fn agent(&self) -> BodyId {
        self.agent
    }

    /// Borrow the physics backend, e.g. for a rendering overlay.
    pub fn world(&self) -> &W {
        &self.world
    }
}
