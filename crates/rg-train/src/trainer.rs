//! The `Trainer` struct and its step loop.

use std::path::{Path, PathBuf};

use rg_core::{Observation, RunRng, TrainConfig, Transition};
use rg_env::{EnvSignal, Environment};
use rg_learner::Learner;
use rg_replay::ReplayBuffer;
use rg_world::PhysicsWorld;

use crate::checkpoint::CheckpointPolicy;
use crate::observer::TrainObserver;
use crate::stop::StopFlag;
use crate::TrainResult;

/// The training-run driver.
///
/// `Trainer<W, L>` owns the environment, the learner, and the replay buffer,
/// and repeats this sequence every step:
///
/// 1. **Predict**: ask the learner for an action over the current state.
/// 2. **Step**: apply it to the environment; bank the reward.
/// 3. **Cutoff**: once the step counter passes `episode_steps`, close the
///    episode — bump the episode counter, restart the step counter at 1,
///    average the banked reward (2-decimal rounding), and checkpoint the
///    learner when the average strictly beats the best seen.
/// 4. **Record**: push the completed transition, `done` carrying the over
///    flag as of this step.
/// 5. **Learn**: once the buffer is trainable, train every `train_interval`
///    steps, decay epsilon (kicking it back to `epsilon_reset` whenever the
///    schedule bottoms out), and copy the online parameters into the target
///    every `target_sync_interval` steps.
/// 6. **Observe**: fire `on_step`, then `on_episode_end` if the cutoff
///    closed the episode this step.
///
/// The step counter is shared across episodes, so training and target-sync
/// cadences carry their phase over episode boundaries.  An episode the
/// environment ends early (collision termination or an external signal)
/// exits the inner loop without touching the episode bookkeeping; the banked
/// reward keeps accumulating into the next cutoff.
///
/// A step that fails pushes nothing and propagates the error; replay
/// contents and best-average bookkeeping stay consistent.
pub struct Trainer<W: PhysicsWorld, L: Learner> {
    env:     Environment<W>,
    learner: L,
    replay:  ReplayBuffer,
    config:  TrainConfig,
    policy:  CheckpointPolicy,
    stop:    StopFlag,

    step_count:    u64,
    episode_count: u64,
    reward_sum:    f32,
}

impl<W: PhysicsWorld, L: Learner> Trainer<W, L> {
    // ── Construction ──────────────────────────────────────────────────────

    /// Wire an environment and a learner into a training run.
    ///
    /// Validates `config` and builds the replay buffer from its geometry;
    /// the buffer's sampling stream is derived from `config.seed`, so the
    /// same seed reproduces the same draws.
    pub fn new(env: Environment<W>, learner: L, config: TrainConfig) -> TrainResult<Self> {
        config.validate()?;
        let mut rng = RunRng::new(config.seed);
        let replay =
            ReplayBuffer::with_rng(config.replay_capacity, config.batch_size, rng.child(0));
        let policy = CheckpointPolicy::new(&config.checkpoint_dir, &config.run_id);

        Ok(Self {
            env,
            learner,
            replay,
            policy,
            stop: StopFlag::new(),
            step_count:    0,
            episode_count: 0,
            reward_sum:    0.0,
            config,
        })
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run episodes until the environment's run flag clears, then save the
    /// final `model` checkpoint and fire `on_run_end`.
    ///
    /// Nothing clears the run flag from inside a headless run; hold a clone
    /// of [`stop_flag`][Self::stop_flag] and set it (from a Ctrl-C handler,
    /// another thread, or an episode-counting observer) to end the run.
    pub fn run<O: TrainObserver>(&mut self, observer: &mut O) -> TrainResult<()> {
        while self.env.running() {
            self.run_episode(observer)?;
        }
        self.policy.final_save(&self.learner)?;
        observer.on_run_end(self.episode_count, self.policy.best_average());
        Ok(())
    }

    /// Run one episode: reset, then step until the over flag rises.
    ///
    /// The stop handle is checked once per step boundary; when set, the
    /// episode ends through the quit signal and the run flag clears.
    pub fn run_episode<O: TrainObserver>(&mut self, observer: &mut O) -> TrainResult<()> {
        let mut state = self.env.reset()?;
        loop {
            if self.stop.is_set() {
                self.env.signal(EnvSignal::Quit);
            }
            if self.env.over() {
                return Ok(());
            }
            self.advance(&mut state, observer)?;
        }
    }

    /// Run up to `n` episodes from the current position, stopping early if
    /// the run flag clears.  No final model is saved.
    ///
    /// Useful for tests and incremental driving.
    pub fn run_episodes<O: TrainObserver>(&mut self, n: u64, observer: &mut O) -> TrainResult<()> {
        for _ in 0..n {
            if !self.env.running() {
                break;
            }
            self.run_episode(observer)?;
        }
        Ok(())
    }

    /// A cloneable handle that ends the run at the next step boundary.
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn advance<O: TrainObserver>(
        &mut self,
        state:    &mut Observation,
        observer: &mut O,
    ) -> TrainResult<()> {
        let action = self.learner.predict_action(state);
        let (reward, next) = self.env.step(action)?;

        self.step_count += 1;
        self.reward_sum += reward;

        // ── Episode cutoff ────────────────────────────────────────────────
        let mut ended: Option<(u64, f32, Option<PathBuf>)> = None;
        if self.step_count > self.config.episode_steps {
            self.env.set_over();
            self.episode_count += 1;
            self.step_count = 1;
            let avg =
                CheckpointPolicy::rounded(self.reward_sum / self.config.episode_steps as f32);
            self.reward_sum = 0.0;
            let checkpoint = self.policy.consider(self.episode_count, avg, &self.learner)?;
            ended = Some((self.episode_count, avg, checkpoint));
        }

        // ── Record the transition ─────────────────────────────────────────
        //
        // `done` reads the over flag after the cutoff check, so the final
        // transition of a capped episode is stored terminal.
        self.replay.push(Transition {
            state:      state.clone(),
            action,
            next_state: next.clone(),
            reward,
            done:       self.env.over(),
        });
        *state = next;

        // ── Train / sync on cadence ───────────────────────────────────────
        if self.replay.trainable() {
            if self.step_count.is_multiple_of(self.config.train_interval) {
                let batch = self
                    .replay
                    .sample(self.config.batch_size, self.config.sample_alpha)?;
                self.learner.train(&batch)?;
            }
            self.learner.decay_epsilon();
            if self.learner.at_floor() {
                self.learner.set_epsilon(self.config.epsilon_reset);
            }
            if self.step_count.is_multiple_of(self.config.target_sync_interval) {
                self.learner.update_target();
            }
        }

        observer.on_step(self.step_count, reward, self.learner.epsilon());
        if let Some((episode, avg, checkpoint)) = ended {
            observer.on_episode_end(episode, avg, checkpoint.as_deref());
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The wrapped environment.
    pub fn env(&self) -> &Environment<W> {
        &self.env
    }

    /// Mutable environment access, e.g. to send an external signal.
    pub fn env_mut(&mut self) -> &mut Environment<W> {
        &mut self.env
    }

    /// The wrapped learner.
    pub fn learner(&self) -> &L {
        &self.learner
    }

    /// Mutable learner access.
    pub fn learner_mut(&mut self) -> &mut L {
        &mut self.learner
    }

    /// The replay buffer.
    pub fn replay(&self) -> &ReplayBuffer {
        &self.replay
    }

    /// The active configuration.
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Completed (cutoff-closed) episodes so far.
    pub fn episode_count(&self) -> u64 {
        self.episode_count
    }

    /// Steps since the last episode cutoff (shared across episodes).
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Best rounded episode average seen this run.
    pub fn best_average(&self) -> f32 {
        self.policy.best_average()
    }

    /// The `<checkpoint_dir>/<run_id>` directory checkpoints land in.
    pub fn checkpoint_directory(&self) -> &Path {
        self.policy.directory()
    }
}
