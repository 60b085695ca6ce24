//! Training loop: episode driver, replay wiring, checkpointing, and run
//! statistics.
//!
//! # Step loop
//!
//! ```text
//! while running:
//!   state = env.reset()
//!   while not over:
//!     ① Predict  — learner picks an action over the current state
//!     ② Step     — env applies it, returns (reward, next state)
//!     ③ Cutoff   — past episode_steps: close the episode, average the
//!                  banked reward, checkpoint on strict improvement
//!     ④ Record   — push the transition (done = over flag as of now)
//!     ⑤ Learn    — on cadence: train (K1), decay/kick epsilon,
//!                  sync the target network (K2)
//!     ⑥ Observe  — on_step, then on_episode_end at the cutoff
//! final `model` checkpoint
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rg_core::{EnvConfig, TrainConfig};
//! use rg_env::Environment;
//! use rg_learner::LinearQLearner;
//! use rg_train::{NoopObserver, Trainer};
//!
//! let env = Environment::from_scene_file(Path::new("arena.json"), EnvConfig::default())?;
//! let learner = LinearQLearner::new(env.observation_len(), Default::default(), 42);
//! let mut trainer = Trainer::new(env, learner, TrainConfig::default())?;
//! let stop = trainer.stop_flag();   // hand to a Ctrl-C handler
//! trainer.run(&mut NoopObserver)?;
//! ```

pub mod checkpoint;
pub mod error;
pub mod observer;
pub mod stats;
pub mod stop;
pub mod trainer;

#[cfg(test)]
mod tests;

pub use checkpoint::CheckpointPolicy;
pub use error::{TrainError, TrainResult};
pub use observer::{NoopObserver, TrainObserver};
pub use stats::CsvStatsWriter;
pub use stop::StopFlag;
pub use trainer::Trainer;
