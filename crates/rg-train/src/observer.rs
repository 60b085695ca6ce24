//! Training observer trait for progress reporting and statistics collection.

use std::path::Path;

/// Callbacks invoked by [`Trainer::run`][crate::Trainer::run] at key points
/// in the step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64, episodes: u64 }
///
/// impl TrainObserver for ProgressPrinter {
///     fn on_step(&mut self, step: u64, reward: f32, epsilon: f32) {
///         if step % self.interval == 0 {
///             println!("ep: {} e: {epsilon} r: {reward}", self.episodes);
///         }
///     }
///     fn on_episode_end(&mut self, episode: u64, _avg: f32, _ckpt: Option<&Path>) {
///         self.episodes = episode;
///     }
/// }
/// ```
pub trait TrainObserver {
    /// Called at the end of every completed step.
    ///
    /// `step` is the trainer's step counter, which restarts at 1 when the
    /// episode cutoff fires.
    fn on_step(&mut self, _step: u64, _reward: f32, _epsilon: f32) {}

    /// Called when the step cutoff closes an episode.
    ///
    /// `checkpoint` is the file the learner was saved to when `avg_reward`
    /// beat the best average seen so far, or `None` when it did not.
    fn on_episode_end(&mut self, _episode: u64, _avg_reward: f32, _checkpoint: Option<&Path>) {}

    /// Called once after the run loop exits and the final model is saved.
    fn on_run_end(&mut self, _episodes: u64, _best_avg: f32) {}
}

/// A [`TrainObserver`] that does nothing.  Use when you need to call `run`
/// but don't want progress callbacks.
pub struct NoopObserver;

impl TrainObserver for NoopObserver {}
