//! CSV statistics backend for training runs.
//!
//! Creates `episode_stats.csv` in the configured output directory, plus an
//! optional `step_log.csv` when per-step rows are requested.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::observer::TrainObserver;
use crate::{TrainError, TrainResult};

/// A [`TrainObserver`] that writes run statistics to CSV files.
///
/// Observer hooks have no return channel, so write errors are stored
/// internally.  After the run returns, check for them with
/// [`take_error`][Self::take_error].
pub struct CsvStatsWriter {
    episodes:     Writer<File>,
    steps:        Option<Writer<File>>,
    /// Steps seen since the last episode row (the cutoff step included).
    step_count:   u64,
    last_epsilon: f32,
    finished:     bool,
    last_error:   Option<TrainError>,
}

impl CsvStatsWriter {
    /// Open (or create) `episode_stats.csv` in `dir` and write its header
    /// row.  `dir` must already exist.
    pub fn new(dir: &Path) -> TrainResult<Self> {
        let mut episodes = Writer::from_path(dir.join("episode_stats.csv"))?;
        episodes.write_record(["episode", "steps", "avg_reward", "epsilon", "checkpointed"])?;

        Ok(Self {
            episodes,
            steps: None,
            step_count: 0,
            last_epsilon: 0.0,
            finished: false,
            last_error: None,
        })
    }

    /// Like [`new`][Self::new], but also opens `step_log.csv` and writes one
    /// row per step.  Episode-step runs make this file large; keep it for
    /// short diagnostic runs.
    pub fn with_step_log(dir: &Path) -> TrainResult<Self> {
        let mut writer = Self::new(dir)?;
        let mut steps = Writer::from_path(dir.join("step_log.csv"))?;
        steps.write_record(["step", "reward", "epsilon"])?;
        writer.steps = Some(steps);
        Ok(writer)
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<TrainError> {
        self.last_error.take()
    }

    /// Flush all files.  Idempotent; also called from `on_run_end`.
    pub fn finish(&mut self) -> TrainResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.episodes.flush()?;
        if let Some(steps) = &mut self.steps {
            steps.flush()?;
        }
        Ok(())
    }

    fn stash(&mut self, result: TrainResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn write_step(&mut self, step: u64, reward: f32, epsilon: f32) -> TrainResult<()> {
        if let Some(steps) = &mut self.steps {
            steps.write_record(&[step.to_string(), reward.to_string(), epsilon.to_string()])?;
        }
        Ok(())
    }

    fn write_episode(&mut self, episode: u64, avg: f32, checkpointed: bool) -> TrainResult<()> {
        self.episodes.write_record(&[
            episode.to_string(),
            self.step_count.to_string(),
            avg.to_string(),
            self.last_epsilon.to_string(),
            (checkpointed as u8).to_string(),
        ])?;
        Ok(())
    }
}

impl TrainObserver for CsvStatsWriter {
    fn on_step(&mut self, step: u64, reward: f32, epsilon: f32) {
        self.step_count += 1;
        self.last_epsilon = epsilon;
        let result = self.write_step(step, reward, epsilon);
        self.stash(result);
    }

    fn on_episode_end(&mut self, episode: u64, avg_reward: f32, checkpoint: Option<&Path>) {
        let result = self.write_episode(episode, avg_reward, checkpoint.is_some());
        self.stash(result);
        self.step_count = 0;
    }

    fn on_run_end(&mut self, _episodes: u64, _best_avg: f32) {
        let result = self.finish();
        self.stash(result);
    }
}
