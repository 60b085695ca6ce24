//! Best-average checkpoint gating.

use std::fs;
use std::path::{Path, PathBuf};

use rg_learner::Learner;

use crate::TrainResult;

/// Decides when an episode average earns a checkpoint and where it goes.
///
/// The gate is strict improvement of the 2-decimal rounded average over the
/// best seen this run.  The best starts at zero, so nothing is saved until
/// the agent first earns a positive average.  All files land under
/// `<dir>/<run_id>/`, created on the first save.
pub struct CheckpointPolicy {
    root: PathBuf,
    best: f32,
}

impl CheckpointPolicy {
    pub fn new(dir: &Path, run_id: &str) -> Self {
        Self { root: dir.join(run_id), best: 0.0 }
    }

    /// Round an episode average the way the gate compares them.
    #[inline]
    pub fn rounded(avg: f32) -> f32 {
        (avg * 100.0).round() / 100.0
    }

    /// Offer a rounded episode average.  Saves `model_<episode>_<avg>` and
    /// returns the path when `avg` strictly beats the best seen, otherwise
    /// returns `None` and writes nothing.
    pub fn consider<L: Learner>(
        &mut self,
        episode: u64,
        avg:     f32,
        learner: &L,
    ) -> TrainResult<Option<PathBuf>> {
        if avg <= self.best {
            return Ok(None);
        }
        self.best = avg;
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(format!("model_{episode}_{avg}"));
        learner.save(&path)?;
        Ok(Some(path))
    }

    /// Save the unconditional end-of-run `model` file and return its path.
    pub fn final_save<L: Learner>(&self, learner: &L) -> TrainResult<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join("model");
        learner.save(&path)?;
        Ok(path)
    }

    /// Best rounded average seen this run.
    pub fn best_average(&self) -> f32 {
        self.best
    }

    /// The `<dir>/<run_id>` directory checkpoints land in.
    pub fn directory(&self) -> &Path {
        &self.root
    }
}
