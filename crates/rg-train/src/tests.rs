//! Integration tests for rg-train.

use std::path::{Path, PathBuf};

use rg_core::{Action, EnvConfig, Observation, TrainConfig, Transition, Vec2};
use rg_env::Environment;
use rg_learner::{Learner, LearnerResult, LinearConfig, LinearQLearner};
use rg_scene::{Scene, SceneBuilder};
use rg_world::PlanarWorld;

use crate::{NoopObserver, TrainObserver, Trainer};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn lone_agent() -> Scene {
    SceneBuilder::new()
        .agent(5.0, 3, 0.0, Vec2::ZERO)
        .build()
        .unwrap()
}

/// Box so large the agent never reaches a wall in a short run.
fn open_env() -> Environment<PlanarWorld> {
    let cfg = EnvConfig { arena_width: 4000.0, arena_height: 3000.0, ..EnvConfig::default() };
    Environment::from_scene(&lone_agent(), cfg).unwrap()
}

fn short_config(dir: &Path, episode_steps: u64) -> TrainConfig {
    TrainConfig {
        episode_steps,
        checkpoint_dir: dir.to_path_buf(),
        run_id: "test".into(),
        ..TrainConfig::default()
    }
}

/// Deterministic full-throttle policy that counts loop callbacks.
#[derive(Default)]
struct CountingLearner {
    train_calls: usize,
    sync_calls:  usize,
}

impl Learner for CountingLearner {
    fn predict_action(&mut self, _state: &Observation) -> Action {
        Action::Forward
    }

    fn train(&mut self, _batch: &[Transition]) -> LearnerResult<f32> {
        self.train_calls += 1;
        Ok(0.0)
    }

    fn update_target(&mut self) {
        self.sync_calls += 1;
    }
}

/// Observer that records every hook invocation.
#[derive(Default)]
struct Recorder {
    steps:    Vec<(u64, f32, f32)>,
    episodes: Vec<(u64, f32, Option<PathBuf>)>,
    runs:     Vec<(u64, f32)>,
}

impl TrainObserver for Recorder {
    fn on_step(&mut self, step: u64, reward: f32, epsilon: f32) {
        self.steps.push((step, reward, epsilon));
    }

    fn on_episode_end(&mut self, episode: u64, avg_reward: f32, checkpoint: Option<&Path>) {
        self.episodes.push((episode, avg_reward, checkpoint.map(Path::to_path_buf)));
    }

    fn on_run_end(&mut self, episodes: u64, best_avg: f32) {
        self.runs.push((episodes, best_avg));
    }
}

// ── Cadence ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cadence {
    use super::*;

    #[test]
    fn the_target_syncs_exactly_once_in_the_first_eighteen_trainable_steps() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            train_interval:       3,
            target_sync_interval: 18,
            batch_size:           1,
            replay_capacity:      100,
            ..short_config(dir.path(), 30)
        };
        let mut trainer = Trainer::new(open_env(), CountingLearner::default(), config).unwrap();

        trainer.run_episode(&mut NoopObserver).unwrap();

        // 31 steps; the buffer is trainable from the first push.  The step
        // counter visits 18 once, and the cutoff restarts it at 1 before the
        // final step's cadence checks.
        assert_eq!(trainer.learner().sync_calls, 1);
        // Training at counts 3, 6, ..., 30.
        assert_eq!(trainer.learner().train_calls, 10);
    }

    #[test]
    fn training_waits_for_a_full_batch() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            train_interval:       3,
            target_sync_interval: 18,
            batch_size:           4,
            replay_capacity:      100,
            ..short_config(dir.path(), 12)
        };
        let mut trainer = Trainer::new(open_env(), CountingLearner::default(), config).unwrap();

        trainer.run_episode(&mut NoopObserver).unwrap();

        // The buffer turns trainable at step 4, so count 3 is skipped and
        // training fires at counts 6, 9, and 12 only.
        assert_eq!(trainer.learner().train_calls, 3);
        assert_eq!(trainer.learner().sync_calls, 0);
    }
}

// ── Episode accounting ────────────────────────────────────────────────────────

#[cfg(test)]
mod episodes {
    use super::*;

    #[test]
    fn the_cutoff_restarts_the_shared_step_counter() {
        let dir = tempfile::tempdir().unwrap();
        // Batch larger than the run keeps the buffer untrainable, isolating
        // the loop accounting from training side effects.
        let config = TrainConfig {
            batch_size:      50,
            replay_capacity: 50,
            ..short_config(dir.path(), 5)
        };
        let mut trainer = Trainer::new(open_env(), CountingLearner::default(), config).unwrap();
        let mut rec = Recorder::default();

        trainer.run_episodes(2, &mut rec).unwrap();

        // The counter is shared across episodes and restarts at 1 when the
        // cutoff fires, so the first episode runs one extra step.
        let steps: Vec<u64> = rec.steps.iter().map(|s| s.0).collect();
        assert_eq!(steps, [1, 2, 3, 4, 5, 1, 2, 3, 4, 5, 1]);
        assert_eq!(trainer.episode_count(), 2);
        assert_eq!(trainer.step_count(), 1);
        assert_eq!(rec.episodes.len(), 2);
        assert_eq!(rec.episodes[0].0, 1);
        assert_eq!(rec.episodes[1].0, 2);
    }

    #[test]
    fn only_the_cutoff_transition_is_stored_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            batch_size:      50,
            replay_capacity: 50,
            ..short_config(dir.path(), 5)
        };
        let mut trainer = Trainer::new(open_env(), CountingLearner::default(), config).unwrap();

        trainer.run_episodes(2, &mut NoopObserver).unwrap();

        let dones: Vec<bool> = trainer.replay().iter().map(|t| t.done).collect();
        assert_eq!(dones.len(), 11);
        for (i, done) in dones.iter().enumerate() {
            // 6 steps in the first episode, 5 in the second.
            let terminal = i == 5 || i == 10;
            assert_eq!(*done, terminal, "transition {i}");
        }
    }
}

// ── Exploration schedule ──────────────────────────────────────────────────────

#[cfg(test)]
mod exploration {
    use super::*;

    #[test]
    fn epsilon_kicks_back_to_the_reset_rate_at_the_floor() {
        let dir = tempfile::tempdir().unwrap();
        let lcfg = LinearConfig {
            epsilon_start: 0.5,
            epsilon_floor: 0.05,
            epsilon_decay: 0.5,
            ..LinearConfig::default()
        };
        let learner = LinearQLearner::new(21, lcfg, 11);
        let config = TrainConfig {
            train_interval:  3,
            batch_size:      1,
            replay_capacity: 50,
            epsilon_reset:   0.2,
            ..short_config(dir.path(), 10)
        };
        let mut trainer = Trainer::new(open_env(), learner, config).unwrap();
        let mut rec = Recorder::default();

        trainer.run_episode(&mut rec).unwrap();

        let epsilons: Vec<f32> = rec.steps.iter().map(|s| s.2).collect();
        // Halving from 0.5 bottoms out on the fourth decay; the kick applies
        // within the same check, so the floor itself is never observable.
        assert_eq!(&epsilons[..5], &[0.25, 0.125, 0.0625, 0.2, 0.1]);
        assert!(epsilons.iter().all(|&e| e != 0.05), "floor leaked: {epsilons:?}");
        assert!(epsilons.iter().filter(|&&e| e == 0.2).count() >= 3);
    }
}

// ── Checkpointing ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod checkpointing {
    use super::*;
    use crate::CheckpointPolicy;

    #[test]
    fn averages_round_to_two_decimals() {
        assert_eq!(CheckpointPolicy::rounded(1.234), 1.23);
        assert_eq!(CheckpointPolicy::rounded(-0.567), -0.57);
        assert_eq!(CheckpointPolicy::rounded(0.5), 0.5);
    }

    #[test]
    fn only_a_strictly_better_average_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let learner = LinearQLearner::new(3, LinearConfig::default(), 1);
        let mut policy = CheckpointPolicy::new(dir.path(), "run");

        // The best starts at zero, so nothing below or at zero saves.
        assert!(policy.consider(1, -0.5, &learner).unwrap().is_none());
        assert!(policy.consider(2, 0.0, &learner).unwrap().is_none());

        let first = policy.consider(3, 0.25, &learner).unwrap().unwrap();
        assert_eq!(first.file_name().unwrap(), "model_3_0.25");
        assert!(first.exists());
        assert_eq!(policy.best_average(), 0.25);

        // Ties and regressions write nothing.
        assert!(policy.consider(4, 0.25, &learner).unwrap().is_none());
        assert!(policy.consider(5, 0.1, &learner).unwrap().is_none());
        assert_eq!(std::fs::read_dir(policy.directory()).unwrap().count(), 1);

        let second = policy.consider(6, 0.26, &learner).unwrap().unwrap();
        assert_eq!(second.file_name().unwrap(), "model_6_0.26");
        assert_eq!(std::fs::read_dir(policy.directory()).unwrap().count(), 2);
    }

    #[test]
    fn final_save_always_writes_the_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let learner = LinearQLearner::new(3, LinearConfig::default(), 1);
        let policy = CheckpointPolicy::new(dir.path(), "run");

        let path = policy.final_save(&learner).unwrap();
        assert_eq!(path, dir.path().join("run").join("model"));
        assert!(path.exists());
        assert_eq!(policy.best_average(), 0.0);
    }

    #[test]
    fn a_repeated_episode_never_checkpoints_twice() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            batch_size:      1,
            replay_capacity: 200,
            ..short_config(dir.path(), 50)
        };
        let mut trainer = Trainer::new(open_env(), CountingLearner::default(), config).unwrap();
        let mut rec = Recorder::default();

        trainer.run_episodes(3, &mut rec).unwrap();

        // Full throttle in the open box earns a positive average, and the
        // extra step makes the first episode the best: later identical
        // episodes never improve on it.
        assert_eq!(rec.episodes.len(), 3);
        let (_, first_avg, first_ckpt) = &rec.episodes[0];
        assert!(*first_avg > 0.0);
        let path = first_ckpt.as_ref().expect("first episode should checkpoint");
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("model_1_{first_avg}")
        );
        assert!(rec.episodes[1].2.is_none());
        assert!(rec.episodes[2].2.is_none());
        assert_eq!(rec.episodes[1].1, rec.episodes[2].1);
        assert_eq!(trainer.best_average(), *first_avg);
        assert!(trainer.checkpoint_directory().exists());
    }
}

// ── Stopping ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stopping {
    use super::*;
    use crate::StopFlag;

    /// Sets the stop flag from inside the run after `limit` steps.
    struct StopAfter {
        limit: u64,
        seen:  u64,
        flag:  StopFlag,
    }

    impl TrainObserver for StopAfter {
        fn on_step(&mut self, _step: u64, _reward: f32, _epsilon: f32) {
            self.seen += 1;
            if self.seen == self.limit {
                self.flag.stop();
            }
        }
    }

    #[test]
    fn the_stop_flag_ends_the_run_at_the_next_step_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            batch_size:      50,
            replay_capacity: 50,
            ..short_config(dir.path(), 1000)
        };
        let learner = LinearQLearner::new(21, LinearConfig::default(), 3);
        let mut trainer = Trainer::new(open_env(), learner, config).unwrap();
        let mut obs = StopAfter { limit: 7, seen: 0, flag: trainer.stop_flag() };

        trainer.run(&mut obs).unwrap();

        assert_eq!(obs.seen, 7, "the step in flight completes, then the run ends");
        assert!(!trainer.env().running());
        assert_eq!(trainer.episode_count(), 0);
        // The end-of-run model is saved even without a completed episode.
        assert!(dir.path().join("test").join("model").exists());
    }

    #[test]
    fn a_preset_stop_flag_yields_an_empty_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            batch_size:      50,
            replay_capacity: 50,
            ..short_config(dir.path(), 1000)
        };
        let learner = LinearQLearner::new(21, LinearConfig::default(), 3);
        let mut trainer = Trainer::new(open_env(), learner, config).unwrap();
        trainer.stop_flag().stop();
        let mut rec = Recorder::default();

        trainer.run(&mut rec).unwrap();

        assert!(rec.steps.is_empty());
        assert_eq!(rec.runs, [(0, 0.0)]);
        assert!(dir.path().join("test").join("model").exists());
    }
}

// ── Failure semantics ─────────────────────────────────────────────────────────

#[cfg(test)]
mod failures {
    use super::*;
    use crate::TrainError;
    use rg_learner::LearnerError;

    #[test]
    fn a_training_failure_aborts_the_episode_with_bookkeeping_intact() {
        let dir = tempfile::tempdir().unwrap();
        // A learner narrower than the environment's observations fails its
        // first training batch.  Full exploration keeps prediction off the
        // mismatched value path.
        let lcfg = LinearConfig {
            epsilon_start: 1.0,
            epsilon_floor: 1.0,
            ..LinearConfig::default()
        };
        let learner = LinearQLearner::new(3, lcfg, 5);
        let config = TrainConfig {
            train_interval:  1,
            batch_size:      1,
            replay_capacity: 10,
            ..short_config(dir.path(), 100)
        };
        let mut trainer = Trainer::new(open_env(), learner, config).unwrap();

        let err = trainer.run_episode(&mut NoopObserver).unwrap_err();
        assert!(matches!(
            err,
            TrainError::Learner(LearnerError::DimensionMismatch { .. })
        ));

        // The step completed before training failed: its transition was
        // pushed whole and the counters saw it.
        assert_eq!(trainer.replay().len(), 1);
        assert_eq!(trainer.step_count(), 1);
        assert_eq!(trainer.episode_count(), 0);
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod determinism {
    use super::*;

    fn run_once(dir: &Path, run_id: &str) -> (Recorder, f32) {
        let config = TrainConfig {
            train_interval:  3,
            batch_size:      4,
            replay_capacity: 100,
            sample_alpha:    0.6,
            seed:            9,
            run_id:          run_id.into(),
            ..short_config(dir, 20)
        };
        let learner = LinearQLearner::new(21, LinearConfig::default(), config.seed);
        let mut trainer = Trainer::new(open_env(), learner, config).unwrap();
        let mut rec = Recorder::default();
        trainer.run_episodes(2, &mut rec).unwrap();
        (rec, trainer.learner().epsilon())
    }

    #[test]
    fn the_same_seed_reproduces_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let (a, eps_a) = run_once(dir.path(), "a");
        let (b, eps_b) = run_once(dir.path(), "b");

        assert_eq!(a.steps, b.steps);
        assert_eq!(eps_a, eps_b);
        assert_eq!(a.episodes.len(), b.episodes.len());
        for (ea, eb) in a.episodes.iter().zip(&b.episodes) {
            assert_eq!(ea.0, eb.0);
            assert_eq!(ea.1, eb.1);
            assert_eq!(ea.2.is_some(), eb.2.is_some());
        }
    }
}

// ── CSV statistics ────────────────────────────────────────────────────────────

#[cfg(test)]
mod stats {
    use super::*;
    use crate::CsvStatsWriter;

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records()
            .map(|r| r.unwrap().iter().map(str::to_owned).collect())
            .collect()
    }

    #[test]
    fn the_episode_file_carries_the_expected_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvStatsWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("episode_stats.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["episode", "steps", "avg_reward", "epsilon", "checkpointed"]);
    }

    #[test]
    fn episode_rows_capture_steps_epsilon_and_the_checkpoint_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvStatsWriter::new(dir.path()).unwrap();

        w.on_step(1, -1.0, 0.5);
        w.on_step(2, 0.5, 0.4);
        w.on_step(1, 0.25, 0.3);
        w.on_episode_end(1, 0.25, Some(Path::new("model/run/model_1_0.25")));
        w.on_step(2, 0.1, 0.2);
        w.on_episode_end(2, -0.5, None);
        w.on_run_end(2, 0.25);
        assert!(w.take_error().is_none());

        let rows = read_rows(&dir.path().join("episode_stats.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ["1", "3", "0.25", "0.3", "1"]);
        assert_eq!(rows[1], ["2", "1", "-0.5", "0.2", "0"]);
    }

    #[test]
    fn the_step_log_is_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvStatsWriter::new(dir.path()).unwrap();
        w.on_step(1, 0.5, 0.9);
        w.finish().unwrap();
        assert!(!dir.path().join("step_log.csv").exists());

        let dir2 = tempfile::tempdir().unwrap();
        let mut w2 = CsvStatsWriter::with_step_log(dir2.path()).unwrap();
        w2.on_step(1, 0.5, 0.9);
        w2.on_step(2, -1.0, 0.8);
        w2.finish().unwrap();

        let rows = read_rows(&dir2.path().join("step_log.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ["1", "0.5", "0.9"]);
        assert_eq!(rows[1], ["2", "-1", "0.8"]);
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvStatsWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
        assert!(w.take_error().is_none());
    }

    #[test]
    fn a_short_run_fills_the_stats_file() {
        let run_dir = tempfile::tempdir().unwrap();
        let stats_dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            batch_size:      50,
            replay_capacity: 50,
            ..short_config(run_dir.path(), 5)
        };
        let mut trainer = Trainer::new(open_env(), CountingLearner::default(), config).unwrap();
        let mut w = CsvStatsWriter::new(stats_dir.path()).unwrap();

        trainer.run_episodes(2, &mut w).unwrap();
        w.finish().unwrap();
        assert!(w.take_error().is_none());

        let rows = read_rows(&stats_dir.path().join("episode_stats.csv"));
        assert_eq!(rows.len(), 2);
        // First episode runs the extra step; full throttle checkpoints it.
        assert_eq!(rows[0][0], "1");
        assert_eq!(rows[0][1], "6");
        assert_eq!(rows[0][4], "1");
        assert_eq!(rows[1][0], "2");
        assert_eq!(rows[1][1], "5");
        assert_eq!(rows[1][4], "0");
    }
}
