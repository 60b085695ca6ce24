//! boxarena — smallest training demo for the raygym harness.
//!
//! Drives a linear Q-learner around a walled 1920x1080 arena with six
//! obstacle pillars.  Episodes are cut to 400 steps so the run finishes in
//! seconds; raise EPISODE_STEPS (and EPISODES) toward the `TrainConfig`
//! defaults for a real overnight run.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use rg_core::{EnvConfig, ProximityReward, TrainConfig};
use rg_env::Environment;
use rg_learner::{Learner, LinearConfig, LinearQLearner};
use rg_scene::load_scene_reader;
use rg_train::{CsvStatsWriter, StopFlag, TrainObserver, Trainer};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:           u64  = 42;
const EPISODES:       u64  = 25;
const EPISODE_STEPS:  u64  = 400;
const PRINT_INTERVAL: u64  = 500; // progress line every this many total steps
const RUN_ID:         &str = "demo";
const OUTPUT_DIR:     &str = "output/boxarena";

// ── Scene ─────────────────────────────────────────────────────────────────────

// Six obstacle pillars spread across the arena, agent spawning in the
// south-west corner pointing at open space.
// type 0 = obstacle, 1 = agent; shape = polygon sides; dir = heading (rad).
const SCENE_JSON: &str = r#"{
  "bodies": [
    { "type": 0, "size": 80.0, "shape": 4, "dir": 0.7854, "x":    0.0, "y":    0.0 },
    { "type": 0, "size": 70.0, "shape": 3, "dir": 0.0,    "x":  500.0, "y":  250.0 },
    { "type": 0, "size": 90.0, "shape": 6, "dir": 0.0,    "x": -500.0, "y":  300.0 },
    { "type": 0, "size": 60.0, "shape": 4, "dir": 0.0,    "x":  450.0, "y": -280.0 },
    { "type": 0, "size": 75.0, "shape": 5, "dir": 0.3,    "x": -350.0, "y": -250.0 },
    { "type": 0, "size": 65.0, "shape": 3, "dir": 1.2,    "x":  150.0, "y": -360.0 },
    { "type": 1, "size": 20.0, "shape": 3, "dir": 0.9,    "x": -700.0, "y": -380.0 }
  ]
}"#;

// ── Observer: progress prints + stop after EPISODES ───────────────────────────

struct ProgressObserver {
    stats:       CsvStatsWriter,
    stop:        StopFlag,
    steps:       u64,
    checkpoints: usize,
}

impl ProgressObserver {
    fn new(stats: CsvStatsWriter, stop: StopFlag) -> Self {
        Self { stats, stop, steps: 0, checkpoints: 0 }
    }
}

impl TrainObserver for ProgressObserver {
    fn on_step(&mut self, step: u64, reward: f32, epsilon: f32) {
        self.steps += 1;
        if self.steps.is_multiple_of(PRINT_INTERVAL) {
            println!(
                "step {:>6}  epsilon {:.3}  reward {:+.3}",
                self.steps, epsilon, reward
            );
        }
        self.stats.on_step(step, reward, epsilon);
    }

    fn on_episode_end(&mut self, episode: u64, avg_reward: f32, checkpoint: Option<&Path>) {
        match checkpoint {
            Some(path) => {
                self.checkpoints += 1;
                println!("episode {episode:>3}  avg {avg_reward:>6.2}  saved {}", path.display());
            }
            None => println!("episode {episode:>3}  avg {avg_reward:>6.2}"),
        }
        if episode >= EPISODES {
            self.stop.stop();
        }
        self.stats.on_episode_end(episode, avg_reward, checkpoint);
    }

    fn on_run_end(&mut self, episodes: u64, best_avg: f32) {
        self.stats.on_run_end(episodes, best_avg);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== boxarena — raygym linear Q demo ===");
    println!("Episodes: {EPISODES}  |  Steps/episode: {EPISODE_STEPS}  |  Seed: {SEED}");
    println!("(Raise EPISODE_STEPS to 5000 and EPISODES into the hundreds for a real run)");
    println!();

    // 1. Load the embedded scene.
    let scene = load_scene_reader(Cursor::new(SCENE_JSON))?;
    println!("Scene: {} obstacles + 1 agent", scene.obstacles.len());

    // 2. Environment: stock vehicle and sensor, clearance term on the nose ray.
    let env_config = EnvConfig {
        proximity_reward: Some(ProximityReward::default()),
        ..EnvConfig::default()
    };
    let env = Environment::from_scene(&scene, env_config)?;
    println!(
        "Arena: {}x{}  |  rays: {} ({}-element observation)",
        env.config().arena_width,
        env.config().arena_height,
        env.config().sensor_count,
        env.observation_len()
    );
    println!();

    // 3. Learner: zero-initialised linear Q over the ray field.
    let learner = LinearQLearner::new(env.observation_len(), LinearConfig::default(), SEED);

    // 4. Training config: stock cadences, short episodes.
    let config = TrainConfig {
        episode_steps:  EPISODE_STEPS,
        run_id:         RUN_ID.into(),
        checkpoint_dir: OUTPUT_DIR.into(),
        seed:           SEED,
        ..TrainConfig::default()
    };

    // 5. Trainer.
    let mut trainer = Trainer::new(env, learner, config)?;

    // 6. Per-episode stats CSV, written next to the checkpoints.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let stats = CsvStatsWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = ProgressObserver::new(stats, trainer.stop_flag());

    // 7. Run until the observer has counted EPISODES episodes.
    let t0 = Instant::now();
    trainer.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.stats.take_error() {
        eprintln!("stats error: {e}");
    }

    // 8. Summary.
    println!();
    println!("Training complete in {:.3} s", elapsed.as_secs_f64());
    println!("  episodes      : {}", trainer.episode_count());
    println!("  steps         : {}", obs.steps);
    println!("  checkpoints   : {}", obs.checkpoints);
    println!("  best average  : {:+.2}", trainer.best_average());
    println!("  final epsilon : {:.3}", trainer.learner().epsilon());
    println!();

    // 9. Checkpoint inventory.
    let mut entries: Vec<std::fs::DirEntry> =
        std::fs::read_dir(trainer.checkpoint_directory())?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());

    println!("{:<24} {:>10}", "Checkpoint", "Bytes");
    println!("{}", "-".repeat(35));
    for entry in &entries {
        println!(
            "{:<24} {:>10}",
            entry.file_name().to_string_lossy(),
            entry.metadata()?.len()
        );
    }

    Ok(())
}
