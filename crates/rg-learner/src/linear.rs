//! A linear Q-function learner behind the [`Learner`] seam.
//!
//! `Q(s, a) = w_a · s + b_a`, one weight row per action, trained with TD(0)
//! targets computed against a frozen copy of the weights.  [`update_target`]
//! replaces the frozen copy with the online one.
//!
//! This is deliberately the smallest model that exercises the whole loop
//! with honest numerics; anything heavier plugs in through the same trait.
//!
//! [`update_target`]: Learner::update_target

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rg_core::{Action, Observation, RunRng, Transition};
use serde::{Deserialize, Serialize};

use crate::epsilon::EpsilonGreedy;
use crate::error::{LearnerError, LearnerResult};
use crate::learner::Learner;

/// Hyperparameters for [`LinearQLearner`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConfig {
    /// SGD step size for the TD update.
    pub learning_rate: f32,
    /// Discount factor for future reward.
    pub gamma: f32,
    pub epsilon_start: f32,
    pub epsilon_floor: f32,
    pub epsilon_decay: f32,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            gamma:         0.99,
            epsilon_start: 1.0,
            epsilon_floor: 0.01,
            epsilon_decay: 0.995,
        }
    }
}

/// Per-action linear Q with a frozen target copy and epsilon-greedy
/// action selection.
///
/// Weights start at zero, so an untrained learner with exploration off
/// always picks the first action (ties break to the lowest index).
pub struct LinearQLearner {
    obs_len:  usize,
    config:   LinearConfig,
    schedule: EpsilonGreedy,
    /// Online parameters: one `obs_len` row per action plus a bias.
    weights: Vec<Vec<f32>>,
    bias:    Vec<f32>,
    target_weights: Vec<Vec<f32>>,
    target_bias:    Vec<f32>,
    rng: RunRng,
}

/// On-disk form.  The frozen target is not stored; load re-syncs it from
/// the online weights.
#[derive(Serialize, Deserialize)]
struct Checkpoint {
    obs_len:  usize,
    config:   LinearConfig,
    schedule: EpsilonGreedy,
    weights:  Vec<Vec<f32>>,
    bias:     Vec<f32>,
}

impl LinearQLearner {
    /// Zero-initialised learner for observations of width `obs_len`.
    pub fn new(obs_len: usize, config: LinearConfig, seed: u64) -> Self {
        Self::with_rng(obs_len, config, RunRng::new(seed))
    }

    /// Like [`new`](Self::new) but with a caller-derived RNG stream.
    pub fn with_rng(obs_len: usize, config: LinearConfig, rng: RunRng) -> Self {
        let weights = vec![vec![0.0; obs_len]; Action::COUNT];
        let bias = vec![0.0; Action::COUNT];
        let schedule = EpsilonGreedy::new(
            config.epsilon_start,
            config.epsilon_floor,
            config.epsilon_decay,
        );
        LinearQLearner {
            obs_len,
            config,
            schedule,
            target_weights: weights.clone(),
            target_bias: bias.clone(),
            weights,
            bias,
            rng,
        }
    }

    /// Rebuild a learner from a checkpoint written by
    /// [`save`](Learner::save).  The target starts as a fresh copy of the
    /// restored online weights.
    pub fn load(path: &Path, rng: RunRng) -> LearnerResult<Self> {
        let file = File::open(path)?;
        let cp: Checkpoint = serde_json::from_reader(BufReader::new(file))?;

        if cp.weights.len() != Action::COUNT || cp.bias.len() != Action::COUNT {
            return Err(LearnerError::BadCheckpoint(format!(
                "expected {} weight rows, found {}",
                Action::COUNT,
                cp.weights.len()
            )));
        }
        if let Some(row) = cp.weights.iter().find(|row| row.len() != cp.obs_len) {
            return Err(LearnerError::BadCheckpoint(format!(
                "weight row of width {} in a checkpoint of width {}",
                row.len(),
                cp.obs_len
            )));
        }

        Ok(LinearQLearner {
            obs_len: cp.obs_len,
            config: cp.config,
            schedule: cp.schedule,
            target_weights: cp.weights.clone(),
            target_bias: cp.bias.clone(),
            weights: cp.weights,
            bias: cp.bias,
            rng,
        })
    }

    /// Q-values for every action under the online weights.
    ///
    /// # Panics
    ///
    /// Panics if the observation width differs from the learner's.
    pub fn q_values(&self, state: &Observation) -> [f32; Action::COUNT] {
        self.q_from(&self.weights, &self.bias, state.as_slice())
    }

    pub fn obs_len(&self) -> usize {
        self.obs_len
    }

    pub fn config(&self) -> &LinearConfig {
        &self.config
    }

    fn q_from(&self, weights: &[Vec<f32>], bias: &[f32], state: &[f32]) -> [f32; Action::COUNT] {
        assert_eq!(
            state.len(),
            self.obs_len,
            "observation width {} does not match learner width {}",
            state.len(),
            self.obs_len
        );
        let mut q = [0.0f32; Action::COUNT];
        for (a, row) in weights.iter().enumerate() {
            q[a] = bias[a] + row.iter().zip(state).map(|(w, x)| w * x).sum::<f32>();
        }
        q
    }

    fn greedy(q: &[f32; Action::COUNT]) -> Action {
        let mut best = 0;
        for (i, &v) in q.iter().enumerate() {
            if v > q[best] {
                best = i;
            }
        }
        Action::from_index(best).unwrap_or(Action::Forward)
    }

    /// TD(0) target for one transition: terminal transitions are their
    /// reward alone, the rest look one step ahead through the frozen target.
    fn td_target(&self, t: &Transition) -> f32 {
        if t.done {
            t.reward
        } else {
            let q_next =
                self.q_from(&self.target_weights, &self.target_bias, t.next_state.as_slice());
            let max_next = q_next.iter().fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            t.reward + self.config.gamma * max_next
        }
    }
}

impl Learner for LinearQLearner {
    fn predict_action(&mut self, state: &Observation) -> Action {
        if self.rng.random::<f32>() < self.schedule.epsilon() {
            return self.rng.choose(&Action::ALL).copied().unwrap_or(Action::Forward);
        }
        Self::greedy(&self.q_values(state))
    }

    fn train(&mut self, batch: &[Transition]) -> LearnerResult<f32> {
        if batch.is_empty() {
            return Ok(0.0);
        }

        let mut loss = 0.0f32;
        for t in batch {
            let state = t.state.as_slice();
            if state.len() != self.obs_len {
                return Err(LearnerError::DimensionMismatch {
                    expected: self.obs_len,
                    got:      state.len(),
                });
            }
            if t.next_state.len() != self.obs_len {
                return Err(LearnerError::DimensionMismatch {
                    expected: self.obs_len,
                    got:      t.next_state.len(),
                });
            }

            let target = self.td_target(t);
            let a = t.action.index();
            let q = self.bias[a]
                + self.weights[a].iter().zip(state).map(|(w, x)| w * x).sum::<f32>();
            let err = target - q;
            loss += err * err;

            let lr = self.config.learning_rate;
            for (w, x) in self.weights[a].iter_mut().zip(state) {
                *w += lr * err * x;
            }
            self.bias[a] += lr * err;
        }
        Ok(loss / batch.len() as f32)
    }

    fn update_target(&mut self) {
        self.target_weights.clone_from(&self.weights);
        self.target_bias.clone_from(&self.bias);
    }

    fn epsilon(&self) -> f32 {
        self.schedule.epsilon()
    }

    fn set_epsilon(&mut self, epsilon: f32) {
        self.schedule.set(epsilon);
    }

    fn decay_epsilon(&mut self) {
        self.schedule.decay();
    }

    fn at_floor(&self) -> bool {
        self.schedule.at_floor()
    }

    fn save(&self, path: &Path) -> LearnerResult<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let file = File::create(path)?;
        let cp = Checkpoint {
            obs_len:  self.obs_len,
            config:   self.config.clone(),
            schedule: self.schedule.clone(),
            weights:  self.weights.clone(),
            bias:     self.bias.clone(),
        };
        serde_json::to_writer(BufWriter::new(file), &cp)?;
        Ok(())
    }
}
