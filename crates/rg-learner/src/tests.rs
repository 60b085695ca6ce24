//! Schedule, linear learner, and baseline policy tests.

use rg_core::{Action, Observation, Transition};

use crate::{LinearConfig, LinearQLearner};

/// Two-element observation (one ray plus speed).
fn obs2(ray: f32, speed: f32) -> Observation {
    Observation::from_parts(vec![ray], speed)
}

fn terminal(state: Observation, action: Action, reward: f32) -> Transition {
    Transition {
        state: state.clone(),
        action,
        next_state: state,
        reward,
        done: true,
    }
}

/// Learner with exploration off and a fast learning rate, for tests that
/// need deterministic greedy picks and visible weight movement.
fn greedy_learner(obs_len: usize) -> LinearQLearner {
    let config = LinearConfig {
        learning_rate: 0.1,
        epsilon_start: 0.0,
        ..LinearConfig::default()
    };
    LinearQLearner::new(obs_len, config, 7)
}

#[cfg(test)]
mod schedule {
    use crate::EpsilonGreedy;

    #[test]
    fn decay_clamps_exactly_to_the_floor() {
        let mut s = EpsilonGreedy::new(0.5, 0.4, 0.5);
        assert!(!s.at_floor());
        s.decay();
        assert_eq!(s.epsilon(), 0.4);
        assert!(s.at_floor());
    }

    #[test]
    fn repeated_decay_reaches_the_floor() {
        let mut s = EpsilonGreedy::new(0.5, 0.1, 0.9);
        for _ in 0..100 {
            s.decay();
        }
        assert_eq!(s.epsilon(), s.floor());
        assert!(s.at_floor());
    }

    #[test]
    fn set_kicks_the_schedule_off_its_floor() {
        let mut s = EpsilonGreedy::new(0.1, 0.1, 0.9);
        assert!(s.at_floor());
        s.set(0.2);
        assert_eq!(s.epsilon(), 0.2);
        assert!(!s.at_floor());
    }
}

#[cfg(test)]
mod linear {
    use rg_core::RunRng;

    use super::*;
    use crate::{Learner, LearnerError};

    #[test]
    fn untrained_greedy_pick_is_the_first_action() {
        let mut learner = greedy_learner(2);
        for _ in 0..10 {
            assert_eq!(learner.predict_action(&obs2(0.3, 0.9)), Action::Forward);
        }
    }

    #[test]
    fn training_pulls_q_toward_the_reward() {
        let mut learner = greedy_learner(2);
        let t = terminal(obs2(1.0, 0.0), Action::Forward, 1.0);

        let first_loss = learner.train(std::slice::from_ref(&t)).unwrap();
        assert_eq!(first_loss, 1.0);

        let mut last_loss = first_loss;
        for _ in 0..19 {
            last_loss = learner.train(std::slice::from_ref(&t)).unwrap();
        }
        assert!(last_loss < 0.01, "loss failed to fall: {last_loss}");
        assert!(learner.q_values(&obs2(1.0, 0.0))[Action::Forward.index()] > 0.9);
    }

    #[test]
    fn trained_action_wins_the_greedy_pick() {
        let mut learner = greedy_learner(2);
        let t = terminal(obs2(1.0, 0.0), Action::Left, 1.0);
        for _ in 0..20 {
            learner.train(std::slice::from_ref(&t)).unwrap();
        }
        assert_eq!(learner.predict_action(&obs2(1.0, 0.0)), Action::Left);
    }

    #[test]
    fn bootstrapping_goes_through_the_frozen_target() {
        let mut learner = greedy_learner(2);
        let state_a = obs2(1.0, 0.0);
        let state_b = obs2(0.0, 1.0);

        // Make state A valuable to the online weights only.
        let t1 = terminal(state_a.clone(), Action::Forward, 1.0);
        for _ in 0..30 {
            learner.train(std::slice::from_ref(&t1)).unwrap();
        }

        // A non-terminal step from B into A.  While the target is still the
        // zero snapshot, the lookahead sees nothing and B stays worthless.
        let t2 = Transition {
            state:      state_b.clone(),
            action:     Action::Right,
            next_state: state_a.clone(),
            reward:     0.0,
            done:       false,
        };
        for _ in 0..5 {
            learner.train(std::slice::from_ref(&t2)).unwrap();
        }
        assert_eq!(learner.q_values(&state_b)[Action::Right.index()], 0.0);

        // After a sync the lookahead sees A's value and B picks it up.
        learner.update_target();
        for _ in 0..30 {
            learner.train(std::slice::from_ref(&t2)).unwrap();
        }
        assert!(learner.q_values(&state_b)[Action::Right.index()] > 0.5);
    }

    #[test]
    fn empty_batch_is_a_zero_loss_noop() {
        let mut learner = greedy_learner(2);
        assert_eq!(learner.train(&[]).unwrap(), 0.0);
    }

    #[test]
    fn wrong_observation_width_is_an_error() {
        let mut learner = greedy_learner(3);
        let t = terminal(obs2(1.0, 0.0), Action::Forward, 1.0);
        assert!(matches!(
            learner.train(std::slice::from_ref(&t)),
            Err(LearnerError::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn full_exploration_spreads_over_the_alphabet() {
        let config = LinearConfig { epsilon_start: 1.0, ..LinearConfig::default() };
        let mut learner = LinearQLearner::new(2, config, 42);
        let mut seen = [false; Action::COUNT];
        for _ in 0..100 {
            seen[learner.predict_action(&obs2(0.0, 0.0)).index()] = true;
        }
        assert!(seen.iter().all(|&s| s), "actions seen: {seen:?}");
    }

    #[test]
    fn epsilon_cycle_via_the_trait() {
        let config = LinearConfig {
            epsilon_start: 0.5,
            epsilon_floor: 0.4,
            epsilon_decay: 0.5,
            ..LinearConfig::default()
        };
        let mut learner = LinearQLearner::new(2, config, 7);
        assert!(!learner.at_floor());
        learner.decay_epsilon();
        assert_eq!(learner.epsilon(), 0.4);
        assert!(learner.at_floor());
        learner.set_epsilon(0.2);
        assert_eq!(learner.epsilon(), 0.2);
        assert!(!learner.at_floor());
    }

    #[test]
    fn checkpoint_roundtrip_restores_q_and_epsilon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/run/model_1_0.5");

        let mut learner = greedy_learner(2);
        let t = terminal(obs2(1.0, 0.0), Action::Brake, 1.0);
        for _ in 0..8 {
            learner.train(std::slice::from_ref(&t)).unwrap();
        }
        learner.save(&path).unwrap();
        assert!(path.exists());

        let restored = LinearQLearner::load(&path, RunRng::new(0)).unwrap();
        let probe = obs2(0.7, 0.2);
        assert_eq!(restored.obs_len(), 2);
        assert_eq!(restored.epsilon(), learner.epsilon());
        assert_eq!(restored.q_values(&probe), learner.q_values(&probe));
        assert_eq!(restored.config(), learner.config());
    }

    #[test]
    fn malformed_checkpoint_shape_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad");
        std::fs::write(
            &path,
            r#"{
                "obs_len": 2,
                "config": {
                    "learning_rate": 0.1, "gamma": 0.99,
                    "epsilon_start": 1.0, "epsilon_floor": 0.01, "epsilon_decay": 0.995
                },
                "schedule": {"epsilon": 1.0, "floor": 0.01, "decay": 0.995},
                "weights": [[0.0, 0.0]],
                "bias": [0.0]
            }"#,
        )
        .unwrap();
        assert!(matches!(
            LinearQLearner::load(&path, RunRng::new(0)),
            Err(LearnerError::BadCheckpoint(_))
        ));
    }
}

#[cfg(test)]
mod random {
    use super::*;
    use crate::{Learner, RandomPolicy};

    #[test]
    fn actions_cover_the_alphabet() {
        let mut policy = RandomPolicy::new(11);
        let mut seen = [false; Action::COUNT];
        for _ in 0..200 {
            seen[policy.predict_action(&obs2(0.0, 0.0)).index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn trait_defaults_are_inert() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nothing");

        let mut policy = RandomPolicy::new(11);
        let t = terminal(obs2(1.0, 0.0), Action::Forward, 1.0);
        assert_eq!(policy.train(std::slice::from_ref(&t)).unwrap(), 0.0);
        policy.update_target();
        policy.decay_epsilon();
        policy.set_epsilon(0.5);
        assert_eq!(policy.epsilon(), 1.0);
        assert!(!policy.at_floor());
        policy.save(&path).unwrap();
        assert!(!path.exists());
    }
}
