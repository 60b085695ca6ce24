//! Ring behaviour and sampling distribution tests.

use rg_core::{Action, Observation, Transition};

use crate::{ReplayBuffer, ReplayError};

/// Transition whose reward doubles as an identity tag.
fn tagged(tag: f32) -> Transition {
    Transition {
        state:      Observation::from_parts(vec![tag], 0.0),
        action:     Action::Forward,
        next_state: Observation::from_parts(vec![tag], 1.0),
        reward:     tag,
        done:       false,
    }
}

fn fill(buffer: &mut ReplayBuffer, tags: std::ops::Range<u32>) {
    for tag in tags {
        buffer.push(tagged(tag as f32));
    }
}

fn stored_tags(buffer: &ReplayBuffer) -> Vec<f32> {
    buffer.iter().map(|t| t.reward).collect()
}

#[cfg(test)]
mod ring {
    use super::*;

    #[test]
    fn filling_reports_len_and_capacity() {
        let mut buffer = ReplayBuffer::new(10, 8, 7);
        fill(&mut buffer, 0..5);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.capacity(), 10);
        assert!(!buffer.is_empty());
        assert!(!buffer.trainable());
    }

    #[test]
    fn trainable_flips_at_batch_min() {
        let mut buffer = ReplayBuffer::new(10, 3, 7);
        fill(&mut buffer, 0..2);
        assert!(!buffer.trainable());
        buffer.push(tagged(2.0));
        assert!(buffer.trainable());
    }

    #[test]
    fn one_past_capacity_evicts_the_oldest() {
        let mut buffer = ReplayBuffer::new(4, 1, 7);
        fill(&mut buffer, 0..5);
        assert_eq!(buffer.len(), 4);
        assert_eq!(stored_tags(&buffer), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn overwrite_keeps_age_order_through_wraparound() {
        let mut buffer = ReplayBuffer::new(4, 1, 7);
        fill(&mut buffer, 0..11);
        assert_eq!(stored_tags(&buffer), vec![7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    #[should_panic(expected = "replay capacity")]
    fn zero_capacity_is_a_programming_error() {
        let _ = ReplayBuffer::new(0, 1, 7);
    }
}

#[cfg(test)]
mod sampling {
    use super::*;

    #[test]
    fn undersized_buffer_refuses_to_sample() {
        let mut buffer = ReplayBuffer::new(10, 2, 1);
        fill(&mut buffer, 0..3);
        let err = buffer.sample(4, 0.0).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::InsufficientData { requested: 4, available: 3 }
        ));
    }

    #[test]
    fn bad_alpha_is_rejected() {
        let mut buffer = ReplayBuffer::new(10, 1, 1);
        fill(&mut buffer, 0..5);
        assert!(matches!(
            buffer.sample(2, -1.0),
            Err(ReplayError::InvalidAlpha(_))
        ));
        assert!(matches!(
            buffer.sample(2, f32::NAN),
            Err(ReplayError::InvalidAlpha(_))
        ));
    }

    #[test]
    fn empty_batch_from_empty_buffer_is_fine() {
        let mut buffer = ReplayBuffer::new(4, 1, 1);
        assert_eq!(buffer.sample(0, 0.0).unwrap().len(), 0);
    }

    #[test]
    fn batches_have_the_requested_size() {
        let mut buffer = ReplayBuffer::new(16, 1, 3);
        fill(&mut buffer, 0..10);
        assert_eq!(buffer.sample(6, 0.0).unwrap().len(), 6);
        assert_eq!(buffer.sample(6, 0.6).unwrap().len(), 6);
        assert_eq!(buffer.sample(10, 0.6).unwrap().len(), 10);
    }

    #[test]
    fn uniform_sampling_covers_the_whole_buffer() {
        let mut buffer = ReplayBuffer::new(8, 1, 42);
        fill(&mut buffer, 0..8);

        let mut counts = [0usize; 8];
        for _ in 0..100 {
            for t in buffer.sample(8, 0.0).unwrap() {
                counts[t.reward as usize] += 1;
            }
        }
        // 800 draws over 8 slots: every slot seen, none wildly off 100.
        for (tag, &count) in counts.iter().enumerate() {
            assert!(count > 40 && count < 180, "tag {tag} drawn {count} times");
        }
    }

    #[test]
    fn recency_weighting_prefers_new_entries() {
        let mut buffer = ReplayBuffer::new(100, 1, 42);
        fill(&mut buffer, 0..100);

        let mut sum = 0.0f64;
        let mut draws = 0usize;
        for _ in 0..20 {
            for t in buffer.sample(100, 3.0).unwrap() {
                sum += t.reward as f64;
                draws += 1;
            }
        }
        let mean = sum / draws as f64;
        // Cubic weighting pushes the mean tag well past the uniform 49.5.
        assert!(mean > 65.0, "mean tag {mean} is not recency-biased");
    }

    #[test]
    fn same_seed_reproduces_the_same_draws() {
        let mut a = ReplayBuffer::new(32, 1, 9);
        let mut b = ReplayBuffer::new(32, 1, 9);
        fill(&mut a, 0..20);
        fill(&mut b, 0..20);

        for alpha in [0.0, 0.6] {
            let ra: Vec<f32> = a.sample(8, alpha).unwrap().iter().map(|t| t.reward).collect();
            let rb: Vec<f32> = b.sample(8, alpha).unwrap().iter().map(|t| t.reward).collect();
            assert_eq!(ra, rb);
        }
    }
}
