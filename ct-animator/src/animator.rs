//! This module handles the [`Animator`], which steps every group once per rendered frame.

use crate::{BlendRate, ElementGroup, SecondaryMotion};
use ct_geometry::{MotionConfig, Populations};
use ct_hand::HandSample;
use tracing::{instrument, trace};

/// Owns the mutable state of every element in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Animator {
    foliage: ElementGroup,
    ornaments: ElementGroup,
    gifts: ElementGroup,
    photos: ElementGroup,

    /// The number of frames stepped so far.
    frames: u64,
}

impl Animator {
    /// Create an animator with every element at its formed target.
    ///
    /// # Panics
    ///
    /// Panics if any population is internally mismatched. See [`ElementGroup::new`].
    #[instrument(skip_all)]
    pub fn new(populations: &Populations, motion: &MotionConfig) -> Self {
        Self {
            foliage: ElementGroup::new(
                &populations.foliage,
                BlendRate::PerState {
                    formed: motion.foliage_formed_rate,
                    chaos: motion.foliage_chaos_rate,
                },
                SecondaryMotion::None,
            ),
            ornaments: ElementGroup::new(
                &populations.ornaments,
                BlendRate::Jittered {
                    base: motion.ornament_rate,
                    step: motion.ornament_rate_jitter,
                    period: 10,
                },
                SecondaryMotion::Tumble {
                    per_frame: motion.ornament_spin,
                },
            ),
            gifts: ElementGroup::new(
                &populations.gifts,
                BlendRate::Constant(motion.gift_rate),
                SecondaryMotion::Bob,
            ),
            photos: ElementGroup::new(
                &populations.photos,
                BlendRate::Constant(motion.photo_rate),
                SecondaryMotion::FaceAxis {
                    spin: motion.photo_spin,
                },
            ),
            frames: 0,
        }
    }

    /// Step every group one frame towards the targets selected by `sample`. `elapsed` is the
    /// number of seconds since the animation started.
    pub fn tick(&mut self, sample: &HandSample, elapsed: f32) {
        for group in [
            &mut self.foliage,
            &mut self.ornaments,
            &mut self.gifts,
            &mut self.photos,
        ] {
            group.step(sample.state, elapsed);
        }

        self.frames += 1;
        if self.frames % 600 == 0 {
            trace!(frames = self.frames, state = %sample.state, "Animator still ticking");
        }
    }

    /// The number of frames stepped so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Every group, in drawing order.
    pub fn groups(&self) -> [&ElementGroup; 4] {
        [&self.foliage, &self.ornaments, &self.gifts, &self.photos]
    }

    pub fn foliage(&self) -> &ElementGroup {
        &self.foliage
    }

    pub fn ornaments(&self) -> &ElementGroup {
        &self.ornaments
    }

    pub fn gifts(&self) -> &ElementGroup {
        &self.gifts
    }

    pub fn photos(&self) -> &ElementGroup {
        &self.photos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_geometry::{scene_rng, GroupKind, Population, SceneConfig};
    use ct_hand::InteractionState;
    use float_cmp::approx_eq;
    use glam::Vec3;

    fn small_scene() -> (Populations, MotionConfig) {
        let mut config = SceneConfig::default();
        config.counts.foliage = 300;
        (
            Populations::generate(&config, &mut scene_rng()),
            config.motion,
        )
    }

    fn chaos() -> HandSample {
        HandSample::new(InteractionState::Chaos, 0.5, 0.5)
    }

    #[test]
    fn starts_formed() {
        let (populations, motion) = small_scene();
        let animator = Animator::new(&populations, &motion);

        for group in animator.groups() {
            for (index, &current) in group.current().iter().enumerate() {
                assert_eq!(current, group.target(InteractionState::Formed, index));
            }
        }
        assert_eq!(animator.frames(), 0);
    }

    #[test]
    fn formed_is_a_fixed_point() {
        let (populations, motion) = small_scene();
        let mut animator = Animator::new(&populations, &motion);
        let before: Vec<Vec<Vec3>> = animator
            .groups()
            .iter()
            .map(|group| group.current().to_vec())
            .collect();

        for frame in 0..50 {
            animator.tick(&HandSample::default(), frame as f32 / 60.);
        }

        for (group, before) in animator.groups().iter().zip(before) {
            assert_eq!(group.current(), before.as_slice(), "{}", group.kind());
        }
    }

    #[test]
    fn foliage_converges_at_the_chaos_rate() {
        let (populations, motion) = small_scene();
        let mut animator = Animator::new(&populations, &motion);

        let initial: Vec<f32> = (0..animator.foliage().len())
            .map(|i| {
                animator.foliage().current()[i]
                    .distance(animator.foliage().target(InteractionState::Chaos, i))
            })
            .collect();

        for frame in 0..30 {
            animator.tick(&chaos(), frame as f32 / 60.);
        }

        let factor = (1f32 - 0.05).powi(30);
        for (i, initial) in initial.into_iter().enumerate() {
            let foliage = animator.foliage();
            let distance = foliage.current()[i].distance(foliage.target(InteractionState::Chaos, i));
            assert!(
                approx_eq!(f32, distance, initial * factor, epsilon = 1e-3 + initial * 1e-4),
                "{distance} vs {}",
                initial * factor
            );
        }
    }

    #[test]
    fn every_group_ends_near_its_chaos_targets() {
        let (populations, motion) = small_scene();
        let mut animator = Animator::new(&populations, &motion);

        for frame in 0..1000 {
            animator.tick(&chaos(), frame as f32 / 60.);
        }

        for group in animator.groups() {
            for (index, &current) in group.current().iter().enumerate() {
                let target = group.target(InteractionState::Chaos, index);
                assert!(current.distance(target) < 0.01, "{} {index}", group.kind());
            }
        }
        assert_eq!(animator.frames(), 1000);
    }

    #[test]
    fn switching_back_moves_by_the_rate_from_where_it_was() {
        let (populations, motion) = small_scene();
        let mut animator = Animator::new(&populations, &motion);

        for frame in 0..40 {
            animator.tick(&chaos(), frame as f32 / 60.);
        }
        let before = animator.gifts().current().to_vec();

        animator.tick(&HandSample::default(), 1.);
        let gifts = animator.gifts();
        for (index, (&previous, &now)) in before.iter().zip(gifts.current()).enumerate() {
            let target = gifts.target(InteractionState::Formed, index);
            let expected = previous + (target - previous) * 0.02;
            assert!(now.abs_diff_eq(expected, 1e-5));
        }
    }

    #[test]
    fn ornament_rates_are_jittered() {
        let (populations, motion) = small_scene();
        let animator = Animator::new(&populations, &motion);
        let rate = animator.ornaments().rate();

        for index in 0..animator.ornaments().len() {
            let r = rate.rate(InteractionState::Chaos, index);
            assert!((0.05..=0.068 + 1e-6).contains(&r));
        }
        assert!(rate.rate(InteractionState::Chaos, 9) > rate.rate(InteractionState::Chaos, 0));
    }

    #[test]
    fn gifts_bob_and_ornaments_tumble() {
        let (populations, motion) = small_scene();
        let mut animator = Animator::new(&populations, &motion);
        let ornament_rotation = animator.ornaments().rotations()[3];

        animator.tick(&HandSample::default(), 2.);

        for (index, rotation) in animator.gifts().rotations().iter().enumerate() {
            assert!(approx_eq!(f32, rotation.x, (2. + index as f32).sin()));
        }

        let now = animator.ornaments().rotations()[3];
        assert!(approx_eq!(f32, now.x, ornament_rotation.x + 0.01, epsilon = 1e-5));
        assert!(approx_eq!(f32, now.y, ornament_rotation.y + 0.01, epsilon = 1e-5));
    }

    #[test]
    #[should_panic]
    fn mismatched_populations_panic() {
        let (mut populations, motion) = small_scene();
        populations.photos = Population {
            kind: GroupKind::Photo,
            formed: vec![Vec3::ZERO; 4],
            chaos: vec![Vec3::ZERO; 3],
            scales: vec![0.8; 4],
            phases: vec![Vec3::ZERO; 4],
            rotations: vec![Vec3::ZERO; 4],
        };

        Animator::new(&populations, &motion);
    }
}
