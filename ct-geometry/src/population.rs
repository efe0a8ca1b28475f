//! This module generates the [`Population`] for each [`GroupKind`].

use crate::{Cone, SceneConfig, Sphere, TreeShape};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;
use strum::{Display, EnumIter};
use tracing::{debug, instrument};

/// The groups of elements in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum GroupKind {
    /// Thousands of small glowing points making up the body of the tree.
    Foliage,

    /// Baubles that sit on the surface of the tree.
    Ornament,

    /// Boxes sitting around the bottom of the tree.
    Gift,

    /// Polaroid-style frames hanging on the tree.
    Photo,
}

impl GroupKind {
    /// The range that per-element scales are drawn from.
    fn scale_range(self) -> (f32, f32) {
        match self {
            Self::Foliage => (2., 7.),
            Self::Ornament => (0.3, 0.5),
            Self::Gift => (0.6, 0.8),
            Self::Photo => (0.8, 0.8),
        }
    }

    /// Sample a scale for one element of this group.
    fn sample_scale<R: Rng + ?Sized>(self, rng: &mut R) -> f32 {
        let (low, high) = self.scale_range();
        if high > low {
            rng.gen_range(low..high)
        } else {
            low
        }
    }
}

/// The immutable, per-element data for one group. Every `Vec` has the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct Population {
    /// Which group this is.
    pub kind: GroupKind,

    /// The target positions in the formed state.
    pub formed: Vec<Vec3>,

    /// The target positions in the chaos state.
    pub chaos: Vec<Vec3>,

    /// The size of each element.
    pub scales: Vec<f32>,

    /// Random values in `[0, 1)` used to decorrelate secondary motion.
    pub phases: Vec<Vec3>,

    /// The starting orientation of each element, as XYZ Euler angles in radians.
    pub rotations: Vec<Vec3>,
}

impl Population {
    /// An empty population with room for `count` elements.
    fn with_capacity(kind: GroupKind, count: usize) -> Self {
        Self {
            kind,
            formed: Vec::with_capacity(count),
            chaos: Vec::with_capacity(count),
            scales: Vec::with_capacity(count),
            phases: Vec::with_capacity(count),
            rotations: Vec::with_capacity(count),
        }
    }

    /// The number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.formed.len()
    }

    /// Are there no elements?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.formed.is_empty()
    }

    /// Generate the foliage: formed targets fill the cone and chaos targets fill the sphere.
    #[instrument(skip(rng))]
    pub fn foliage<R: Rng + ?Sized>(count: usize, cone: Cone, sphere: Sphere, rng: &mut R) -> Self {
        let mut population = Self::with_capacity(GroupKind::Foliage, count);

        for _ in 0..count {
            population.formed.push(cone.sample_volume(rng));
            population.chaos.push(sphere.sample_volume(rng));
            population.scales.push(GroupKind::Foliage.sample_scale(rng));
            population.phases.push(rng.gen());
            population.rotations.push(Vec3::ZERO);
        }

        population
    }

    /// Generate an instanced group: formed targets sit on the surface of the cone and chaos
    /// targets sit on the surface of the wider ornament sphere.
    fn instances<R: Rng + ?Sized>(
        kind: GroupKind,
        count: usize,
        shape: &TreeShape,
        rng: &mut R,
    ) -> Self {
        let cone = shape.cone();
        let sphere = shape.ornament_chaos_sphere();
        let mut population = Self::with_capacity(kind, count);

        for _ in 0..count {
            population
                .formed
                .push(cone.sample_surface(rng, shape.ornament_offset));
            population.chaos.push(sphere.sample_surface(rng));
            population.scales.push(kind.sample_scale(rng));
            population.phases.push(rng.gen());
            population.rotations.push(Vec3::new(
                rng.gen_range(0.0..PI),
                rng.gen_range(0.0..PI),
                0.,
            ));
        }

        population
    }

    /// Generate the ornaments.
    #[instrument(skip(shape, rng))]
    pub fn ornaments<R: Rng + ?Sized>(count: usize, shape: &TreeShape, rng: &mut R) -> Self {
        Self::instances(GroupKind::Ornament, count, shape, rng)
    }

    /// Generate the gifts, which sit in a band at the bottom of the tree and spread out wider
    /// than the cone.
    #[instrument(skip(shape, rng))]
    pub fn gifts<R: Rng + ?Sized>(count: usize, shape: &TreeShape, rng: &mut R) -> Self {
        let mut population = Self::instances(GroupKind::Gift, count, shape, rng);
        let band = shape.gift_band.min(shape.height);

        for target in &mut population.formed {
            target.y = -shape.height / 2.
                + if band > 0. {
                    rng.gen_range(0.0..band)
                } else {
                    0.
                };
            target.x *= shape.gift_spread;
            target.z *= shape.gift_spread;
        }

        population
    }

    /// Generate the photos.
    #[instrument(skip(shape, rng))]
    pub fn photos<R: Rng + ?Sized>(count: usize, shape: &TreeShape, rng: &mut R) -> Self {
        Self::instances(GroupKind::Photo, count, shape, rng)
    }
}

/// Every group in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Populations {
    pub foliage: Population,
    pub ornaments: Population,
    pub gifts: Population,
    pub photos: Population,
}

impl Populations {
    /// Generate every group described by the config.
    #[instrument(skip_all)]
    pub fn generate<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let shape = &config.tree;
        let counts = &config.counts;

        let populations = Self {
            foliage: Population::foliage(counts.foliage, shape.cone(), shape.chaos_sphere(), rng),
            ornaments: Population::ornaments(counts.ornaments, shape, rng),
            gifts: Population::gifts(counts.gifts, shape, rng),
            photos: Population::photos(counts.photos, shape, rng),
        };

        debug!(
            foliage = populations.foliage.len(),
            ornaments = populations.ornaments.len(),
            gifts = populations.gifts.len(),
            photos = populations.photos.len(),
            "Generated populations"
        );
        populations
    }

    /// Iterate over every group.
    pub fn iter(&self) -> impl Iterator<Item = &Population> {
        [&self.foliage, &self.ornaments, &self.gifts, &self.photos].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_rng;
    use glam::Vec3Swizzles;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn every_vec_has_the_configured_length() {
        let config = SceneConfig::default();
        let populations = Populations::generate(&config, &mut scene_rng());

        let expected = [4000, 150, 20, 20];
        for (population, expected) in populations.iter().zip(expected) {
            assert_eq!(population.len(), expected, "{}", population.kind);
            assert_eq!(population.chaos.len(), expected);
            assert_eq!(population.scales.len(), expected);
            assert_eq!(population.phases.len(), expected);
            assert_eq!(population.rotations.len(), expected);
        }
    }

    #[test]
    fn empty_populations_are_fine() {
        let mut config = SceneConfig::default();
        config.counts.foliage = 0;
        config.counts.photos = 0;

        let populations = Populations::generate(&config, &mut scene_rng());
        assert!(populations.foliage.is_empty());
        assert!(populations.photos.is_empty());
        assert_eq!(populations.ornaments.len(), 150);
    }

    #[test]
    fn scales_come_from_the_group_range() {
        let populations = Populations::generate(&SceneConfig::default(), &mut scene_rng());

        for population in populations.iter() {
            let (low, high) = population.kind.scale_range();
            for &scale in &population.scales {
                assert!(scale >= low && scale <= high, "{scale} for {}", population.kind);
            }
        }
        assert!(populations.photos.scales.iter().all(|&s| s == 0.8));
    }

    #[test]
    fn ornament_chaos_sphere_is_wider_than_foliage() {
        let shape = TreeShape::default();
        let ornaments = Population::ornaments(100, &shape, &mut scene_rng());

        for point in ornaments.chaos {
            assert!((point.length() - 18.).abs() < 1e-3);
        }
    }

    proptest! {
        #[test]
        fn foliage_targets_stay_in_bounds(seed: u64) {
            let shape = TreeShape::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let foliage = Population::foliage(200, shape.cone(), shape.chaos_sphere(), &mut rng);

            for (&formed, &chaos) in foliage.formed.iter().zip(&foliage.chaos) {
                prop_assert!(shape.cone().contains(formed, 0.));
                prop_assert!(formed.y >= -6. && formed.y <= 6.);
                prop_assert!(shape.chaos_sphere().contains(chaos));
            }
        }

        #[test]
        fn ornament_targets_hug_the_surface(seed: u64) {
            let shape = TreeShape::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let ornaments = Population::ornaments(100, &shape, &mut rng);

            for &formed in &ornaments.formed {
                let radius = shape.cone().radius_at_y(formed.y);
                let distance = formed.xz().length();

                prop_assert!(distance >= radius - 1e-3);
                prop_assert!(distance <= radius + shape.ornament_offset + 1e-3);
            }
        }

        #[test]
        fn gifts_sit_in_the_bottom_band(seed: u64) {
            let shape = TreeShape::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let gifts = Population::gifts(50, &shape, &mut rng);

            let max_spread = (shape.radius + shape.ornament_offset) * shape.gift_spread;
            for &formed in &gifts.formed {
                prop_assert!(formed.y >= -6. && formed.y < -4. + 1e-4);
                prop_assert!(formed.xz().length() <= max_spread + 1e-3);
            }
        }
    }
}
