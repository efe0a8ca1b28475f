//! This module handles the two shapes that targets are sampled from.

use glam::{Vec3, Vec3Swizzles};
use rand::Rng;
use std::f32::consts::TAU;

/// An upright cone centred on the origin, with its base at `y = -height / 2` and its apex at
/// `y = height / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cone {
    /// The full height of the cone.
    pub height: f32,

    /// The radius of the base.
    pub base_radius: f32,
}

impl Cone {
    /// The radius of the cone at the given fraction of its height, where 0 is the base and 1 is
    /// the apex.
    #[inline]
    pub fn radius_at_fraction(&self, fraction: f32) -> f32 {
        (1. - fraction) * self.base_radius
    }

    /// The radius of the cone at the given `y` coordinate, clamped to the ends of the cone.
    pub fn radius_at_y(&self, y: f32) -> f32 {
        let fraction = (y + self.height / 2.) / self.height;
        self.radius_at_fraction(fraction.clamp(0., 1.))
    }

    /// The `y` coordinate at the given fraction of the height.
    #[inline]
    fn y_at_fraction(&self, fraction: f32) -> f32 {
        fraction * self.height - self.height / 2.
    }

    /// Sample a point inside the cone.
    ///
    /// The radial distance is scaled by the square root of a uniform sample so that points don't
    /// clump around the trunk.
    pub fn sample_volume<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let fraction: f32 = rng.gen();
        let angle = rng.gen_range(0.0..TAU);
        let r = rng.gen::<f32>().sqrt() * self.radius_at_fraction(fraction);

        Vec3::new(r * angle.cos(), self.y_at_fraction(fraction), r * angle.sin())
    }

    /// Sample a point on the lateral surface of the cone, pushed outwards by up to `max_offset`.
    pub fn sample_surface<R: Rng + ?Sized>(&self, rng: &mut R, max_offset: f32) -> Vec3 {
        let fraction: f32 = rng.gen();
        let angle = rng.gen_range(0.0..TAU);
        let offset = if max_offset > 0. {
            rng.gen_range(0.0..max_offset)
        } else {
            0.
        };
        let r = self.radius_at_fraction(fraction) + offset;

        Vec3::new(r * angle.cos(), self.y_at_fraction(fraction), r * angle.sin())
    }

    /// Is the point within the cone, allowing its horizontal distance from the axis to exceed the
    /// cone's radius by `outward_slack`?
    pub fn contains(&self, point: Vec3, outward_slack: f32) -> bool {
        const EPSILON: f32 = 1e-4;

        let half = self.height / 2.;
        let within_height = point.y >= -half - EPSILON && point.y <= half + EPSILON;
        let within_radius =
            point.xz().length() <= self.radius_at_y(point.y) + outward_slack + EPSILON;

        within_height && within_radius
    }
}

/// A sphere centred on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    /// The radius of the sphere.
    pub radius: f32,
}

impl Sphere {
    /// Sample a random direction, uniformly distributed over the unit sphere.
    fn sample_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
        let theta = rng.gen_range(0.0..TAU);
        let phi = (rng.gen::<f32>() * 2. - 1.).acos();

        Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
    }

    /// Sample a point inside the sphere, uniformly by volume.
    ///
    /// Using the cube root of the radius sample stops points clumping in the middle.
    pub fn sample_volume<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let direction = Self::sample_direction(rng);
        direction * self.radius * rng.gen::<f32>().cbrt()
    }

    /// Sample a point on the surface of the sphere.
    pub fn sample_surface<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        Self::sample_direction(rng) * self.radius
    }

    /// Is the point within the sphere?
    pub fn contains(&self, point: Vec3) -> bool {
        point.length() <= self.radius + 1e-3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn radius_shrinks_to_the_apex() {
        let cone = Cone {
            height: 12.,
            base_radius: 4.5,
        };

        assert!(approx_eq!(f32, cone.radius_at_y(-6.), 4.5));
        assert!(approx_eq!(f32, cone.radius_at_y(0.), 2.25));
        assert!(approx_eq!(f32, cone.radius_at_y(6.), 0.));
        assert!(approx_eq!(f32, cone.radius_at_y(100.), 0.));
    }

    #[test]
    fn volume_samples_are_not_all_on_the_surface() {
        let mut rng = StdRng::seed_from_u64(7);
        let sphere = Sphere { radius: 15. };

        let inner = (0..1000)
            .map(|_| sphere.sample_volume(&mut rng))
            .filter(|p| p.length() < 15. * 0.5)
            .count();

        // A uniform-by-volume sample puts 1/8 of the points inside half the radius
        assert!((60..=200).contains(&inner), "{inner} points inside r/2");
    }

    proptest! {
        #[test]
        fn cone_volume_samples_stay_inside(
            seed: u64,
            height in 0.5f32..50.,
            base_radius in 0.1f32..20.,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let cone = Cone { height, base_radius };

            for _ in 0..64 {
                let point = cone.sample_volume(&mut rng);
                prop_assert!(cone.contains(point, 0.), "{point:?} escaped {cone:?}");
            }
        }

        #[test]
        fn cone_surface_samples_stay_near_the_surface(
            seed: u64,
            max_offset in 0f32..2.,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let cone = Cone { height: 12., base_radius: 4.5 };

            for _ in 0..64 {
                let point = cone.sample_surface(&mut rng, max_offset);
                let distance = point.xz().length();
                let radius = cone.radius_at_y(point.y);

                prop_assert!(cone.contains(point, max_offset));
                prop_assert!(distance >= radius - 1e-3);
            }
        }

        #[test]
        fn sphere_samples_stay_inside(seed: u64, radius in 0.1f32..100.) {
            let mut rng = StdRng::seed_from_u64(seed);
            let sphere = Sphere { radius };

            for _ in 0..64 {
                prop_assert!(sphere.contains(sphere.sample_volume(&mut rng)));

                let surface = sphere.sample_surface(&mut rng);
                prop_assert!((surface.length() - radius).abs() <= radius * 1e-4 + 1e-4);
            }
        }
    }
}
