//! This crate generates the two target configurations for every group of elements in the scene,
//! and holds the [`SceneConfig`] that describes the scene.
//!
//! All generation happens once at startup. Nothing in here is reproducible in a normal build,
//! since [`scene_rng`] uses entropy, but test and bench builds use a fixed seed.

mod config;
mod population;
mod shapes;

pub use self::{
    config::{
        config_path, CameraConfig, InvalidSceneConfig, MotionConfig, Palette, PopulationCounts,
        SceneConfig, TreeShape,
    },
    population::{GroupKind, Population, Populations},
    shapes::{Cone, Sphere},
};

use rand::rngs::StdRng;

/// An RGB colour.
pub type RGBArray = [u8; 3];

/// Create a `StdRng` from entropy in a normal build, or seeded from 12345 in a test or bench
/// build.
pub fn scene_rng() -> StdRng {
    use rand::SeedableRng;

    cfg_if::cfg_if! {
        if #[cfg(any(test, feature = "bench"))] {
            StdRng::seed_from_u64(12345)
        } else {
            StdRng::from_entropy()
        }
    }
}
