//! This module handles the [`SceneConfig`], which is loaded from a RON file.

use crate::{Cone, RGBArray, Sphere};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// The path of the scene config file, from the `CHAOS_TREE_CONFIG` environment variable or
/// `chaos_tree.ron` in the working directory.
pub fn config_path() -> String {
    std::env::var("CHAOS_TREE_CONFIG").unwrap_or_else(|_| "chaos_tree.ron".to_string())
}

/// The error returned by [`SceneConfig::validate`].
#[derive(Clone, Debug, Error, PartialEq)]
#[allow(missing_docs, reason = "the #[error] attributes document the variants")]
pub enum InvalidSceneConfig {
    #[error("`{name}` must be positive and finite, but was {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("Blend rate `{name}` must be in (0, 1], but was {value}")]
    RateOutOfRange { name: &'static str, value: f32 },
}

/// The number of elements in each group.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationCounts {
    pub foliage: usize,
    pub ornaments: usize,
    pub gifts: usize,
    pub photos: usize,
}

impl Default for PopulationCounts {
    fn default() -> Self {
        Self {
            foliage: 4000,
            ornaments: 150,
            gifts: 20,
            photos: 20,
        }
    }
}

/// The dimensions of the tree and the chaos sphere.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeShape {
    /// The full height of the tree cone.
    pub height: f32,

    /// The radius of the base of the tree cone.
    pub radius: f32,

    /// The radius of the foliage chaos sphere.
    pub chaos_radius: f32,

    /// How far ornaments may stick out from the surface of the cone.
    pub ornament_offset: f32,

    /// The ornament chaos sphere radius, as a multiple of [`Self::chaos_radius`].
    pub ornament_chaos_scale: f32,

    /// The height of the band at the bottom of the tree where gifts sit.
    pub gift_band: f32,

    /// How much wider than the cone the gifts are spread.
    pub gift_spread: f32,
}

impl Default for TreeShape {
    fn default() -> Self {
        Self {
            height: 12.,
            radius: 4.5,
            chaos_radius: 15.,
            ornament_offset: 0.5,
            ornament_chaos_scale: 1.2,
            gift_band: 2.,
            gift_spread: 1.5,
        }
    }
}

impl TreeShape {
    /// The cone of the formed tree.
    pub fn cone(&self) -> Cone {
        Cone {
            height: self.height,
            base_radius: self.radius,
        }
    }

    /// The sphere that foliage flies out to.
    pub fn chaos_sphere(&self) -> Sphere {
        Sphere {
            radius: self.chaos_radius,
        }
    }

    /// The wider sphere that the instanced ornaments fly out to.
    pub fn ornament_chaos_sphere(&self) -> Sphere {
        Sphere {
            radius: self.chaos_radius * self.ornament_chaos_scale,
        }
    }
}

/// Blend rates and secondary motion, all expressed per frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub foliage_formed_rate: f32,
    pub foliage_chaos_rate: f32,

    /// The ornament rate for index 0. Each index adds `ornament_rate_jitter * (i % 10)`.
    pub ornament_rate: f32,
    pub ornament_rate_jitter: f32,

    pub gift_rate: f32,
    pub photo_rate: f32,

    /// Radians added to the x and y rotation of each ornament per frame.
    pub ornament_spin: f32,

    /// Radians added to the z rotation of each photo per frame in chaos.
    pub photo_spin: f32,

    /// The amplitude of the wind sway on the foliage.
    pub wind_amplitude: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            foliage_formed_rate: 0.03,
            foliage_chaos_rate: 0.05,
            ornament_rate: 0.05,
            ornament_rate_jitter: 0.002,
            gift_rate: 0.02,
            photo_rate: 0.04,
            ornament_spin: 0.01,
            photo_spin: 0.02,
            wind_amplitude: 0.05,
        }
    }
}

/// How the camera follows the hand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// The distance of the camera from the tree along the z axis.
    pub distance: f32,

    /// The vertical field of view in degrees.
    pub fov_degrees: f32,

    /// The horizontal distance covered by moving the hand across the whole frame.
    pub horizontal_range: f32,

    /// The vertical distance covered by moving the hand across the whole frame.
    pub vertical_range: f32,

    /// The camera height when the hand is centred.
    pub vertical_base: f32,

    /// The height of the point on the axis that the camera always looks at.
    pub look_at_height: f32,

    /// The fraction of the remaining distance the camera moves each frame.
    pub smoothing: f32,

    /// The vertical offset of the whole tree group in the world.
    pub tree_offset_y: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 20.,
            fov_degrees: 50.,
            horizontal_range: 15.,
            vertical_range: 10.,
            vertical_base: 4.,
            look_at_height: 2.,
            smoothing: 0.05,
            tree_offset_y: -2.,
        }
    }
}

/// The colours used to draw the scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub emerald_deep: RGBArray,
    pub emerald_light: RGBArray,
    pub gold_high: RGBArray,
    pub gold_dark: RGBArray,
    pub red_velvet: RGBArray,
    pub warm_white: RGBArray,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            emerald_deep: [0x00, 0x28, 0x16],
            emerald_light: [0x00, 0x5c, 0x33],
            gold_high: [0xff, 0xd7, 0x00],
            gold_dark: [0xb8, 0x86, 0x0b],
            red_velvet: [0x8b, 0x00, 0x00],
            warm_white: [0xff, 0xfd, 0xd0],
        }
    }
}

/// Everything needed to build and animate the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub counts: PopulationCounts,
    pub tree: TreeShape,
    pub motion: MotionConfig,
    pub camera: CameraConfig,
    pub palette: Palette,
}

impl SceneConfig {
    /// Load the config from the given file, or use the default if the file is unavailable or
    /// invalid RON. Also save the default to the file for future editing.
    #[instrument]
    pub fn from_file(filename: &str) -> Self {
        let write_and_return_default = || -> Self {
            let default = Self::default();
            default.save_to_file(filename);
            default
        };

        let Ok(text) = fs::read_to_string(filename) else {
            debug!("No scene config file; writing the default");
            return write_and_return_default();
        };

        ron::from_str(&text).unwrap_or_else(|error| {
            warn!(?error, "Unable to parse scene config; using the default");
            write_and_return_default()
        })
    }

    /// Save the config to the given file, ignoring any errors.
    pub fn save_to_file(&self, filename: &str) {
        if let Some(parent) = Path::new(filename).parent() {
            let _ = fs::DirBuilder::new().recursive(true).create(parent);
        }

        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default().struct_names(true))
        {
            Ok(text) => {
                if let Err(error) = fs::write(filename, text) {
                    warn!(?error, filename, "Unable to save scene config");
                }
            }
            Err(error) => warn!(?error, "Unable to serialize scene config"),
        }
    }

    /// Check that every dimension is positive and every blend rate is in `(0, 1]`.
    pub fn validate(&self) -> Result<(), InvalidSceneConfig> {
        let positive = [
            ("tree.height", self.tree.height),
            ("tree.radius", self.tree.radius),
            ("tree.chaos_radius", self.tree.chaos_radius),
            ("tree.ornament_chaos_scale", self.tree.ornament_chaos_scale),
            ("tree.gift_spread", self.tree.gift_spread),
            ("camera.distance", self.camera.distance),
            ("camera.fov_degrees", self.camera.fov_degrees),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.) {
                return Err(InvalidSceneConfig::NotPositive { name, value });
            }
        }

        let max_ornament_rate =
            self.motion.ornament_rate + 9. * self.motion.ornament_rate_jitter;
        let rates = [
            ("motion.foliage_formed_rate", self.motion.foliage_formed_rate),
            ("motion.foliage_chaos_rate", self.motion.foliage_chaos_rate),
            ("motion.ornament_rate", self.motion.ornament_rate),
            ("motion.ornament_rate (max jitter)", max_ornament_rate),
            ("motion.gift_rate", self.motion.gift_rate),
            ("motion.photo_rate", self.motion.photo_rate),
            ("camera.smoothing", self.camera.smoothing),
        ];
        for (name, value) in rates {
            if !(value > 0. && value <= 1.) {
                return Err(InvalidSceneConfig::RateOutOfRange { name, value });
            }
        }

        Ok(())
    }
}
