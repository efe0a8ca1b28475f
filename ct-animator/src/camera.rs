//! This module handles the [`CameraController`], which moves the camera to follow the hand.

use crate::approach;
use ct_geometry::CameraConfig;
use ct_hand::HandSample;
use glam::{Mat4, Vec2, Vec3};

/// Smoothly moves the camera in the plane `z = distance` to follow the hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraController {
    config: CameraConfig,
    position: Vec3,
}

impl CameraController {
    /// Create a camera at the position it would settle at for a centred hand.
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            position: Vec3::new(0., config.vertical_base, config.distance),
        }
    }

    /// The `(x, y)` position that the camera is moving towards for this sample.
    ///
    /// The horizontal direction is mirrored, so moving your hand to the right of the frame (which
    /// is the left of the picture) swings the camera left.
    pub fn target_for(&self, sample: &HandSample) -> Vec2 {
        Vec2::new(
            (sample.x - 0.5) * -self.config.horizontal_range,
            self.config.vertical_base + (sample.y - 0.5) * self.config.vertical_range,
        )
    }

    /// Move the camera one frame towards the target for this sample and return its new
    /// position.
    pub fn update(&mut self, sample: &HandSample) -> Vec3 {
        let target = self.target_for(sample).extend(self.config.distance);
        self.position = approach(self.position, target, self.config.smoothing);
        self.position.z = self.config.distance;
        self.position
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The world point that the camera always looks at.
    #[inline]
    pub fn look_at(&self) -> Vec3 {
        Vec3::new(0., self.config.look_at_height, 0.)
    }

    /// The offset applied to every element of the tree when it's drawn.
    #[inline]
    pub fn tree_offset(&self) -> Vec3 {
        Vec3::new(0., self.config.tree_offset_y, 0.)
    }

    /// The combined view and projection matrix for a viewport with the given aspect ratio.
    pub fn view_projection(&self, aspect_ratio: f32) -> Mat4 {
        let projection = Mat4::perspective_rh(
            self.config.fov_degrees.to_radians(),
            aspect_ratio.max(f32::EPSILON),
            0.1,
            1000.,
        );
        let view = Mat4::look_at_rh(self.position, self.look_at(), Vec3::Y);
        projection * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_hand::InteractionState;
    use float_cmp::approx_eq;

    #[test]
    fn target_is_mirrored_horizontally() {
        let camera = CameraController::new(CameraConfig::default());
        let target = camera.target_for(&HandSample::new(InteractionState::Chaos, 0.9, 0.1));

        assert!(approx_eq!(f32, target.x, -6., epsilon = 1e-5));
        assert!(approx_eq!(f32, target.y, 0., epsilon = 1e-5));
    }

    #[test]
    fn default_sample_targets_the_resting_position() {
        let camera = CameraController::new(CameraConfig::default());
        assert_eq!(camera.target_for(&HandSample::default()), Vec2::new(0., 4.));
        assert_eq!(camera.position(), Vec3::new(0., 4., 20.));
    }

    #[test]
    fn camera_eases_towards_the_target() {
        let mut camera = CameraController::new(CameraConfig::default());
        let sample = HandSample::new(InteractionState::Formed, 0.9, 0.1);

        let first = camera.update(&sample);
        assert!(approx_eq!(f32, first.x, -0.3, epsilon = 1e-5));
        assert!(approx_eq!(f32, first.y, 3.8, epsilon = 1e-5));
        assert_eq!(first.z, 20.);

        for _ in 0..500 {
            camera.update(&sample);
        }
        let settled = camera.position();
        assert!(settled.abs_diff_eq(Vec3::new(-6., 0., 20.), 1e-3));
        assert_eq!(camera.look_at(), Vec3::new(0., 2., 0.));
    }

    #[test]
    fn look_at_point_is_in_the_middle_of_the_screen() {
        let camera = CameraController::new(CameraConfig::default());
        let clip = camera.view_projection(16. / 9.) * camera.look_at().extend(1.);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(clip.w > 0.);
    }
}
