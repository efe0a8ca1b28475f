//! This crate animates the scene every frame.
//!
//! The [`Animator`] owns every element's current position and orientation and pulls them towards
//! the targets selected by the latest [`HandSample`](ct_hand::HandSample). The
//! [`CameraController`] does the same for the camera, using the hand position.

mod animator;
mod camera;
mod group;

pub use self::{
    animator::Animator,
    camera::CameraController,
    group::{approach, wind_sway, BlendRate, ElementGroup, SecondaryMotion},
};
