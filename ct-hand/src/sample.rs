//! This module handles the [`HandSample`] type and its [`InteractionState`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Which shape the tree should be converging towards.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionState {
    /// Everything converges to the tree.
    #[default]
    Formed,

    /// Everything flies out to the chaos sphere.
    Chaos,
}

impl InteractionState {
    /// Is this the [`Chaos`](Self::Chaos) state?
    #[inline]
    pub fn is_chaos(self) -> bool {
        matches!(self, Self::Chaos)
    }
}

/// The latest classification of the hand in front of the camera.
///
/// `x` and `y` are normalised to `[0, 1]`, with `(0.5, 0.5)` being the centre of the frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandSample {
    /// The state chosen by the classifier.
    pub state: InteractionState,

    /// The horizontal position of the hand.
    pub x: f32,

    /// The vertical position of the hand.
    pub y: f32,
}

impl Default for HandSample {
    fn default() -> Self {
        Self {
            state: InteractionState::Formed,
            x: 0.5,
            y: 0.5,
        }
    }
}

impl HandSample {
    /// Create a new sample, clamping the coordinates into `[0, 1]`.
    ///
    /// A NaN coordinate is replaced with the centre of the frame.
    pub fn new(state: InteractionState, x: f32, y: f32) -> Self {
        let normalise = |v: f32| if v.is_nan() { 0.5 } else { v.clamp(0., 1.) };
        Self {
            state,
            x: normalise(x),
            y: normalise(y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn default_is_formed_and_centred() {
        let sample = HandSample::default();
        assert_eq!(sample.state, InteractionState::Formed);
        assert_eq!((sample.x, sample.y), (0.5, 0.5));
    }

    #[test]
    fn new_clamps_coordinates() {
        let sample = HandSample::new(InteractionState::Chaos, 1.7, -0.2);
        assert_eq!((sample.x, sample.y), (1., 0.));

        let sample = HandSample::new(InteractionState::Chaos, f32::NAN, 0.25);
        assert_eq!((sample.x, sample.y), (0.5, 0.25));
    }

    #[test]
    fn state_strings_match_the_wire_format() {
        assert_eq!(InteractionState::Chaos.to_string(), "CHAOS");
        assert_eq!(InteractionState::Formed.to_string(), "FORMED");
        assert_eq!(
            InteractionState::from_str("CHAOS"),
            Ok(InteractionState::Chaos)
        );
        assert!(InteractionState::from_str("UNKNOWN").is_err());
        assert!(InteractionState::from_str("chaos").is_err());
    }
}
