//! This module handles the [`ElementGroup`] arena, which owns the mutable state of every element
//! in one group.

use ct_geometry::{GroupKind, Population};
use ct_hand::InteractionState;
use glam::{EulerRot, Quat, Vec3, Vec3Swizzles};
use std::f32::consts::TAU;

/// Move `current` the fraction `rate` of the way to `target`.
///
/// This is a first-order exponential smoothing step. It has no velocity, so for a rate in
/// `(0, 1]` it can never overshoot the target.
#[inline]
pub fn approach(current: Vec3, target: Vec3, rate: f32) -> Vec3 {
    current + (target - current) * rate
}

/// The horizontal wind sway applied to foliage when it's drawn. This is never written back into
/// the element's position.
#[inline]
pub fn wind_sway(position: Vec3, elapsed: f32, amplitude: f32) -> Vec3 {
    position + Vec3::X * (elapsed * 2. + position.y).sin() * amplitude
}

/// How fast the elements of a group approach their targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BlendRate {
    /// A different rate depending on the interaction state.
    PerState {
        /// The rate while converging to the tree.
        formed: f32,

        /// The rate while flying out to the chaos sphere.
        chaos: f32,
    },

    /// The same rate in both states.
    Constant(f32),

    /// A rate of `base + step * (index % period)`, so that neighbouring elements don't all arrive
    /// at the same time.
    Jittered {
        /// The rate for indices which are multiples of `period`.
        base: f32,

        /// The amount added per index.
        step: f32,

        /// How many different rates there are.
        period: usize,
    },
}

impl BlendRate {
    /// The rate for the element at the given index in the given state.
    #[inline]
    pub fn rate(&self, state: InteractionState, index: usize) -> f32 {
        match *self {
            Self::PerState { formed, chaos } => {
                if state.is_chaos() {
                    chaos
                } else {
                    formed
                }
            }
            Self::Constant(rate) => rate,
            Self::Jittered { base, step, period } => {
                base + step * (index % period.max(1)) as f32
            }
        }
    }
}

/// Motion applied to each element's orientation after its position has been updated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SecondaryMotion {
    /// No secondary motion.
    None,

    /// Add `per_frame` radians to the x and y rotation every frame.
    Tumble {
        /// The rotation added per frame.
        per_frame: f32,
    },

    /// Set the x rotation to `sin(elapsed + index)`.
    Bob,

    /// Face the vertical axis through the centre of the tree while formed, and spin about z by
    /// `spin` radians per frame in chaos.
    FaceAxis {
        /// The rotation added per frame in chaos.
        spin: f32,
    },
}

/// The yaw that turns the element's forward (+z) vector to point horizontally at the vertical
/// axis. Returns `None` if the element is on the axis.
fn yaw_towards_axis(position: Vec3) -> Option<f32> {
    let towards = -position.xz();
    (towards.length_squared() > f32::EPSILON).then(|| towards.x.atan2(towards.y))
}

/// The mutable state of every element in a group, along with its immutable targets.
///
/// Every `Vec` has the same length and is indexed by element id.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementGroup {
    kind: GroupKind,
    formed: Vec<Vec3>,
    chaos: Vec<Vec3>,
    scales: Vec<f32>,
    phases: Vec<Vec3>,

    /// The current position of each element, starting at its formed target.
    current: Vec<Vec3>,

    /// The current orientation of each element, as XYZ Euler angles.
    rotations: Vec<Vec3>,

    rate: BlendRate,
    motion: SecondaryMotion,
}

impl ElementGroup {
    /// Create a group from a generated population, with every element at its formed target.
    ///
    /// # Panics
    ///
    /// Panics if the population's vecs have different lengths, since that means it wasn't
    /// produced by the generator.
    pub fn new(population: &Population, rate: BlendRate, motion: SecondaryMotion) -> Self {
        let len = population.formed.len();
        assert!(
            population.chaos.len() == len
                && population.scales.len() == len
                && population.phases.len() == len
                && population.rotations.len() == len,
            "The {} population must have one of every attribute per element",
            population.kind
        );

        Self {
            kind: population.kind,
            formed: population.formed.clone(),
            chaos: population.chaos.clone(),
            scales: population.scales.clone(),
            phases: population.phases.clone(),
            current: population.formed.clone(),
            rotations: population.rotations.clone(),
            rate,
            motion,
        }
    }

    /// Advance every element by one frame, towards the targets for `state`. `elapsed` is the
    /// number of seconds since the animation started.
    pub fn step(&mut self, state: InteractionState, elapsed: f32) {
        let targets = if state.is_chaos() {
            &self.chaos
        } else {
            &self.formed
        };

        for (index, (current, &target)) in self.current.iter_mut().zip(targets).enumerate() {
            *current = approach(*current, target, self.rate.rate(state, index));
        }

        match self.motion {
            SecondaryMotion::None => {}
            SecondaryMotion::Tumble { per_frame } => {
                for rotation in &mut self.rotations {
                    rotation.x = (rotation.x + per_frame).rem_euclid(TAU);
                    rotation.y = (rotation.y + per_frame).rem_euclid(TAU);
                }
            }
            SecondaryMotion::Bob => {
                for (index, rotation) in self.rotations.iter_mut().enumerate() {
                    rotation.x = (elapsed + index as f32).sin();
                }
            }
            SecondaryMotion::FaceAxis { spin } => {
                for (rotation, &position) in self.rotations.iter_mut().zip(&self.current) {
                    if state.is_chaos() {
                        rotation.z = (rotation.z + spin).rem_euclid(TAU);
                    } else if let Some(yaw) = yaw_towards_axis(position) {
                        *rotation = Vec3::new(0., yaw, 0.);
                    }
                }
            }
        }
    }

    /// Which group this is.
    #[inline]
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// The number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Are there no elements?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// The target of the element at `index` for the given state.
    #[inline]
    pub fn target(&self, state: InteractionState, index: usize) -> Vec3 {
        if state.is_chaos() {
            self.chaos[index]
        } else {
            self.formed[index]
        }
    }

    /// The current position of every element.
    #[inline]
    pub fn current(&self) -> &[Vec3] {
        &self.current
    }

    /// The current orientation of every element, as XYZ Euler angles.
    #[inline]
    pub fn rotations(&self) -> &[Vec3] {
        &self.rotations
    }

    /// The current orientation of the element at `index`.
    pub fn orientation(&self, index: usize) -> Quat {
        let Vec3 { x, y, z } = self.rotations[index];
        Quat::from_euler(EulerRot::XYZ, x, y, z)
    }

    /// The size of every element.
    #[inline]
    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    /// The random phase of every element.
    #[inline]
    pub fn phases(&self) -> &[Vec3] {
        &self.phases
    }

    /// The blend rate of this group.
    #[inline]
    pub fn rate(&self) -> BlendRate {
        self.rate
    }
}
