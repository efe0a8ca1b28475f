//! This crate provides the hand sample that the vision worker writes and the renderer reads.
//!
//! There is exactly one writer (the signal source) and any number of readers (the animator and
//! the camera controller). The whole [`HandSample`] is replaced on every write, so readers never
//! see a half-updated value.

mod cell;
mod sample;

pub use self::{
    cell::{BusyFlag, BusyGuard, HandCell, WeakHandCell},
    sample::{HandSample, InteractionState},
};
