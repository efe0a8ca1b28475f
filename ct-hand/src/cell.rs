//! This module provides the single-writer cell for the latest [`HandSample`] and the busy flag
//! that keeps at most one classification in flight.

use crate::HandSample;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, RwLock, Weak,
};
use tracing::trace;
use tracing_unwrap::ResultExt;

/// The latest [`HandSample`], shared between the vision worker and the renderer.
///
/// Cloning this type gives another strong handle to the same sample. The renderer owns the
/// strong handles; the vision worker only gets a [`WeakHandCell`] so that it can tell when the
/// surface has gone away.
#[derive(Clone, Debug, Default)]
pub struct HandCell(Arc<RwLock<HandSample>>);

impl HandCell {
    /// Create a new cell holding the default sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the latest sample.
    #[inline]
    pub fn latest(&self) -> HandSample {
        *self
            .0
            .read()
            .expect_or_log("Should be able to read the hand sample")
    }

    /// Replace the latest sample wholesale.
    pub fn publish(&self, sample: HandSample) {
        trace!(?sample, "Publishing hand sample");
        *self
            .0
            .write()
            .expect_or_log("Should be able to write the hand sample") = sample;
    }

    /// Get a weak handle to this cell.
    pub fn downgrade(&self) -> WeakHandCell {
        WeakHandCell(Arc::downgrade(&self.0))
    }
}

/// A weak handle to a [`HandCell`], held by the vision worker.
#[derive(Clone, Debug)]
pub struct WeakHandCell(Weak<RwLock<HandSample>>);

impl WeakHandCell {
    /// Try to get a strong handle to the cell, if the surface still exists.
    pub fn upgrade(&self) -> Option<HandCell> {
        self.0.upgrade().map(HandCell)
    }

    /// Publish the sample if the cell is still alive and return whether it was published.
    pub fn publish_if_alive(&self, sample: HandSample) -> bool {
        match self.upgrade() {
            Some(cell) => {
                cell.publish(sample);
                true
            }
            None => false,
        }
    }
}

/// A flag that allows at most one classification request to be in flight.
///
/// The flag is cleared when the [`BusyGuard`] returned by [`BusyFlag::try_acquire`] is dropped.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    /// Create a new, idle flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag if it's currently clear. Returns `None` if something else holds it.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(Arc::clone(&self.0)))
    }

    /// Is a request currently in flight?
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Proof that the [`BusyFlag`] is held. Clears the flag on drop.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InteractionState;

    #[test]
    fn publish_replaces_the_whole_sample() {
        let cell = HandCell::new();
        assert_eq!(cell.latest(), HandSample::default());

        let sample = HandSample::new(InteractionState::Chaos, 0.9, 0.1);
        cell.clone().publish(sample);
        assert_eq!(cell.latest(), sample);
    }

    #[test]
    fn weak_cell_discards_after_teardown() {
        let cell = HandCell::new();
        let weak = cell.downgrade();

        let sample = HandSample::new(InteractionState::Chaos, 0.2, 0.3);
        assert!(weak.publish_if_alive(sample));
        assert_eq!(cell.latest(), sample);

        drop(cell);
        assert!(weak.upgrade().is_none());
        assert!(!weak.publish_if_alive(HandSample::default()));
    }

    #[test]
    fn busy_flag_allows_one_holder() {
        let flag = BusyFlag::new();
        assert!(!flag.is_busy());

        let guard = flag.try_acquire().expect("the flag starts clear");
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());
        assert!(flag.clone().try_acquire().is_none());

        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_some());
    }
}
