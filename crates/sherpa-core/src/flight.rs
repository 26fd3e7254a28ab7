//! Single-flight operation state.
//!
//! Every controller in this crate allows at most one in-flight operation of a
//! given kind. The busy flag and the last outcome live in one [`Flight`] value.

use serde::{Deserialize, Serialize};

/// Tri-state for a single-flight operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flight<T> {
    /// Nothing has run yet, or the last outcome was acknowledged.
    Idle,
    /// An operation is in flight; new requests are dropped.
    Pending,
    /// The last operation finished with this outcome.
    Resolved(T),
}

impl<T> Default for Flight<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> Flight<T> {
    /// Returns true while an operation is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true when no operation has run or the outcome was cleared.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Moves to `Pending` unless already pending.
    ///
    /// Returns `false` when the request must be dropped.
    pub fn try_begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = Self::Pending;
        true
    }

    /// Records the outcome of the in-flight operation.
    pub fn resolve(&mut self, outcome: T) {
        *self = Self::Resolved(outcome);
    }

    /// Drops a resolved outcome, returning to `Idle`. Pending is left alone.
    pub fn acknowledge(&mut self) {
        if matches!(self, Self::Resolved(_)) {
            *self = Self::Idle;
        }
    }

    /// The outcome of the last operation, if it has resolved.
    pub fn outcome(&self) -> Option<&T> {
        match self {
            Self::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }
}
