//! Bounded history of produced state snapshots.

use crate::state::CfdState;
use std::collections::VecDeque;

/// Number of snapshots retained.
pub const HISTORY_CAPACITY: usize = 1000;

/// Ring of the most recent [`CfdState`] values, oldest first.
#[derive(Debug, Clone, Default)]
pub struct StateHistory {
    buf: VecDeque<CfdState>,
}

impl StateHistory {
    pub fn push(&mut self, state: CfdState) {
        if self.buf.len() == HISTORY_CAPACITY {
            self.buf.pop_front();
        }
        self.buf.push_back(state);
    }

    /// The last `n` snapshots in chronological order.
    pub fn last_n(&self, n: usize) -> Vec<CfdState> {
        let skip = self.buf.len().saturating_sub(n);
        self.buf.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
