// Rolling history - Fixed-length window of daily aggregates
use std::collections::VecDeque;

/// Oldest-first window of exactly `N` daily values.
///
/// Starts zero-filled; every push evicts the oldest entry so the length
/// never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingHistory<const N: usize> {
    days: VecDeque<i32>,
}

impl<const N: usize> RollingHistory<N> {
    pub fn new() -> Self {
        Self {
            days: std::iter::repeat_n(0, N).collect(),
        }
    }

    /// Append the newest aggregate, evicting the oldest
    pub fn push(&mut self, value: i32) {
        self.days.pop_front();
        self.days.push_back(value);
    }

    pub fn newest(&self) -> i32 {
        self.days.back().copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.days.iter().copied()
    }
}

impl<const N: usize> Default for RollingHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}
