//! Load lifecycle status

/// State of the single-shot seed load.
///
/// Transitions are `Idle -> Pending` when the load starts, then
/// `Pending -> Succeeded` or `Pending -> Failed`. Both outcomes are terminal
/// for the session; there is no retry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// The load has not started yet.
    #[default]
    Idle,
    /// The fetch is in flight.
    Pending,
    /// The collection was seeded from the fetched dataset.
    Succeeded,
    /// The fetch failed; the collection is empty.
    Failed,
}

impl LoadStatus {
    /// Returns `true` while the fetch is in flight.
    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }

    /// Returns `true` once the load reached one of its terminal states.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}
