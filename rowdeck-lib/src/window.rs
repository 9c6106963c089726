//! Incremental reveal window

/// Rows revealed when the table first renders.
pub const INITIAL_WINDOW: usize = 20;

/// Rows added on each sentinel hit.
pub const WINDOW_STEP: usize = 20;

/// Governs how many rows are revealed to the presentation layer.
///
/// The reveal count starts at [`INITIAL_WINDOW`], never decreases (short of
/// an explicit [`reset`](Self::reset)), and advancing clamps to the total
/// row count. The visible rows are always a prefix of the collection, so
/// reordering the underlying rows changes what is visible even while the
/// count is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowController {
    reveal: usize,
}

impl WindowController {
    /// Controller at the initial window size.
    pub fn new() -> Self {
        Self {
            reveal: INITIAL_WINDOW,
        }
    }

    /// Current reveal count.
    ///
    /// May exceed the collection length after deletions; the slice accessor
    /// clamps at read time.
    pub fn reveal_count(&self) -> usize {
        self.reveal
    }

    /// Returns `true` while rows beyond the window remain hidden.
    ///
    /// The shell renders the scroll sentinel exactly while this holds.
    pub fn has_more(&self, total: usize) -> bool {
        self.reveal < total
    }

    /// Reacts to the scroll sentinel becoming visible.
    ///
    /// Advances the reveal count by [`WINDOW_STEP`], clamped to `total`.
    /// No-op once everything is revealed, so saturated calls are idempotent.
    pub fn on_sentinel_visible(&mut self, total: usize) {
        if self.reveal < total {
            self.reveal = (self.reveal + WINDOW_STEP).min(total);
        }
    }

    /// The first `min(reveal_count, len)` items, in current order.
    pub fn visible_slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[..self.reveal.min(rows.len())]
    }

    /// Returns to the initial window size.
    ///
    /// Called by the shell when a load completes.
    pub fn reset(&mut self) {
        self.reveal = INITIAL_WINDOW;
    }
}

impl Default for WindowController {
    fn default() -> Self {
        Self::new()
    }
}
