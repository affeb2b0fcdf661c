use crate::models::RankedResult;

/// Default number of results revealed per batch
pub const DEFAULT_BATCH_SIZE: usize = 6;

/// Externally visible result state: the full ranked list plus a cursor over
/// how much of it the presentation layer may show.
///
/// Invariant: `0 <= visible_count <= results.len()`. The cursor only moves
/// forward; it resets to one batch whenever the ranked list is recomputed.
#[derive(Debug, Clone, Default)]
pub struct ResultPage {
    results: Vec<RankedResult>,
    visible_count: usize,
    batch_size: usize,
}

impl ResultPage {
    /// Build a fresh page over a newly ranked list, cursor at one batch
    pub fn new(results: Vec<RankedResult>, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        let visible_count = batch_size.min(results.len());
        Self {
            results,
            visible_count,
            batch_size,
        }
    }

    /// Advance the cursor by one batch, clamped to the list length.
    /// Requesting more at the end is a no-op, not an error.
    pub fn reveal_more(&mut self) {
        self.visible_count = (self.visible_count + self.batch_size).min(self.results.len());
    }

    /// Whether another batch is available past the cursor
    pub fn has_more(&self) -> bool {
        self.visible_count < self.results.len()
    }

    /// The currently revealed slice of the ranked list
    pub fn visible(&self) -> &[RankedResult] {
        &self.results[..self.visible_count]
    }

    /// The full ranked list
    pub fn all(&self) -> &[RankedResult] {
        &self.results
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }
}
