//! Vertical writing position for one page.

/// Monotonic vertical offset in page millimetres, measured from the top edge.
///
/// Positions are never reused once passed; the page canvas is write-once per
/// coordinate.
#[derive(Debug)]
pub struct LayoutCursor {
    y: f32,
}

impl LayoutCursor {
    pub fn new(start: f32) -> Self {
        Self {
            y: if start.is_finite() { start.max(0.0) } else { 0.0 },
        }
    }

    pub fn position(&self) -> f32 {
        self.y
    }

    /// Move down by `amount` and return the new position.
    ///
    /// Negative or non-finite amounts are treated as zero.
    pub fn advance(&mut self, amount: f32) -> f32 {
        if amount.is_finite() && amount > 0.0 {
            self.y += amount;
        }
        self.y
    }
}
