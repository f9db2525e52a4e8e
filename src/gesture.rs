//! Drag gesture tracking and classification.
//!
//! Pure coordinate math: a tracker remembers where a drag started and turns
//! every later pointer position into an offset; the free functions classify
//! that offset against the commit threshold. No timers, no state beyond the
//! start point.
//!
//! Coordinates are in abstract distance units, not terminal cells. The event
//! loop scales cell deltas by `motion.units_per_cell` before they get here,
//! so the default threshold of 100 units stays meaningful on a cell grid.

use crate::deck::Decision;

/// Pointer offset relative to the drag start.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

/// Tracks a single drag from its start point.
#[derive(Debug, Clone, Copy)]
pub struct DragTracker {
    start_x: f32,
    start_y: f32,
}

impl DragTracker {
    pub fn new(x: f32, y: f32) -> Self {
        Self { start_x: x, start_y: y }
    }

    /// Offset of the given pointer position relative to the drag start.
    pub fn offset(&self, x: f32, y: f32) -> Offset {
        Offset {
            x: x - self.start_x,
            y: y - self.start_y,
        }
    }
}

/// Commit classification: past the threshold to the right accepts, past it to
/// the left rejects, anything else is no decision.
pub fn classify(offset_x: f32, threshold: f32) -> Option<Decision> {
    if offset_x > threshold {
        Some(Decision::Accept)
    } else if offset_x < -threshold {
        Some(Decision::Reject)
    } else {
        None
    }
}

/// Feedback direction label, valid below the threshold too (used to pick the
/// stamp styling while the drag is live). Dead center means no label.
pub fn direction(offset_x: f32) -> Option<Decision> {
    if offset_x > 0.0 {
        Some(Decision::Accept)
    } else if offset_x < 0.0 {
        Some(Decision::Reject)
    } else {
        None
    }
}

/// Feedback intensity in `[0, 1]`: how far the drag is toward the threshold.
pub fn confidence(offset_x: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 {
        return 1.0;
    }
    (offset_x.abs() / threshold).min(1.0)
}
