//! Deck-level selection state machine.
//!
//! Owns the ordered items, the current position, the decision history and the
//! retained list. At most one item is "current" while the position is inside
//! the deck; none once the deck is finished. The invariants:
//!
//! - `history.len() == position` whenever no swipe is in flight
//! - `retained.len()` equals the number of Accept decisions in history
//! - history and retained are mutated in lockstep, only here
//!
//! A swipe is recorded immediately but the position only advances when the
//! owning motion controller reports that the exit animation completed
//! ([`Deck::complete_swipe`]). Between those two points the swipe is
//! "in flight" and every other mutating command is rejected.

use crate::catalog::Item;

/// One accept/reject decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

#[derive(Debug)]
pub struct Deck {
    items: Vec<Item>,
    position: usize,
    history: Vec<Decision>,
    /// Indices into `items` of accepted decisions, in decision order.
    retained: Vec<usize>,
    in_flight: Option<Decision>,
}

impl Deck {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            position: 0,
            history: Vec::new(),
            retained: Vec::new(),
            in_flight: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The current item, if the position is still inside the deck. While a
    /// swipe is in flight this is still the card animating out.
    pub fn current(&self) -> Option<&Item> {
        self.items.get(self.position)
    }

    /// Item `depth` positions ahead of the current one (depth 0 = current).
    pub fn peek(&self, depth: usize) -> Option<&Item> {
        self.items.get(self.position + depth)
    }

    pub fn history(&self) -> &[Decision] {
        &self.history
    }

    pub fn in_flight(&self) -> Option<Decision> {
        self.in_flight
    }

    /// Finished means every item has been decided and committed.
    pub fn is_finished(&self) -> bool {
        self.position == self.items.len() && self.in_flight.is_none()
    }

    /// Fraction of the deck already committed, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.items.is_empty() {
            1.0
        } else {
            self.position as f32 / self.items.len() as f32
        }
    }

    /// Retained items in decision order.
    pub fn retained_items(&self) -> Vec<&Item> {
        self.retained.iter().map(|&i| &self.items[i]).collect()
    }

    pub fn retained_len(&self) -> usize {
        self.retained.len()
    }

    /// The terminal session result, available exactly once finished.
    pub fn result(&self) -> Option<Vec<&Item>> {
        if self.is_finished() {
            Some(self.retained_items())
        } else {
            None
        }
    }

    /// Record a decision for the current item and mark the swipe in flight.
    /// Rejected (returns false, no state change) when the deck is finished or
    /// another swipe has not committed yet.
    pub fn swipe(&mut self, direction: Decision) -> bool {
        if self.position >= self.items.len() || self.in_flight.is_some() {
            tracing::debug!(?direction, "swipe rejected");
            return false;
        }

        self.history.push(direction);
        if direction == Decision::Accept {
            self.retained.push(self.position);
        }
        self.in_flight = Some(direction);
        true
    }

    /// Commit the in-flight swipe: the exit animation finished (or was
    /// force-cancelled, which counts as immediate completion). Advances the
    /// position. No-op when nothing is in flight.
    pub fn complete_swipe(&mut self) {
        if self.in_flight.take().is_some() {
            self.position += 1;
        }
    }

    /// Revert the last committed decision. Returns the direction it was
    /// swiped, so the newly-current card can replay from that side. Rejected
    /// while a swipe is in flight or when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Decision> {
        if self.in_flight.is_some() || self.history.is_empty() {
            tracing::debug!("undo rejected");
            return None;
        }

        let last = self.history.pop()?;
        if last == Decision::Accept {
            self.retained.pop();
        }
        self.position -= 1;
        Some(last)
    }

    /// Reset to the first item with empty history and retained list. Always
    /// available, including mid-flight.
    pub fn restart(&mut self) {
        self.position = 0;
        self.history.clear();
        self.retained.clear();
        self.in_flight = None;
    }
}
