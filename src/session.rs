//! Selection session façade.
//!
//! Coordinates the deck state machine with the motion controller of the
//! single current card. The UI layer only ever talks to this type: commands
//! in (swipe, pointer events, undo, restart, export), render state out
//! (visible card window, current card transform, live feedback, progress).
//!
//! Ordering rules enforced here:
//! - programmatic and gesture swipes funnel through the one `Deck::swipe`
//!   entry, so there is a single commit path
//! - the deck position only advances when the motion controller reports the
//!   fly-out committed
//! - the undo replay controller is created only after the deck position
//!   decrement is applied
//! - restart force-settles any in-flight commit first, so a torn-down
//!   animation can never leave the deck stuck in-flight

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::Item;
use crate::config::{ExportConfig, MotionConfig};
use crate::deck::{Deck, Decision};
use crate::export::{self, ExportError};
use crate::gesture::DragTracker;
use crate::motion::{CardMotion, MotionEvent, MotionPhase, Transform};

/// One card in the visible stack window.
#[derive(Debug)]
pub struct StackCard<'a> {
    pub item: &'a Item,
    /// 0 = current card, 1 = next, ...
    pub depth: usize,
    /// Downward offset in distance units
    pub translate_y: f32,
    pub scale: f32,
}

/// Live feedback for the stamp overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub direction: Decision,
    pub confidence: f32,
}

/// Render state of the current card.
#[derive(Debug, Clone, Copy)]
pub struct CardVisual {
    pub transform: Transform,
    pub phase: MotionPhase,
}

pub struct Session {
    deck: Deck,
    motion: Option<CardMotion>,
    drag: Option<DragTracker>,
    motion_cfg: MotionConfig,
    export_cfg: ExportConfig,
    /// Viewport width in distance units, refreshed by the UI every frame.
    viewport_width: f32,
    expanded: bool,
}

impl Session {
    pub fn new(items: Vec<Item>, motion_cfg: MotionConfig, export_cfg: ExportConfig) -> Self {
        let deck = Deck::new(items);
        let motion = if deck.is_finished() {
            None
        } else {
            Some(CardMotion::new(&motion_cfg))
        };
        Self {
            deck,
            motion,
            drag: None,
            motion_cfg,
            export_cfg,
            viewport_width: 0.0,
            expanded: false,
        }
    }

    /// Keep the exit geometry in sync with the terminal size.
    pub fn set_viewport_width(&mut self, units: f32) {
        self.viewport_width = units.max(1.0);
    }

    // --- commands -----------------------------------------------------------

    /// Programmatic swipe (key press). Rejected while the current card is
    /// animating or a swipe is in flight.
    pub fn swipe(&mut self, direction: Decision) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        if motion.input_locked() || !self.deck.swipe(direction) {
            return;
        }
        motion.fly_out(direction, self.viewport_width);
        self.expanded = false;
    }

    /// Pointer pressed on the card, in distance-unit coordinates.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        if self.drag.is_none() && motion.begin_drag() {
            self.drag = Some(DragTracker::new(x, y));
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let (Some(motion), Some(drag)) = (self.motion.as_mut(), self.drag.as_ref()) else {
            return;
        };
        motion.drag_to(drag.offset(x, y), self.viewport_width);
    }

    /// Pointer released: past the threshold the decision is recorded and the
    /// card flies out; otherwise it snaps back with no side effects.
    pub fn pointer_up(&mut self) {
        if self.drag.take().is_none() {
            return;
        }
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        if let Some(direction) = motion.release(self.viewport_width) {
            if !self.deck.swipe(direction) {
                // Unreachable while one controller exists per current card;
                // resolve the orphaned animation rather than double-commit.
                motion.force_cancel();
            }
            self.expanded = false;
        }
    }

    /// Revert the last decision and replay the card in from the side it left.
    /// The deck's own guards apply: rejected mid-flight or on empty history.
    /// Undoing while a previous replay is still animating just restarts the
    /// replay on the older card.
    pub fn undo(&mut self) {
        if let Some(direction) = self.deck.undo() {
            // Position decrement is applied above; only now is the
            // newly-current card unambiguous.
            self.motion = Some(CardMotion::replaying_in(
                &self.motion_cfg,
                direction,
                self.viewport_width,
            ));
            self.drag = None;
            self.expanded = false;
        }
    }

    /// Back to the first card with a clean history. Always available.
    pub fn restart(&mut self) {
        self.force_settle();
        self.deck.restart();
        self.motion = if self.deck.is_finished() {
            None
        } else {
            Some(CardMotion::new(&self.motion_cfg))
        };
        self.drag = None;
        self.expanded = false;
    }

    /// Teardown path: resolve a lost animation completion so the deck is
    /// never left in-flight. A pending fly-out counts as committed and the
    /// controller is reconciled exactly as if the animation had finished.
    pub fn force_settle(&mut self) {
        if let Some(motion) = self.motion.as_mut() {
            if motion.force_cancel().is_some() {
                self.deck.complete_swipe();
                self.drag = None;
                self.motion = if self.deck.is_finished() {
                    None
                } else {
                    Some(CardMotion::new(&self.motion_cfg))
                };
            }
        }
    }

    /// Advance animations by the frame delta and reconcile the controller
    /// when a fly-out commits.
    pub fn tick(&mut self, delta: Duration) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        match motion.tick(delta) {
            Some(MotionEvent::Committed(_)) => {
                self.deck.complete_swipe();
                self.drag = None;
                self.motion = if self.deck.is_finished() {
                    None
                } else {
                    Some(CardMotion::new(&self.motion_cfg))
                };
            }
            Some(MotionEvent::Settled) | None => {}
        }
    }

    pub fn toggle_expanded(&mut self) {
        let has_card = self.deck.current().is_some();
        if has_card && self.motion.as_ref().is_some_and(|m| !m.input_locked()) {
            self.expanded = !self.expanded;
        }
    }

    /// Hand the retained list to the export collaborator. Only valid once
    /// finished; failure leaves the session untouched and retryable.
    pub async fn request_export(&self) -> Result<PathBuf, ExportError> {
        let Some(items) = self.deck.result() else {
            return Err(ExportError::SessionActive);
        };
        export::export_document(&self.export_cfg, &items).await
    }

    // --- render state -------------------------------------------------------

    /// The bounded window of stacked cards, current first. Cards beyond the
    /// configured depth are not surfaced at all.
    pub fn visible_cards(&self) -> Vec<StackCard<'_>> {
        (0..self.motion_cfg.visible_window_depth)
            .filter_map(|depth| {
                self.deck.peek(depth).map(|item| StackCard {
                    item,
                    depth,
                    translate_y: depth as f32 * 10.0,
                    scale: 1.0 - depth as f32 * 0.05,
                })
            })
            .collect()
    }

    /// Transform and phase of the current card, if one exists.
    pub fn current_visual(&self) -> Option<CardVisual> {
        self.motion.as_ref().map(|m| CardVisual {
            transform: *m.transform(),
            phase: m.phase(),
        })
    }

    /// Stamp feedback: live while dragging, pinned at full confidence while
    /// the committed card flies out.
    pub fn feedback(&self) -> Option<Feedback> {
        let motion = self.motion.as_ref()?;
        if let Some((direction, confidence)) = motion.drag_feedback() {
            return Some(Feedback {
                direction,
                confidence,
            });
        }
        if motion.phase() == MotionPhase::FlyingOut {
            if let Some(direction) = self.deck.in_flight() {
                return Some(Feedback {
                    direction,
                    confidence: 1.0,
                });
            }
        }
        None
    }

    pub fn is_finished(&self) -> bool {
        self.deck.is_finished()
    }

    pub fn position(&self) -> usize {
        self.deck.position()
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn progress(&self) -> f32 {
        self.deck.progress()
    }

    pub fn history_len(&self) -> usize {
        self.deck.history().len()
    }

    pub fn retained_items(&self) -> Vec<&Item> {
        self.deck.retained_items()
    }

    pub fn retained_len(&self) -> usize {
        self.deck.retained_len()
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn units_per_cell(&self) -> f32 {
        self.motion_cfg.units_per_cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample;
    use crate::config::ExportConfig;
    use crate::export::ExportFormat;

    const VIEWPORT: f32 = 960.0;

    fn session(n: usize) -> Session {
        let mut s = Session::new(sample(n), MotionConfig::default(), ExportConfig::default());
        s.set_viewport_width(VIEWPORT);
        s
    }

    /// Run animation frames until the session settles (no phase change left).
    fn settle(s: &mut Session) {
        for _ in 0..120 {
            s.tick(Duration::from_millis(16));
        }
    }

    #[test]
    fn test_swipe_commits_after_animation() {
        let mut s = session(3);
        s.swipe(Decision::Accept);

        // Decision recorded immediately, position advances only on commit.
        assert_eq!(s.history_len(), 1);
        assert_eq!(s.position(), 0);

        settle(&mut s);
        assert_eq!(s.position(), 1);
        assert_eq!(s.retained_items().len(), 1);
    }

    #[test]
    fn test_swipe_rejected_while_in_flight() {
        let mut s = session(3);
        s.swipe(Decision::Accept);
        s.swipe(Decision::Reject); // mid fly-out

        settle(&mut s);
        assert_eq!(s.history_len(), 1);
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn test_undo_rejected_mid_flight_then_commits_normally() {
        let mut s = session(3);
        s.swipe(Decision::Accept);
        s.undo(); // rejected: swipe in flight

        settle(&mut s);
        assert_eq!(s.position(), 1);
        assert_eq!(s.retained_items().len(), 1);
    }

    #[test]
    fn test_undo_replays_card_from_swiped_side() {
        let mut s = session(3);
        s.swipe(Decision::Accept);
        settle(&mut s);

        s.undo();
        assert_eq!(s.position(), 0);
        assert_eq!(s.retained_items().len(), 0);

        let visual = s.current_visual().unwrap();
        assert_eq!(visual.phase, MotionPhase::ReplayingIn);
        assert!(visual.transform.x > VIEWPORT);

        settle(&mut s);
        let visual = s.current_visual().unwrap();
        assert_eq!(visual.phase, MotionPhase::Idle);
        assert_eq!(visual.transform, Transform::NEUTRAL);
    }

    #[test]
    fn test_rapid_double_undo() {
        let mut s = session(3);
        s.swipe(Decision::Accept);
        settle(&mut s);
        s.swipe(Decision::Reject);
        settle(&mut s);

        s.undo();
        s.undo(); // second undo lands while the first replay is animating

        assert_eq!(s.position(), 0);
        assert_eq!(s.history_len(), 0);
        assert_eq!(s.retained_items().len(), 0);
        assert_eq!(
            s.current_visual().unwrap().phase,
            MotionPhase::ReplayingIn
        );
    }

    #[test]
    fn test_undo_from_finished_resumes_review() {
        let mut s = session(1);
        s.swipe(Decision::Accept);
        settle(&mut s);
        assert!(s.is_finished());

        s.undo();
        assert!(!s.is_finished());
        assert_eq!(s.position(), 0);
        assert_eq!(
            s.current_visual().unwrap().phase,
            MotionPhase::ReplayingIn
        );
    }

    #[test]
    fn test_drag_gesture_full_path() {
        let mut s = session(2);
        s.pointer_down(500.0, 300.0);
        s.pointer_move(680.0, 304.0); // +180 units, past the threshold
        s.pointer_up();

        assert_eq!(s.history_len(), 1);
        settle(&mut s);
        assert_eq!(s.position(), 1);
        assert_eq!(s.retained_items().len(), 1);
    }

    #[test]
    fn test_drag_below_threshold_cancels_cleanly() {
        let mut s = session(2);
        s.pointer_down(500.0, 300.0);
        s.pointer_move(550.0, 300.0); // +50, below threshold
        s.pointer_up();

        assert_eq!(s.history_len(), 0);
        settle(&mut s);
        assert_eq!(s.position(), 0);
        let visual = s.current_visual().unwrap();
        assert_eq!(visual.transform, Transform::NEUTRAL);
    }

    #[test]
    fn test_pointer_ignored_while_replaying() {
        let mut s = session(2);
        s.swipe(Decision::Reject);
        settle(&mut s);
        s.undo();

        s.pointer_down(500.0, 300.0);
        s.pointer_move(700.0, 300.0);
        s.pointer_up();
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn test_feedback_while_dragging() {
        let mut s = session(2);
        s.pointer_down(500.0, 300.0);
        s.pointer_move(450.0, 300.0); // -50 units

        let feedback = s.feedback().unwrap();
        assert_eq!(feedback.direction, Decision::Reject);
        assert!((feedback.confidence - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_feedback_pinned_during_fly_out() {
        let mut s = session(2);
        s.swipe(Decision::Accept);
        let feedback = s.feedback().unwrap();
        assert_eq!(feedback.direction, Decision::Accept);
        assert_eq!(feedback.confidence, 1.0);
    }

    #[test]
    fn test_visible_window_stacking() {
        let s = session(5);
        let cards = s.visible_cards();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].depth, 0);
        assert_eq!(cards[0].translate_y, 0.0);
        assert_eq!(cards[0].scale, 1.0);
        assert_eq!(cards[2].translate_y, 20.0);
        assert!((cards[2].scale - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_window_shrinks_near_deck_end() {
        let mut s = session(2);
        s.swipe(Decision::Reject);
        settle(&mut s);
        assert_eq!(s.visible_cards().len(), 1);
    }

    #[test]
    fn test_full_review_reaches_finished() {
        let mut s = session(3);
        for d in [Decision::Reject, Decision::Accept, Decision::Accept] {
            s.swipe(d);
            settle(&mut s);
        }
        assert!(s.is_finished());
        assert!(s.current_visual().is_none());
        assert!(s.visible_cards().is_empty());
        assert_eq!(s.retained_items().len(), 2);
    }

    #[test]
    fn test_empty_deck_starts_finished() {
        let s = session(0);
        assert!(s.is_finished());
        assert!(s.current_visual().is_none());
        assert_eq!(s.progress(), 1.0);
    }

    #[test]
    fn test_restart_mid_flight_is_clean() {
        let mut s = session(3);
        s.swipe(Decision::Accept);
        s.restart(); // fly-out still running

        assert_eq!(s.position(), 0);
        assert_eq!(s.history_len(), 0);
        assert_eq!(s.retained_items().len(), 0);
        let visual = s.current_visual().unwrap();
        assert_eq!(visual.phase, MotionPhase::Idle);

        // The session keeps working normally afterwards.
        s.swipe(Decision::Accept);
        settle(&mut s);
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn test_force_settle_commits_pending_swipe() {
        let mut s = session(2);
        s.swipe(Decision::Accept);
        s.force_settle();

        // Committed without any animation frames; deck is not stuck.
        assert_eq!(s.position(), 1);
        assert_eq!(s.history_len(), 1);
        let visual = s.current_visual().unwrap();
        assert_eq!(visual.phase, MotionPhase::Idle);

        // The next swipe proceeds normally.
        s.swipe(Decision::Reject);
        settle(&mut s);
        assert!(s.is_finished());
    }

    #[test]
    fn test_expanded_resets_on_fly_out() {
        let mut s = session(2);
        s.toggle_expanded();
        assert!(s.expanded());
        s.swipe(Decision::Accept);
        assert!(!s.expanded());

        // Toggling is ignored while the card is animating out.
        s.toggle_expanded();
        assert!(!s.expanded());
    }

    #[tokio::test]
    async fn test_export_rejected_until_finished() {
        let s = session(1);
        let err = s.request_export().await.unwrap_err();
        assert!(matches!(err, ExportError::SessionActive));
    }

    #[tokio::test]
    async fn test_export_failure_leaves_session_finished() {
        let export_cfg = ExportConfig {
            output_dir: Some(std::path::PathBuf::from("/dev/null/not-a-dir")),
            format: ExportFormat::Markdown,
            file_stem: "out".to_string(),
            title: "t".to_string(),
        };
        let mut s = Session::new(sample(1), MotionConfig::default(), export_cfg);
        s.set_viewport_width(VIEWPORT);
        s.swipe(Decision::Accept);
        settle(&mut s);
        assert!(s.is_finished());

        let err = s.request_export().await.unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        // Session state untouched; retry stays available.
        assert!(s.is_finished());
        assert_eq!(s.retained_items().len(), 1);
    }
}
