//! Per-card motion controller.
//!
//! One controller exists per current card. It owns the card's visual
//! transform and its animation phase, and is the only thing allowed to move
//! the card. Animated phases are advanced by explicit [`CardMotion::tick`]
//! calls with the frame delta, so every transition is deterministic and
//! testable without a clock or a rendering surface.
//!
//! Phase graph:
//!
//! ```text
//! Idle ──pointer down──▶ Dragging ──release ≤ T──▶ SnappingBack ──▶ Idle
//!   │                        │
//!   │                        └──release > T──▶ FlyingOut (terminal)
//!   └──programmatic commit──────────────────▶ FlyingOut
//!
//! ReplayingIn (undo entry, teleport off-screen then animate in) ──▶ Idle
//! ```
//!
//! `FlyingOut` reports `Committed(direction)` exactly once on completion and
//! the controller is then discarded by the session. `Idle` and the end of
//! `SnappingBack`/`ReplayingIn` are guaranteed to be the exact neutral
//! transform.

use std::time::Duration;

use crate::config::MotionConfig;
use crate::deck::Decision;
use crate::gesture::{self, Offset};

/// How far past the viewport edge a fly-out or replay teleport lands, in
/// distance units.
const EXIT_MARGIN: f32 = 200.0;

/// Rotation multiplier for the exaggerated exit/entry tilt.
const EXIT_ROTATION_FACTOR: f32 = 1.5;

/// Visual transform of a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub rotation_deg: f32,
    pub scale: f32,
}

impl Transform {
    pub const NEUTRAL: Self = Self {
        x: 0.0,
        y: 0.0,
        rotation_deg: 0.0,
        scale: 1.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    Idle,
    Dragging,
    SnappingBack,
    FlyingOut,
    ReplayingIn,
}

/// Completion signals surfaced by [`CardMotion::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    /// The fly-out finished; the decision is final and the controller is done.
    Committed(Decision),
    /// A snap-back or undo replay settled back to neutral.
    Settled,
}

/// Frame-advanced animation timer.
#[derive(Debug, Clone)]
struct EffectTimer {
    elapsed: Duration,
    duration: Duration,
}

impl EffectTimer {
    fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_transform(from: &Transform, to: &Transform, t: f32) -> Transform {
    Transform {
        x: lerp(from.x, to.x, t),
        y: lerp(from.y, to.y, t),
        rotation_deg: lerp(from.rotation_deg, to.rotation_deg, t),
        scale: lerp(from.scale, to.scale, t),
    }
}

#[derive(Debug)]
pub struct CardMotion {
    phase: MotionPhase,
    transform: Transform,
    timer: Option<EffectTimer>,
    anim_from: Transform,
    anim_to: Transform,
    /// Direction waiting to be reported as `Committed` when the fly-out
    /// finishes. Taken exactly once.
    pending: Option<Decision>,
    threshold: f32,
    max_rotation_deg: f32,
    snap_back: Duration,
    fly_out: Duration,
    undo_replay: Duration,
}

impl CardMotion {
    /// Fresh controller for a card that just became current, centered.
    pub fn new(cfg: &MotionConfig) -> Self {
        Self {
            phase: MotionPhase::Idle,
            transform: Transform::NEUTRAL,
            timer: None,
            anim_from: Transform::NEUTRAL,
            anim_to: Transform::NEUTRAL,
            pending: None,
            threshold: cfg.swipe_threshold,
            max_rotation_deg: cfg.max_rotation_deg,
            snap_back: cfg.snap_back(),
            fly_out: cfg.fly_out(),
            undo_replay: cfg.undo_replay(),
        }
    }

    /// Controller for a card becoming current again after undo: teleported
    /// fully off-screen in the direction it was previously swiped, then
    /// animated back to center. Skips `Idle` on entry.
    pub fn replaying_in(cfg: &MotionConfig, from: Decision, viewport_width: f32) -> Self {
        let mut motion = Self::new(cfg);
        let start = motion.exit_transform(from, viewport_width);
        motion.phase = MotionPhase::ReplayingIn;
        motion.transform = start;
        motion.anim_from = start;
        motion.anim_to = Transform::NEUTRAL;
        motion.timer = Some(EffectTimer::new(motion.undo_replay));
        motion
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Pointer input is ignored while the card is flying out or replaying in.
    pub fn input_locked(&self) -> bool {
        matches!(
            self.phase,
            MotionPhase::FlyingOut | MotionPhase::ReplayingIn
        )
    }

    /// Live drag feedback: direction label and confidence toward the commit
    /// threshold. Only meaningful while dragging.
    pub fn drag_feedback(&self) -> Option<(Decision, f32)> {
        if self.phase != MotionPhase::Dragging {
            return None;
        }
        let dir = gesture::direction(self.transform.x)?;
        Some((dir, gesture::confidence(self.transform.x, self.threshold)))
    }

    /// Start a drag. Only valid from `Idle`.
    pub fn begin_drag(&mut self) -> bool {
        if self.phase != MotionPhase::Idle {
            return false;
        }
        self.phase = MotionPhase::Dragging;
        true
    }

    /// Follow the pointer 1:1; rotation grows with horizontal travel toward
    /// the viewport edge.
    pub fn drag_to(&mut self, offset: Offset, viewport_width: f32) {
        if self.phase != MotionPhase::Dragging {
            return;
        }
        let half = (viewport_width / 2.0).max(1.0);
        self.transform = Transform {
            x: offset.x,
            y: offset.y,
            rotation_deg: offset.x / half * self.max_rotation_deg,
            scale: 1.0,
        };
    }

    /// End a drag. Past the threshold the card starts flying out and the
    /// committed direction is returned; otherwise it snaps back to center and
    /// no commit is ever reported.
    pub fn release(&mut self, viewport_width: f32) -> Option<Decision> {
        if self.phase != MotionPhase::Dragging {
            return None;
        }
        match gesture::classify(self.transform.x, self.threshold) {
            Some(direction) => {
                self.start_fly_out(direction, viewport_width);
                Some(direction)
            }
            None => {
                self.phase = MotionPhase::SnappingBack;
                self.anim_from = self.transform;
                self.anim_to = Transform::NEUTRAL;
                self.timer = Some(EffectTimer::new(self.snap_back));
                None
            }
        }
    }

    /// Programmatic commit (button press, no prior drag). Rejected while the
    /// card is already flying out or replaying in.
    pub fn fly_out(&mut self, direction: Decision, viewport_width: f32) -> bool {
        if self.input_locked() {
            return false;
        }
        self.start_fly_out(direction, viewport_width);
        true
    }

    fn start_fly_out(&mut self, direction: Decision, viewport_width: f32) {
        self.phase = MotionPhase::FlyingOut;
        self.anim_from = self.transform;
        self.anim_to = self.exit_transform(direction, viewport_width);
        self.timer = Some(EffectTimer::new(self.fly_out));
        self.pending = Some(direction);
    }

    /// Advance animations by the frame delta. Returns at most one event;
    /// `Committed` fires exactly once per controller.
    pub fn tick(&mut self, delta: Duration) -> Option<MotionEvent> {
        let timer = self.timer.as_mut()?;
        timer.advance(delta);
        let finished = timer.is_finished();
        let t = ease_out_cubic(timer.progress());
        self.transform = lerp_transform(&self.anim_from, &self.anim_to, t);

        if !finished {
            return None;
        }
        self.timer = None;

        match self.phase {
            MotionPhase::SnappingBack | MotionPhase::ReplayingIn => {
                self.phase = MotionPhase::Idle;
                self.transform = Transform::NEUTRAL;
                Some(MotionEvent::Settled)
            }
            MotionPhase::FlyingOut => {
                // Terminal: the transform stays at the exit target and the
                // controller is discarded once the commit is consumed.
                self.transform = self.anim_to;
                self.pending.take().map(MotionEvent::Committed)
            }
            _ => None,
        }
    }

    /// Teardown path: resolve whatever is going on right now. A fly-out that
    /// has not reported yet counts as immediately completed and its direction
    /// is returned (once); anything else resets to neutral.
    pub fn force_cancel(&mut self) -> Option<Decision> {
        self.timer = None;
        let pending = self.pending.take();
        if pending.is_none() {
            self.phase = MotionPhase::Idle;
            self.transform = Transform::NEUTRAL;
        }
        pending
    }

    /// Off-screen transform one viewport width plus margin past the edge, with
    /// the exaggerated exit rotation.
    fn exit_transform(&self, direction: Decision, viewport_width: f32) -> Transform {
        let sign = match direction {
            Decision::Accept => 1.0,
            Decision::Reject => -1.0,
        };
        Transform {
            x: sign * (viewport_width + EXIT_MARGIN),
            y: self.transform.y,
            rotation_deg: sign * self.max_rotation_deg * EXIT_ROTATION_FACTOR,
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: f32 = 800.0;

    fn cfg() -> MotionConfig {
        MotionConfig::default()
    }

    /// Tick in small steps until an event shows up or the budget runs out.
    fn tick_until_event(motion: &mut CardMotion, ms_budget: u64) -> Option<MotionEvent> {
        let step = Duration::from_millis(16);
        let mut elapsed = Duration::ZERO;
        while elapsed.as_millis() <= ms_budget as u128 {
            if let Some(event) = motion.tick(step) {
                return Some(event);
            }
            elapsed += step;
        }
        None
    }

    #[test]
    fn test_drag_follows_pointer() {
        let mut motion = CardMotion::new(&cfg());
        assert!(motion.begin_drag());
        motion.drag_to(Offset { x: 60.0, y: -4.0 }, VIEWPORT);

        let t = motion.transform();
        assert_eq!(t.x, 60.0);
        assert_eq!(t.y, -4.0);
        // 60 / 400 * 15 degrees
        assert!((t.rotation_deg - 2.25).abs() < 1e-4);
    }

    #[test]
    fn test_release_below_threshold_snaps_back_to_neutral() {
        let mut motion = CardMotion::new(&cfg());
        motion.begin_drag();
        motion.drag_to(Offset { x: 50.0, y: 0.0 }, VIEWPORT);
        assert_eq!(motion.release(VIEWPORT), None);
        assert_eq!(motion.phase(), MotionPhase::SnappingBack);

        assert_eq!(tick_until_event(&mut motion, 1000), Some(MotionEvent::Settled));
        assert_eq!(motion.phase(), MotionPhase::Idle);
        assert_eq!(*motion.transform(), Transform::NEUTRAL);
    }

    #[test]
    fn test_release_past_threshold_commits_once() {
        let mut motion = CardMotion::new(&cfg());
        motion.begin_drag();
        motion.drag_to(Offset { x: 150.0, y: 0.0 }, VIEWPORT);
        assert_eq!(motion.release(VIEWPORT), Some(Decision::Accept));
        assert_eq!(motion.phase(), MotionPhase::FlyingOut);

        assert_eq!(
            tick_until_event(&mut motion, 1000),
            Some(MotionEvent::Committed(Decision::Accept))
        );
        // Exactly once: further ticks report nothing.
        assert_eq!(tick_until_event(&mut motion, 200), None);
        // Exit lands past the viewport edge.
        assert!(motion.transform().x > VIEWPORT);
    }

    #[test]
    fn test_programmatic_fly_out_from_idle() {
        let mut motion = CardMotion::new(&cfg());
        assert!(motion.fly_out(Decision::Reject, VIEWPORT));
        assert_eq!(motion.phase(), MotionPhase::FlyingOut);
        assert_eq!(
            tick_until_event(&mut motion, 1000),
            Some(MotionEvent::Committed(Decision::Reject))
        );
        assert!(motion.transform().x < -VIEWPORT);
    }

    #[test]
    fn test_input_ignored_while_flying_out() {
        let mut motion = CardMotion::new(&cfg());
        motion.fly_out(Decision::Accept, VIEWPORT);

        assert!(motion.input_locked());
        assert!(!motion.begin_drag());
        assert!(!motion.fly_out(Decision::Reject, VIEWPORT));
        let before = *motion.transform();
        motion.drag_to(Offset { x: 10.0, y: 0.0 }, VIEWPORT);
        assert_eq!(*motion.transform(), before);
    }

    #[test]
    fn test_replay_teleports_then_settles_neutral() {
        let mut motion = CardMotion::replaying_in(&cfg(), Decision::Accept, VIEWPORT);
        assert_eq!(motion.phase(), MotionPhase::ReplayingIn);
        assert!(motion.input_locked());

        // Entry teleport: fully off-screen with exaggerated tilt, no tick yet.
        assert!(motion.transform().x > VIEWPORT);
        assert!((motion.transform().rotation_deg - 22.5).abs() < 1e-4);

        assert_eq!(tick_until_event(&mut motion, 1000), Some(MotionEvent::Settled));
        assert_eq!(motion.phase(), MotionPhase::Idle);
        assert_eq!(*motion.transform(), Transform::NEUTRAL);
    }

    #[test]
    fn test_force_cancel_resolves_pending_commit() {
        let mut motion = CardMotion::new(&cfg());
        motion.fly_out(Decision::Accept, VIEWPORT);

        assert_eq!(motion.force_cancel(), Some(Decision::Accept));
        // The commit was consumed; nothing further fires.
        assert_eq!(motion.force_cancel(), None);
        assert_eq!(tick_until_event(&mut motion, 200), None);
    }

    #[test]
    fn test_force_cancel_mid_drag_resets() {
        let mut motion = CardMotion::new(&cfg());
        motion.begin_drag();
        motion.drag_to(Offset { x: 80.0, y: 5.0 }, VIEWPORT);

        assert_eq!(motion.force_cancel(), None);
        assert_eq!(motion.phase(), MotionPhase::Idle);
        assert_eq!(*motion.transform(), Transform::NEUTRAL);
    }

    #[test]
    fn test_drag_feedback() {
        let mut motion = CardMotion::new(&cfg());
        assert_eq!(motion.drag_feedback(), None);

        motion.begin_drag();
        motion.drag_to(Offset { x: -50.0, y: 0.0 }, VIEWPORT);
        assert_eq!(motion.drag_feedback(), Some((Decision::Reject, 0.5)));

        motion.drag_to(Offset { x: 0.0, y: 0.0 }, VIEWPORT);
        assert_eq!(motion.drag_feedback(), None);
    }

    #[test]
    fn test_zero_duration_animation_completes_on_first_tick() {
        let mut zero = cfg();
        zero.fly_out_ms = 0;
        let mut motion = CardMotion::new(&zero);
        motion.fly_out(Decision::Accept, VIEWPORT);
        assert_eq!(
            motion.tick(Duration::from_millis(1)),
            Some(MotionEvent::Committed(Decision::Accept))
        );
    }
}
