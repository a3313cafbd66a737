use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec2;

use crate::traits::{Action, Controller};

/// Snapshot of held movement actions, taken once at the top of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    bits: u8,
}

impl InputState {
    pub fn from_actions(actions: &[Action]) -> Self {
        let bits = actions.iter().fold(0, |acc, a| acc | a.bit());
        Self { bits }
    }

    pub fn with(mut self, action: Action, pressed: bool) -> Self {
        if pressed {
            self.bits |= action.bit();
        } else {
            self.bits &= !action.bit();
        }
        self
    }

    fn axis(&self, positive: Action, negative: Action) -> f32 {
        match (self.is_down(positive), self.is_down(negative)) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// +1 forward, -1 back, 0 when neither or both are held
    pub fn forward_axis(&self) -> f32 {
        self.axis(Action::MoveForward, Action::MoveBack)
    }

    /// +1 right, -1 left, 0 when neither or both are held
    pub fn right_axis(&self) -> f32 {
        self.axis(Action::MoveRight, Action::MoveLeft)
    }

    /// True when the held keys produce a net direction
    pub fn is_moving(&self) -> bool {
        self.forward_axis() != 0.0 || self.right_axis() != 0.0
    }
}

impl Controller for InputState {
    fn is_down(&self, action: Action) -> bool {
        self.bits & action.bit() != 0
    }
}

/// Discrete platform notifications, applied in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    CaptureGranted,
    CaptureLost,
    CaptureDenied(String),
    Click,
    /// Pointer position in normalized device coordinates, y up
    PointerMoved(Vec2),
}

/// Everything the platform delivered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub keys: InputState,
    pub look_delta: Vec2,
    pub events: Vec<PlatformEvent>,
}

#[derive(Debug, Default)]
struct Pending {
    look_delta: Vec2,
    events: VecDeque<PlatformEvent>,
}

/// Thread-safe input sink written by platform callbacks at any time.
///
/// Held keys are last-write-wins per action. Look deltas accumulate and
/// discrete events queue until the frame loop drains them with `snapshot`.
#[derive(Debug, Clone, Default)]
pub struct SharedInput {
    keys: Arc<AtomicU8>,
    pending: Arc<Mutex<Pending>>,
}

impl SharedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_action(&self, action: Action, pressed: bool) {
        if pressed {
            self.keys.fetch_or(action.bit(), Ordering::AcqRel);
        } else {
            self.keys.fetch_and(!action.bit(), Ordering::AcqRel);
        }
    }

    /// Drop every held action (focus loss, capture loss)
    pub fn release_all(&self) {
        self.keys.store(0, Ordering::Release);
    }

    pub fn add_look_delta(&self, dx: f32, dy: f32) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.lock().look_delta += Vec2::new(dx, dy);
    }

    pub fn push(&self, event: PlatformEvent) {
        self.lock().events.push_back(event);
    }

    /// Current held keys without draining anything
    pub fn keys(&self) -> InputState {
        InputState {
            bits: self.keys.load(Ordering::Acquire),
        }
    }

    /// Drain pending deltas and events into one consistent frame
    pub fn snapshot(&self) -> InputFrame {
        let mut pending = self.lock();
        let look_delta = std::mem::take(&mut pending.look_delta);
        let events = pending.events.drain(..).collect();
        InputFrame {
            keys: self.keys(),
            look_delta,
            events,
        }
    }

    // A panicking writer cannot leave `Pending` half-updated, so a poisoned
    // lock is still safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn opposite_keys_cancel() {
        let state = InputState::from_actions(&[Action::MoveForward, Action::MoveBack]);
        assert_eq!(state.forward_axis(), 0.0);
        assert!(!state.is_moving());
    }

    #[test]
    fn single_keys_give_unit_axes() {
        let state = InputState::default()
            .with(Action::MoveBack, true)
            .with(Action::MoveRight, true);
        assert_eq!(state.forward_axis(), -1.0);
        assert_eq!(state.right_axis(), 1.0);
        assert!(state.is_moving());
    }

    #[test]
    fn release_is_never_stuck() {
        let input = SharedInput::new();
        input.set_action(Action::MoveLeft, true);
        input.set_action(Action::MoveLeft, true);
        input.set_action(Action::MoveLeft, false);
        assert!(!input.keys().is_down(Action::MoveLeft));
    }

    #[test]
    fn snapshot_drains_events_and_deltas() {
        let input = SharedInput::new();
        input.add_look_delta(3.0, -1.0);
        input.add_look_delta(1.0, 1.0);
        input.push(PlatformEvent::Click);

        let frame = input.snapshot();
        assert_eq!(frame.look_delta, Vec2::new(4.0, 0.0));
        assert_eq!(frame.events, vec![PlatformEvent::Click]);

        let empty = input.snapshot();
        assert_eq!(empty.look_delta, Vec2::ZERO);
        assert!(empty.events.is_empty());
    }

    #[test]
    fn writes_from_other_threads_are_visible() {
        let input = SharedInput::new();
        let writer = input.clone();
        thread::spawn(move || {
            writer.set_action(Action::MoveForward, true);
            writer.push(PlatformEvent::CaptureLost);
        })
        .join()
        .unwrap();

        let frame = input.snapshot();
        assert!(frame.keys.is_down(Action::MoveForward));
        assert_eq!(frame.events, vec![PlatformEvent::CaptureLost]);
    }

    #[test]
    fn non_finite_look_delta_is_dropped() {
        let input = SharedInput::new();
        input.add_look_delta(f32::NAN, 1.0);
        assert_eq!(input.snapshot().look_delta, Vec2::ZERO);
    }
}
