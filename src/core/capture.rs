//! Pointer-capture arbitration between free exploring and modal UI.
//!
//! The platform grants or revokes capture asynchronously, so every
//! notification is applied against the current modal/session state and
//! corrected back to `Released` whenever a modal is open.

use log::{debug, info, warn};
use serde::Serialize;

use super::interactable::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CaptureState {
    /// Free cursor, no look from the pointer
    #[default]
    Released,
    /// Asked the platform, awaiting confirmation
    Requested,
    /// Pointer drives look, navigation active
    Captured,
}

/// Which UI surface currently owns the screen
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum UiMode {
    #[default]
    Exploring,
    /// Content viewer open on a beacon
    Viewing(ObjectId),
    Composing,
    /// Conversation panel open with the guide
    Conversing,
}

impl UiMode {
    pub fn is_modal(&self) -> bool {
        !matches!(self, UiMode::Exploring)
    }
}

/// Commands for the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaptureCommand {
    RequestCapture,
    ReleaseCapture,
}

#[derive(Debug, Clone, Default)]
pub struct CaptureStateMachine {
    state: CaptureState,
    modal_open: bool,
    logged_in: bool,
}

impl CaptureStateMachine {
    pub fn new(logged_in: bool) -> Self {
        Self {
            state: CaptureState::Released,
            modal_open: false,
            logged_in,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_captured(&self) -> bool {
        self.state == CaptureState::Captured
    }

    pub fn modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn logged_in(&self) -> bool {
        self.logged_in
    }

    fn transition(&mut self, to: CaptureState, reason: &str) {
        if self.state != to {
            info!(target: "capture", "{:?} -> {:?} ({})", self.state, to, reason);
            self.state = to;
        }
    }

    /// User clicked into the scene. Only asks for capture from `Released`
    /// with no modal open and a logged-in session.
    pub fn request(&mut self, out: &mut Vec<CaptureCommand>) {
        if self.state != CaptureState::Released {
            return;
        }
        if self.modal_open || !self.logged_in {
            debug!(
                target: "capture",
                "Capture request ignored (modal_open={}, logged_in={})",
                self.modal_open,
                self.logged_in
            );
            return;
        }
        self.transition(CaptureState::Requested, "user_interaction");
        out.push(CaptureCommand::RequestCapture);
    }

    /// Platform confirmed capture
    pub fn on_granted(&mut self, out: &mut Vec<CaptureCommand>) {
        match self.state {
            CaptureState::Requested if !self.modal_open && self.logged_in => {
                self.transition(CaptureState::Captured, "platform_granted");
            }
            CaptureState::Captured => {}
            _ => {
                // Late or unsolicited grant: hand the pointer straight back
                debug!(target: "capture", "Unexpected capture grant in {:?}, releasing", self.state);
                self.transition(CaptureState::Released, "unsolicited_grant");
                out.push(CaptureCommand::ReleaseCapture);
            }
        }
    }

    /// Platform reports capture gone; trusted unconditionally
    pub fn on_lost(&mut self) {
        self.transition(CaptureState::Released, "platform_lost");
    }

    /// Platform refused capture; exploring continues without pointer look
    pub fn on_denied(&mut self, reason: &str) {
        warn!(target: "capture", "Pointer capture denied: {}", reason);
        self.transition(CaptureState::Released, "platform_denied");
    }

    /// Re-evaluated on every modal open/close
    pub fn set_modal_open(&mut self, open: bool, out: &mut Vec<CaptureCommand>) {
        self.modal_open = open;
        if open {
            self.force_release("modal_open", out);
        }
    }

    pub fn set_logged_in(&mut self, logged_in: bool, out: &mut Vec<CaptureCommand>) {
        self.logged_in = logged_in;
        if !logged_in {
            self.force_release("logged_out", out);
        }
    }

    fn force_release(&mut self, reason: &str, out: &mut Vec<CaptureCommand>) {
        if self.state != CaptureState::Released {
            self.transition(CaptureState::Released, reason);
            out.push(CaptureCommand::ReleaseCapture);
        }
    }
}
