use log::warn;

use super::frame_loop::HostCommand;
use super::input::{PlatformEvent, SharedInput};
use crate::traits::PointerCapture;

/// Carry out frame-loop commands on the platform.
///
/// Capture outcomes are fed back through `input` so the state machine sees
/// them on the next tick, the same way an asynchronous platform would
/// report them.
pub fn apply_host_commands<P: PointerCapture + ?Sized>(
    platform: &P,
    commands: &[HostCommand],
    input: &SharedInput,
) {
    for command in commands {
        match command {
            HostCommand::RequestCapture => match platform.set_pointer_captured(true) {
                Ok(()) => input.push(PlatformEvent::CaptureGranted),
                Err(err) => {
                    warn!(target: "capture", "Capture request failed: {}", err);
                    input.push(PlatformEvent::CaptureDenied(err.to_string()));
                }
            },
            HostCommand::ReleaseCapture => {
                if let Err(err) = platform.set_pointer_captured(false) {
                    warn!(target: "capture", "Release failed: {}", err);
                }
            }
            HostCommand::SetCursor(style) => platform.set_cursor_style(*style),
        }
    }
}
