use glam::Vec2;
use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::input::{PlatformEvent, SharedInput};
use crate::traits::Action;

/// Physical keys bound to movement; an action is held while any key bound to it is down
const BINDINGS: [(KeyCode, Action); 8] = [
    (KeyCode::KeyW, Action::MoveForward),
    (KeyCode::ArrowUp, Action::MoveForward),
    (KeyCode::KeyS, Action::MoveBack),
    (KeyCode::ArrowDown, Action::MoveBack),
    (KeyCode::KeyA, Action::MoveLeft),
    (KeyCode::ArrowLeft, Action::MoveLeft),
    (KeyCode::KeyD, Action::MoveRight),
    (KeyCode::ArrowRight, Action::MoveRight),
];

/// Adapter that bridges Winit events into `SharedInput`
#[derive(Debug, Clone)]
pub struct WinitInputAdapter {
    input: SharedInput,
    /// Held bound keys, one bit per `BINDINGS` entry
    held: u8,
    /// Window inner size in physical pixels
    size: (u32, u32),
}

impl WinitInputAdapter {
    pub fn new(input: SharedInput, width: u32, height: u32) -> Self {
        Self {
            input,
            held: 0,
            size: (width, height),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    /// Process a Winit WindowEvent
    pub fn process_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.on_key(code, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => self.on_mouse_button(*button, *state),
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::Focused(focused) => self.on_focus(*focused),
            _ => {}
        }
    }

    /// Raw device motion drives look; cursor position is clamped by the OS and useless while locked
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.add_look_delta(delta.0 as f32, delta.1 as f32);
        }
    }

    pub fn on_key(&mut self, code: KeyCode, pressed: bool) {
        if let Some(index) = BINDINGS.iter().position(|(key, _)| *key == code) {
            let action = BINDINGS[index].1;
            if pressed {
                self.held |= 1 << index;
            } else {
                self.held &= !(1 << index);
            }
            let down = BINDINGS
                .iter()
                .enumerate()
                .any(|(i, (_, bound))| *bound == action && self.held & (1 << i) != 0);
            self.input.set_action(action, down);
        } else if code == KeyCode::Escape && pressed {
            // The OS drops pointer lock on Escape without telling us
            self.input.push(PlatformEvent::CaptureLost);
        }
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left && state == ElementState::Pressed {
            self.input.push(PlatformEvent::Click);
        }
    }

    pub fn on_cursor_moved(&mut self, x: f32, y: f32) {
        if let Some(ndc) = cursor_to_ndc(x, y, self.size.0, self.size.1) {
            self.input.push(PlatformEvent::PointerMoved(ndc));
        }
    }

    pub fn on_focus(&mut self, focused: bool) {
        if !focused {
            self.held = 0;
            self.input.release_all();
            self.input.push(PlatformEvent::CaptureLost);
        }
    }
}

/// Map Winit KeyCode to a movement action
pub fn action_for_key(code: KeyCode) -> Option<Action> {
    BINDINGS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, action)| *action)
}

/// Window pixel position to normalized device coordinates (y up)
pub fn cursor_to_ndc(x: f32, y: f32, width: u32, height: u32) -> Option<Vec2> {
    if width == 0 || height == 0 || !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(Vec2::new(
        x / width as f32 * 2.0 - 1.0,
        1.0 - y / height as f32 * 2.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Controller;

    // Winit KeyEvent has private fields, so these drive the adapter through
    // its decomposed handlers.

    fn adapter() -> (WinitInputAdapter, SharedInput) {
        let input = SharedInput::new();
        (WinitInputAdapter::new(input.clone(), 800, 600), input)
    }

    #[test]
    fn wasd_and_arrows_map_to_actions() {
        assert_eq!(action_for_key(KeyCode::KeyW), Some(Action::MoveForward));
        assert_eq!(action_for_key(KeyCode::ArrowUp), Some(Action::MoveForward));
        assert_eq!(action_for_key(KeyCode::KeyA), Some(Action::MoveLeft));
        assert_eq!(action_for_key(KeyCode::ArrowRight), Some(Action::MoveRight));
        assert_eq!(action_for_key(KeyCode::ArrowDown), Some(Action::MoveBack));
        assert_eq!(action_for_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn key_press_and_release() {
        let (mut adapter, input) = adapter();
        adapter.on_key(KeyCode::KeyW, true);
        assert!(input.keys().is_down(Action::MoveForward));
        adapter.on_key(KeyCode::KeyW, false);
        assert!(!input.keys().is_down(Action::MoveForward));
    }

    #[test]
    fn action_stays_held_while_another_bound_key_is_down() {
        let (mut adapter, input) = adapter();
        adapter.on_key(KeyCode::KeyW, true);
        adapter.on_key(KeyCode::ArrowUp, true);
        adapter.on_key(KeyCode::ArrowUp, false);
        assert!(input.keys().is_down(Action::MoveForward));
        adapter.on_key(KeyCode::KeyW, false);
        assert!(!input.keys().is_down(Action::MoveForward));
    }

    #[test]
    fn repeated_press_then_single_release_clears() {
        let (mut adapter, input) = adapter();
        adapter.on_key(KeyCode::KeyA, true);
        adapter.on_key(KeyCode::KeyA, true);
        adapter.on_key(KeyCode::KeyA, false);
        assert!(!input.keys().is_down(Action::MoveLeft));
    }

    #[test]
    fn focus_loss_forgets_held_keys() {
        let (mut adapter, input) = adapter();
        adapter.on_key(KeyCode::KeyW, true);
        adapter.on_key(KeyCode::ArrowUp, true);
        adapter.on_focus(false);
        adapter.on_key(KeyCode::ArrowUp, true);
        adapter.on_key(KeyCode::ArrowUp, false);
        assert!(!input.keys().is_down(Action::MoveForward));
    }

    #[test]
    fn focus_loss_releases_keys() {
        let (mut adapter, input) = adapter();
        adapter.on_key(KeyCode::KeyD, true);
        adapter.on_focus(false);
        let frame = input.snapshot();
        assert!(!frame.keys.is_moving());
        assert_eq!(frame.events, vec![PlatformEvent::CaptureLost]);
    }

    #[test]
    fn escape_reports_capture_lost() {
        let (mut adapter, input) = adapter();
        adapter.on_key(KeyCode::Escape, true);
        adapter.on_key(KeyCode::Escape, false);
        assert_eq!(input.snapshot().events, vec![PlatformEvent::CaptureLost]);
    }

    #[test]
    fn left_press_is_a_click() {
        let (mut adapter, input) = adapter();
        adapter.on_mouse_button(MouseButton::Left, ElementState::Pressed);
        adapter.on_mouse_button(MouseButton::Left, ElementState::Released);
        adapter.on_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert_eq!(input.snapshot().events, vec![PlatformEvent::Click]);
    }

    #[test]
    fn cursor_centre_is_ndc_origin() {
        let ndc = cursor_to_ndc(400.0, 300.0, 800, 600).unwrap();
        assert!(ndc.length() < 1e-6);
        let corner = cursor_to_ndc(0.0, 0.0, 800, 600).unwrap();
        assert_eq!(corner, Vec2::new(-1.0, 1.0));
        assert!(cursor_to_ndc(1.0, 1.0, 0, 600).is_none());
    }
}
