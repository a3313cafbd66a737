use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use serde_json::json;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, CursorIcon, Window, WindowId},
};

use gratitude_grove::cli::Cli;
use gratitude_grove::config::{load_descriptors, Config};
use gratitude_grove::core::{
    apply_host_commands, Clock, CoreEvent, CursorStyle, FrameLoop, ManualClock, ObjectDescriptor,
    PlatformEvent, SharedInput, UiMode, WinitInputAdapter,
};
use gratitude_grove::error::CoreError;
use gratitude_grove::traits::{Action, PointerCapture, TimeSource};

// === Constants ===

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;

// === Platform ===

/// Pointer capture backed by a winit window
struct WindowPlatform<'a>(&'a Window);

impl PointerCapture for WindowPlatform<'_> {
    fn set_pointer_captured(&self, captured: bool) -> Result<(), CoreError> {
        let window = self.0;
        if captured {
            // Locked is unsupported on some platforms (X11), Confined is the closest fallback
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
                .map_err(|e| CoreError::CapturePermissionDenied(e.to_string()))?;
            window.set_cursor_visible(false);
        } else {
            window.set_cursor_visible(true);
            window
                .set_cursor_grab(CursorGrabMode::None)
                .map_err(|e| CoreError::CapturePermissionDenied(e.to_string()))?;
        }
        Ok(())
    }

    fn set_cursor_style(&self, style: CursorStyle) {
        let icon = match style {
            CursorStyle::Default => CursorIcon::Default,
            CursorStyle::Pointer => CursorIcon::Pointer,
        };
        self.0.set_cursor(icon);
    }
}

/// Headless runs have nothing to lock; every request succeeds
struct HeadlessPlatform;

impl PointerCapture for HeadlessPlatform {
    fn set_pointer_captured(&self, _captured: bool) -> Result<(), CoreError> {
        Ok(())
    }

    fn set_cursor_style(&self, _style: CursorStyle) {}
}

// === Windowed host ===

struct App {
    frame_loop: FrameLoop,
    clock: Clock,
    window: Option<Arc<Window>>,
    adapter: Option<WinitInputAdapter>,
}

impl App {
    fn new(frame_loop: FrameLoop) -> Self {
        Self {
            frame_loop,
            clock: Clock::new(),
            window: None,
            adapter: None,
        }
    }

    /// Apply anything the frame loop queued outside a tick
    fn flush_commands(&mut self) {
        let commands = self.frame_loop.take_commands();
        if let Some(window) = &self.window {
            apply_host_commands(&WindowPlatform(window), &commands, self.frame_loop.input());
        }
    }

    /// Stand-in for the modal UI: C composes, Enter/Backspace closes, R marks read and closes
    fn handle_modal_key(&mut self, code: KeyCode) -> bool {
        match (code, self.frame_loop.ui_mode().clone()) {
            (KeyCode::KeyC, UiMode::Exploring) => {
                self.frame_loop.set_ui_mode(UiMode::Composing);
            }
            (KeyCode::Enter | KeyCode::Backspace, mode) if mode.is_modal() => {
                self.frame_loop.close_modal();
            }
            (KeyCode::KeyR, UiMode::Viewing(id)) => {
                if let Err(e) = self.frame_loop.mark_read(&id) {
                    warn!("Could not mark `{}` read: {}", id, e);
                }
                self.frame_loop.close_modal();
            }
            _ => return false,
        }
        self.flush_commands();
        true
    }

    fn redraw(&mut self) {
        let time = self.clock.tick();
        let output = self.frame_loop.tick(time);

        for event in &output.events {
            match event {
                CoreEvent::BeaconSelected(id) => {
                    let label = self
                        .frame_loop
                        .registry()
                        .get(id)
                        .and_then(|object| object.label.clone())
                        .unwrap_or_default();
                    info!("Viewing `{}` {} (R: mark read, Enter: close)", id, label);
                }
                CoreEvent::InteractionStart(id) => info!("Talking to `{}` (Enter: close)", id),
                CoreEvent::CaptureNotice(notice) => warn!("{}", notice),
                other => log::debug!("{:?}", other),
            }
        }

        if let Some(window) = &self.window {
            apply_host_commands(&WindowPlatform(window), &output.commands, self.frame_loop.input());
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Gratitude Grove")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        INITIAL_WINDOW_WIDTH,
                        INITIAL_WINDOW_HEIGHT,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let size = window.inner_size();
            self.frame_loop.set_viewport(size.width, size.height);
            self.adapter = Some(WinitInputAdapter::new(
                self.frame_loop.input().clone(),
                size.width,
                size.height,
            ));
            self.window = Some(window);
            self.clock.reset();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(code),
                    repeat: false,
                    ..
                },
            ..
        } = &event
        {
            if self.handle_modal_key(*code) {
                return;
            }
            if *code == KeyCode::Escape {
                // Mirror what a browser does with pointer lock on Escape
                if let Some(window) = &self.window {
                    if let Err(e) = WindowPlatform(window).set_pointer_captured(false) {
                        warn!("Release failed: {}", e);
                    }
                }
            }
        }

        if let Some(adapter) = &mut self.adapter {
            adapter.process_window_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.frame_loop.set_viewport(size.width, size.height),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(adapter) = &mut self.adapter {
            adapter.process_device_event(&event);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn run_windowed(frame_loop: FrameLoop) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(frame_loop);

    info!("Gratitude Grove - click to look around, WASD/arrows to walk, C to compose, Escape to free the mouse");
    event_loop.run_app(&mut app)?;
    Ok(())
}

// === Headless host ===

/// Fixed-step run: click to capture, walk forward for the first half, then idle
fn run_headless(mut frame_loop: FrameLoop, frames: u64, dt: f32, quiet: bool) -> Result<()> {
    let mut clock = ManualClock::new(dt);
    let input = frame_loop.input().clone();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    input.push(PlatformEvent::Click);
    for n in 0..frames {
        input.set_action(Action::MoveForward, n < frames / 2);
        let output = frame_loop.tick(clock.tick());
        if !quiet {
            for event in &output.events {
                writeln!(out, "{}", serde_json::to_string(event)?)?;
            }
        }
        apply_host_commands(&HeadlessPlatform, &output.commands, &input);
    }

    let summary = json!({
        "frames": frames,
        "elapsed": clock.elapsed(),
        "camera": frame_loop.camera(),
        "capture": frame_loop.capture_state(),
        "objects": frame_loop.registry().len(),
        "trees": frame_loop.forest().trees().len(),
        "snowflakes": frame_loop.snow().len(),
        "unread": frame_loop.registry().unread_count(),
    });
    writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let descriptors: Vec<ObjectDescriptor> = match &cli.objects {
        Some(path) => load_descriptors(path)?,
        None => Vec::new(),
    };

    let mut frame_loop = FrameLoop::new(config, SharedInput::new(), !cli.guest);
    let report = frame_loop.sync_objects(&descriptors);
    info!(
        "Loaded {} objects ({} from the object source)",
        frame_loop.registry().len(),
        report.added.len()
    );

    if cli.headless {
        cli.validate_headless()?;
        run_headless(frame_loop, cli.frames, cli.dt, cli.quiet)
    } else {
        run_windowed(frame_loop)
    }
}
