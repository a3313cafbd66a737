use glam::{Vec2, Vec3};
use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::Rng;
use serde::Serialize;

use super::animator::{AnimationPose, IdleAnimator};
use super::capture::{CaptureCommand, CaptureState, CaptureStateMachine, UiMode};
use super::frame::FrameTime;
use super::input::{PlatformEvent, SharedInput};
use super::interactable::{Interactable, ObjectDescriptor, ObjectId, ObjectKind};
use super::navigation::NavigationController;
use super::picker::{CursorStyle, InteractionPicker};
use super::placement::SpatialPlacer;
use super::registry::{ObjectRegistry, ReconcileReport};
use super::scenery::{Forest, SnowField};
use super::timer::Throttled;
use crate::camera::CameraPose;
use crate::config::Config;
use crate::error::CoreError;
use crate::math::{Ray, Rgb};

const STATS_INTERVAL: f32 = 1.0;

/// Events for the selection/modal collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum CoreEvent {
    HoverEntered(ObjectId),
    HoverExited(ObjectId),
    /// A beacon was chosen; open the content viewer
    BeaconSelected(ObjectId),
    /// The guide was chosen; open the conversation panel
    InteractionStart(ObjectId),
    InteractionEnd(ObjectId),
    CaptureChanged(CaptureState),
    /// Non-fatal capture problem worth telling the user about
    CaptureNotice(String),
    CursorStyle(CursorStyle),
}

/// Requests for the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HostCommand {
    RequestCapture,
    ReleaseCapture,
    SetCursor(CursorStyle),
}

impl From<CaptureCommand> for HostCommand {
    fn from(command: CaptureCommand) -> Self {
        match command {
            CaptureCommand::RequestCapture => HostCommand::RequestCapture,
            CaptureCommand::ReleaseCapture => HostCommand::ReleaseCapture,
        }
    }
}

/// Result of one tick
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub frame: FrameTime,
    pub camera: CameraPose,
    pub poses: Vec<(ObjectId, AnimationPose)>,
    /// Snowflake positions after this tick's fall
    pub snow: Vec<Vec3>,
    pub events: Vec<CoreEvent>,
    pub commands: Vec<HostCommand>,
}

/// Per-frame coordinator.
///
/// Each tick runs input snapshot, navigation, animation and picking in that
/// order against one input snapshot and one `FrameTime`. Calls made between
/// ticks (`set_ui_mode`, `sync_objects`, ...) take effect immediately; their
/// events and commands are delivered with the next tick unless the host
/// takes the commands early with `take_commands`.
#[derive(Debug)]
pub struct FrameLoop<R: Rng = ThreadRng> {
    config: Config,
    input: SharedInput,
    navigation: NavigationController,
    capture: CaptureStateMachine,
    placer: SpatialPlacer<R>,
    picker: InteractionPicker,
    animator: IdleAnimator,
    registry: ObjectRegistry,
    forest: Forest,
    snow: SnowField,
    ui_mode: UiMode,
    guide_id: Option<ObjectId>,
    /// Who the open conversation is with
    conversation: Option<ObjectId>,
    pointer_ndc: Vec2,
    aspect: f32,
    last_capture: CaptureState,
    last_cursor: CursorStyle,
    pending_events: Vec<CoreEvent>,
    pending_commands: Vec<HostCommand>,
    stats: Throttled,
}

impl FrameLoop<ThreadRng> {
    pub fn new(config: Config, input: SharedInput, logged_in: bool) -> Self {
        Self::with_placer(config, input, logged_in, SpatialPlacer::new())
    }
}

impl<R: Rng> FrameLoop<R> {
    pub fn with_placer(config: Config, input: SharedInput, logged_in: bool, mut placer: SpatialPlacer<R>) -> Self {
        let scene = &config.scene;
        let pose = CameraPose::new(
            scene.spawn_position,
            scene.spawn_yaw,
            scene.spawn_pitch,
            config.navigation.base_height,
        );

        let mut registry = ObjectRegistry::new();
        let guide_id = scene.guide.as_ref().map(|guide| {
            let color = Rgb::from_hex(&guide.color).unwrap_or(Rgb([0.09, 0.64, 0.29]));
            let mut object = Interactable::new(
                ObjectId::new(guide.id.clone()),
                0,
                ObjectKind::Guide,
                guide.position,
                color,
            );
            object.yaw = guide.yaw;
            object.label = Some(guide.label.clone());
            registry.insert_resident(object);
            ObjectId::new(guide.id.clone())
        });

        let forest = Forest::scatter(&config.scenery.forest, &mut placer);
        let snow = SnowField::new(&config.scenery.snow, &mut placer);

        Self {
            navigation: NavigationController::new(pose, config.navigation),
            capture: CaptureStateMachine::new(logged_in),
            picker: InteractionPicker::new(config.picking.max_distance),
            animator: IdleAnimator::new(config.animation),
            placer,
            registry,
            forest,
            snow,
            input,
            ui_mode: UiMode::Exploring,
            guide_id,
            conversation: None,
            pointer_ndc: Vec2::ZERO,
            aspect: 16.0 / 9.0,
            last_capture: CaptureState::Released,
            last_cursor: CursorStyle::Default,
            pending_events: Vec::new(),
            pending_commands: Vec::new(),
            stats: Throttled::new(STATS_INTERVAL),
            config,
        }
    }

    // === Accessors ===

    pub fn camera(&self) -> &CameraPose {
        self.navigation.pose()
    }

    pub fn capture_state(&self) -> CaptureState {
        self.capture.state()
    }

    pub fn ui_mode(&self) -> &UiMode {
        &self.ui_mode
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn hovered(&self) -> Option<&ObjectId> {
        self.picker.hovered()
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn snow(&self) -> &SnowField {
        &self.snow
    }

    /// Handle for platform callbacks
    pub fn input(&self) -> &SharedInput {
        &self.input
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // === External collaborators ===

    /// Full sync with the object source's current list
    pub fn sync_objects(&mut self, descriptors: &[ObjectDescriptor]) -> ReconcileReport {
        self.registry
            .reconcile(descriptors, &mut self.placer, &self.config.placement)
    }

    /// Incremental add/update from the object source
    pub fn upsert_object(&mut self, descriptor: &ObjectDescriptor) -> bool {
        self.registry
            .upsert(descriptor, &mut self.placer, &self.config.placement)
    }

    pub fn remove_object(&mut self, id: &ObjectId) -> bool {
        self.registry.remove(id).is_some()
    }

    pub fn mark_read(&mut self, id: &ObjectId) -> Result<(), CoreError> {
        self.registry.mark_read(id)
    }

    pub fn set_selected(&mut self, id: &ObjectId, selected: bool) -> Result<(), CoreError> {
        self.registry.set_selected(id, selected)
    }

    /// Switch UI surface; any modal releases capture before the next navigation step
    pub fn set_ui_mode(&mut self, mode: UiMode) {
        if mode == self.ui_mode {
            return;
        }
        let previous = std::mem::replace(&mut self.ui_mode, mode);
        info!(target: "frame", "UI mode {:?} -> {:?}", previous, self.ui_mode);

        if self.ui_mode == UiMode::Conversing && self.conversation.is_none() {
            self.conversation = self.guide_id.clone();
        }
        if previous == UiMode::Conversing {
            if let Some(partner) = self.conversation.take() {
                self.pending_events.push(CoreEvent::InteractionEnd(partner));
            }
        }

        let mut commands = Vec::new();
        self.capture
            .set_modal_open(self.ui_mode.is_modal(), &mut commands);
        self.queue_capture(commands);
    }

    pub fn close_modal(&mut self) {
        self.set_ui_mode(UiMode::Exploring);
    }

    pub fn set_session(&mut self, logged_in: bool) {
        let mut commands = Vec::new();
        self.capture.set_logged_in(logged_in, &mut commands);
        self.queue_capture(commands);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Commands produced since the last tick, for hosts that apply them immediately
    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.pending_commands)
    }

    // === Frame ===

    pub fn tick(&mut self, time: FrameTime) -> FrameOutput {
        // 1. Input snapshot
        let snapshot = self.input.snapshot();
        let mut clicked = false;
        let mut capture_commands = Vec::new();
        for event in snapshot.events {
            match event {
                PlatformEvent::CaptureGranted => self.capture.on_granted(&mut capture_commands),
                PlatformEvent::CaptureLost => self.capture.on_lost(),
                PlatformEvent::CaptureDenied(reason) => {
                    self.capture.on_denied(&reason);
                    let notice = CoreError::CapturePermissionDenied(reason).to_string();
                    self.pending_events.push(CoreEvent::CaptureNotice(notice));
                }
                PlatformEvent::Click => clicked = true,
                PlatformEvent::PointerMoved(ndc) => {
                    if ndc.is_finite() {
                        self.pointer_ndc = ndc;
                    }
                }
            }
        }
        self.queue_capture(capture_commands);

        // 2. Navigation, only while captured
        if self.capture.is_captured() {
            self.navigation.look(snapshot.look_delta);
            let look = self.navigation.pose().look_direction();
            self.navigation.advance(time, &snapshot.keys, look);
        }

        // 3. Animation
        let poses: Vec<(ObjectId, AnimationPose)> = self
            .registry
            .as_mut_slice()
            .iter_mut()
            .map(|object| {
                let pose = self.animator.tick(time.delta, time.elapsed, object);
                (object.id.clone(), pose)
            })
            .collect();
        self.snow.tick(time.delta);

        // 4. Picking
        self.pick(clicked);

        if let Some((frames, seconds)) = self.stats.try_tick(time.delta) {
            debug!(
                target: "frame",
                "{} frames in {:.2}s ({:.1} fps), {} objects, {} unread, capture {:?}",
                frames,
                seconds,
                frames as f32 / seconds.max(f32::EPSILON),
                self.registry.len(),
                self.registry.unread_count(),
                self.capture.state()
            );
        }

        FrameOutput {
            frame: time,
            camera: *self.navigation.pose(),
            poses,
            snow: self.snow.positions(),
            events: std::mem::take(&mut self.pending_events),
            commands: std::mem::take(&mut self.pending_commands),
        }
    }

    /// Ray used for hover this frame; `None` while a modal owns the screen
    pub fn pointer_ray(&self) -> Option<Ray> {
        if self.ui_mode.is_modal() {
            return None;
        }
        // Captured look uses the crosshair at screen centre
        let ndc = if self.capture.is_captured() {
            Vec2::ZERO
        } else {
            self.pointer_ndc
        };
        Some(self.navigation.pose().ray_through(
            ndc,
            self.aspect,
            self.config.picking.fov_y_degrees.to_radians(),
        ))
    }

    fn pick(&mut self, clicked: bool) {
        let ray = self.pointer_ray();
        let clicked = clicked && !self.ui_mode.is_modal();
        let result = self
            .picker
            .update(ray.as_ref(), self.registry.as_mut_slice(), clicked);

        self.pending_events
            .extend(result.exited.into_iter().map(CoreEvent::HoverExited));
        self.pending_events
            .extend(result.entered.into_iter().map(CoreEvent::HoverEntered));

        if clicked {
            match result.selected {
                Some(id) => self.select(id),
                None if !self.capture.is_captured() => {
                    // Clicking empty space is the gesture that asks for capture
                    let mut commands = Vec::new();
                    self.capture.request(&mut commands);
                    self.queue_capture(commands);
                }
                None => {}
            }
        }

        let cursor = self.picker.cursor_style();
        if cursor != self.last_cursor {
            self.last_cursor = cursor;
            self.pending_events.push(CoreEvent::CursorStyle(cursor));
            self.pending_commands.push(HostCommand::SetCursor(cursor));
        }
    }

    fn select(&mut self, id: ObjectId) {
        let Some(object) = self.registry.get(&id) else {
            debug!(target: "picking", "Selected `{}` vanished, ignoring", id);
            return;
        };
        match object.kind {
            ObjectKind::Beacon { .. } => {
                info!(target: "picking", "Beacon `{}` selected", id);
                self.pending_events.push(CoreEvent::BeaconSelected(id.clone()));
                self.set_ui_mode(UiMode::Viewing(id));
            }
            ObjectKind::Guide => {
                info!(target: "picking", "Guide `{}` selected", id);
                self.pending_events.push(CoreEvent::InteractionStart(id.clone()));
                self.conversation = Some(id);
                self.set_ui_mode(UiMode::Conversing);
            }
        }
    }

    fn queue_capture(&mut self, commands: Vec<CaptureCommand>) {
        self.pending_commands
            .extend(commands.into_iter().map(HostCommand::from));
        let state = self.capture.state();
        if state != self.last_capture {
            self.last_capture = state;
            self.pending_events.push(CoreEvent::CaptureChanged(state));
        }
    }
}
