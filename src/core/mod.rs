pub mod animator;
pub mod capture;
pub mod clock;
pub mod frame;
pub mod frame_loop;
pub mod host;
pub mod input;
pub mod input_adapter;
pub mod interactable;
pub mod navigation;
pub mod picker;
pub mod placement;
pub mod registry;
pub mod scenery;
pub mod timer;

pub use animator::{AnimationPose, ArmPose, HeadPose, IdleAnimator};
pub use capture::{CaptureCommand, CaptureState, CaptureStateMachine, UiMode};
pub use clock::{Clock, ManualClock, MAX_FRAME_DELTA};
pub use frame::FrameTime;
pub use frame_loop::{CoreEvent, FrameLoop, FrameOutput, HostCommand};
pub use host::apply_host_commands;
pub use input::{InputFrame, InputState, PlatformEvent, SharedInput};
pub use input_adapter::WinitInputAdapter;
pub use interactable::{
    AnimationPhase, CollisionVolume, Interactable, KindTag, ObjectDescriptor, ObjectId, ObjectKind,
};
pub use navigation::NavigationController;
pub use picker::{CursorStyle, InteractionPicker, PickResult};
pub use placement::{PlacementConstraint, SpatialPlacer};
pub use registry::{ObjectRegistry, ReconcileReport};
pub use scenery::{Forest, SnowField, TreeInstance};
pub use timer::Throttled;
