pub mod controller;
pub mod frame;
pub mod window;

pub use controller::*;
pub use frame::*;
pub use window::*;
