use crate::core::CursorStyle;
use crate::error::CoreError;

/// Pointer capture and cursor control provided by the windowing layer
pub trait PointerCapture {
    /// Lock (or release) the pointer to the window.
    ///
    /// `Err` means the platform refused; the caller keeps exploring without
    /// pointer look.
    fn set_pointer_captured(&self, captured: bool) -> Result<(), CoreError>;

    /// Set cursor icon shown while the pointer is free
    fn set_cursor_style(&self, style: CursorStyle);
}
