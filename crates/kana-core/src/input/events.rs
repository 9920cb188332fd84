use glam::Vec2;

/// Input the stroke capture controller understands.
/// Pointer positions are already in canvas bitmap space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureEvent {
    /// A touch/click began.
    PointerDown(Vec2),
    /// A touch/cursor moved.
    PointerMove(Vec2),
    /// A touch/click ended.
    PointerUp,
    /// The pointer left the canvas. Ends a stroke the same way as `PointerUp`.
    PointerLeave,
    /// The undo button.
    Undo,
    /// The redo button.
    Redo,
}
