//! Column rendering
//!
//! Turns bounce chains into per-column draw commands. The text canvas is the
//! only backend; anything that can fill a vertical strip can consume a
//! [`Frame`] directly.

pub mod ascii;
pub mod frame;
pub mod projector;

pub use ascii::AsciiCanvas;
pub use frame::{Frame, FrameParams, render_column, render_frame};
pub use projector::{DrawCommand, HitCategory, Screen, Shading, colors, project};
