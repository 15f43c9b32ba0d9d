//! Mirror Maze - a first-person grid raycaster with reflective tiles
//!
//! Core modules:
//! - `cast`: Grid traversal, mirror reflection, per-column bounce chains
//! - `renderer`: Perspective projection, frame assembly, ASCII output
//! - `level`: Level files and the built-in level
//! - `player`: Camera snapshot and per-column ray directions
//! - `settings`: Render settings and quality presets

pub mod cast;
pub mod level;
pub mod player;
pub mod renderer;
pub mod settings;

pub use cast::{Cell, LevelGrid, MirrorOrientation, ReflectionChain, cast_column};
pub use level::{Level, LevelError};
pub use player::Player;
pub use renderer::{DrawCommand, Frame, Screen, render_frame};
pub use settings::{QualityPreset, Settings};

/// Render configuration constants
pub mod consts {
    use std::f64::consts::PI;

    /// Default output rows; columns come from the quality preset
    pub const SCREEN_ROWS: u32 = 48;
    /// Horizontal field of view (60 degrees)
    pub const FOV: f64 = PI / 3.0;

    /// Mirrors a single column may bounce off before it is drawn as opaque
    pub const MAX_BOUNCES: u32 = 3;
    /// Highest bounce budget settings may ask for
    pub const BOUNCE_LIMIT: u32 = 64;
    /// Draw distance in cells, summed over every bounce of a column
    pub const MAX_DEPTH: f64 = 20.0;
    /// World units per grid cell
    pub const CELL_SIZE: f64 = 1.0;
    /// Trace step limit is the larger grid dimension times this
    pub const ITERATION_CAP_FACTOR: u32 = 4;
    /// Push past a mirror before tracing again, in cells
    pub const REFLECTION_EPSILON: f64 = 1e-6;

    /// Closest perceived distance (cells) used for projection
    pub const MIN_PROJECT_DISTANCE: f64 = 0.05;
    /// Shade = 1 / (1 + distance * falloff)
    pub const SHADE_FALLOFF: f64 = 0.2;
    /// Darkest shade anything is drawn with
    pub const MIN_BRIGHTNESS: f64 = 0.08;
    /// Light kept per mirror bounce
    pub const MIRROR_REFLECTANCE: f64 = 0.85;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}
