//! Ray casting core
//!
//! Everything needed to turn a ray into the surface it finally lands on:
//! - Pure functions over a read-only grid snapshot
//! - No rendering or platform dependencies
//! - Every loop bounded by the bounce budget and the per-trace iteration cap,
//!   and optionally by a draw distance

pub mod column;
pub mod grid;
pub mod ray;
pub mod reflect;

pub use column::{ReflectionChain, Segment, Terminal, cast_column, cast_column_within};
pub use grid::{Cell, GridError, LevelGrid, MaterialId, MirrorOrientation};
pub use ray::{Hit, Ray, Side, TraceError, TraceResult, trace, trace_within};
pub use reflect::reflect;
