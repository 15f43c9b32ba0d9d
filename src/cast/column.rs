//! One screen column: trace, bounce, repeat
//!
//! Each bounce restarts the trace at the mirror hit point with the reflected
//! direction. The loop is bounded by the bounce budget, and every trace is
//! bounded by the grid's iteration cap, so a column always terminates.

use glam::{DVec2, IVec2};

use super::grid::{LevelGrid, MaterialId};
use super::ray::{Hit, Ray, Side, trace_within};
use super::reflect::reflect;
use crate::consts::REFLECTION_EPSILON;

/// Segments reserved up front; longer chains reallocate
const INITIAL_SEGMENTS: u32 = 8;

/// How a chain ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    /// Struck an opaque wall
    Wall(MaterialId),
    /// Struck a mirror with no bounces left; drawn as an opaque surface
    BudgetExhausted,
    /// A trace gave up; drawn as an opaque surface
    IterationCap,
    /// Ran past the draw distance
    OutOfRange,
}

/// One straight leg of a column's path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start of the leg (the camera, or the previous mirror hit)
    pub origin: DVec2,
    pub direction: DVec2,
    pub hit: Hit,
    pub cell: IVec2,
    pub point: DVec2,
    /// Length of the leg in world units
    pub distance: f64,
    pub side: Side,
}

/// Every leg a column's ray took, in order
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionChain {
    segments: Vec<Segment>,
    bounces: u32,
    terminal: Terminal,
    cell_size: f64,
}

impl ReflectionChain {
    /// Never empty; at most `max_bounces + 1` long
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The leg that ended the chain
    #[inline]
    pub fn last(&self) -> &Segment {
        // cast_column always pushes before it can return
        &self.segments[self.segments.len() - 1]
    }

    #[inline]
    pub fn bounces(&self) -> u32 {
        self.bounces
    }

    #[inline]
    pub fn terminal(&self) -> Terminal {
        self.terminal
    }

    /// Total path length in world units
    pub fn cumulative_distance(&self) -> f64 {
        self.segments.iter().map(|s| s.distance).sum()
    }

    /// Total path length in cells
    pub fn cumulative_cells(&self) -> f64 {
        self.cumulative_distance() / self.cell_size
    }
}

/// Follow `ray` through `grid`, reflecting off at most `max_bounces` mirrors
#[inline]
pub fn cast_column(ray: &Ray, grid: &LevelGrid, max_bounces: u32) -> ReflectionChain {
    cast_column_within(ray, grid, max_bounces, f64::INFINITY)
}

/// [`cast_column`] with a draw distance
///
/// The whole path, across every bounce, ends with [`Terminal::OutOfRange`]
/// once it has covered `max_depth` cells without reaching a wall.
pub fn cast_column_within(ray: &Ray, grid: &LevelGrid, max_bounces: u32, max_depth: f64) -> ReflectionChain {
    let nudge = REFLECTION_EPSILON * grid.cell_size();
    let limit = max_depth * grid.cell_size();

    // grows with actual bounces, not the budget
    let mut segments = Vec::with_capacity(max_bounces.min(INITIAL_SEGMENTS) as usize + 1);
    let mut bounces = 0;
    let mut travelled = 0.0;
    let mut ray = *ray;
    let mut start = ray.origin;
    // how far `ray.origin` was pushed past `start`
    let mut offset = 0.0;

    let terminal = loop {
        let remaining = (limit - travelled - offset).max(0.0);
        let result = trace_within(&ray, grid, remaining);
        let distance = result.distance + offset;
        travelled += distance;
        segments.push(Segment {
            origin: start,
            direction: ray.direction(),
            hit: result.hit,
            cell: result.cell,
            point: result.point,
            distance,
            side: result.side,
        });

        let orientation = match result.hit {
            Hit::Wall(material) => break Terminal::Wall(material),
            Hit::IterationCap => break Terminal::IterationCap,
            Hit::OutOfRange => break Terminal::OutOfRange,
            Hit::Mirror(_) if bounces >= max_bounces => {
                log::debug!(
                    "bounce budget of {} spent at cell {}",
                    max_bounces,
                    result.cell
                );
                break Terminal::BudgetExhausted;
            }
            Hit::Mirror(orientation) => orientation,
        };

        let direction = reflect(ray.direction(), orientation);
        start = result.point;
        offset = nudge;
        ray = Ray::from_unit(start + direction * nudge, direction);
        bounces += 1;
    };

    ReflectionChain {
        segments,
        bounces,
        terminal,
        cell_size: grid.cell_size(),
    }
}
