//! Grid traversal
//!
//! A ray is stepped across the grid one cell boundary at a time (DDA). For each
//! axis we keep the distance along the ray at which it next crosses a grid
//! line on that axis; the smaller of the two is always the next crossing.
//! Per-axis increments are constant for a given ray, so a whole trace is
//! additions and comparisons only.

use glam::{DVec2, IVec2};

use super::grid::{Cell, LevelGrid, MaterialId, MirrorOrientation};

/// A ray was given a direction it can't travel along
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TraceError {
    #[error("ray direction {0} is zero or not finite")]
    DegenerateDirection(DVec2),
}

/// A half-line in world space with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec2,
    direction: DVec2,
}

impl Ray {
    /// Normalizes `direction`; fails if it has no length
    pub fn new(origin: DVec2, direction: DVec2) -> Result<Self, TraceError> {
        let length = direction.length();
        if !(length.is_finite() && length > 0.0) {
            return Err(TraceError::DegenerateDirection(direction));
        }
        Ok(Self {
            origin,
            direction: direction / length,
        })
    }

    /// `direction` must already be unit length
    #[inline]
    pub(crate) fn from_unit(origin: DVec2, direction: DVec2) -> Self {
        debug_assert!((direction.length() - 1.0).abs() < 1e-9);
        Self { origin, direction }
    }

    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f64) -> DVec2 {
        self.origin + self.direction * t
    }
}

/// Which family of grid lines the ray crossed to enter the hit cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// A vertical grid line: the east or west face of the cell
    X,
    /// A horizontal grid line: the north or south face of the cell
    Y,
}

/// What stopped a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hit {
    Wall(MaterialId),
    Mirror(MirrorOrientation),
    /// The step limit ran out before anything solid was found
    IterationCap,
    /// Nothing within the distance limit
    OutOfRange,
}

/// Outcome of a single trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceResult {
    pub hit: Hit,
    /// Cell that was hit (the last cell visited for [`Hit::IterationCap`])
    pub cell: IVec2,
    /// Point where the ray entered `cell`
    pub point: DVec2,
    /// Euclidean distance from the ray origin to `point`
    pub distance: f64,
    pub side: Side,
}

/// Step `ray` through `grid` until it enters a non-empty cell
///
/// The cell containing the origin is never tested, so a ray resuming from a
/// surface does not hit that surface again.
#[inline]
pub fn trace(ray: &Ray, grid: &LevelGrid) -> TraceResult {
    trace_within(ray, grid, f64::INFINITY)
}

/// [`trace`], giving up with [`Hit::OutOfRange`] once the next cell boundary
/// lies beyond `max_distance` world units
///
/// A surface exactly `max_distance` away is still hit.
pub fn trace_within(ray: &Ray, grid: &LevelGrid, max_distance: f64) -> TraceResult {
    let size = grid.cell_size();
    let dir = ray.direction();
    // origin in cell units
    let local = ray.origin / size;
    let mut cell = grid.world_to_cell(ray.origin);

    let step = IVec2::new(step_sign(dir.x), step_sign(dir.y));
    let delta = DVec2::new(axis_delta(dir.x, size), axis_delta(dir.y, size));
    let mut side_dist = DVec2::new(
        first_crossing(local.x, cell.x, dir.x, delta.x),
        first_crossing(local.y, cell.y, dir.y, delta.y),
    );

    let mut distance = 0.0;
    let mut side = Side::X;
    for _ in 0..grid.iteration_cap() {
        if side_dist.x < side_dist.y {
            distance = side_dist.x;
            side_dist.x += delta.x;
            cell.x = cell.x.saturating_add(step.x);
            side = Side::X;
        } else {
            distance = side_dist.y;
            side_dist.y += delta.y;
            cell.y = cell.y.saturating_add(step.y);
            side = Side::Y;
        }

        if distance > max_distance {
            let point = ray.at(max_distance);
            return TraceResult {
                hit: Hit::OutOfRange,
                cell: grid.world_to_cell(point),
                point,
                distance: max_distance,
                side,
            };
        }

        let hit = match grid.cell_at(cell.x, cell.y) {
            Cell::Empty => continue,
            Cell::Wall(material) => Hit::Wall(material),
            Cell::Mirror(orientation) => Hit::Mirror(orientation),
        };
        return TraceResult {
            hit,
            cell,
            point: ray.at(distance),
            distance,
            side,
        };
    }

    log::warn!(
        "trace from {} along {} gave up after {} steps",
        ray.origin,
        dir,
        grid.iteration_cap()
    );
    TraceResult {
        hit: Hit::IterationCap,
        cell,
        point: ray.at(distance),
        distance,
        side,
    }
}

#[inline]
fn step_sign(component: f64) -> i32 {
    if component > 0.0 {
        1
    } else if component < 0.0 {
        -1
    } else {
        0
    }
}

/// Distance along the ray between two consecutive grid lines on one axis
#[inline]
fn axis_delta(component: f64, cell_size: f64) -> f64 {
    if component == 0.0 {
        f64::INFINITY
    } else {
        (cell_size / component).abs()
    }
}

/// Distance along the ray to the first grid line on one axis
#[inline]
fn first_crossing(local: f64, cell: i32, component: f64, delta: f64) -> f64 {
    if component == 0.0 {
        // parallel to this axis' grid lines; `0 * inf` would be NaN
        f64::INFINITY
    } else if component < 0.0 {
        (local - cell as f64) * delta
    } else {
        (cell as f64 + 1.0 - local) * delta
    }
}
