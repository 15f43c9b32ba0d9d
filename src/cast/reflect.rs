//! Reflection off axis-aligned mirrors

use glam::DVec2;

use super::grid::MirrorOrientation;

/// Reflect `direction` off a mirror with the given orientation
///
/// Closed form of `v - 2(v·n)n` for an axis-aligned normal: the component
/// along the normal changes sign and the other is untouched. Negation is
/// exact, so reflecting twice gives back the same bits.
#[inline]
pub fn reflect(direction: DVec2, orientation: MirrorOrientation) -> DVec2 {
    match orientation {
        MirrorOrientation::Vertical => DVec2::new(-direction.x, direction.y),
        MirrorOrientation::Horizontal => DVec2::new(direction.x, -direction.y),
    }
}
