//! Camera snapshot
//!
//! Position and heading are owned by whatever moves the player; the renderer
//! only reads a copy per frame.

use glam::DVec2;

use crate::cast::{Ray, TraceError};
use crate::normalize_angle;
use crate::renderer::Screen;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// World-space position
    pub position: DVec2,
    /// Heading in radians, 0 = east (+x), π/2 = south (+y)
    pub angle: f64,
}

impl Player {
    pub fn new(position: DVec2, angle: f64) -> Self {
        Self {
            position,
            angle: normalize_angle(angle),
        }
    }

    /// Unit view direction
    #[inline]
    pub fn direction(&self) -> DVec2 {
        DVec2::from_angle(self.angle)
    }

    /// Camera plane for a horizontal field of view `fov`
    ///
    /// Perpendicular to [`Self::direction`], with length `tan(fov / 2)` so the
    /// screen edges sit exactly `fov / 2` off-axis.
    #[inline]
    pub fn camera_plane(&self, fov: f64) -> DVec2 {
        self.direction().perp() * (fov * 0.5).tan()
    }

    /// Ray through the centre of screen column `column`
    pub fn column_ray(&self, column: u32, screen: &Screen) -> Result<Ray, TraceError> {
        let dir = self.direction() + self.camera_plane(screen.fov) * screen.camera_x(column);
        Ray::new(self.position, dir)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(DVec2::new(1.5, 1.5), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_direction_follows_angle() {
        let p = Player::new(DVec2::ZERO, FRAC_PI_2);
        assert!((p.direction() - DVec2::Y).length() < 1e-12);
    }

    #[test]
    fn test_new_normalizes_angle() {
        let p = Player::new(DVec2::ZERO, 5.0 * PI / 2.0);
        assert!((p.angle - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_camera_plane_is_perpendicular() {
        let p = Player::new(DVec2::ZERO, 0.3);
        let plane = p.camera_plane(PI / 3.0);
        assert!(plane.dot(p.direction()).abs() < 1e-12);
        assert!((plane.length() - (PI / 6.0).tan()).abs() < 1e-12);
    }

    #[test]
    fn test_centre_column_looks_straight_ahead() {
        let p = Player::new(DVec2::new(2.0, 2.0), 1.0);
        let screen = Screen::new(3, 10, PI / 3.0);
        let ray = p.column_ray(1, &screen).unwrap();
        assert!((ray.direction() - p.direction()).length() < 1e-12);
        assert_eq!(ray.origin, p.position);
    }

    #[test]
    fn test_edge_columns_spread_symmetrically() {
        let p = Player::new(DVec2::ZERO, 0.0);
        let screen = Screen::new(4, 10, PI / 2.0);
        let left = p.column_ray(0, &screen).unwrap().direction();
        let right = p.column_ray(3, &screen).unwrap().direction();
        assert!((left.y + right.y).abs() < 1e-12);
        assert!(left.y < 0.0);
        // column centres never reach the fov edge
        assert!(left.y.atan2(left.x).abs() < PI / 4.0);
    }

    #[test]
    fn test_nan_heading_is_degenerate() {
        let p = Player {
            position: DVec2::ZERO,
            angle: f64::NAN,
        };
        let screen = Screen::new(1, 1, PI / 3.0);
        assert!(p.column_ray(0, &screen).is_err());
    }
}
