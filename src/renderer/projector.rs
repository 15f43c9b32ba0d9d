//! Perspective projection of a column's chain into a vertical strip

use crate::cast::{MaterialId, ReflectionChain, Side, Terminal};
use crate::consts::{
    MIN_BRIGHTNESS, MIN_PROJECT_DISTANCE, MIRROR_REFLECTANCE, SHADE_FALLOFF,
};

/// Output surface: one ray per column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    /// Columns (one ray each)
    pub width: u32,
    /// Rows
    pub height: u32,
    /// Horizontal field of view in radians
    pub fov: f64,
}

impl Screen {
    pub fn new(width: u32, height: u32, fov: f64) -> Self {
        Self { width, height, fov }
    }

    /// Position of a column's centre on the camera plane, in [-1, 1]
    #[inline]
    pub fn camera_x(&self, column: u32) -> f64 {
        2.0 * (column as f64 + 0.5) / self.width.max(1) as f64 - 1.0
    }

    /// Angle between a column's ray and the view direction
    #[inline]
    pub fn column_angle(&self, column: u32) -> f64 {
        (self.camera_x(column) * (self.fov * 0.5).tan()).atan()
    }
}

/// Depth shading parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    /// Shade = 1 / (1 + distance * falloff), distance in cells
    pub falloff: f64,
    /// Lower clamp on the final shade
    pub min_brightness: f64,
    /// Multiplier applied once per mirror bounce
    pub reflectance: f64,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            falloff: SHADE_FALLOFF,
            min_brightness: MIN_BRIGHTNESS,
            reflectance: MIRROR_REFLECTANCE,
        }
    }
}

impl Shading {
    /// Brightness of a surface `distance` cells away seen through `bounces` mirrors
    pub fn shade(&self, distance: f64, bounces: u32) -> f64 {
        let depth = 1.0 / (1.0 + distance.max(0.0) * self.falloff);
        let mirrored = self.reflectance.powi(bounces as i32);
        (depth * mirrored).clamp(self.min_brightness, 1.0)
    }
}

/// What kind of surface a strip shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitCategory {
    Wall(MaterialId),
    /// Bounce budget or step limit ran out; an opaque mirror-coloured surface
    Opaque,
    /// Nothing within the draw distance
    Horizon,
    /// The column's ray couldn't be built; nothing is drawn
    Void,
}

impl From<Terminal> for HitCategory {
    fn from(terminal: Terminal) -> Self {
        match terminal {
            Terminal::Wall(material) => HitCategory::Wall(material),
            Terminal::BudgetExhausted | Terminal::IterationCap => HitCategory::Opaque,
            Terminal::OutOfRange => HitCategory::Horizon,
        }
    }
}

/// Palette, before shading
pub mod colors {
    pub const WALL: [f32; 3] = [1.0, 1.0, 1.0];
    pub const BRICK: [f32; 3] = [1.0, 0.0, 0.0];
    pub const MIRROR: [f32; 3] = [0.0, 1.0, 1.0];
    /// Unknown materials and the horizon
    pub const OTHER: [f32; 3] = [0.0, 1.0, 0.0];
    pub const CEILING: [f32; 3] = [0.2, 0.2, 0.2];
    pub const FLOOR: [f32; 3] = [0.4, 0.4, 0.4];
    /// Faces crossed on a horizontal grid line are drawn this much darker
    pub const Y_SIDE_DIM: f32 = 0.75;
}

/// One column's strip, ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub column: u32,
    /// Strip height in rows, never more than the screen height
    pub height: u32,
    /// First row of the strip
    pub top: u32,
    /// One past the last row of the strip
    pub bottom: u32,
    /// Brightness in `[min_brightness, 1]`
    pub shade: f64,
    /// Fisheye-corrected distance in cells
    pub distance: f64,
    pub category: HitCategory,
    pub bounces: u32,
    pub side: Side,
}

impl DrawCommand {
    /// An empty strip for a column that produced no chain
    pub fn void(column: u32, shading: &Shading) -> Self {
        Self {
            column,
            height: 0,
            top: 0,
            bottom: 0,
            shade: shading.min_brightness,
            distance: f64::INFINITY,
            category: HitCategory::Void,
            bounces: 0,
            side: Side::X,
        }
    }

    /// Shaded RGB colour of the strip
    pub fn color(&self) -> [f32; 3] {
        let base = match self.category {
            HitCategory::Wall(MaterialId::BOUNDARY) => colors::WALL,
            HitCategory::Wall(MaterialId::BRICK) => colors::BRICK,
            HitCategory::Wall(MaterialId::MIRROR) | HitCategory::Opaque => colors::MIRROR,
            HitCategory::Wall(_) | HitCategory::Horizon => colors::OTHER,
            HitCategory::Void => return colors::CEILING,
        };
        let side = match self.side {
            Side::X => 1.0,
            Side::Y => colors::Y_SIDE_DIM,
        };
        let k = self.shade as f32 * side;
        base.map(|c| c * k)
    }
}

/// Project a column's chain onto the screen
///
/// Uses the chain's whole path length, corrected for fisheye by the cosine
/// of the column's angle off the view axis.
pub fn project(chain: &ReflectionChain, column: u32, screen: &Screen, shading: &Shading) -> DrawCommand {
    let perceived = chain.cumulative_cells() * screen.column_angle(column).cos();
    let distance = perceived.max(MIN_PROJECT_DISTANCE);

    let screen_height = screen.height as f64;
    let height = (screen_height / distance).min(screen_height).round() as u32;
    let top = (screen.height - height) / 2;

    DrawCommand {
        column,
        height,
        top,
        bottom: top + height,
        shade: shading.shade(distance, chain.bounces()),
        distance,
        category: chain.terminal().into(),
        bounces: chain.bounces(),
        side: chain.last().side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::{Cell, LevelGrid, Ray, cast_column, cast_column_within};
    use glam::DVec2;
    use std::f64::consts::PI;

    /// Single-row corridor: wall, `len` empty cells, wall
    fn corridor(len: usize, cell_size: f64) -> LevelGrid {
        let mut row = vec![Cell::Empty; len + 2];
        row[0] = Cell::Wall(MaterialId::BOUNDARY);
        row[len + 1] = Cell::Wall(MaterialId::BRICK);
        LevelGrid::from_rows(&[row], cell_size).unwrap()
    }

    fn straight_shot(cells: usize) -> ReflectionChain {
        let grid = corridor(cells, 1.0);
        let ray = Ray::new(DVec2::new(1.0, 0.5), DVec2::X).unwrap();
        cast_column(&ray, &grid, 3)
    }

    #[test]
    fn test_centre_column_angle_is_zero() {
        let screen = Screen::new(5, 100, PI / 3.0);
        assert_eq!(screen.camera_x(2), 0.0);
        assert_eq!(screen.column_angle(2), 0.0);
        assert!((screen.column_angle(0) + screen.column_angle(4)).abs() < 1e-12);
    }

    #[test]
    fn test_strip_height_is_inverse_distance() {
        let screen = Screen::new(1, 600, PI / 3.0);
        let cmd = project(&straight_shot(4), 0, &screen, &Shading::default());
        assert_eq!(cmd.height, 150);
        assert_eq!(cmd.top, 225);
        assert_eq!(cmd.bottom, 375);
        assert_eq!(cmd.category, HitCategory::Wall(MaterialId::BRICK));
    }

    #[test]
    fn test_near_wall_is_clamped_to_screen() {
        let grid = corridor(2, 1.0);
        let ray = Ray::new(DVec2::new(2.999_999_9, 0.5), DVec2::X).unwrap();
        let chain = cast_column(&ray, &grid, 3);
        let screen = Screen::new(1, 480, PI / 3.0);
        let cmd = project(&chain, 0, &screen, &Shading::default());

        assert_eq!(cmd.height, 480);
        assert_eq!(cmd.top, 0);
        assert_eq!(cmd.distance, MIN_PROJECT_DISTANCE);
        assert!(cmd.shade <= 1.0);
    }

    #[test]
    fn test_fisheye_correction_shortens_off_axis() {
        let chain = straight_shot(4);
        let screen = Screen::new(9, 600, PI / 2.0);
        let centre = project(&chain, 4, &screen, &Shading::default());
        let edge = project(&chain, 0, &screen, &Shading::default());
        assert!(edge.distance < centre.distance);
        assert!((edge.distance - 4.0 * screen.column_angle(0).cos()).abs() < 1e-9);
    }

    #[test]
    fn test_far_wall_is_darker() {
        let screen = Screen::new(1, 600, PI / 3.0);
        let shading = Shading::default();
        let near = project(&straight_shot(2), 0, &screen, &shading);
        let far = project(&straight_shot(10), 0, &screen, &shading);
        assert!(far.shade < near.shade);
        assert!(far.height < near.height);
    }

    #[test]
    fn test_shade_is_monotonic_and_clamped() {
        let shading = Shading::default();
        let mut last = f64::INFINITY;
        for d in [0.05, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0] {
            let s = shading.shade(d, 0);
            assert!(s < last);
            last = s;
        }
        assert_eq!(shading.shade(1e9, 0), MIN_BRIGHTNESS);
        assert_eq!(shading.shade(0.0, 0), 1.0);
    }

    #[test]
    fn test_bounces_dim_the_shade() {
        let shading = Shading::default();
        assert!(shading.shade(2.0, 1) < shading.shade(2.0, 0));
        assert!(shading.shade(2.0, 3) < shading.shade(2.0, 1));
    }

    #[test]
    fn test_colors_follow_material() {
        let screen = Screen::new(1, 600, PI / 3.0);
        let cmd = project(&straight_shot(1), 0, &screen, &Shading::default());
        let [r, g, b] = cmd.color();
        assert!(r > 0.0 && g == 0.0 && b == 0.0);

        let opaque = DrawCommand {
            category: HitCategory::Opaque,
            side: Side::Y,
            ..cmd
        };
        let [r, g, b] = opaque.color();
        assert_eq!(r, 0.0);
        assert!(g > 0.0 && g == b);
        assert!(g < cmd.shade as f32);
    }

    #[test]
    fn test_out_of_range_projects_at_draw_distance() {
        let grid = corridor(30, 1.0);
        let ray = Ray::new(DVec2::new(1.0, 0.5), DVec2::X).unwrap();
        let chain = cast_column_within(&ray, &grid, 3, 20.0);
        let screen = Screen::new(1, 600, PI / 3.0);
        let cmd = project(&chain, 0, &screen, &Shading::default());

        assert_eq!(cmd.category, HitCategory::Horizon);
        assert_eq!(cmd.height, 30);
        assert_eq!(cmd.color()[1], cmd.shade as f32);
        assert_eq!(cmd.color()[0], 0.0);
    }

    #[test]
    fn test_void_draws_nothing() {
        let cmd = DrawCommand::void(7, &Shading::default());
        assert_eq!(cmd.height, 0);
        assert_eq!(cmd.category, HitCategory::Void);
        assert_eq!(cmd.color(), colors::CEILING);
    }
}
