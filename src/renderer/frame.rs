//! Whole-frame assembly
//!
//! Columns only read the grid and the player snapshot, so they can be cast in
//! any order; the output is always in left-to-right column order.

use super::projector::{DrawCommand, Screen, Shading, project};
use crate::cast::{LevelGrid, cast_column_within};
use crate::player::Player;

/// Everything besides the level and camera needed to draw a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub screen: Screen,
    pub max_bounces: u32,
    /// Draw distance in cells
    pub max_depth: f64,
    pub shading: Shading,
}

/// One draw command per screen column
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    screen: Screen,
    commands: Vec<DrawCommand>,
}

impl Frame {
    #[inline]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Left to right, `screen.width` long
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn column(&self, column: u32) -> Option<&DrawCommand> {
        self.commands.get(column as usize)
    }
}

/// Cast and project a single column
pub fn render_column(grid: &LevelGrid, player: &Player, params: &FrameParams, column: u32) -> DrawCommand {
    match player.column_ray(column, &params.screen) {
        Ok(ray) => {
            let chain = cast_column_within(&ray, grid, params.max_bounces, params.max_depth);
            project(&chain, column, &params.screen, &params.shading)
        }
        Err(err) => {
            log::warn!("column {column} skipped: {err}");
            DrawCommand::void(column, &params.shading)
        }
    }
}

/// Draw every column of one frame
#[cfg(feature = "parallel")]
pub fn render_frame(grid: &LevelGrid, player: &Player, params: &FrameParams) -> Frame {
    use rayon::iter::{IntoParallelIterator as _, ParallelIterator as _};

    let commands = (0..params.screen.width)
        .into_par_iter()
        .map(|column| render_column(grid, player, params, column))
        .collect();

    Frame {
        screen: params.screen,
        commands,
    }
}

/// Draw every column of one frame
#[cfg(not(feature = "parallel"))]
pub fn render_frame(grid: &LevelGrid, player: &Player, params: &FrameParams) -> Frame {
    let commands = (0..params.screen.width)
        .map(|column| render_column(grid, player, params, column))
        .collect();

    Frame {
        screen: params.screen,
        commands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_DEPTH;
    use crate::level::Level;
    use crate::renderer::HitCategory;
    use glam::DVec2;
    use std::f64::consts::PI;

    fn params(width: u32) -> FrameParams {
        FrameParams {
            screen: Screen::new(width, 60, PI / 3.0),
            max_bounces: 3,
            max_depth: MAX_DEPTH,
            shading: Shading::default(),
        }
    }

    #[test]
    fn test_far_columns_stop_at_draw_distance() {
        let level = Level::builtin();
        let p = FrameParams {
            max_depth: 2.0,
            ..params(32)
        };
        let frame = render_frame(&level.grid, &level.player, &p);
        // the east wall is 9.5 cells down the corridor from (1.5, 1.5)
        let cmd = frame.column(16).unwrap();
        assert_eq!(cmd.category, HitCategory::Horizon);
        assert!(frame.commands().iter().all(|c| c.distance <= 2.0 + 1e-9));
    }

    #[test]
    fn test_one_command_per_column_in_order() {
        let level = Level::builtin();
        let frame = render_frame(&level.grid, &level.player, &params(64));

        assert_eq!(frame.commands().len(), 64);
        for (i, cmd) in frame.commands().iter().enumerate() {
            assert_eq!(cmd.column, i as u32);
            assert!(cmd.height <= 60);
            assert_ne!(cmd.category, HitCategory::Void);
        }
        assert!(frame.column(64).is_none());
    }

    #[test]
    fn test_matches_column_by_column() {
        let level = Level::builtin();
        let player = Player::new(DVec2::new(5.5, 4.5), -1.2);
        let p = params(97);
        let frame = render_frame(&level.grid, &player, &p);
        let expected: Vec<DrawCommand> = (0..97)
            .map(|c| render_column(&level.grid, &player, &p, c))
            .collect();
        assert_eq!(frame.commands(), expected.as_slice());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_frame_equals_serial() {
        let level = Level::builtin();
        let p = params(321);
        for angle in [-2.5, -1.2, 0.0, 0.7, 2.9] {
            let player = Player::new(DVec2::new(5.5, 4.5), angle);
            let parallel = render_frame(&level.grid, &player, &p);

            let mut serial = Vec::with_capacity(p.screen.width as usize);
            for column in 0..p.screen.width {
                serial.push(render_column(&level.grid, &player, &p, column));
            }
            assert_eq!(parallel.commands(), serial.as_slice());
        }
    }

    #[test]
    fn test_broken_camera_gives_void_columns() {
        let level = Level::builtin();
        let player = Player {
            position: DVec2::new(1.5, 1.5),
            angle: f64::NAN,
        };
        let frame = render_frame(&level.grid, &player, &params(8));
        assert_eq!(frame.commands().len(), 8);
        assert!(frame.commands().iter().all(|c| c.category == HitCategory::Void));
    }

    #[test]
    fn test_zero_width_screen_is_empty() {
        let level = Level::builtin();
        let frame = render_frame(&level.grid, &level.player, &params(0));
        assert!(frame.commands().is_empty());
    }
}
