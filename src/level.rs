//! Level files
//!
//! A level is a JSON document:
//!
//! ```json
//! {
//!     "grid": [[1, 1, 1], [1, 0, 1], [1, 1, 1]],
//!     "mirrors": [{ "x": 1, "y": 0, "orientation": "vertical" }],
//!     "player": { "x": 1.5, "y": 1.5, "angle": 0 },
//!     "cell_size": 1.0
//! }
//! ```
//!
//! Tile `0` is empty floor and any other value is a wall of that material,
//! unless the tile is listed under `mirrors`. `player` and `cell_size` are
//! optional; player coordinates are in world units, and a missing player
//! starts in cell (1, 1) facing east.

use std::path::{Path, PathBuf};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::cast::{Cell, GridError, LevelGrid, MaterialId, MirrorOrientation};
use crate::consts::CELL_SIZE;
use crate::player::Player;

/// Reasons a level can't be loaded
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level JSON")]
    Json(#[from] serde_json::Error),
    #[error("mirror at ({x}, {y}) is outside the {width}x{height} grid")]
    MirrorOutOfBounds { x: u32, y: u32, width: u32, height: u32 },
    #[error("mirror at ({x}, {y}) sits on an empty tile")]
    MirrorOnEmptyTile { x: u32, y: u32 },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// On-disk layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelFile {
    grid: Vec<Vec<u8>>,
    #[serde(default)]
    mirrors: Vec<MirrorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    player: Option<PlayerSpec>,
    #[serde(default = "default_cell_size")]
    cell_size: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct MirrorSpec {
    x: u32,
    y: u32,
    orientation: MirrorOrientation,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PlayerSpec {
    x: f64,
    y: f64,
    #[serde(default)]
    angle: f64,
}

fn default_cell_size() -> f64 {
    CELL_SIZE
}

/// The level shipped with the binary
const BUILTIN_LEVEL: &str = r#"{
    "grid": [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 1, 3, 1, 0, 0, 1, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 1],
        [1, 0, 0, 2, 0, 0, 0, 0, 1, 0, 0, 1],
        [1, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 2, 0, 0, 1, 3, 1, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]
    ],
    "mirrors": [
        { "x": 4, "y": 3, "orientation": "vertical" },
        { "x": 8, "y": 5, "orientation": "horizontal" },
        { "x": 7, "y": 8, "orientation": "vertical" }
    ],
    "player": { "x": 1.5, "y": 1.5, "angle": 0 }
}"#;

/// A validated grid plus where the camera starts
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub grid: LevelGrid,
    pub player: Player,
}

impl Level {
    /// Parse and validate a level document
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;
        file.try_into()
    }

    /// Load a level file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded {}x{} level from {}",
            level.grid.width(),
            level.grid.height(),
            path.display()
        );
        Ok(level)
    }

    /// 12x12 level with three mirrors, starting in the top-left corner
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_LEVEL).expect("built-in level is valid")
    }

    /// Serialize back to the level file format
    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(&LevelFile::from(self))?)
    }
}

impl TryFrom<LevelFile> for Level {
    type Error = LevelError;

    fn try_from(file: LevelFile) -> Result<Self, Self::Error> {
        let height = file.grid.len() as u32;
        let width = file.grid.first().map(Vec::len).unwrap_or(0) as u32;

        let mut rows: Vec<Vec<Cell>> = file
            .grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&tile| match tile {
                        0 => Cell::Empty,
                        t => Cell::Wall(MaterialId(t)),
                    })
                    .collect()
            })
            .collect();

        for m in &file.mirrors {
            let cell = rows
                .get_mut(m.y as usize)
                .and_then(|row| row.get_mut(m.x as usize))
                .ok_or(LevelError::MirrorOutOfBounds {
                    x: m.x,
                    y: m.y,
                    width,
                    height,
                })?;
            if cell.is_empty() {
                return Err(LevelError::MirrorOnEmptyTile { x: m.x, y: m.y });
            }
            *cell = Cell::Mirror(m.orientation);
        }

        let grid = LevelGrid::from_rows(&rows, file.cell_size)?;
        let player = match file.player {
            Some(p) => Player::new(DVec2::new(p.x, p.y), p.angle),
            // same cell as the default player at unit scale
            None => {
                let default = Player::default();
                Player::new(default.position * grid.cell_size(), default.angle)
            }
        };

        Ok(Self { grid, player })
    }
}

impl From<&Level> for LevelFile {
    fn from(level: &Level) -> Self {
        let width = level.grid.width() as usize;
        let mut grid = vec![vec![0u8; width]; level.grid.height() as usize];
        let mut mirrors = Vec::new();

        for (pos, cell) in level.grid.cells() {
            let (x, y) = (pos.x as usize, pos.y as usize);
            grid[y][x] = match cell {
                Cell::Empty => 0,
                Cell::Wall(material) => material.0,
                Cell::Mirror(orientation) => {
                    mirrors.push(MirrorSpec {
                        x: x as u32,
                        y: y as u32,
                        orientation,
                    });
                    MaterialId::MIRROR.0
                }
            };
        }

        Self {
            grid,
            mirrors,
            player: Some(PlayerSpec {
                x: level.player.position.x,
                y: level.player.position.y,
                angle: level.player.angle,
            }),
            cell_size: level.grid.cell_size(),
        }
    }
}
