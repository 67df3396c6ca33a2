//! A fixed-size cellular automaton grid that paints itself into an RGBA pixel buffer, ready to
//! be blitted onto a canvas.
//!
//! ```
//! use pixel_life::cell::Cell;
//! use pixel_life::grid::Grid;
//!
//! let mut grid = Grid::new(20, 20)?;
//! grid.set(1, 0, Cell::Alive)?;
//! grid.step();
//!
//! assert_eq!(grid.pixels().len(), 20 * 20 * 4);
//! # Ok::<(), pixel_life::grid::GridError>(())
//! ```

pub mod cell;
pub mod color;
pub mod config;
pub mod grid;
pub mod parse_rle;
pub mod pattern;
pub mod render;
pub mod rule_set;

mod parse_util;

#[cfg(feature = "wasm")]
pub mod wasm;

/// Signed cell coordinate, used where patterns may be positioned relative to a point.
pub type PatternOffset = i64;

pub use cell::Cell;
pub use config::Boundary;
pub use config::GridConfig;
pub use grid::Grid;
pub use grid::GridError;
pub use rule_set::RuleSet;
