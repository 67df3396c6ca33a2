use std::fmt;
use std::mem;
use std::ops::ControlFlow;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::debug;
use tracing::trace;

use crate::PatternOffset;
use crate::cell::Cell;
use crate::config::Boundary;
use crate::config::GridConfig;
use crate::parse_rle;
use crate::parse_rle::RleError;
use crate::pattern::Pattern;
use crate::render;
use crate::render::Glyphs;
use crate::render::Swatch;
use crate::rule_set::RuleSet;

/// Bytes per pixel in the exported buffer
pub const PIXEL_SIZE: usize = 4;

/// Offsets of the 8 cells surrounding a cell, as `(row, column)` deltas
const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid dimensions {width}x{height}: both must be non-zero and the pixel buffer must fit in memory")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Cell ({row}, {column}) is outside of the {width}x{height} grid")]
    OutOfRange {
        row: i64,
        column: i64,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read RLE: {0}")]
    Rle(#[from] RleError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("RLE has no `x = .., y = ..` header to size the grid from")]
    MissingHeader,
}

/// A fixed-size grid of cells, stored row-major, together with its RGBA pixel rendering.
///
/// The pixel buffer is repainted by every call that changes a cell, so [`Grid::pixels`] is
/// always current. A slice returned by it borrows the grid, which means it cannot outlive the
/// next mutating call.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,

    /// Current generation
    cells: Vec<Cell>,

    /// Scratch buffer the next generation is computed into, then swapped with `cells`
    next: Vec<Cell>,

    /// `PIXEL_SIZE` bytes per cell, same order as `cells`
    pixels: Vec<u8>,

    generation: u64,

    config: GridConfig,
}

impl Grid {
    /// Create a grid with every cell dead and the default configuration
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        Self::with_config(width, height, GridConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: GridConfig) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDimensions { width, height };

        if width == 0 || height == 0 {
            return Err(invalid);
        }

        // The pixel buffer is the largest allocation, so if it fits the cell buffers do too.
        let Some(len) = (width as usize).checked_mul(height as usize) else {
            return Err(invalid);
        };
        let Some(bytes) = len.checked_mul(PIXEL_SIZE) else {
            return Err(invalid);
        };
        if bytes > isize::MAX as usize {
            return Err(invalid);
        }

        let dead = config.palette.dead.to_bytes();
        let pixels = dead.iter().copied().cycle().take(bytes).collect();

        debug!(width, height, rule = %config.rule, boundary = ?config.boundary, "new grid");

        Ok(Self {
            width,
            height,
            cells: vec![Cell::Dead; len],
            next: vec![Cell::Dead; len],
            pixels,
            generation: 0,
            config,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of times [`Grid::step`] has been called
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The RGBA pixel buffer: `width * height * 4` bytes, four per cell, in row-major order.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Position of `(row, column)` in [`Grid::cells`]. Multiply by [`PIXEL_SIZE`] for the
    /// position in [`Grid::pixels`].
    pub fn index(&self, row: u32, column: u32) -> Result<usize, GridError> {
        self.checked_index(row.into(), column.into())
    }

    fn checked_index(&self, row: i64, column: i64) -> Result<usize, GridError> {
        let (width, height) = (i64::from(self.width), i64::from(self.height));

        if !(0..height).contains(&row) || !(0..width).contains(&column) {
            return Err(GridError::OutOfRange {
                row,
                column,
                width: self.width,
                height: self.height,
            });
        }

        Ok((row * width + column) as usize)
    }

    pub fn get(&self, row: u32, column: u32) -> Result<Cell, GridError> {
        let i = self.index(row, column)?;

        Ok(self.cells[i])
    }

    /// Colour of a single cell, as stored in the pixel buffer
    pub fn pixel(&self, row: u32, column: u32) -> Result<[u8; 4], GridError> {
        let i = self.index(row, column)? * PIXEL_SIZE;

        let mut px = [0; 4];
        px.copy_from_slice(&self.pixels[i..i + PIXEL_SIZE]);

        Ok(px)
    }

    pub fn set(&mut self, row: u32, column: u32, cell: Cell) -> Result<(), GridError> {
        let i = self.index(row, column)?;
        self.paint(i, cell);

        Ok(())
    }

    /// Flip a cell, returning its new state
    pub fn toggle(&mut self, row: u32, column: u32) -> Result<Cell, GridError> {
        let i = self.index(row, column)?;
        let cell = self.cells[i].toggled();
        self.paint(i, cell);

        Ok(cell)
    }

    /// Kill every cell. The generation counter is left alone.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Dead);
        self.repaint();
    }

    pub fn set_rule(&mut self, rule: RuleSet) {
        self.config.rule = rule;
    }

    pub fn set_boundary(&mut self, boundary: Boundary) {
        self.config.boundary = boundary;
    }

    /// Advance the grid by one generation.
    ///
    /// Every new cell is computed from the previous generation only, so the order cells are
    /// visited in does not matter.
    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);

        for row in 0..height {
            for column in 0..width {
                let i = self.offset(row, column);
                let live = self.count_neighbors(row, column);

                self.next[i] = self.config.rule.next(self.cells[i], live);
            }
        }

        mem::swap(&mut self.cells, &mut self.next);
        self.generation += 1;
        self.repaint();

        trace!(generation = self.generation, population = self.population(), "step");
    }

    pub fn step_n(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Count the live cells around `(row, column)` under the configured boundary policy
    pub fn live_neighbors(&self, row: u32, column: u32) -> Result<u8, GridError> {
        self.index(row, column)?;

        Ok(self.count_neighbors(row, column))
    }

    fn count_neighbors(&self, row: u32, column: u32) -> u8 {
        let (width, height) = (i64::from(self.width), i64::from(self.height));

        let mut count = 0;

        for (dr, dc) in NEIGHBORS {
            let (r, c) = (i64::from(row) + dr, i64::from(column) + dc);

            let (r, c) = match self.config.boundary {
                Boundary::Wrap => (r.rem_euclid(height), c.rem_euclid(width)),
                Boundary::Clamp => {
                    if !(0..height).contains(&r) || !(0..width).contains(&c) {
                        continue;
                    }

                    (r, c)
                }
            };

            if self.cells[(r * width + c) as usize].is_alive() {
                count += 1;
            }
        }

        count
    }

    /// Text rendering with the configured glyphs: one line per row, one glyph per cell.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn render_with(&self, glyphs: Glyphs) -> String {
        render::render_glyphs(&self.cells, self.width as usize, glyphs)
    }

    /// Denser text rendering packing 2x4 cells into each braille character
    pub fn render_braille(&self) -> String {
        render::render_braille(&self.cells, self.width as usize)
    }

    /// Colour-matched text rendering: each cell becomes the swatch symbol nearest to its pixel
    /// colour. `None` when `swatches` is empty.
    pub fn render_nearest(&self, swatches: &[Swatch<'_>]) -> Option<String> {
        render::render_nearest(&self.pixels, self.width as usize, swatches)
    }

    /// Set every cell along the line from `from` to `to` alive. Both ends are `(row, column)`
    /// and are included.
    pub fn draw_line(&mut self, from: (u32, u32), to: (u32, u32)) -> Result<(), GridError> {
        self.index(from.0, from.1)?;
        self.index(to.0, to.1)?;

        let (mut r, mut c) = (i64::from(from.0), i64::from(from.1));
        let (r1, c1) = (i64::from(to.0), i64::from(to.1));

        // Bresenham, all octants
        let dc = (c1 - c).abs();
        let dr = -(r1 - r).abs();
        let sc = if c < c1 { 1 } else { -1 };
        let sr = if r < r1 { 1 } else { -1 };
        let mut err = dc + dr;

        loop {
            let i = self.checked_index(r, c)?;
            self.paint(i, Cell::Alive);

            if r == r1 && c == c1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dr {
                err += dr;
                c += sc;
            }
            if e2 <= dc {
                err += dc;
                r += sr;
            }
        }

        Ok(())
    }

    /// Set every cell on the border of the grid alive
    pub fn draw_outline(&mut self) {
        let (w, h) = (self.width - 1, self.height - 1);

        for column in 0..=w {
            self.paint(column as usize, Cell::Alive);
            self.paint(self.offset(h, column), Cell::Alive);
        }

        for row in 0..=h {
            self.paint(self.offset(row, 0), Cell::Alive);
            self.paint(self.offset(row, w), Cell::Alive);
        }
    }

    /// Stamp `pattern` with its top-left corner at `(row, column)`.
    ///
    /// Nothing is written unless every cell of the pattern lands inside the grid.
    pub fn place(&mut self, pattern: &Pattern, row: u32, column: u32) -> Result<(), GridError> {
        let (row, column) = (i64::from(row), i64::from(column));

        let cells = pattern
            .cells
            .iter()
            .map(|&(r, c)| (row + i64::from(r), column + i64::from(c)));

        self.set_alive_all(cells)
    }

    /// Stamp an RLE pattern with its origin at `(row, column)`, with the same all-or-nothing
    /// behaviour as [`Grid::place`]. Returns the parsed file metadata; a rule in the file is not
    /// applied.
    pub fn load_rle<'a>(
        &mut self,
        bytes: &'a [u8],
        row: u32,
        column: u32,
    ) -> Result<parse_rle::RleFile<'a>, LoadError> {
        let (row, column) = (i64::from(row), i64::from(column));

        self.stamp_rle(bytes, |x, y| (row.saturating_add(y), column.saturating_add(x)))
    }

    /// Build a grid sized by the header of an RLE pattern and load the pattern into it. A rule
    /// given by the file replaces the one in `config`.
    pub fn from_rle(bytes: &[u8], config: GridConfig) -> Result<Self, LoadError> {
        // Metadata and header only, the body is read once the grid exists
        let file = parse_rle::read_rle_until(bytes, |_, _| ControlFlow::Break(()))?;

        let Some((width, height)) = file.size else {
            return Err(LoadError::MissingHeader);
        };

        let config = match file.rule {
            Some(rule) => config.with_rule(rule),
            None => config,
        };

        let mut grid = Self::with_config(width, height, config)?;

        // Offsets position a pattern in an unbounded plane, here the grid is the pattern's frame
        let (dx, dy) = file.offset.unwrap_or_default();
        grid.stamp_rle(bytes, |x, y| (y - dy, x - dx))?;

        Ok(grid)
    }

    /// Read an RLE body, mapping each live `(x, y)` to a `(row, column)` with `at`. Cells are
    /// validated as they are read and nothing is written unless all of them land in the grid.
    fn stamp_rle<'a, P>(
        &mut self,
        bytes: &'a [u8],
        at: P,
    ) -> Result<parse_rle::RleFile<'a>, LoadError>
    where
        P: Fn(PatternOffset, PatternOffset) -> (PatternOffset, PatternOffset),
    {
        let mut indices = Vec::new();
        let mut outside = None;

        let file = parse_rle::read_rle_until(bytes, |x, y| {
            let (r, c) = at(x, y);

            match self.checked_index(r, c) {
                Ok(i) => {
                    indices.push(i);
                    ControlFlow::Continue(())
                }
                Err(e) => {
                    outside = Some(e);
                    ControlFlow::Break(())
                }
            }
        })?;

        if let Some(e) = outside {
            return Err(e.into());
        }

        for i in indices {
            self.paint(i, Cell::Alive);
        }

        Ok(file)
    }

    /// Fill the grid pseudo-randomly. Each cell is alive with probability `density`, clamped to
    /// `[0, 1]`. The same seed always produces the same grid.
    pub fn fill_random(&mut self, seed: u64, density: f64) {
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for cell in self.cells.iter_mut() {
            *cell = Cell::from(rng.gen_bool(density));
        }

        self.repaint();

        debug!(seed, density, population = self.population(), "random fill");
    }

    fn set_alive_all<I>(&mut self, cells: I) -> Result<(), GridError>
    where
        I: IntoIterator<Item = (PatternOffset, PatternOffset)>,
    {
        let indices = cells
            .into_iter()
            .map(|(r, c)| self.checked_index(r, c))
            .collect::<Result<Vec<_>, _>>()?;

        for i in indices {
            self.paint(i, Cell::Alive);
        }

        Ok(())
    }

    fn offset(&self, row: u32, column: u32) -> usize {
        (row as usize) * (self.width as usize) + column as usize
    }

    fn paint(&mut self, i: usize, cell: Cell) {
        self.cells[i] = cell;

        let px = self.config.palette.color(cell).to_bytes();
        self.pixels[i * PIXEL_SIZE..(i + 1) * PIXEL_SIZE].copy_from_slice(&px);
    }

    fn repaint(&mut self) {
        let palette = self.config.palette;

        for (&cell, px) in self.cells.iter().zip(self.pixels.chunks_exact_mut(PIXEL_SIZE)) {
            px.copy_from_slice(&palette.color(cell).to_bytes());
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(self.config.glyphs))
    }
}
