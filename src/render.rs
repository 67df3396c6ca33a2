use crate::cell::Cell;
use crate::color::Rgba;
use crate::grid::PIXEL_SIZE;

/// Hex values of braille dots
///
/// ```text
///      1   8
///      2  10
///      4  20
///     40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// The pair of characters used to draw cells as text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub alive: char,
    pub dead: char,
}

impl Glyphs {
    pub const BLOCKS: Glyphs = Glyphs {
        alive: '■',
        dead: '□',
    };

    pub const ASCII: Glyphs = Glyphs {
        alive: '#',
        dead: '.',
    };

    pub const fn glyph(&self, cell: Cell) -> char {
        match cell {
            Cell::Alive => self.alive,
            Cell::Dead => self.dead,
        }
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Self::BLOCKS
    }
}

/// A symbol and the opaque colour it stands for. Symbols are strings so emoji made of several
/// code points fit.
pub type Swatch<'a> = (&'a str, [u8; 3]);

/// Coloured hearts, for drawing a grid with custom palettes as emoji.
pub const HEARTS: &[Swatch<'static>] = &[
    ("\u{2764}\u{FE0F}", [255, 0, 0]),
    ("\u{1F49B}", [255, 255, 0]),
    ("\u{1F49A}", [0, 255, 0]),
    ("\u{1F499}", [0, 0, 255]),
    ("\u{1F49C}", [128, 0, 128]),
    ("\u{1F5A4}", [0, 0, 0]),
    ("\u{1F90D}", [255, 255, 255]),
    ("\u{1F494}", [255, 105, 180]),
    ("\u{2763}\u{FE0F}", [255, 192, 203]),
    ("\u{1F495}", [255, 20, 147]),
    ("\u{1F49E}", [255, 182, 193]),
    ("\u{1F493}", [255, 160, 122]),
    ("\u{1F9E1}", [255, 165, 0]),
    ("\u{1F90E}", [139, 69, 19]),
];

/// One glyph per cell, one line per row. Every line, including the last, ends in `\n`.
pub(crate) fn render_glyphs(cells: &[Cell], width: usize, glyphs: Glyphs) -> String {
    let glyph_len = glyphs.alive.len_utf8().max(glyphs.dead.len_utf8());
    let mut s = String::with_capacity(cells.len() * glyph_len + cells.len() / width);

    for row in cells.chunks(width) {
        s.extend(row.iter().map(|&c| glyphs.glyph(c)));
        s.push('\n');
    }

    s
}

/// Packs the cells into braille characters, each covering 2 columns and 4 rows.
///
/// Let `w` and `h` refer to width and height of the cell buffer. Then `bw = ceil(w / 2)` and
/// `bh = ceil(h / 4)` are the width and height of the output in braille characters, not
/// accounting for the trailing newline on each line.
pub(crate) fn render_braille(cells: &[Cell], width: usize) -> String {
    let height = cells.len() / width;
    let (bw, bh) = (width.div_ceil(2), height.div_ceil(4));

    // compute codepoints
    let mut cp = vec![0u8; bw * bh];

    for (n, c) in cells.iter().enumerate() {
        if !c.is_alive() {
            continue;
        }

        let (x, y) = (n % width, n / width);
        cp[(y / 4) * bw + (x / 2)] |= dot(x, y);
    }

    // Each braille character is 3 bytes, and newlines one byte.
    let mut fb = String::with_capacity(3 * (bw * bh) + bh);

    for line in cp.chunks(bw) {
        for &bits in line {
            fb.push(char::from_u32(BRAILLE_EMPTY + bits as u32).unwrap_or(' '));
        }
        fb.push('\n');
    }

    fb
}

/// One swatch symbol per pixel: the one closest in colour to the pixel once it is composited
/// over white. Ties go to the earlier swatch. `None` when there are no swatches.
pub(crate) fn render_nearest(
    pixels: &[u8],
    width: usize,
    swatches: &[Swatch<'_>],
) -> Option<String> {
    if swatches.is_empty() {
        return None;
    }

    let mut s = String::with_capacity(pixels.len());

    for row in pixels.chunks_exact(width * PIXEL_SIZE) {
        for px in row.chunks_exact(PIXEL_SIZE) {
            let px = <[u8; 4]>::try_from(px).ok()?;
            let rgb = Rgba::from_bytes(px).over(Rgba::WHITE);

            let (symbol, _) = swatches.iter().min_by_key(|(_, c)| distance(*c, rgb))?;
            s.push_str(symbol);
        }

        s.push('\n');
    }

    Some(s)
}

/// Squared euclidean distance in RGB space
fn distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(&a, b)| u32::from(a.abs_diff(b)).pow(2))
        .sum()
}

fn dot(x: usize, y: usize) -> u8 {
    match (x % 2, y % 4) {
        (0, 0) => 0x1,
        (1, 0) => 0x8,
        (0, 1) => 0x2,
        (1, 1) => 0x10,
        (0, 2) => 0x4,
        (1, 2) => 0x20,
        (0, 3) => 0x40,
        (1, 3) => 0x80,
        _ => unreachable!(),
    }
}
