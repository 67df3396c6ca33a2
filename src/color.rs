use crate::cell::Cell;

/// A straight (non-premultiplied) RGBA colour, laid out the way a canvas `ImageData` expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, u8::MAX)
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_bytes([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }

    /// Composite this colour over an opaque `background`, dropping the alpha channel.
    ///
    /// Terminals and most image formats cannot show transparency, so this is what a pixel looks
    /// like once it lands on a surface of colour `background`.
    pub fn over(self, background: Rgba) -> [u8; 3] {
        let a = self.a as f32 / 255.0;

        let f = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;

        [
            f(self.r, background.r),
            f(self.g, background.g),
            f(self.b, background.b),
        ]
    }
}

/// Maps cell states to pixel colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub alive: Rgba,
    pub dead: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            alive: Rgba::BLACK,
            dead: Rgba::WHITE,
        }
    }
}

impl Palette {
    pub const fn color(&self, cell: Cell) -> Rgba {
        match cell {
            Cell::Alive => self.alive,
            Cell::Dead => self.dead,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Palette;
    use super::Rgba;
    use crate::cell::Cell;

    #[test]
    fn default_palette() {
        let palette = Palette::default();

        assert_eq!(palette.color(Cell::Alive).to_bytes(), [0, 0, 0, 255]);
        assert_eq!(palette.color(Cell::Dead).to_bytes(), [255, 255, 255, 255]);
    }

    #[test]
    fn opaque_over_anything_is_itself() {
        let red = Rgba::opaque(255, 0, 0);

        assert_eq!(red.over(Rgba::WHITE), [255, 0, 0]);
        assert_eq!(red.over(Rgba::BLACK), [255, 0, 0]);
    }

    #[test]
    fn transparent_shows_background() {
        let clear = Rgba::new(10, 20, 30, 0);

        assert_eq!(clear.over(Rgba::WHITE), [255, 255, 255]);
    }

    #[test]
    fn half_alpha_blends() {
        let black = Rgba::new(0, 0, 0, 128);

        // 255 * (1 - 128/255) = 127
        assert_eq!(black.over(Rgba::WHITE), [127, 127, 127]);
    }
}
