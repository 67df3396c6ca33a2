//! JavaScript bindings.
//!
//! The host reads pixels straight out of linear memory:
//!
//! ```js
//! const universe = new Universe(20, 20);
//! const pixels = new Uint8ClampedArray(memory.buffer, universe.pixels(), universe.width() * universe.height() * 4);
//! ctx.putImageData(new ImageData(pixels, universe.width(), universe.height()), 0, 0);
//! ```
//!
//! That view aliases memory owned by the universe. It is stale after any call that mutates the
//! universe, and may be detached entirely if memory grows, so it has to be rebuilt after each
//! `step`, `toggle` or `fillRandom`.

use wasm_bindgen::prelude::*;

use crate::cell::Cell;
use crate::grid::Grid;
use crate::render::HEARTS;
use crate::rule_set::RuleSet;

#[wasm_bindgen]
pub struct Universe {
    grid: Grid,
}

#[wasm_bindgen]
impl Universe {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Result<Universe, JsError> {
        Ok(Self {
            grid: Grid::new(width, height)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn generation(&self) -> u64 {
        self.grid.generation()
    }

    /// Pointer to the first byte of the RGBA buffer in linear memory
    pub fn pixels(&self) -> *const u8 {
        self.grid.pixels().as_ptr()
    }

    /// Owned copy of the RGBA buffer, safe to keep across mutations
    #[wasm_bindgen(js_name = pixelsCopy)]
    pub fn pixels_copy(&self) -> Vec<u8> {
        self.grid.pixels().to_vec()
    }

    pub fn step(&mut self) {
        self.grid.step();
    }

    /// Returns whether the cell is alive afterwards
    pub fn toggle(&mut self, row: u32, column: u32) -> Result<bool, JsError> {
        let cell = self.grid.toggle(row, column)?;

        Ok(cell == Cell::Alive)
    }

    #[wasm_bindgen(js_name = fillRandom)]
    pub fn fill_random(&mut self, seed: u64, density: f64) {
        self.grid.fill_random(seed, density);
    }

    #[wasm_bindgen(js_name = setRule)]
    pub fn set_rule(&mut self, rule: &str) -> Result<(), JsError> {
        let rule: RuleSet = rule.parse()?;
        self.grid.set_rule(rule);

        Ok(())
    }

    pub fn render(&self) -> String {
        self.grid.render()
    }

    /// Each cell as the coloured heart closest to its pixel
    #[wasm_bindgen(js_name = renderHearts)]
    pub fn render_hearts(&self) -> String {
        self.grid.render_nearest(HEARTS).unwrap_or_default()
    }
}
