use crate::color::Palette;
use crate::render::Glyphs;
use crate::rule_set::RuleSet;

/// What happens to neighbour lookups that fall off the edge of the grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The grid is a torus: the row above row `0` is row `height - 1`, and likewise for columns.
    ///
    /// On grids narrower than 3 cells the same neighbour can be reached through more than one
    /// offset, and is counted once per offset.
    #[default]
    Wrap,

    /// Cells past the edge do not exist, so edge cells have fewer neighbours.
    Clamp,
}

/// Everything about a [`Grid`](crate::grid::Grid) that is not its size or its cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub rule: RuleSet,
    pub boundary: Boundary,
    pub palette: Palette,
    pub glyphs: Glyphs,
}

impl GridConfig {
    pub fn with_rule(mut self, rule: RuleSet) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }
}
