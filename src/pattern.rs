/// A named arrangement of live cells, given as `(row, column)` pairs relative to its top-left
/// corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(u32, u32)],
}

impl Pattern {
    /// Look up a built-in pattern by name, ignoring case.
    pub fn find(name: &str) -> Option<&'static Pattern> {
        PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Number of columns spanned by the pattern
    pub fn width(&self) -> u32 {
        self.cells.iter().map(|&(_, c)| c + 1).max().unwrap_or(0)
    }

    /// Number of rows spanned by the pattern
    pub fn height(&self) -> u32 {
        self.cells.iter().map(|&(r, _)| r + 1).max().unwrap_or(0)
    }
}

pub const BLOCK: Pattern = Pattern {
    name: "block",
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
};

/// Period 2 oscillator, horizontal phase
pub const BLINKER: Pattern = Pattern {
    name: "blinker",
    cells: &[(0, 0), (0, 1), (0, 2)],
};

pub const TOAD: Pattern = Pattern {
    name: "toad",
    cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
};

pub const BEACON: Pattern = Pattern {
    name: "beacon",
    cells: &[(0, 0), (0, 1), (1, 0), (2, 3), (3, 2), (3, 3)],
};

/// Travels one cell down and one cell right every 4 generations.
pub const GLIDER: Pattern = Pattern {
    name: "glider",
    cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
};

pub const R_PENTOMINO: Pattern = Pattern {
    name: "r-pentomino",
    cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
};

pub const PATTERNS: &[Pattern] = &[BLOCK, BLINKER, TOAD, BEACON, GLIDER, R_PENTOMINO];

#[cfg(test)]
mod test {
    use super::GLIDER;
    use super::Pattern;

    #[test]
    fn find_ignores_case() {
        assert_eq!(Pattern::find("Glider"), Some(&GLIDER));
        assert_eq!(Pattern::find("R-PENTOMINO").map(|p| p.name), Some("r-pentomino"));
        assert_eq!(Pattern::find("gosper"), None);
    }

    #[test]
    fn bounding_box() {
        let beacon = Pattern::find("beacon").unwrap();

        assert_eq!((beacon.width(), beacon.height()), (4, 4));
        assert_eq!((GLIDER.width(), GLIDER.height()), (3, 3));
    }
}
