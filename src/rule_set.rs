use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::cell::Cell;
use crate::parse_util;

/// Conway's Game of Life: born with 3 neighbours, survives with 2 or 3.
pub const B3S23: RuleSet = RuleSet::new(1 << 3, 1 << 2 | 1 << 3);

/// Mask of the neighbour counts 0 through 8
const COUNTS: u16 = 0x1FF;

/// An outer totalistic rule in birth/survival form.
///
/// Each set is a mask over neighbour counts: bit `n` is on when a cell with `n` live
/// neighbours is born (dead cells) or stays alive (live cells). HighLife, B36/S23, has births
/// `0b0_0100_1000` and survivals `0b0_0000_1100`.
///
/// See: https://conwaylife.com/wiki/Rulestring
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    births: u16,
    survivals: u16,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Bits above the 9th name counts a cell can never have and are dropped.
    pub const fn new(births: u16, survivals: u16) -> Self {
        Self {
            births: births & COUNTS,
            survivals: survivals & COUNTS,
        }
    }

    pub const fn births(&self) -> u16 {
        self.births
    }

    pub const fn survivals(&self) -> u16 {
        self.survivals
    }

    /// State of a cell in the next generation, given its current state and how many of its
    /// neighbours are alive.
    pub const fn next(&self, cell: Cell, live_neighbors: u8) -> Cell {
        if live_neighbors > 8 {
            return Cell::Dead;
        }

        let set = match cell {
            Cell::Dead => self.births,
            Cell::Alive => self.survivals,
        };

        if (set >> live_neighbors) & 1 == 1 {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        write_digits(f, self.births())?;
        write!(f, "/S")?;
        write_digits(f, self.survivals())
    }
}

fn write_digits(f: &mut fmt::Formatter<'_>, set: u16) -> fmt::Result {
    for i in 0..=8 {
        if set & (1 << i) != 0 {
            write!(f, "{i}")?;
        }
    }

    Ok(())
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({self})")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Expected 'B' or 'b' to start the births")]
    MissingBirths,

    #[error("Expected 'S' or 's' to start the survivals")]
    MissingSurvivals,

    #[error("Expected '/' between births and survivals")]
    MissingSeparator,

    #[error("Neighbour counts range over 0-8, found '{got}'")]
    InvalidDigit { got: char },

    #[error("Unexpected input after rule: \"{rest}\"")]
    TrailingInput { rest: String },
}

impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();

        let (rule, rest) = match parse_util::peek_1(bytes) {
            Some(b) if b.is_ascii_digit() || b == b'/' => parse_nameless_rule(bytes)?,
            _ => parse_rule(bytes)?,
        };

        if !rest.is_empty() {
            return Err(RuleError::TrailingInput {
                rest: String::from_utf8_lossy(rest).to_string(),
            });
        }

        Ok(rule)
    }
}

// Parse rules that look like b3/s23 or B3S23
pub(crate) fn parse_rule(bytes: &[u8]) -> Result<(RuleSet, &[u8]), RuleError> {
    let Some(bytes) = bytes.strip_prefix(b"B").or_else(|| bytes.strip_prefix(b"b")) else {
        return Err(RuleError::MissingBirths);
    };

    let (b, bytes) = parse_util::take_digits(bytes);

    // The separator is optional in this form
    let bytes = parse_util::expect(b'/', bytes).unwrap_or(bytes);

    let Some(bytes) = bytes.strip_prefix(b"S").or_else(|| bytes.strip_prefix(b"s")) else {
        return Err(RuleError::MissingSurvivals);
    };

    let (s, bytes) = parse_util::take_digits(bytes);

    Ok((from_digits(b, s)?, bytes))
}

// Parse rules that look like 3/23, births first. These show up in RLE #r comment lines.
pub(crate) fn parse_nameless_rule(bytes: &[u8]) -> Result<(RuleSet, &[u8]), RuleError> {
    let (b, bytes) = parse_util::take_digits(bytes);

    let Ok(bytes) = parse_util::expect(b'/', bytes) else {
        return Err(RuleError::MissingSeparator);
    };

    let (s, bytes) = parse_util::take_digits(bytes);

    Ok((from_digits(b, s)?, bytes))
}

fn from_digits(births: Option<&[u8]>, survivals: Option<&[u8]>) -> Result<RuleSet, RuleError> {
    let births = bytes_to_num(births.unwrap_or_default())?;
    let survivals = bytes_to_num(survivals.unwrap_or_default())?;

    Ok(RuleSet::new(births, survivals))
}

/// Turn a run of count digits such as `23` into a count mask
fn bytes_to_num(bytes: &[u8]) -> Result<u16, RuleError> {
    bytes.iter().try_fold(0u16, |mask, &b| match b {
        b'0'..=b'8' => Ok(mask | 1 << (b - b'0')),
        _ => Err(RuleError::InvalidDigit { got: b as char }),
    })
}

#[cfg(test)]
mod test {
    use super::B3S23;
    use super::RuleError;
    use super::RuleSet;
    use crate::cell::Cell;

    #[test]
    fn parse_conway() {
        for s in ["B3/S23", "b3s23", "b3/s23", "3/23", " B3/S23\n"] {
            let rule: RuleSet = s.parse().unwrap();
            assert_eq!(rule, B3S23, "parsing {s:?}");
        }
    }

    #[test]
    fn parse_empty_sets() {
        let rule: RuleSet = "B/S012345678".parse().unwrap();

        assert_eq!(rule.births(), 0);
        assert_eq!(rule.survivals(), 0x1FF);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("S23".parse::<RuleSet>(), Err(RuleError::MissingBirths));
        assert_eq!("B3".parse::<RuleSet>(), Err(RuleError::MissingSurvivals));
        assert_eq!(
            "B9/S23".parse::<RuleSet>(),
            Err(RuleError::InvalidDigit { got: '9' })
        );
        assert_eq!("323".parse::<RuleSet>(), Err(RuleError::MissingSeparator));
        assert_eq!(
            "B3/S23x".parse::<RuleSet>(),
            Err(RuleError::TrailingInput {
                rest: "x".to_string()
            })
        );
    }

    #[test]
    fn display_round_trips() {
        let highlife: RuleSet = "b36s23".parse().unwrap();

        assert_eq!(highlife.to_string(), "B36/S23");
        assert_eq!(B3S23.to_string(), "B3/S23");
        assert_eq!(RuleSet::new(0, 0).to_string(), "B/S");
    }

    #[test]
    fn conway_transitions() {
        for n in 0..=8 {
            let born = B3S23.next(Cell::Dead, n);
            let survives = B3S23.next(Cell::Alive, n);

            assert_eq!(born.is_alive(), n == 3, "birth with {n} neighbours");
            assert_eq!(survives.is_alive(), n == 2 || n == 3, "survival with {n} neighbours");
        }
    }

    #[test]
    fn bits_past_eight_are_ignored() {
        let rule = RuleSet::new(0xFFFF, 0xFFFF);

        assert_eq!(rule.births(), 0x1FF);
        assert_eq!(rule.survivals(), 0x1FF);
    }
}
