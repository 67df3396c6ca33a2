//! Reader for the run length encoded pattern format used by most Life software.
//!
//! A file is a block of `#` metadata lines, an optional `x = W, y = H[, rule = R]` header, and
//! a body of `<count><tag>` runs ending in `!`.
//!
//! See: https://conwaylife.com/wiki/Run_Length_Encoded

use std::ops::ControlFlow;

use thiserror::Error;
use tracing::warn;

use crate::PatternOffset;
use crate::parse_util;
use crate::parse_util::ConvertError;
use crate::parse_util::ParseError;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

/// Everything an RLE file says about its pattern, apart from the cells themselves.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RleFile<'a> {
    pub name: Option<&'a [u8]>,
    pub author: Option<&'a [u8]>,

    /// Where the top-left corner of the pattern sits, from `#P` or `#R` lines
    pub offset: Option<(PatternOffset, PatternOffset)>,

    /// Pattern width and height, from the `x = .., y = ..` header line
    pub size: Option<(u32, u32)>,

    pub rule: Option<RuleSet>,
}

#[derive(Debug, Error)]
pub enum RleError {
    #[error("'#' is not followed by a metadata tag")]
    MissingTag,

    #[error("Unknown metadata tag '#{got}'")]
    UnknownTag { got: char },

    #[error("'#{tag}' line has no value")]
    EmptyMetadata { tag: char },

    #[error("Invalid '#{tag}' offset: {source}")]
    Offset {
        tag: char,
        #[source]
        source: CoordError,
    },

    #[error("Invalid rule: {0}")]
    Rule(#[from] RuleError),

    #[error("Invalid header size: {0}")]
    HeaderSize(#[from] CoordError),

    #[error("Invalid header: {0}")]
    HeaderSyntax(#[from] ParseError),

    #[error("Pattern body ends without a '!'")]
    UnterminatedBody,

    #[error("Invalid run count: {0}")]
    RunCount(#[source] ConvertError),

    #[error("Run count must be directly followed by a tag")]
    DanglingRunCount,

    #[error("Unexpected byte 0x{got:02X} in pattern body")]
    UnexpectedByte { got: u8 },

    #[error("Live cell ({x}, {y}) lies outside the {width}x{height} pattern given by the header")]
    OutsideHeader {
        x: PatternOffset,
        y: PatternOffset,
        width: u32,
        height: u32,
    },

    #[error("Cell coordinates overflow once the offset is applied")]
    CoordinateOverflow,
}

#[derive(Debug, Error)]
pub enum CoordError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error("Missing {axis} value")]
    Missing { axis: char },

    #[error("Invalid {axis} value: {source}")]
    Invalid {
        axis: char,
        #[source]
        source: ConvertError,
    },
}

/// Parse an RLE file. Assumes the bytes are valid Ascii.
///
/// `f` is called with the `(x, y)` coordinates of every live cell, where `x` grows to the right
/// and `y` grows downwards, shifted by the file's offset if it has one. A rule given both by a
/// `#r` line and by the header is taken from whichever comes last.
///
/// When there is a header, a live cell outside of it is an error.
pub fn read_rle<F>(bytes: &[u8], mut f: F) -> Result<RleFile<'_>, RleError>
where
    F: FnMut(PatternOffset, PatternOffset),
{
    read_rle_until(bytes, |x, y| {
        f(x, y);
        ControlFlow::Continue(())
    })
}

/// Like [`read_rle`], but stops reading the body as soon as `f` breaks. The metadata and header
/// are still returned, and the rest of the body is not checked.
pub fn read_rle_until<F>(mut bytes: &[u8], f: F) -> Result<RleFile<'_>, RleError>
where
    F: FnMut(PatternOffset, PatternOffset) -> ControlFlow<()>,
{
    let mut file = RleFile::default();

    while let Some((meta, rest)) = read_metadata(parse_util::take_ws(bytes))? {
        match meta {
            Metadata::Comment => {}
            Metadata::Name(name) => replace(&mut file.name, name, "name"),
            Metadata::Author(author) => replace(&mut file.author, author, "author"),
            Metadata::Offset(x, y) => replace(&mut file.offset, (x, y), "offset"),
            Metadata::Rule(rule) => replace(&mut file.rule, rule, "rule"),
        }

        bytes = rest;
    }

    bytes = parse_util::take_ws(bytes);

    if let Some((header, rest)) = read_header(bytes)? {
        file.size = Some(header.size);

        if let Some(rule) = header.rule {
            replace(&mut file.rule, rule, "rule");
        }

        bytes = rest;
    }

    read_body(bytes, file.offset.unwrap_or_default(), file.size, f)?;

    Ok(file)
}

fn replace<T>(slot: &mut Option<T>, value: T, what: &str) {
    if slot.replace(value).is_some() {
        warn!("RLE {what} given more than once, keeping the last one");
    }
}

enum Metadata<'a> {
    Comment,
    Name(&'a [u8]),
    Author(&'a [u8]),
    Offset(PatternOffset, PatternOffset),
    Rule(RuleSet),
}

/// Takes the rest of the line and its line break. The line comes back without a trailing `\r`,
/// or as `None` when it is blank.
fn take_line(bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    let (line, bytes) = parse_util::take_until(b'\n', bytes);
    let (_, bytes) = parse_util::take_1(bytes);

    let line = line
        .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
        .filter(|l| !l.iter().all(u8::is_ascii_whitespace));

    (line, bytes)
}

/// Reads one `#` line, or returns `None` if `bytes` does not start with one.
fn read_metadata(bytes: &[u8]) -> Result<Option<(Metadata<'_>, &[u8])>, RleError> {
    let Ok(bytes) = parse_util::expect(b'#', bytes) else {
        return Ok(None);
    };

    let (Some(tag), bytes) = parse_util::take_1(bytes) else {
        return Err(RleError::MissingTag);
    };

    let (line, rest) = take_line(parse_util::take_blank(bytes));

    let text = line
        .map(<[u8]>::trim_ascii_end)
        .ok_or(RleError::EmptyMetadata { tag: tag as char });

    let meta = match tag {
        b'C' | b'c' => Metadata::Comment,
        b'N' => Metadata::Name(text?),
        b'O' => Metadata::Author(text?),
        b'P' | b'R' => {
            let (x, y) = read_offset(text?).map_err(|source| RleError::Offset {
                tag: tag as char,
                source,
            })?;

            Metadata::Offset(x, y)
        }
        b'r' => Metadata::Rule(parse_rule(text?)?),
        b if b.is_ascii_whitespace() => return Err(RleError::MissingTag),
        b => return Err(RleError::UnknownTag { got: b as char }),
    };

    Ok(Some((meta, rest)))
}

/// Reads the whitespace separated `X Y` pair of a `#P` or `#R` line.
fn read_offset(bytes: &[u8]) -> Result<(PatternOffset, PatternOffset), CoordError> {
    let mut parts = bytes
        .split(u8::is_ascii_whitespace)
        .filter(|part| !part.is_empty());

    let mut next = |axis: char| -> Result<PatternOffset, CoordError> {
        let part = parts.next().ok_or(CoordError::Missing { axis })?;

        parse_util::convert(part).map_err(|source| CoordError::Invalid { axis, source })
    };

    Ok((next('x')?, next('y')?))
}

fn parse_rule(bytes: &[u8]) -> Result<RuleSet, RuleError> {
    String::from_utf8_lossy(bytes).parse()
}

struct Header {
    size: (u32, u32),
    rule: Option<RuleSet>,
}

/// Reads the `x = W, y = H[, rule = R]` line, or returns `None` if `bytes` does not start with
/// an `x`.
fn read_header(bytes: &[u8]) -> Result<Option<(Header, &[u8])>, RleError> {
    if parse_util::peek_1(bytes) != Some(b'x') {
        return Ok(None);
    }

    let ((width, height), bytes) = read_size(bytes)?;

    let (rule, bytes) = match parse_util::take_1(bytes) {
        (Some(b','), bytes) => {
            let bytes = expect_key(b"rule", bytes)?;
            let (rule, bytes) = take_line(bytes);

            (Some(parse_rule(rule.unwrap_or_default())?), bytes)
        }
        // The size ended at a line break or the end of input
        (_, bytes) => (None, bytes),
    };

    let header = Header {
        size: (width, height),
        rule,
    };

    Ok(Some((header, bytes)))
}

/// Consumes `key =`, allowing whitespace before the key and around the `=`.
fn expect_key<'a>(key: &[u8], bytes: &'a [u8]) -> Result<&'a [u8], ParseError> {
    let bytes = parse_util::take_ws(bytes);
    let bytes = parse_util::expect_slice(key, bytes)?;
    let bytes = parse_util::take_ws(bytes);

    parse_util::expect(b'=', bytes)
}

/// Reads `x = W, y = H`, stopping right before the byte that ends `H`.
fn read_size(bytes: &[u8]) -> Result<((u32, u32), &[u8]), CoordError> {
    let value = |axis: char, bytes: &[u8]| -> Result<u32, CoordError> {
        parse_util::convert(bytes).map_err(|source| CoordError::Invalid { axis, source })
    };

    let bytes = expect_key(b"x", bytes)?;
    let (Some(w), bytes) = parse_util::take_with(b',', bytes) else {
        return Err(CoordError::Missing { axis: 'x' });
    };
    let w = value('x', w)?;

    let bytes = expect_key(b"y", bytes)?;
    let (Some(h), bytes) = parse_util::take_until_fn(|b| matches!(b, b',' | b'\r' | b'\n'), bytes)
    else {
        return Err(CoordError::Missing { axis: 'y' });
    };
    let h = value('y', h)?;

    Ok(((w, h), bytes))
}

/// Reads `<count><tag>` runs up to and including the closing `!`. Whitespace, line breaks
/// included, may appear between runs but not inside one.
///
/// Live runs are checked against `size` before any of their cells is reported.
fn read_body<F>(
    mut bytes: &[u8],
    (dx, dy): (PatternOffset, PatternOffset),
    size: Option<(u32, u32)>,
    mut f: F,
) -> Result<(), RleError>
where
    F: FnMut(PatternOffset, PatternOffset) -> ControlFlow<()>,
{
    let (mut x, mut y): (PatternOffset, PatternOffset) = (0, 0);

    loop {
        let (count, rest) = parse_util::take_digits(parse_util::take_ws(bytes));

        let run = match count {
            Some(count) => {
                let count: u32 = parse_util::convert(count).map_err(RleError::RunCount)?;
                PatternOffset::from(count)
            }
            None => 1,
        };

        let (Some(tag), rest) = parse_util::take_1(rest) else {
            return Err(RleError::UnterminatedBody);
        };
        bytes = rest;

        match tag {
            b'!' => return Ok(()),

            // Dead cells
            b'b' | b'.' => x = advance(x, run)?,

            // Live cells. Multi-state files use A-X for the live states
            b'o' | b'A'..=b'X' => {
                let end = advance(x, run)?;

                if let Some((width, height)) = size {
                    if run > 0 && (end > i64::from(width) || y >= i64::from(height)) {
                        return Err(RleError::OutsideHeader {
                            x: end - 1,
                            y,
                            width,
                            height,
                        });
                    }
                }

                let row = advance(dy, y)?;

                for column in x..end {
                    if f(advance(dx, column)?, row).is_break() {
                        return Ok(());
                    }
                }

                x = end;
            }

            // End of row, a count skips blank rows
            b'$' => {
                y = advance(y, run)?;
                x = 0;
            }

            // Leading whitespace is already gone, so this must sit between a count and its tag
            b if b.is_ascii_whitespace() => return Err(RleError::DanglingRunCount),

            b => return Err(RleError::UnexpectedByte { got: b }),
        }
    }
}

fn advance(from: PatternOffset, by: PatternOffset) -> Result<PatternOffset, RleError> {
    from.checked_add(by).ok_or(RleError::CoordinateOverflow)
}
