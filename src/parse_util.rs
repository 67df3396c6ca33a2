//! Small byte-slice combinators shared by the rulestring and RLE parsers.
//!
//! Each function hands back the unconsumed rest of its input, alongside whatever it took, and
//! leaves the input untouched when nothing matched.

use std::str::FromStr;

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of input, expected '{exp}'")]
    UnexpectedEof { exp: char },

    #[error("Expected '{exp}', but got '{got}'")]
    UnexpectedToken { exp: char, got: char },

    #[error("Expected \"{exp}\", but got \"{got}\"")]
    UnexpectedSlice { exp: String, got: String },
}

/// Skips leading ascii whitespace, line breaks included.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    bytes.trim_ascii_start()
}

/// Skips leading spaces and tabs, stopping at a line break.
pub fn take_blank(bytes: &[u8]) -> &[u8] {
    let (_, rest) = take_while(|b| b == b' ' || b == b'\t', bytes);

    rest
}

/// Splits off the first byte, or returns `None` and `bytes` unchanged when it is empty.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    match bytes.split_first() {
        Some((&b, rest)) => (Some(b), rest),
        None => (None, bytes),
    }
}

/// The first byte, without consuming it
pub const fn peek_1(bytes: &[u8]) -> Option<u8> {
    match bytes.first() {
        Some(&b) => Some(b),
        None => None,
    }
}

/// Expects the next character in `bytes` to be `b`.
pub fn expect(b: u8, bytes: &[u8]) -> ParseResult<&[u8]> {
    let (Some(a), bytes) = take_1(bytes) else {
        return Err(ParseError::UnexpectedEof { exp: b as char });
    };

    if a != b {
        return Err(ParseError::UnexpectedToken {
            exp: b as char,
            got: a as char,
        });
    }

    Ok(bytes)
}

/// Expects `bytes` to start with `bs`.
pub fn expect_slice<'a>(bs: &[u8], bytes: &'a [u8]) -> ParseResult<&'a [u8]> {
    match bytes.strip_prefix(bs) {
        Some(rest) => Ok(rest),
        None => {
            let n = bs.len().min(bytes.len());

            Err(ParseError::UnexpectedSlice {
                exp: String::from_utf8_lossy(bs).to_string(),
                got: String::from_utf8_lossy(&bytes[..n]).to_string(),
            })
        }
    }
}

/// Splits off the longest prefix whose bytes all satisfy `p`.
fn take_while<P>(p: P, bytes: &[u8]) -> (&[u8], &[u8])
where
    P: Fn(u8) -> bool,
{
    let i = bytes.iter().position(|&a| !p(a)).unwrap_or(bytes.len());

    bytes.split_at(i)
}

/// Splits off bytes up to, not including, the first one satisfying `p` or the end of input.
///
/// Returns `None` with `bytes` unchanged when that would be empty.
#[inline]
pub fn take_until_fn<P>(p: P, bytes: &[u8]) -> (Option<&[u8]>, &[u8])
where
    P: Fn(u8) -> bool,
{
    match take_while(|a| !p(a), bytes) {
        ([], _) => (None, bytes),
        (taken, rest) => (Some(taken), rest),
    }
}

/// [`take_until_fn`] for a single delimiter byte.
pub fn take_until(b: u8, bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    take_until_fn(|a| a == b, bytes)
}

/// Takes a run of ascii digits.
pub fn take_digits(bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    take_until_fn(|a| !a.is_ascii_digit(), bytes)
}

/// Like [`take_until`], but also drops the delimiter when it is there.
pub fn take_with(b: u8, bytes: &[u8]) -> (Option<&[u8]>, &[u8]) {
    match take_until(b, bytes) {
        (Some(taken), rest) => (Some(taken), rest.strip_prefix(&[b]).unwrap_or(rest)),
        none => none,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Input is not valid UTF-8")]
    InvalidUtf8,

    #[error("Failed to convert \"{str}\"")]
    ParseError { str: String },
}

/// Converts `&[u8]` to `T` if `T: FromStr`, ignoring surrounding ascii whitespace.
pub fn convert<T: FromStr>(bytes: &[u8]) -> Result<T, ConvertError> {
    let Ok(str) = std::str::from_utf8(bytes) else {
        return Err(ConvertError::InvalidUtf8);
    };

    let str = str.trim();

    str.parse::<T>().map_err(|_| ConvertError::ParseError {
        str: str.to_string(),
    })
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_take_ws_full_ws() {
        let bytes = b"  ";

        let res = super::take_ws(bytes);

        assert_eq!(res, b"")
    }

    #[test]
    fn test_take_blank_stops_at_newline() {
        let res = super::take_blank(b" \t\nx");

        assert_eq!(res, b"\nx")
    }

    #[test]
    fn test_take_until_runs_to_end() {
        let (res, rest) = super::take_until(b',', b"123");

        assert_eq!(res, Some(b"123".as_slice()));
        assert_eq!(rest, b"");
    }

    #[test]
    fn test_take_until_nothing_taken() {
        let (res, rest) = super::take_until(b',', b",1");

        assert_eq!(res, None);
        assert_eq!(rest, b",1");
    }

    #[test]
    fn test_take_with_consumes_delimiter() {
        let (res, rest) = super::take_with(b',', b"12, y");

        assert_eq!(res, Some(b"12".as_slice()));
        assert_eq!(rest, b" y");
    }

    #[test]
    fn test_expect() {
        assert_eq!(super::expect(b'x', b"x=1"), Ok(b"=1".as_slice()));
        assert_eq!(
            super::expect(b'x', b"y"),
            Err(super::ParseError::UnexpectedToken { exp: 'x', got: 'y' })
        );
        assert_eq!(
            super::expect(b'x', b""),
            Err(super::ParseError::UnexpectedEof { exp: 'x' })
        );
    }

    #[test]
    fn test_expect_slice() {
        assert_eq!(super::expect_slice(b"rule", b"rule = b3"), Ok(b" = b3".as_slice()));
        assert!(super::expect_slice(b"rule", b"ru").is_err());
    }

    #[test]
    fn test_convert_trims() {
        assert_eq!(super::convert::<u32>(b" 42 "), Ok(42));
        assert!(super::convert::<u32>(b"4x").is_err());
    }
}
