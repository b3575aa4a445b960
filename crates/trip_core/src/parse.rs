//! Trip line parsing.
//!
//! Lines are scanned as raw bytes: the first five comma delimiters are located
//! positionally and the two consumed fields (pickup zone and pickup datetime) are
//! sliced out without allocating. Nothing past the fifth delimiter is examined,
//! and no CSV quoting is honoured except one wrapping quote pair around the
//! datetime field.

use thiserror::Error;

/// Field separator.
const DELIMITER: u8 = b',';

/// A data line must contain at least this many delimiters (six fields).
pub const DELIMITERS_REQUIRED: usize = 5;

/// Offset of the date/time separator inside `YYYY-MM-DD HH:MM`.
const TIME_SEPARATOR_OFFSET: usize = 10;

/// Offset of the first hour digit inside `YYYY-MM-DD HH:MM`.
const HOUR_OFFSET: usize = 11;

/// Shortest datetime that still carries both hour digits.
const MIN_DATETIME_LEN: usize = HOUR_OFFSET + 2;

/// Highest valid hour of day.
const MAX_HOUR: u8 = 23;

/// Reasons a data line is discarded.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRejection {
    #[error("line is empty")]
    Empty,

    #[error("expected at least 5 delimiters, found {found}")]
    TooFewFields { found: usize },

    #[error("pickup zone field is empty")]
    EmptyZone,

    #[error("pickup datetime field is empty")]
    EmptyDatetime,

    #[error("pickup datetime too short: {len} bytes")]
    DatetimeTooShort { len: usize },

    #[error("expected a space at datetime offset 10, found byte {found:#04x}")]
    MissingTimeSeparator { found: u8 },

    #[error("hour digits are not ASCII decimal")]
    HourNotNumeric,

    #[error("hour {hour} is outside 0..=23")]
    HourOutOfRange { hour: u8 },
}

/// The fields of one accepted trip line, borrowed from the line buffer.
///
/// The zone is kept as raw bytes; its encoding is never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripFields<'a> {
    pub pickup_zone: &'a [u8],
    pub pickup_hour: u8,
}

/// Parse one data line (terminator already removed).
///
/// Field 1 is the pickup zone and field 3 the pickup datetime; all other
/// fields are ignored and may hold anything, including further commas.
pub fn parse_trip_line(line: &[u8]) -> Result<TripFields<'_>, LineRejection> {
    if line.is_empty() {
        return Err(LineRejection::Empty);
    }

    let delimiters = delimiter_offsets(line)?;

    let zone = &line[delimiters[0] + 1..delimiters[1]];
    if zone.is_empty() {
        return Err(LineRejection::EmptyZone);
    }

    let datetime = &line[delimiters[2] + 1..delimiters[3]];
    if datetime.is_empty() {
        return Err(LineRejection::EmptyDatetime);
    }

    let pickup_hour = parse_pickup_hour(strip_wrapping_quotes(datetime))?;

    Ok(TripFields {
        pickup_zone: zone,
        pickup_hour,
    })
}

/// Extract the hour from a fixed-width `YYYY-MM-DD HH...` datetime.
///
/// The first ten bytes are not inspected. Byte 10 must be a space and bytes
/// 11..13 two ASCII digits in `00..=23`.
pub fn parse_pickup_hour(datetime: &[u8]) -> Result<u8, LineRejection> {
    if datetime.len() < MIN_DATETIME_LEN {
        return Err(LineRejection::DatetimeTooShort {
            len: datetime.len(),
        });
    }

    let separator = datetime[TIME_SEPARATOR_OFFSET];
    if separator != b' ' {
        return Err(LineRejection::MissingTimeSeparator { found: separator });
    }

    let tens = datetime[HOUR_OFFSET];
    let ones = datetime[HOUR_OFFSET + 1];
    if !tens.is_ascii_digit() || !ones.is_ascii_digit() {
        return Err(LineRejection::HourNotNumeric);
    }

    let hour = (tens - b'0') * 10 + (ones - b'0');
    if hour > MAX_HOUR {
        return Err(LineRejection::HourOutOfRange { hour });
    }

    Ok(hour)
}

/// Remove one leading and one trailing `"` when both are present.
pub fn strip_wrapping_quotes(field: &[u8]) -> &[u8] {
    match field {
        [b'"', inner @ .., b'"'] => inner,
        _ => field,
    }
}

/// Drop a trailing `\n` and then a trailing `\r`, accepting LF and CRLF input.
pub fn trim_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Byte offsets of the first [`DELIMITERS_REQUIRED`] delimiters.
fn delimiter_offsets(line: &[u8]) -> Result<[usize; DELIMITERS_REQUIRED], LineRejection> {
    let mut offsets = [0usize; DELIMITERS_REQUIRED];
    let mut found = 0;

    for (pos, &byte) in line.iter().enumerate() {
        if byte != DELIMITER {
            continue;
        }
        offsets[found] = pos;
        found += 1;
        if found == DELIMITERS_REQUIRED {
            return Ok(offsets);
        }
    }

    Err(LineRejection::TooFewFields { found })
}
