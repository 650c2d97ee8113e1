//! # Raw AIS record parsing and validation
//!
//! Turns one line of delimiter-separated text into a validated `(Mmsi, Position)` pair.
//!
//! ## Overview
//! -----------------
//! * [`split_fields`] – fixed-arity tokenizer. Any character of the delimiter string
//!   separates columns; empty tokens are skipped, so `", "` treats `"1, 2"` and `"1,2"` alike.
//!   Columns past the requested arity are ignored.
//! * [`RawRecord`] – the five textual columns of an AIS report.
//! * [`parse_ais_record`] – tokenizer + validation in one call.
//!
//! ## Column layout
//! -----------------
//! 1. Reception time as UTC epoch seconds, e.g. `1456786800.005` (fraction truncated)
//! 2. MMSI
//! 3. AIS slot second
//! 4. Latitude in 1/10000 minute
//! 5. Longitude in 1/10000 minute
//!
//! ## Error Handling
//! -----------------
//! Two failure classes are kept apart:
//! * **Format errors** (not enough non-empty columns) are returned as
//!   [`ParseRecordError`]. What happens next is decided by the caller's [`FormatPolicy`].
//! * **Validation failures** (MMSI out of range, unusable time, position out of range)
//!   yield `Ok(None)`: the record is dropped without surfacing an error.
use thiserror::Error;

use crate::{
    ais::{is_valid_mmsi, Point, Position},
    constants::{AisUnit, Mmsi},
    utility::{parse_leading, time_recorded_str},
};

/// Number of columns of an AIS record.
pub const AIS_RECORD_COLUMNS: usize = 5;

/// Line-level format errors.
///
/// Empty tokens are skipped by [`split_fields`], so an empty column shows up as a
/// missing one.
#[derive(Error, Debug, PartialEq)]
pub enum ParseRecordError {
    #[error("Could not find enough columns (expected {expected}, found {found})")]
    NotEnoughColumns { expected: usize, found: usize },
}

/// What to do with a line that fails [`split_fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatPolicy {
    /// Abort ingestion on the first malformed line.
    #[default]
    FailFast,
    /// Skip the line and keep going; skipped lines are counted.
    SkipMalformed,
}

/// Split `line` into exactly `N` non-empty tokens.
///
/// Arguments
/// -----------------
/// * `line`: One line of input, without line terminator.
/// * `delimiter`: Set of separator characters.
///
/// Return
/// ----------
/// * The first `N` tokens, or [`ParseRecordError::NotEnoughColumns`] if fewer exist.
pub fn split_fields<'a, const N: usize>(
    line: &'a str,
    delimiter: &str,
) -> Result<[&'a str; N], ParseRecordError> {
    let mut fields = [""; N];
    let mut found = 0;

    let tokens = line
        .split(|c: char| delimiter.contains(c))
        .filter(|token| !token.is_empty())
        .take(N);
    for token in tokens {
        fields[found] = token;
        found += 1;
    }

    if found != N {
        return Err(ParseRecordError::NotEnoughColumns { expected: N, found });
    }
    Ok(fields)
}

/// The five textual columns of an AIS report, borrowed from the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub recv: &'a str,
    pub mmsi: &'a str,
    pub slot: &'a str,
    pub latitude: &'a str,
    pub longitude: &'a str,
}

impl<'a> RawRecord<'a> {
    /// Tokenize `line` into a [`RawRecord`].
    pub fn from_line(line: &'a str, delimiter: &str) -> Result<Self, ParseRecordError> {
        let [recv, mmsi, slot, latitude, longitude] =
            split_fields::<AIS_RECORD_COLUMNS>(line, delimiter)?;
        Ok(RawRecord {
            recv,
            mmsi,
            slot,
            latitude,
            longitude,
        })
    }

    /// Validate the record.
    ///
    /// Return
    /// ----------
    /// * `None` if the MMSI is out of range, the time cannot be quantized, or the
    ///   position is out of range.
    /// * The vessel id and its quantized [`Position`] otherwise.
    pub fn validate(&self) -> Option<(Mmsi, Position)> {
        let mmsi = parse_leading::<Mmsi>(self.mmsi).unwrap_or(0);
        if !is_valid_mmsi(mmsi) {
            return None;
        }

        let t = time_recorded_str(self.recv, self.slot)?;
        let x = Point::new(
            parse_leading::<AisUnit>(self.latitude)?,
            parse_leading::<AisUnit>(self.longitude)?,
        );

        x.is_valid().then_some((mmsi, Position { t, x }))
    }
}

/// Tokenize and validate one line.
///
/// Return
/// ----------
/// * `Err(ParseRecordError)` – malformed line.
/// * `Ok(None)` – well-formed but invalid record.
/// * `Ok(Some((mmsi, position)))` – accepted record.
pub fn parse_ais_record(
    line: &str,
    delimiter: &str,
) -> Result<Option<(Mmsi, Position)>, ParseRecordError> {
    Ok(RawRecord::from_line(line, delimiter)?.validate())
}

/// Normalize a delimiter given on the command line.
///
/// One pair of surrounding double quotes is stripped and the two-character sequence
/// `\t` becomes a tab.
pub fn unescape_delimiter(delimiter: &str) -> String {
    let stripped = match delimiter.strip_prefix('"').and_then(|d| d.strip_suffix('"')) {
        Some(inner) if !inner.is_empty() => inner,
        _ => delimiter,
    };
    stripped.replace("\\t", "\t")
}

#[cfg(test)]
mod record_test {
    use super::*;

    #[test]
    fn test_split_fields() {
        let fields = split_fields::<3>("a, b,,c, d", ", ").unwrap();
        assert_eq!(fields, ["a", "b", "c"]);

        assert_eq!(
            split_fields::<3>("a, b", ", "),
            Err(ParseRecordError::NotEnoughColumns {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            split_fields::<1>("", ", "),
            Err(ParseRecordError::NotEnoughColumns {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn test_parse_valid_record() {
        let line = "1456786803.005, 211234567, 2, 31800000, 6000000, extra";
        let (mmsi, pos) = parse_ais_record(line, ", ").unwrap().unwrap();

        assert_eq!(mmsi, 211234567);
        assert_eq!(pos, Position::new(1456786802, 31800000, 6000000));
    }

    #[test]
    fn test_parse_tab_separated_record() {
        let line = "1456786803\t211234567\t2\t-31800000\t-6000000";
        let (_, pos) = parse_ais_record(line, "\t").unwrap().unwrap();
        assert_eq!(pos.x, Point::new(-31800000, -6000000));
    }

    #[test]
    fn test_parse_invalid_records() {
        // MMSI out of range
        assert_eq!(
            parse_ais_record("1456786803, 12345, 2, 0, 0", ", "),
            Ok(None)
        );
        // slot second out of range
        assert_eq!(
            parse_ais_record("1456786803, 211234567, 60, 0, 0", ", "),
            Ok(None)
        );
        // zero reception time
        assert_eq!(
            parse_ais_record("0, 211234567, 2, 0, 0", ", "),
            Ok(None)
        );
        // latitude out of range
        assert_eq!(
            parse_ais_record("1456786803, 211234567, 2, 108000001, 0", ", "),
            Ok(None)
        );
        // longitude not a number
        assert_eq!(
            parse_ais_record("1456786803, 211234567, 2, 0, abc", ", "),
            Ok(None)
        );
    }

    #[test]
    fn test_parse_malformed_record() {
        assert_eq!(
            parse_ais_record("1456786803, 211234567, 2, 0", ", "),
            Err(ParseRecordError::NotEnoughColumns {
                expected: 5,
                found: 4
            })
        );
        // an empty column counts as missing
        assert_eq!(
            parse_ais_record("1456786803,211234567,,0,0", ","),
            Err(ParseRecordError::NotEnoughColumns {
                expected: 5,
                found: 4
            })
        );
    }

    #[test]
    fn test_unescape_delimiter() {
        assert_eq!(unescape_delimiter("\", \""), ", ");
        assert_eq!(unescape_delimiter("\\t"), "\t");
        assert_eq!(unescape_delimiter("\"\\t\""), "\t");
        assert_eq!(unescape_delimiter(";"), ";");
        assert_eq!(unescape_delimiter("\"\""), "\"\"");
    }
}
