//! MMSI frequency counting over raw record streams.
use std::io::BufRead;

use ahash::RandomState;
use itertools::Itertools;
use std::collections::HashMap;

use crate::{
    constants::Mmsi,
    record::{split_fields, FormatPolicy},
    seqmaker_errors::SeqMakerError,
    utility::parse_leading,
};

/// Count how often each MMSI appears in the second column of `reader`.
///
/// No range validation is applied beyond `mmsi > 0`; an unparsable MMSI is ignored.
/// Lines with fewer than two columns are format errors, handled according to `policy`.
///
/// Return
/// ----------
/// * `(mmsi, count)` pairs sorted by count descending, ties by MMSI ascending.
/// * [`SeqMakerError::InvalidRecordFormat`] (1-based line number) on the first malformed
///   line under [`FormatPolicy::FailFast`].
/// * [`SeqMakerError::IoError`] if reading fails.
pub fn count_mmsi<R: BufRead>(
    reader: R,
    delimiter: &str,
    policy: FormatPolicy,
) -> Result<Vec<(Mmsi, usize)>, SeqMakerError> {
    let mut counts: HashMap<Mmsi, usize, RandomState> = HashMap::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let mmsi = match split_fields::<2>(&line, delimiter) {
            Ok([_, mmsi]) => mmsi,
            Err(source) => match policy {
                FormatPolicy::FailFast => {
                    return Err(SeqMakerError::InvalidRecordFormat { line: i + 1, source });
                }
                FormatPolicy::SkipMalformed => continue,
            },
        };

        match parse_leading::<Mmsi>(mmsi) {
            Some(mmsi) if mmsi > 0 => *counts.entry(mmsi).or_default() += 1,
            _ => {}
        }
    }

    Ok(counts
        .into_iter()
        .sorted_unstable_by(|(m1, c1), (m2, c2)| c2.cmp(c1).then(m1.cmp(m2)))
        .collect())
}
