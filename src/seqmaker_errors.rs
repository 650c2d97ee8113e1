use thiserror::Error;

use crate::{constants::Timestamp, record::ParseRecordError};

#[derive(Error, Debug)]
pub enum SeqMakerError {
    #[error("Invalid data format at line {line}: {source}")]
    InvalidRecordFormat {
        line: usize,
        source: ParseRecordError,
    },

    #[error("Invalid segmentation parameter: {0}")]
    InvalidSplitParameter(String),

    #[error("Invalid stride: {0} (must be at least 1)")]
    InvalidStride(usize),

    #[error(
        "Grid point at t = {target} is not covered by the segment (last report at t = {last})"
    )]
    GridOutOfCoverage { target: u64, last: Timestamp },

    #[error("Cannot resample a segment of {0} report(s), at least 2 are required")]
    DegenerateSegment(usize),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl PartialEq for SeqMakerError {
    fn eq(&self, other: &Self) -> bool {
        use SeqMakerError::*;
        match (self, other) {
            (
                InvalidRecordFormat {
                    line: l1,
                    source: s1,
                },
                InvalidRecordFormat {
                    line: l2,
                    source: s2,
                },
            ) => l1 == l2 && s1 == s2,
            (InvalidSplitParameter(a), InvalidSplitParameter(b)) => a == b,
            (InvalidStride(a), InvalidStride(b)) => a == b,
            (
                GridOutOfCoverage {
                    target: t1,
                    last: l1,
                },
                GridOutOfCoverage {
                    target: t2,
                    last: l2,
                },
            ) => t1 == t2 && l1 == l2,
            (DegenerateSegment(a), DegenerateSegment(b)) => a == b,

            // not comparable, equal if same variant
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
