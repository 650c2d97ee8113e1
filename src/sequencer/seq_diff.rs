//! Handler collecting strided time and distance differences.
//!
//! For every vessel and every index `i ≥ stride`, the pair
//! `(t[i] − t[i−stride], round(dist_nm(x[i−stride], x[i]) × 10000))` is appended to a
//! single flat list. Vessels follow each other in processing order.
use crate::{
    ais::Position,
    constants::{AisUnit, Mmsi, Timestamp, DIFF_DISTANCE_SCALE},
    seqmaker_errors::SeqMakerError,
    split_args::SplitArgs,
    utility::adjacent_diff,
};

use super::TrajectoryHandler;

/// `(Δt in seconds, distance in 1/10000 nm)`.
pub type DiffPair = (Timestamp, AisUnit);

#[derive(Debug, Clone)]
pub struct SequenceDiff {
    stride: usize,
    diffs: Vec<DiffPair>,
}

impl SequenceDiff {
    /// Coverage gate used for diff runs: any vessel with at least one report.
    pub const GATING_ARGS: SplitArgs = SplitArgs {
        seq_length: 0,
        dt_max: 1,
        dti: 0,
        ds_max: 0.,
        v_min: 0.,
    };

    /// Return
    /// ----------
    /// * [`SeqMakerError::InvalidStride`] if `stride` is zero.
    pub fn new(stride: usize) -> Result<Self, SeqMakerError> {
        if stride == 0 {
            return Err(SeqMakerError::InvalidStride(stride));
        }
        Ok(Self {
            stride,
            diffs: Vec::new(),
        })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn diffs(&self) -> &[DiffPair] {
        &self.diffs
    }

    pub fn into_diffs(self) -> Vec<DiffPair> {
        self.diffs
    }
}

impl TrajectoryHandler for SequenceDiff {
    fn init(&mut self, _n_trajectories: usize) {}

    fn process(&mut self, _mmsi: Mmsi, trajectory: &[Position]) -> Result<(), SeqMakerError> {
        let diffs = adjacent_diff(trajectory, self.stride, |a: &Position, b: &Position| {
            let dx = (a.x.dist_nm(&b.x) * DIFF_DISTANCE_SCALE).round() as AisUnit;
            (b.t - a.t, dx)
        });
        self.diffs.extend(diffs);
        Ok(())
    }
}

#[cfg(test)]
mod seq_diff_test {
    use super::*;

    #[test]
    fn test_zero_stride_rejected() {
        assert_eq!(
            SequenceDiff::new(0).unwrap_err(),
            SeqMakerError::InvalidStride(0)
        );
    }

    #[test]
    fn test_strided_differences() {
        // 600 units of latitude = 0.06 nm = 600 × 1/10000 nm
        let trajectory = [
            Position::new(0, 0, 0),
            Position::new(10, 600, 0),
            Position::new(25, 1200, 0),
        ];

        let mut diff = SequenceDiff::new(1).unwrap();
        diff.process(211234567, &trajectory).unwrap();
        assert_eq!(diff.diffs(), &[(10, 600), (15, 600)]);

        let mut diff = SequenceDiff::new(2).unwrap();
        diff.process(211234567, &trajectory).unwrap();
        diff.process(211234568, &trajectory[..2]).unwrap();
        assert_eq!(diff.into_diffs(), vec![(25, 1200)]);
    }
}
