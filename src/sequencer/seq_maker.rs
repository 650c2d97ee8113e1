//! Handler producing resampled fixed-length sequences.
use ahash::RandomState;
use std::collections::HashMap;

use tracing::debug;

use crate::{
    ais::{Point, Position},
    constants::Mmsi,
    seq::split,
    seqmaker_errors::SeqMakerError,
    split_args::SplitArgs,
};

use super::TrajectoryHandler;

/// Concatenated sequences per vessel, each `seq_length + 1` points long.
pub type SequenceMap = HashMap<Mmsi, Vec<Point>, RandomState>;

/// Runs [`split`] on every vessel and keeps the non-empty results.
#[derive(Debug, Clone)]
pub struct SequenceMaker {
    split_args: SplitArgs,
    sequences: SequenceMap,
}

impl SequenceMaker {
    pub fn new(split_args: SplitArgs) -> Self {
        Self {
            split_args,
            sequences: SequenceMap::default(),
        }
    }

    pub fn split_args(&self) -> &SplitArgs {
        &self.split_args
    }

    pub fn sequences(&self) -> &SequenceMap {
        &self.sequences
    }

    pub fn into_sequences(self) -> SequenceMap {
        self.sequences
    }
}

impl TrajectoryHandler for SequenceMaker {
    fn init(&mut self, n_trajectories: usize) {
        self.sequences.reserve(n_trajectories);
    }

    fn process(&mut self, mmsi: Mmsi, trajectory: &[Position]) -> Result<(), SeqMakerError> {
        let seq = split(trajectory, &self.split_args)?;
        if seq.is_empty() {
            return Ok(());
        }

        debug!(
            mmsi,
            sequences = seq.len() / self.split_args.grid_points(),
            "sequences extracted"
        );
        self.sequences.insert(mmsi, seq);
        Ok(())
    }
}
