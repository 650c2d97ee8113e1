//! Handler measuring how much of each trajectory is lost to segmentation.
use ahash::RandomState;
use std::collections::HashMap;

use crate::{
    ais::Position, constants::Mmsi, seq::drop_rate, seqmaker_errors::SeqMakerError,
    split_args::SplitArgs,
};

use super::TrajectoryHandler;

/// Drop rate per vessel, in `[0, 1]`.
pub type DropRateMap = HashMap<Mmsi, f64, RandomState>;

/// Runs [`drop_rate`] on every vessel.
#[derive(Debug, Clone)]
pub struct SequenceCounter {
    split_args: SplitArgs,
    drop_rates: DropRateMap,
}

impl SequenceCounter {
    pub fn new(split_args: SplitArgs) -> Self {
        Self {
            split_args,
            drop_rates: DropRateMap::default(),
        }
    }

    pub fn split_args(&self) -> &SplitArgs {
        &self.split_args
    }

    pub fn drop_rates(&self) -> &DropRateMap {
        &self.drop_rates
    }

    pub fn into_drop_rates(self) -> DropRateMap {
        self.drop_rates
    }
}

impl TrajectoryHandler for SequenceCounter {
    fn init(&mut self, n_trajectories: usize) {
        self.drop_rates.reserve(n_trajectories);
    }

    fn process(&mut self, mmsi: Mmsi, trajectory: &[Position]) -> Result<(), SeqMakerError> {
        self.drop_rates
            .insert(mmsi, drop_rate(trajectory, &self.split_args));
        Ok(())
    }
}
