//! # seqmaker
//!
//! Turns a stream of raw AIS position reports into clean, fixed-length, uniformly
//! time-sampled vessel trajectories.
//!
//! Reports are parsed and validated line by line ([`record`]), buffered per vessel by a
//! [`Sequencer`], then drained through one handler per run:
//!
//! * [`SequenceMaker`] – resampled sequences of `seq_length + 1` points per vessel;
//! * [`SequenceCounter`] – fraction of each trajectory lost to segmentation;
//! * [`SequenceDiff`] – strided time/distance differences over all vessels.
//!
//! The segmentation engine itself lives in [`seq`]; [`dump`] writes handler results to disk
//! and [`mmsi_counter`] builds a vessel histogram of a raw stream.
pub mod ais;
pub mod constants;
pub mod dump;
pub mod mmsi_counter;
pub mod record;
pub mod seq;
pub mod seqmaker_errors;
pub mod sequencer;
pub mod split_args;
pub mod utility;

pub use ais::{Point, Position, Trajectory};
pub use record::FormatPolicy;
pub use seqmaker_errors::SeqMakerError;
pub use sequencer::{
    DropRateMap, Handler, HandlerOutput, IngestStats, SequenceCounter, SequenceDiff,
    SequenceMaker, SequenceMap, Sequencer, TrajectoryHandler,
};
pub use split_args::{SplitArgs, SplitArgsBuilder};
