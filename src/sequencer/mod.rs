//! # Sequencer: per-vessel buffering, cleaning, and handler dispatch
//!
//! The [`Sequencer`] accumulates reports per vessel, then drains every vessel through
//! one handler in a single [`run`](Sequencer::run).
//!
//! Modules
//! -----------------
//! * [`seq_maker`] – [`SequenceMaker`]: resampled fixed-length sequences per vessel.
//! * [`seq_counter`] – [`SequenceCounter`]: drop rate per vessel.
//! * [`seq_diff`] – [`SequenceDiff`]: strided time/distance differences over all vessels.
//! * *(crate-private)* `progress_bar` – Optional progress UI when the `progress` feature is enabled.
//!
//! Run pipeline
//! -----------------
//! For every vessel, in ascending MMSI order:
//!
//! 1. sort reports by time (stable, so reports sharing a timestamp keep arrival order);
//! 2. drop duplicate timestamps, keeping the first-arrived report;
//! 3. optionally apply the spike filter with `distance ≤ ds_max` as plausibility test;
//! 4. skip the vessel unless it has at least one report,
//!    `len × dt_max ≥ seq_length × dti` and `t_last − t_first ≥ seq_length × dti`;
//! 5. hand the cleaned trajectory to the handler.
//!
//! Skipped vessels are not an error. A run drains the store: a second run without new
//! reports sees no vessel.
//!
//! Quick-Start
//! -----------------
//! ```rust
//! use seqmaker::{FormatPolicy, Sequencer, SplitArgs};
//!
//! # fn run() -> Result<(), seqmaker::SeqMakerError> {
//! let args = SplitArgs::builder().seq_length(10).dt_max(60).dti(6).build()?;
//! let mut sequencer = Sequencer::new(args);
//!
//! let input = "1456786803.005, 211234567, 2, 31800000, 6000000\n";
//! let stats = sequencer.ingest(input.as_bytes(), ", ", FormatPolicy::FailFast)?;
//! assert_eq!(stats.accepted, 1);
//!
//! let sequences = sequencer.make_sequences(false)?;
//! assert!(sequences.is_empty());
//! # Ok(()) }
//! # run().unwrap();
//! ```
use std::{fmt, io::BufRead};

use tracing::{debug, info};

use crate::{
    ais::{Position, Trajectory},
    constants::{Mmsi, TrajectorySet},
    record::{parse_ais_record, FormatPolicy},
    seqmaker_errors::SeqMakerError,
    split_args::SplitArgs,
    utility::low_pass_filter,
};

pub mod seq_counter;
pub mod seq_diff;
pub mod seq_maker;

#[cfg(feature = "progress")]
pub(crate) mod progress_bar;

pub use seq_counter::{DropRateMap, SequenceCounter};
pub use seq_diff::{DiffPair, SequenceDiff};
pub use seq_maker::{SequenceMap, SequenceMaker};

/// Capability shared by all handlers.
pub trait TrajectoryHandler {
    /// Called once per run with the number of vessels about to be processed.
    fn init(&mut self, n_trajectories: usize);

    /// Called once per vessel that passed the coverage gate, with its cleaned reports.
    fn process(&mut self, mmsi: Mmsi, trajectory: &[Position]) -> Result<(), SeqMakerError>;
}

/// The closed set of handlers a [`Sequencer`] can drive.
#[derive(Debug, Clone)]
pub enum Handler {
    Sequences(SequenceMaker),
    DropRates(SequenceCounter),
    Diffs(SequenceDiff),
}

/// What a [`Handler`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    Sequences(SequenceMap),
    DropRates(DropRateMap),
    Diffs(Vec<DiffPair>),
}

impl Handler {
    /// Parameters a run of this handler cleans, gates and segments with.
    pub fn split_args(&self) -> SplitArgs {
        match self {
            Handler::Sequences(h) => *h.split_args(),
            Handler::DropRates(h) => *h.split_args(),
            Handler::Diffs(_) => SequenceDiff::GATING_ARGS,
        }
    }

    pub fn into_output(self) -> HandlerOutput {
        match self {
            Handler::Sequences(h) => HandlerOutput::Sequences(h.into_sequences()),
            Handler::DropRates(h) => HandlerOutput::DropRates(h.into_drop_rates()),
            Handler::Diffs(h) => HandlerOutput::Diffs(h.into_diffs()),
        }
    }
}

impl TrajectoryHandler for Handler {
    fn init(&mut self, n_trajectories: usize) {
        match self {
            Handler::Sequences(h) => h.init(n_trajectories),
            Handler::DropRates(h) => h.init(n_trajectories),
            Handler::Diffs(h) => h.init(n_trajectories),
        }
    }

    fn process(&mut self, mmsi: Mmsi, trajectory: &[Position]) -> Result<(), SeqMakerError> {
        match self {
            Handler::Sequences(h) => h.process(mmsi, trajectory),
            Handler::DropRates(h) => h.process(mmsi, trajectory),
            Handler::Diffs(h) => h.process(mmsi, trajectory),
        }
    }
}

/// Counters of one [`Sequencer::ingest`] call.
///
/// Display
/// -----------------
/// * `format!("{}", stats)` – `lines=10, accepted=7, invalid=2, malformed=1`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Lines read.
    pub lines: usize,
    /// Records added to the store.
    pub accepted: usize,
    /// Well-formed records rejected by validation.
    pub invalid: usize,
    /// Malformed lines skipped under [`FormatPolicy::SkipMalformed`].
    pub malformed: usize,
}

impl fmt::Display for IngestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lines={}, accepted={}, invalid={}, malformed={}",
            self.lines, self.accepted, self.invalid, self.malformed
        )
    }
}

/// Per-vessel report store and run orchestrator.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    trajectories: TrajectorySet,
    split_args: SplitArgs,
}

impl Sequencer {
    pub fn new(split_args: SplitArgs) -> Self {
        Self {
            trajectories: TrajectorySet::default(),
            split_args,
        }
    }

    pub fn split_args(&self) -> &SplitArgs {
        &self.split_args
    }

    /// Append one validated report to the buffer of `mmsi`.
    pub fn add(&mut self, mmsi: Mmsi, position: Position) {
        self.trajectories.entry(mmsi).or_default().push(position);
    }

    /// Replace the buffer of `mmsi` with `trajectory`.
    pub fn add_trajectory(&mut self, mmsi: Mmsi, trajectory: Trajectory) {
        self.trajectories.insert(mmsi, trajectory);
    }

    /// Read delimiter-separated AIS records line by line and add the valid ones.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: Line source, e.g. a locked stdin.
    /// * `delimiter`: Set of column separator characters.
    /// * `policy`: Whether a malformed line aborts ingestion or is skipped.
    ///
    /// Return
    /// ----------
    /// * [`IngestStats`] on success.
    /// * [`SeqMakerError::InvalidRecordFormat`] (1-based line number) on the first malformed
    ///   line under [`FormatPolicy::FailFast`]. Records read before stay in the store.
    /// * [`SeqMakerError::IoError`] if reading fails.
    pub fn ingest<R: BufRead>(
        &mut self,
        reader: R,
        delimiter: &str,
        policy: FormatPolicy,
    ) -> Result<IngestStats, SeqMakerError> {
        let mut stats = IngestStats::default();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            stats.lines += 1;

            match parse_ais_record(&line, delimiter) {
                Ok(Some((mmsi, position))) => {
                    self.add(mmsi, position);
                    stats.accepted += 1;
                }
                Ok(None) => stats.invalid += 1,
                Err(source) => match policy {
                    FormatPolicy::FailFast => {
                        return Err(SeqMakerError::InvalidRecordFormat { line: i + 1, source });
                    }
                    FormatPolicy::SkipMalformed => {
                        debug!(line = i + 1, error = %source, "skipping malformed record");
                        stats.malformed += 1;
                    }
                },
            }
        }

        info!(
            %stats,
            vessels = self.number_of_trajectories(),
            "ingestion complete"
        );
        Ok(stats)
    }

    #[inline]
    pub fn number_of_trajectories(&self) -> usize {
        self.trajectories.len()
    }

    #[inline]
    pub fn total_positions(&self) -> usize {
        self.trajectories.values().map(Vec::len).sum()
    }

    /// Drain every vessel through `handler`.
    ///
    /// Vessels are visited in ascending MMSI order. See the module documentation for the
    /// cleaning steps and the coverage gate. Both use `split_args`: the spike filter tests
    /// jumps against its `ds_max`, the gate its `seq_length`, `dti` and `dt_max`. The
    /// handler must segment with the same parameters.
    ///
    /// Return
    /// ----------
    /// * `Ok(())` once every vessel has been processed or skipped.
    /// * The first error returned by `handler`. Remaining vessels are discarded.
    pub fn run_with<H: TrajectoryHandler>(
        &mut self,
        handler: &mut H,
        split_args: &SplitArgs,
        apply_low_pass_filter: bool,
    ) -> Result<(), SeqMakerError> {
        let mut trajectories: Vec<(Mmsi, Trajectory)> = self.trajectories.drain().collect();
        trajectories.sort_unstable_by_key(|(mmsi, _)| *mmsi);

        handler.init(trajectories.len());

        #[cfg(feature = "progress")]
        let mut progress = progress_bar::RunProgress::new(trajectories.len());

        let (mut processed, mut skipped) = (0usize, 0usize);
        for (mmsi, mut trajectory) in trajectories {
            clean(&mut trajectory, split_args, apply_low_pass_filter);

            if has_coverage(&trajectory, split_args) {
                handler.process(mmsi, &trajectory)?;
                processed += 1;
            } else {
                debug!(mmsi, reports = trajectory.len(), "vessel skipped, not enough coverage");
                skipped += 1;
            }

            #[cfg(feature = "progress")]
            progress.tick(mmsi);
        }

        #[cfg(feature = "progress")]
        progress.finish();

        info!(processed, skipped, "run complete");
        Ok(())
    }

    /// Drain every vessel through `handler`, using the handler's own parameters throughout.
    ///
    /// The parameters given to [`Sequencer::new`] are not used. Diff runs never apply the
    /// spike filter.
    pub fn run(
        &mut self,
        handler: &mut Handler,
        apply_low_pass_filter: bool,
    ) -> Result<(), SeqMakerError> {
        let split_args = handler.split_args();
        let apply_low_pass_filter =
            apply_low_pass_filter && !matches!(handler, Handler::Diffs(_));
        self.run_with(handler, &split_args, apply_low_pass_filter)
    }

    /// Run a [`SequenceMaker`] and return the resampled sequences per vessel.
    pub fn make_sequences(
        &mut self,
        apply_low_pass_filter: bool,
    ) -> Result<SequenceMap, SeqMakerError> {
        let split_args = self.split_args;
        let mut maker = SequenceMaker::new(split_args);
        self.run_with(&mut maker, &split_args, apply_low_pass_filter)?;
        Ok(maker.into_sequences())
    }

    /// Run a [`SequenceCounter`] and return the drop rate per vessel.
    pub fn drop_rates(
        &mut self,
        apply_low_pass_filter: bool,
    ) -> Result<DropRateMap, SeqMakerError> {
        let split_args = self.split_args;
        let mut counter = SequenceCounter::new(split_args);
        self.run_with(&mut counter, &split_args, apply_low_pass_filter)?;
        Ok(counter.into_drop_rates())
    }

    /// Run a [`SequenceDiff`] with `stride` and return the flat list of differences,
    /// vessels in ascending MMSI order.
    pub fn diffs(&mut self, stride: usize) -> Result<Vec<DiffPair>, SeqMakerError> {
        let mut diff = SequenceDiff::new(stride)?;
        self.run_with(&mut diff, &SequenceDiff::GATING_ARGS, false)?;
        Ok(diff.into_diffs())
    }
}

/// Sort by time, drop duplicate timestamps, optionally remove spikes.
fn clean(trajectory: &mut Trajectory, split_args: &SplitArgs, apply_low_pass_filter: bool) {
    trajectory.sort_by_key(|pos| pos.t);
    trajectory.dedup_by_key(|pos| pos.t);

    if apply_low_pass_filter {
        let ds_max = split_args.ds_max;
        low_pass_filter(trajectory, |a, b| a.x.dist_nm(&b.x) <= ds_max);
    }
}

/// Whether a cleaned trajectory can possibly hold one complete segment.
fn has_coverage(trajectory: &[Position], args: &SplitArgs) -> bool {
    let (Some(first), Some(last)) = (trajectory.first(), trajectory.last()) else {
        return false;
    };

    let target = args.target_duration();
    trajectory.len() as u64 * u64::from(args.dt_max) >= target
        && u64::from(last.t - first.t) >= target
}
