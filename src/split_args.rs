//! # Segmentation parameters
//!
//! [`SplitArgs`] carries the five knobs of the segmentation engine. It can be built
//! field by field (all fields are public) or through the validating
//! [`SplitArgsBuilder`].
use std::cmp::Ordering::{Equal, Greater};

use crate::{
    constants::{Knot, NauticalMile, Timestamp},
    seqmaker_errors::SeqMakerError,
};

/// Parameters controlling segmentation, resampling and admission.
///
/// Fields
/// -----------------
/// * `seq_length` – number of grid intervals per output sequence. A sequence holds
///   `seq_length + 1` grid points and spans `seq_length × dti` seconds.
/// * `dt_max` – largest accepted time gap (s) between consecutive reports of a segment.
/// * `dti` – grid spacing (s) of the resampled sequence.
/// * `ds_max` – largest accepted jump (nm) between consecutive reports. Also the
///   plausibility threshold of the spike filter.
/// * `v_min` – minimum average speed (kt) over a resampled sequence; slower sequences
///   are discarded.
///
/// Defaults
/// -----------------
/// * `seq_length`: 3600
/// * `dt_max`: 60 s
/// * `dti`: 6 s
/// * `ds_max`: 0.1 nm
/// * `v_min`: 0 kt
///
/// See also
/// ------------
/// * [`crate::seq::split`] – Consumes these parameters.
/// * [`SplitArgsBuilder::build`] – Validation rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitArgs {
    pub seq_length: u32,
    pub dt_max: Timestamp,
    pub dti: Timestamp,
    pub ds_max: NauticalMile,
    pub v_min: Knot,
}

impl SplitArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SplitArgsBuilder {
        SplitArgsBuilder::new()
    }

    /// Time span (s) covered by one output sequence, `seq_length × dti`.
    #[inline]
    pub fn target_duration(&self) -> u64 {
        u64::from(self.seq_length) * u64::from(self.dti)
    }

    /// Number of grid points of one output sequence, `seq_length + 1`.
    #[inline]
    pub fn grid_points(&self) -> usize {
        self.seq_length as usize + 1
    }
}

impl Default for SplitArgs {
    fn default() -> Self {
        SplitArgs {
            seq_length: 3600,
            dt_max: 60,
            dti: 6,
            ds_max: 0.1,
            v_min: 0.0,
        }
    }
}

/// Builder for [`SplitArgs`], with validation.
#[derive(Debug, Clone)]
pub struct SplitArgsBuilder {
    args: SplitArgs,
}

impl Default for SplitArgsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SplitArgsBuilder {
    pub fn new() -> Self {
        Self {
            args: SplitArgs::default(),
        }
    }

    pub fn seq_length(mut self, v: u32) -> Self {
        self.args.seq_length = v;
        self
    }
    pub fn dt_max(mut self, v: Timestamp) -> Self {
        self.args.dt_max = v;
        self
    }
    pub fn dti(mut self, v: Timestamp) -> Self {
        self.args.dti = v;
        self
    }
    pub fn ds_max(mut self, v: NauticalMile) -> Self {
        self.args.ds_max = v;
        self
    }
    pub fn v_min(mut self, v: Knot) -> Self {
        self.args.v_min = v;
        self
    }

    /// Return true iff x > 0.0, finite and comparable.
    #[inline]
    fn gt0(x: f64) -> bool {
        x.is_finite() && x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0, finite and comparable.
    #[inline]
    fn ge0(x: f64) -> bool {
        x.is_finite() && matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `seq_length ≥ 1`, `dt_max ≥ 1`, `dti ≥ 1`
    /// * `ds_max > 0`, finite
    /// * `v_min ≥ 0`, finite
    ///
    /// Returns
    /// -----------------
    /// * `Ok(SplitArgs)` if all rules hold.
    /// * `Err(SeqMakerError::InvalidSplitParameter)` naming the first violated rule.
    pub fn build(self) -> Result<SplitArgs, SeqMakerError> {
        let a = &self.args;

        if a.seq_length == 0 {
            return Err(SeqMakerError::InvalidSplitParameter(
                "seq_length must be >= 1".into(),
            ));
        }
        if a.dt_max == 0 {
            return Err(SeqMakerError::InvalidSplitParameter(
                "dt_max must be >= 1".into(),
            ));
        }
        if a.dti == 0 {
            return Err(SeqMakerError::InvalidSplitParameter(
                "dti must be >= 1".into(),
            ));
        }
        if !Self::gt0(a.ds_max) {
            return Err(SeqMakerError::InvalidSplitParameter(
                "ds_max must be > 0".into(),
            ));
        }
        if !Self::ge0(a.v_min) {
            return Err(SeqMakerError::InvalidSplitParameter(
                "v_min must be >= 0".into(),
            ));
        }

        Ok(self.args)
    }
}
