//! # Segmentation and grid resampling
//!
//! The core of the crate: a single forward pass over a cleaned trajectory that cuts it
//! into gap-free segments of a fixed duration and resamples each segment onto a uniform
//! time grid.
//!
//! ## Overview
//! -----------------
//! * [`interpolate`] – two-pointer linear resampling of a buffer onto `N` evenly
//!   spaced timestamps starting at the first report.
//! * [`split`] – segmentation. A temporal gap (`Δt > dt_max`) or a spatial jump
//!   (`Δs > ds_max`) drops the current segment and starts a new one at the offending
//!   report. Once a segment spans `seq_length × dti` seconds it is resampled to
//!   `seq_length + 1` grid points and admitted if its path length reaches the
//!   minimum-speed threshold.
//! * [`drop_rate`] – same gap/duration bookkeeping without materializing output;
//!   the fraction of reports that never end up in a completed segment.
//!
//! ## Preconditions
//! -----------------
//! Inputs are expected sorted by time and free of duplicate timestamps (see
//! [`crate::sequencer::Sequencer::run`]). A report older than its predecessor counts as
//! a temporal gap.
//!
//! ## Error Semantics
//! -----------------
//! Gaps, short segments and slow segments are silent. Only a violated resampler
//! precondition surfaces as an error ([`SeqMakerError::GridOutOfCoverage`],
//! [`SeqMakerError::DegenerateSegment`]); [`split`] never triggers it on its own.
use crate::{
    ais::{acc_dist_nm, Point, Position},
    constants::{Timestamp, NM_PER_SECOND_PER_KNOT},
    seqmaker_errors::SeqMakerError,
    split_args::SplitArgs,
};

/// Resample `trajectory` onto `n_grid_points` timestamps `t0 + i·dt`, `t0` being the
/// time of the first report.
///
/// For each grid time the bracketing pair of reports is found by advancing a single
/// index, then the position is linearly interpolated with [`Point::interpolate`].
///
/// Arguments
/// -----------------
/// * `trajectory`: Time-ordered reports, at least two.
/// * `n_grid_points`: Number of output points.
/// * `dt`: Grid spacing in seconds.
///
/// Return
/// ----------
/// * `n_grid_points` interpolated points.
/// * [`SeqMakerError::DegenerateSegment`] if fewer than two reports are given.
/// * [`SeqMakerError::GridOutOfCoverage`] if the last grid time lies after the last report.
pub fn interpolate(
    trajectory: &[Position],
    n_grid_points: usize,
    dt: Timestamp,
) -> Result<Vec<Point>, SeqMakerError> {
    let (first, last) = match trajectory {
        [first, .., last] => (first, last),
        _ => return Err(SeqMakerError::DegenerateSegment(trajectory.len())),
    };

    if n_grid_points == 0 {
        return Ok(Vec::new());
    }

    let t0 = u64::from(first.t);
    let t_end = t0 + (n_grid_points as u64 - 1) * u64::from(dt);
    if t_end > u64::from(last.t) {
        return Err(SeqMakerError::GridOutOfCoverage {
            target: t_end,
            last: last.t,
        });
    }

    let mut seq = Vec::with_capacity(n_grid_points);
    let mut j = 0;
    for i in 0..n_grid_points as u64 {
        let ti = t0 + i * u64::from(dt);

        // stops at the last report at the latest, its time is >= t_end >= ti
        while u64::from(trajectory[j + 1].t) < ti {
            j += 1;
        }

        let (p1, p2) = (&trajectory[j], &trajectory[j + 1]);
        let w = (ti as f64 - f64::from(p1.t)) / (f64::from(p2.t) - f64::from(p1.t));
        seq.push(p1.x.interpolate(&p2.x, w));
    }

    Ok(seq)
}

/// Whether `pos` cannot continue a segment ending at `prev`.
#[inline]
fn is_gap(prev: &Position, pos: &Position, args: &SplitArgs) -> bool {
    pos.t
        .checked_sub(prev.t)
        .map_or(true, |dt| dt > args.dt_max)
        || pos.x.dist_nm(&prev.x) > args.ds_max
}

/// Cut a cleaned trajectory into fixed-duration segments and resample them.
///
/// Walks the reports once with a working buffer anchored at `t0`:
///
/// * empty buffer → seed it with the report, `t0 = t`;
/// * gap to the previous report → drop the buffer, restart it with the report;
/// * otherwise append, and once `t - t0 ≥ seq_length × dti` resample the buffer to
///   `seq_length + 1` points spaced `dti` apart. The sequence is kept if its path
///   length is at least `v_min × seq_length × dti / 3600` nm. The buffer is cleared
///   either way.
///
/// Arguments
/// -----------------
/// * `trajectory`: Sorted, deduplicated reports of one vessel.
/// * `args`: Segmentation parameters.
///
/// Return
/// ----------
/// * The concatenation of all admitted sequences, each exactly
///   `seq_length + 1` points long. Empty if none was admitted.
///
/// See also
/// ------------
/// * [`interpolate`] – Grid resampling of a completed segment.
/// * [`drop_rate`] – Bookkeeping variant.
pub fn split(trajectory: &[Position], args: &SplitArgs) -> Result<Vec<Point>, SeqMakerError> {
    let target = args.target_duration();
    let d_min = args.v_min * NM_PER_SECOND_PER_KNOT * target as f64;

    let mut seqs = Vec::with_capacity(trajectory.len());
    let mut buffer: Vec<Position> = Vec::with_capacity(trajectory.len());

    let mut t0 = 0;
    for &pos in trajectory {
        match buffer.last().map(|prev| is_gap(prev, &pos, args)) {
            None | Some(true) => {
                buffer.clear();
                buffer.push(pos);
                t0 = pos.t;
            }
            Some(false) => {
                buffer.push(pos);

                if u64::from(pos.t - t0) >= target {
                    let seq = interpolate(&buffer, args.grid_points(), args.dti)?;
                    if acc_dist_nm(&seq) >= d_min {
                        seqs.extend_from_slice(&seq);
                    }
                    buffer.clear();
                }
            }
        }
    }

    Ok(seqs)
}

/// Fraction of reports that do not end up in a completed segment.
///
/// Mirrors the bookkeeping of [`split`]: a counter `i` of reports since the last
/// anchor is reset to 1 on a gap and added to the total when the segment duration is
/// reached. After a completed segment the next report re-anchors without a gap test.
/// The minimum-speed admission of [`split`] is not taken into account.
///
/// Return
/// ----------
/// * `1 - total / len`, in `[0, 1]`.
/// * `1.0` for an empty trajectory.
pub fn drop_rate(trajectory: &[Position], args: &SplitArgs) -> f64 {
    if trajectory.is_empty() {
        return 1.0;
    }

    let target = args.target_duration();
    let mut total = 0usize;
    let mut i = 0usize;

    let mut last_pos: Option<Position> = None;
    let mut t0 = 0;
    for &pos in trajectory {
        i += 1;

        if i == 1 {
            t0 = pos.t;
        } else if last_pos.is_some_and(|prev| is_gap(&prev, &pos, args)) {
            i = 1;
            t0 = pos.t;
        } else if u64::from(pos.t.saturating_sub(t0)) >= target {
            total += i;
            i = 0;
        }

        last_pos = Some(pos);
    }

    1. - total as f64 / trajectory.len() as f64
}

#[cfg(test)]
mod seq_test {
    use super::*;
    use crate::constants::AIS_UNITS_PER_DEGREE;
    use approx::assert_relative_eq;

    fn split_test_args() -> SplitArgs {
        SplitArgs {
            seq_length: 5,
            dt_max: 15,
            dti: 5,
            // 5 AIS units
            ds_max: 5. / (AIS_UNITS_PER_DEGREE / 60.),
            v_min: 0.,
        }
    }

    fn split_test_trajectory() -> Vec<Position> {
        vec![
            Position::new(0, 0, 0),    // 1.1
            Position::new(10, 4, 2),   // 1.2
            Position::new(20, 8, 4),   // 1.3
            Position::new(30, 12, 6),  // 1.x
            Position::new(40, 16, 8),  // 2.1
            Position::new(50, 20, 10), // 2.2
            Position::new(60, 24, 12), // 2.3
            Position::new(70, 28, 14), // 2.x
            Position::new(999, 32, 16),
            Position::new(90, 36, 18),  // 3.1
            Position::new(100, 40, 20), // 3.2
            Position::new(110, 44, 22), // 3.3
            Position::new(120, 48, 24), // 3.x
            Position::new(130, 52, 26),
            Position::new(140, 60, 28),
            Position::new(150, 60, 30),
        ]
    }

    fn split_test_expected() -> Vec<Point> {
        [
            (0, 0),
            (2, 1),
            (4, 2),
            (6, 3),
            (8, 4),
            (10, 5),
            (16, 8),
            (18, 9),
            (20, 10),
            (22, 11),
            (24, 12),
            (26, 13),
            (36, 18),
            (38, 19),
            (40, 20),
            (42, 21),
            (44, 22),
            (46, 23),
        ]
        .into_iter()
        .map(|(lat, lon)| Point::new(lat, lon))
        .collect()
    }

    #[test]
    fn test_interpolation() {
        let trajectory = vec![
            Position::new(0, 0, 0),
            Position::new(20, 4, 2),
            Position::new(50, 10, 5),
        ];
        let expected = [
            Point::new(0, 0),  // t = 0
            Point::new(2, 1),  // t = 10
            Point::new(4, 2),  // t = 20
            Point::new(6, 3),  // t = 30
            Point::new(8, 4),  // t = 40
            Point::new(10, 5), // t = 50
        ];

        let seq = interpolate(&trajectory, expected.len(), 10).unwrap();
        assert_eq!(seq, expected);
    }

    #[test]
    fn test_interpolation_precondition() {
        let trajectory = vec![Position::new(0, 0, 0), Position::new(20, 4, 2)];

        assert_eq!(
            interpolate(&trajectory, 4, 10),
            Err(SeqMakerError::GridOutOfCoverage {
                target: 30,
                last: 20
            })
        );
        assert_eq!(
            interpolate(&trajectory[..1], 1, 10),
            Err(SeqMakerError::DegenerateSegment(1))
        );
        assert_eq!(
            interpolate(&[], 1, 10),
            Err(SeqMakerError::DegenerateSegment(0))
        );
        assert_eq!(interpolate(&trajectory, 0, 10), Ok(Vec::new()));
    }

    #[test]
    fn test_split() {
        let seq = split(&split_test_trajectory(), &split_test_args()).unwrap();
        assert_eq!(seq, split_test_expected());
    }

    #[test]
    fn test_drop_rate() {
        let trajectory = split_test_trajectory();
        let rate = drop_rate(&trajectory, &split_test_args());
        assert_relative_eq!(rate, 4. / trajectory.len() as f64);
    }

    #[test]
    fn test_drop_rate_bounds() {
        let args = split_test_args();
        assert_eq!(drop_rate(&[], &args), 1.0);
        assert_eq!(drop_rate(&[Position::new(0, 0, 0)], &args), 1.0);

        let all_absorbed: Vec<Position> = (0..4).map(|k| Position::new(k * 10, 0, 0)).collect();
        assert_eq!(drop_rate(&all_absorbed, &args), 0.0);
    }

    #[test]
    fn test_split_minimum_speed() {
        // each sequence moves 5 × sqrt(5)/10000 nm in 25 s, about 0.16 kt
        let slow = SplitArgs {
            v_min: 0.1,
            ..split_test_args()
        };
        let fast = SplitArgs {
            v_min: 0.2,
            ..split_test_args()
        };

        assert_eq!(
            split(&split_test_trajectory(), &slow).unwrap(),
            split_test_expected()
        );
        assert!(split(&split_test_trajectory(), &fast).unwrap().is_empty());
    }

    #[test]
    fn test_split_is_idempotent() {
        let args = split_test_args();
        let first = split(&split_test_trajectory(), &args).unwrap();

        // lay every sequence back on its own grid, far apart in time
        let regridded: Vec<Position> = first
            .chunks(args.grid_points())
            .enumerate()
            .flat_map(|(k, seq)| {
                seq.iter().enumerate().map(move |(i, x)| Position {
                    t: 1000 * k as Timestamp + i as Timestamp * args.dti,
                    x: *x,
                })
            })
            .collect();

        let second = split(&regridded, &args).unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn test_split_incomplete_segment_is_dropped() {
        let trajectory = vec![
            Position::new(0, 0, 0),
            Position::new(10, 4, 2),
            Position::new(20, 8, 4),
        ];
        assert!(split(&trajectory, &split_test_args()).unwrap().is_empty());
    }
}
