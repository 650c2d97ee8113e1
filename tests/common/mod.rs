#![allow(dead_code)]

use seqmaker::{
    constants::{Mmsi, AIS_UNITS_PER_DEGREE},
    Point, Position, SplitArgs,
};

pub const MMSI: Mmsi = 200000000;

/// 5 s grid, 6 points per sequence, 15 s / 5 AIS units thresholds.
pub fn small_split_args() -> SplitArgs {
    SplitArgs {
        seq_length: 5,
        dt_max: 15,
        dti: 5,
        ds_max: 5. / (AIS_UNITS_PER_DEGREE / 60.),
        v_min: 0.,
    }
}

/// A straight track sampled every 10 s, with spikes and one late out-of-order report.
pub fn noisy_trajectory() -> Vec<Position> {
    vec![
        Position::new(0, 0, 0),
        Position::new(10, 4, 2),
        Position::new(11, 99, 4),
        Position::new(20, 8, 4),
        Position::new(30, 12, 6),
        Position::new(31, 16, 8),
        Position::new(40, 16, 8),
        Position::new(41, 20, 99),
        Position::new(42, 20, 99),
        Position::new(50, 20, 10),
        Position::new(60, 24, 12),
        Position::new(70, 28, 14),
        Position::new(80, 32, 16),
        Position::new(90, 36, 18),
        Position::new(999, 36, 18),
        Position::new(100, 40, 20),
        Position::new(110, 44, 22),
        Position::new(120, 48, 24),
        Position::new(130, 52, 26),
        Position::new(140, 56, 28),
        Position::new(150, 60, 30),
        Position::new(160, 64, 32),
        Position::new(161, 64, 99),
        Position::new(170, 68, 34),
        Position::new(180, 72, 36),
        Position::new(190, 76, 38),
    ]
}

/// The four sequences extracted from [`noisy_trajectory`] with the low pass filter on.
pub fn noisy_trajectory_sequences() -> Vec<Point> {
    [(0, 0), (20, 10), (36, 18), (52, 26)]
        .into_iter()
        .flat_map(|(lat, lon)| (0..6).map(move |i| Point::new(lat + 2 * i, lon + i)))
        .collect()
}

/// Render positions as `recv, mmsi, slot, lat, lon` lines, slot second equal to the
/// reception second.
pub fn to_records(mmsi: Mmsi, base_time: u32, trajectory: &[Position]) -> String {
    trajectory
        .iter()
        .map(|pos| {
            let t = base_time + pos.t;
            format!(
                "{t}.005, {mmsi}, {}, {}, {}\n",
                t % 60,
                pos.x.latitude,
                pos.x.longitude
            )
        })
        .collect()
}
