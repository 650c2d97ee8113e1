//! Progress reporting for [`Sequencer`](super::Sequencer) runs (feature: `progress`).
//!
//! [`RunProgress`] drives an `indicatif` bar over the vessels of one run. The message shows
//! the last MMSI, the time spent on it and a smoothed per-vessel time,
//! `avg ← α·last + (1–α)·avg`, seeded with the first vessel's time.
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use crate::constants::Mmsi;

const BAR_TEMPLATE: &str =
    "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}";

/// Smoothing factor of the per-vessel average.
const SMOOTHING: f64 = 0.2;

pub(crate) struct RunProgress {
    bar: ProgressBar,
    vessel_start: Instant,
    avg_vessel_time: Option<Duration>,
}

impl RunProgress {
    pub(crate) fn new(n_trajectories: usize) -> Self {
        let bar = ProgressBar::new((n_trajectories as u64).max(1));
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.enable_steady_tick(Duration::from_millis(200));

        Self {
            bar,
            vessel_start: Instant::now(),
            avg_vessel_time: None,
        }
    }

    /// Mark the vessel `mmsi` as done.
    pub(crate) fn tick(&mut self, mmsi: Mmsi) {
        let now = Instant::now();
        let last = now.duration_since(self.vessel_start);
        self.vessel_start = now;

        let avg = smooth(self.avg_vessel_time, last);
        self.avg_vessel_time = Some(avg);

        self.bar.set_message(format!(
            "mmsi: {mmsi}, last: {}, avg: {}",
            short_duration(last),
            short_duration(avg)
        ));
        self.bar.inc(1);
    }

    pub(crate) fn finish(self) {
        self.bar.finish_and_clear();
    }
}

fn smooth(avg: Option<Duration>, sample: Duration) -> Duration {
    match avg {
        None => sample,
        Some(avg) => sample.mul_f64(SMOOTHING) + avg.mul_f64(1.0 - SMOOTHING),
    }
}

/// `"253µs"`, `"42ms"` or `"3.14s"` depending on the scale.
fn short_duration(d: Duration) -> String {
    match (d.as_micros(), d.as_millis()) {
        (us, _) if us < 1_000 => format!("{us}µs"),
        (_, ms) if ms < 1_000 => format!("{ms}ms"),
        _ => format!("{:.2}s", d.as_secs_f64()),
    }
}
