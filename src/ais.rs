//! # AIS geo model
//!
//! Fixed-point positions as carried by AIS position reports and the two geometric
//! primitives the segmentation engine is built on: a flat-earth **distance** corrected
//! for meridian convergence, and componentwise **linear interpolation**.
//!
//! Units & Conventions
//! -----------------
//! * Coordinates are signed 32-bit integers in **1/600000 degree** (1/10000 minute),
//!   see [`AIS_UNITS_PER_DEGREE`].
//! * Valid latitudes and longitudes both lie in `[-180·600000, 180·600000]`. Values outside
//!   are rejected at ingestion, never clamped.
//! * Distances are in **nautical miles**.
//! * Timestamps are whole seconds.
//!
//! See also
//! ------------
//! * [`crate::seq`] – Segmentation and grid resampling on top of this model.
//! * [`crate::record`] – Validation of raw records into [`Position`]s.
use std::f64::consts::PI;

use crate::{
    constants::{
        AisUnit, Degree, Mmsi, NauticalMile, Timestamp, AIS_UNITS_PER_DEGREE, MAX_MMSI, MIN_MMSI,
        NM_PER_DEGREE,
    },
    utility::adjacent_diff,
};

/// A fixed-point geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub latitude: AisUnit,
    pub longitude: AisUnit,
}

impl Point {
    pub const MAX_LATITUDE: AisUnit = 180 * 600_000;
    pub const MIN_LATITUDE: AisUnit = -Self::MAX_LATITUDE;
    pub const MAX_LONGITUDE: AisUnit = 180 * 600_000;
    pub const MIN_LONGITUDE: AisUnit = -Self::MAX_LONGITUDE;

    pub const fn new(latitude: AisUnit, longitude: AisUnit) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both coordinates lie inside the declared valid range.
    pub const fn is_valid(&self) -> bool {
        Self::MIN_LATITUDE <= self.latitude
            && self.latitude <= Self::MAX_LATITUDE
            && Self::MIN_LONGITUDE <= self.longitude
            && self.longitude <= Self::MAX_LONGITUDE
    }

    /// Distance to another point in nautical miles.
    ///
    /// The longitude delta is scaled by the cosine of the mean latitude, then the
    /// euclidean norm in degrees is converted to nautical miles (60 nm per degree).
    ///
    /// Arguments
    /// -----------------
    /// * `other`: The second point.
    ///
    /// Return
    /// ----------
    /// * The distance in nautical miles. Symmetric, never negative.
    pub fn dist_nm(&self, other: &Point) -> NauticalMile {
        let ais2deg = |ais: i64| -> Degree { ais as f64 / AIS_UNITS_PER_DEGREE };

        // i64 so that the sum of two extreme coordinates cannot overflow
        let (lat1, lat2) = (self.latitude as i64, other.latitude as i64);
        let (lon1, lon2) = (self.longitude as i64, other.longitude as i64);

        let dlat_deg = ais2deg(lat1 - lat2);
        let dlon_deg = ais2deg(lon1 - lon2);
        let mlat_deg = ais2deg(lat1 + lat2) / 2.;

        let cos_mlat = (mlat_deg / 180. * PI).cos();
        let dist_deg = (dlat_deg * dlat_deg + cos_mlat * cos_mlat * dlon_deg * dlon_deg).sqrt();

        dist_deg * NM_PER_DEGREE
    }

    /// Linear blend towards `other` with weight `w ∈ [0, 1]`.
    ///
    /// Each component is computed as `(1 - w)·a + w·b` and **truncated toward zero** to
    /// the fixed-point representation.
    pub fn interpolate(&self, other: &Point, w: f64) -> Point {
        let blend = |a: AisUnit, b: AisUnit| ((1. - w) * a as f64 + w * b as f64) as AisUnit;

        Point {
            latitude: blend(self.latitude, other.latitude),
            longitude: blend(self.longitude, other.longitude),
        }
    }
}

/// A timestamped [`Point`]. Trajectories are ordered by `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub t: Timestamp,
    pub x: Point,
}

impl Position {
    pub const fn new(t: Timestamp, latitude: AisUnit, longitude: AisUnit) -> Self {
        Self {
            t,
            x: Point::new(latitude, longitude),
        }
    }
}

/// The reports of one vessel, in construction order until cleaned.
pub type Trajectory = Vec<Position>;

/// Whether `mmsi` lies in the accepted range `[200000000, 799999999]`.
#[inline]
pub const fn is_valid_mmsi(mmsi: Mmsi) -> bool {
    mmsi >= MIN_MMSI && mmsi <= MAX_MMSI
}

/// Accumulated path length of a polyline in nautical miles.
///
/// Zero for fewer than two points.
pub fn acc_dist_nm(points: &[Point]) -> NauticalMile {
    adjacent_diff(points, 1, |a, b| a.dist_nm(b)).sum()
}
