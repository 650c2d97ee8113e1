//! # Constants and type definitions for seqmaker
//!
//! This module centralizes the **unit conversions**, **validity bounds**, and **common type
//! definitions** used throughout the crate.
//!
//! ## Overview
//!
//! - AIS fixed-point coordinate scale (1/600000 degree, i.e. 1/10000 minute)
//! - Degree ↔ nautical mile and knot ↔ nm/s conversions
//! - MMSI and slot-second validity bounds
//! - Core type aliases shared by the geo model, the segmentation engine and the handlers

use ahash::RandomState;
use std::collections::HashMap;

use crate::ais::Trajectory;

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of AIS fixed-point units in one degree (1/10000 minute resolution)
pub const AIS_UNITS_PER_DEGREE: f64 = 600_000.0;

/// Nautical miles per degree of arc along a meridian
pub const NM_PER_DEGREE: f64 = 60.0;

/// Knots → nautical miles per second
pub const NM_PER_SECOND_PER_KNOT: f64 = 1.0 / 3600.0;

/// Scale of the spatial component of an adjacent difference (1/10000 nm)
pub const DIFF_DISTANCE_SCALE: f64 = 10_000.0;

// -------------------------------------------------------------------------------------------------
// Validity bounds
// -------------------------------------------------------------------------------------------------

/// Smallest accepted MMSI
pub const MIN_MMSI: Mmsi = 200_000_000;

/// Largest accepted MMSI
pub const MAX_MMSI: Mmsi = 799_999_999;

/// Largest accepted AIS slot second
pub const MAX_SLOT_SECOND: Timestamp = 59;

/// Seconds in one minute
pub const ONE_MINUTE: Timestamp = 60;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Vessel identifier
pub type Mmsi = i32;
/// Timestamp in whole seconds (UTC epoch)
pub type Timestamp = u32;
/// Fixed-point coordinate in 1/600000 degree
pub type AisUnit = i32;
/// Distance in nautical miles
pub type NauticalMile = f64;
/// Angle in degrees
pub type Degree = f64;
/// Speed in knots
pub type Knot = f64;

/// A full set of per-vessel report buffers.
///
/// The key is the [`Mmsi`] of the vessel, the value its (not yet cleaned) [`Trajectory`].
/// Uses [`ahash`](https://docs.rs/ahash) for fast hashing.
pub type TrajectorySet = HashMap<Mmsi, Trajectory, RandomState>;
