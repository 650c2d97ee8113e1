//! Numeric helpers shared by the segmentation engine and the handlers.
//!
//! * [`adjacent_diff`] – strided pairwise transform, lazy.
//! * [`time_recorded`] – quantize a reception time onto the AIS slot second.
//! * [`low_pass_filter`] – single-pass removal of isolated outliers.
//! * [`parse_leading`] – integer prefix parsing for raw text columns.
use std::str::FromStr;

use itertools::Itertools;

use crate::constants::{Timestamp, MAX_SLOT_SECOND, ONE_MINUTE};

/// Lazily yield `op(items[i], items[i + stride])` for `i = 0 … len - stride - 1`.
///
/// Empty when `items.len() <= stride`.
///
/// Arguments
/// -----------------
/// * `items`: The input slice.
/// * `stride`: Distance between the two elements of each pair.
/// * `op`: Binary operation applied to `(earlier, later)`.
///
/// See also
/// ------------
/// * [`crate::ais::acc_dist_nm`] – Path length with `stride = 1`.
/// * [`crate::sequencer::seq_diff::SequenceDiff`] – Time/distance differences with any stride.
pub fn adjacent_diff<'a, T, R, F>(
    items: &'a [T],
    stride: usize,
    mut op: F,
) -> impl Iterator<Item = R> + 'a
where
    R: 'a,
    F: FnMut(&'a T, &'a T) -> R + 'a,
{
    items
        .iter()
        .zip(items.iter().skip(stride))
        .map(move |(a, b)| op(a, b))
}

/// Estimate the transmission time of a report from its reception time and AIS slot second.
///
/// The slot second only fixes the second within a minute. The minute is chosen so that
/// the result lies within half a minute of the reception time: a slot far ahead of the
/// received second belongs to the previous minute, a slot far behind it to the next one.
///
/// Arguments
/// -----------------
/// * `recv`: Reception time in whole seconds.
/// * `slot`: Slot second, `0..=59`.
///
/// Return
/// ----------
/// * `None` if `recv == 0`, if `slot > 59`, or if the result would be negative.
/// * The quantized time otherwise.
pub fn time_recorded(recv: Timestamp, slot: Timestamp) -> Option<Timestamp> {
    const HALF_MINUTE: i64 = ONE_MINUTE as i64 / 2;

    if recv == 0 || slot > MAX_SLOT_SECOND {
        return None;
    }

    let sec = recv % ONE_MINUTE;
    let same_minute = (recv - sec) as i64 + slot as i64;
    let offset = sec as i64 - slot as i64;

    let t = if offset > HALF_MINUTE {
        same_minute + ONE_MINUTE as i64
    } else if offset <= -HALF_MINUTE {
        same_minute - ONE_MINUTE as i64
    } else {
        same_minute
    };

    Timestamp::try_from(t).ok()
}

/// Text variant of [`time_recorded`]: fractional seconds in `recv` are truncated.
pub fn time_recorded_str(recv: &str, slot: &str) -> Option<Timestamp> {
    let recv = parse_leading::<Timestamp>(recv).unwrap_or(0);
    let slot = parse_leading::<Timestamp>(slot).unwrap_or(MAX_SLOT_SECOND + 1);
    time_recorded(recv, slot)
}

/// Remove isolated outliers from a time-ordered sequence, in place.
///
/// A run counter starts at 1, resets to 0 on every valid transition and increments on
/// every invalid one. Each element is kept if the counter is below 2 after evaluating the
/// transition to its successor; the last element is kept only if the counter ends below 1.
///
/// A single bad element is dropped together with its neighbouring invalid transitions.
/// Two or more consecutive outliers that are consistent with each other are kept.
/// A single-element input is emptied.
///
/// Arguments
/// -----------------
/// * `items`: The sequence to filter.
/// * `is_valid`: Whether the transition from the first to the second argument is plausible.
pub fn low_pass_filter<T, F>(items: &mut Vec<T>, mut is_valid: F)
where
    F: FnMut(&T, &T) -> bool,
{
    if items.is_empty() {
        return;
    }

    let mut keep = Vec::with_capacity(items.len());
    let mut acc = 1u32;
    for (a, b) in items.iter().tuple_windows() {
        acc = if is_valid(a, b) { 0 } else { acc + 1 };
        keep.push(acc < 2);
    }
    keep.push(acc < 1);

    let mut flags = keep.into_iter();
    items.retain(|_| flags.next().unwrap_or(false));
}

/// Parse the longest `-?[0-9]+` prefix of `field`.
///
/// `"123.4"` parses as `123`. Returns `None` when no digits lead the field or when
/// the prefix does not fit `T`.
pub fn parse_leading<T: FromStr>(field: &str) -> Option<T> {
    let bytes = field.as_bytes();
    let sign = usize::from(bytes.first() == Some(&b'-'));
    let digits = bytes[sign..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();

    if digits == 0 {
        return None;
    }
    field[..sign + digits].parse().ok()
}
