//! Maps normalized floats in `[1.0, 2.0)` to bucket indices and back.

use crate::constants::{AccuracyTier, NEAR_TWO_CLAMP};
use crate::errors::{Error, Result};

/// Returns the smallest index `i` such that `v < table[i]`, or `None` if
/// `v` is not less than any entry (i.e. `v >= 2.0`, which bucketize
/// precludes by clamping first).
pub(crate) fn value_to_bucket(v: f32, tier: AccuracyTier) -> Option<u8> {
  let table = tier.table();
  let idx = table.partition_point(|&bound| bound <= v);
  if idx == table.len() {
    None
  } else {
    Some(idx as u8)
  }
}

/// Midpoint of bucket `i`'s interval: `(table[i-1], table[i]]`, with
/// `table[-1]` treated as `1.0`.
pub(crate) fn bucket_to_value(i: u8, tier: AccuracyTier) -> f32 {
  let table = tier.table();
  let idx = i as usize;
  let prev = if idx == 0 { 1.0 } else { table[idx - 1] };
  let next = table[idx];
  (prev + next) / 2.0
}

/// Converts a batch of samples into bucket indices, normalizing each by
/// `min` first. Precondition (checked by the caller, the batcher): `max <
/// 2*min` and `min > 0`.
pub(crate) fn bucketize(xs: &[f32], min: f32, tier: AccuracyTier) -> Result<Vec<u8>> {
  let mut out = Vec::with_capacity(xs.len());
  for &x in xs {
    let mut v = x / min;
    if v >= 2.0 {
      v = NEAR_TWO_CLAMP;
    }
    if v < 1.0 {
      return Err(Error::out_of_range(v));
    }
    match value_to_bucket(v, tier) {
      Some(b) => out.push(b),
      None => return Err(Error::out_of_range(v)),
    }
  }
  Ok(out)
}

/// Recovers the (approximate) original values from bucket indices.
pub(crate) fn unbucketize(indices: &[u8], min: f32, tier: AccuracyTier) -> Vec<f32> {
  indices
    .iter()
    .map(|&i| bucket_to_value(i, tier) * min)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn value_to_bucket_is_monotonic_in_v() {
    let tier = AccuracyTier::QuarterPercent;
    let mut prev_bucket = 0u8;
    let mut v = 1.0001f32;
    while v < 1.999 {
      let b = value_to_bucket(v, tier).unwrap();
      assert!(b >= prev_bucket);
      prev_bucket = b;
      v += 0.01;
    }
  }

  #[test]
  fn bucket_to_value_round_trips_within_half_bucket_width() {
    let tier = AccuracyTier::TenthPercent;
    for i in 0..tier.table().len() as u8 {
      let v = bucket_to_value(i, tier);
      let recovered_bucket = value_to_bucket(v, tier).unwrap();
      assert_eq!(recovered_bucket, i);
    }
  }

  #[test]
  fn bucketize_clamps_near_two() {
    let tier = AccuracyTier::HalfPercent;
    let xs = [1.9999999f32 * 10.0];
    let buckets = bucketize(&xs, 10.0, tier).unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0] as usize, tier.table().len() - 1);
  }

  #[test]
  fn bucketize_rejects_values_below_min() {
    let tier = AccuracyTier::HalfPercent;
    let xs = [5.0f32];
    assert!(bucketize(&xs, 10.0, tier).is_err());
  }

  #[test]
  fn bucketize_unbucketize_round_trip_is_within_tier_error() {
    let tier = AccuracyTier::TenthPercent;
    let xs = [10.0f32, 10.5, 11.2, 12.3, 19.9];
    let min = 10.0f32;
    let buckets = bucketize(&xs, min, tier).unwrap();
    let ys = unbucketize(&buckets, min, tier);
    for (&x, &y) in xs.iter().zip(ys.iter()) {
      let rel_err = ((y - x) / x).abs();
      assert!(rel_err < 0.002, "rel_err {} too large for TenthPercent", rel_err);
    }
  }
}
