//! Bucket tables: three fixed partitions of `(1.0, 2.0]`, one per accuracy
//! tier, sized so a value's worst-case reconstruction error (half the width
//! of its bucket) stays under the tier's promised relative error.
//!
//! Table sizes (36 / 71 / 176) and the choice of a geometric progression
//! `ratio^1, ratio^2, …, 2.0` (where `ratio = 2^(1/K)`) both follow directly
//! from the target relative errors in the data model: a geometric step of
//! `K` buckets across a 2x range gives each bucket a half-width of
//! approximately `(ratio - 1) / 2`, which works out to about 1%, 0.5%, and
//! 0.2% for `K = 36, 71, 176` respectively.

use crate::constants::AccuracyTier;
use std::sync::OnceLock;

const HALF_PERCENT_LEN: usize = 36;
const QUARTER_PERCENT_LEN: usize = 71;
const TENTH_PERCENT_LEN: usize = 176;

fn geometric_table(len: usize) -> Vec<f32> {
  let ratio = 2f64.powf(1.0 / len as f64);
  (1..=len)
    .map(|i| if i == len { 2.0 } else { ratio.powi(i as i32) as f32 })
    .collect()
}

static HALF_PERCENT_TABLE: OnceLock<Vec<f32>> = OnceLock::new();
static QUARTER_PERCENT_TABLE: OnceLock<Vec<f32>> = OnceLock::new();
static TENTH_PERCENT_TABLE: OnceLock<Vec<f32>> = OnceLock::new();

impl AccuracyTier {
  /// The tier's bucket table: a monotonically increasing sequence of upper
  /// bounds over `(1.0, 2.0]`, with the final element exactly `2.0`.
  pub fn table(&self) -> &'static [f32] {
    let table = match self {
      AccuracyTier::HalfPercent => HALF_PERCENT_TABLE.get_or_init(|| geometric_table(HALF_PERCENT_LEN)),
      AccuracyTier::QuarterPercent => QUARTER_PERCENT_TABLE.get_or_init(|| geometric_table(QUARTER_PERCENT_LEN)),
      AccuracyTier::TenthPercent => TENTH_PERCENT_TABLE.get_or_init(|| geometric_table(TENTH_PERCENT_LEN)),
    };
    table.as_slice()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_well_formed(tier: AccuracyTier, expected_len: usize) {
    let table = tier.table();
    assert_eq!(table.len(), expected_len);
    assert_eq!(*table.last().unwrap(), 2.0f32);
    for window in table.windows(2) {
      assert!(window[0] < window[1]);
    }
    assert!(table[0] > 1.0);
  }

  #[test]
  fn tables_are_well_formed() {
    assert_well_formed(AccuracyTier::HalfPercent, 36);
    assert_well_formed(AccuracyTier::QuarterPercent, 71);
    assert_well_formed(AccuracyTier::TenthPercent, 176);
  }

  #[test]
  fn tighter_tiers_have_more_buckets() {
    assert!(AccuracyTier::HalfPercent.table().len() < AccuracyTier::QuarterPercent.table().len());
    assert!(AccuracyTier::QuarterPercent.table().len() < AccuracyTier::TenthPercent.table().len());
  }
}
