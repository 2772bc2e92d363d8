//! Carves an input sequence into maximal contiguous batches, each either a
//! literal (length 1 or 2, one truncated by a zero, or a ranged run that
//! stalled at its two-sample seed) or a "ranged" batch of 3+ samples all
//! satisfying `max/min < 2`.

use crate::constants::MAX_BATCH_LEN;

pub(crate) enum Batch<'a> {
  /// A single sample, stored literally: either the input's tail element,
  /// or a run-ending exact zero.
  Literal1(f32),
  /// Two samples, stored literally: the input's last two elements, a run
  /// ending because the second sample is an exact zero, or a would-be
  /// ranged run whose seed pair never extended any further.
  Literal2(f32, f32),
  /// A run of 3 or more samples, none zero, with `max(samples) <
  /// 2*min(samples)`.
  Ranged { samples: &'a [f32], max: f32, min: f32 },
}

/// Splits `xs` into batches per the carving rules: degenerate cases for
/// length 0/1/2 tails and zero-triggered closures, then greedy extension
/// of a max/min-bounded run capped at `MAX_BATCH_LEN` samples.
pub(crate) fn carve_batches(xs: &[f32]) -> Vec<Batch<'_>> {
  let mut batches = Vec::new();
  let mut s = 0usize;
  while s < xs.len() {
    let remaining = xs.len() - s;
    if remaining == 1 {
      batches.push(Batch::Literal1(xs[s]));
      s += 1;
      continue;
    }
    if remaining == 2 {
      batches.push(Batch::Literal2(xs[s], xs[s + 1]));
      s += 2;
      continue;
    }
    if xs[s] == 0.0 {
      batches.push(Batch::Literal1(xs[s]));
      s += 1;
      continue;
    }
    if xs[s + 1] == 0.0 {
      batches.push(Batch::Literal2(xs[s], xs[s + 1]));
      s += 2;
      continue;
    }

    let (mut max, mut min) = if xs[s] >= xs[s + 1] { (xs[s], xs[s + 1]) } else { (xs[s + 1], xs[s]) };
    let mut i = s + 2;
    while i - s < MAX_BATCH_LEN && i < xs.len() {
      let x = xs[i];
      if x == 0.0 {
        break;
      }
      if x > max {
        if x < 2.0 * min {
          max = x;
        } else {
          break;
        }
      } else if x < min {
        if x > max / 2.0 {
          min = x;
        } else {
          break;
        }
      }
      i += 1;
    }
    if i - s <= 2 {
      // The run never extended past its seed pair (the third candidate was
      // a zero or fell outside max/min<2 on the very first check). A
      // length-2 batch must use the plain literal framing, not the
      // max/min/key shape, so the container never sees a `Ranged` batch
      // shorter than 3 samples.
      batches.push(Batch::Literal2(xs[s], xs[s + 1]));
    } else {
      batches.push(Batch::Ranged { samples: &xs[s..i], max, min });
    }
    s = i;
  }
  batches
}
