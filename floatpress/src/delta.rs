//! Chooses an encoding key for a batch's bucket-index sequence from the
//! histogram of signed deltas between consecutive indices.

use crate::constants::MAX_ANALYZABLE_DELTA;

/// One entry of the key-selection table: a single key (`key1`, used when
/// `paired_key` is `None`) or a symmetric pair where the even-numbered key
/// gives `+1` the shorter codeword and the odd-numbered key gives `-1` the
/// shorter one. `max_magnitude` is the largest `|delta|` this entry can
/// encode (via explicit codewords alone, or explicit codewords plus a
/// fixed-width suffix for larger magnitudes).
struct KeyRange {
  key_even: u8,
  paired_key: Option<u8>,
  max_magnitude: i32,
}

/// Walked once per batch in increasing order of coverage; replaces the
/// large switch statement over encode-key ranges with a single dispatch
/// over this data table.
const KEY_RANGES: &[KeyRange] = &[
  KeyRange { key_even: 1, paired_key: None, max_magnitude: 1 },
  KeyRange { key_even: 2, paired_key: Some(3), max_magnitude: 2 },
  KeyRange { key_even: 4, paired_key: Some(5), max_magnitude: 3 },
  KeyRange { key_even: 6, paired_key: Some(7), max_magnitude: 4 },
  KeyRange { key_even: 8, paired_key: Some(9), max_magnitude: 5 },
  KeyRange { key_even: 10, paired_key: Some(11), max_magnitude: 6 },
  KeyRange { key_even: 12, paired_key: Some(13), max_magnitude: 10 },
  KeyRange { key_even: 14, paired_key: Some(15), max_magnitude: 12 },
  KeyRange { key_even: 16, paired_key: Some(17), max_magnitude: 20 },
];

/// Computes `(M+, M-, count(+1), count(-1))` for the deltas between
/// consecutive elements of `buckets`.
fn histogram(buckets: &[u8]) -> (i32, i32, u32, u32) {
  let mut max_pos = 0i32;
  let mut max_neg = 0i32;
  let mut count_plus_one = 0u32;
  let mut count_minus_one = 0u32;
  for pair in buckets.windows(2) {
    let d = pair[1] as i32 - pair[0] as i32;
    if d > 0 {
      max_pos = max_pos.max(d);
      if d == 1 {
        count_plus_one += 1;
      }
    } else if d < 0 {
      max_neg = max_neg.max(-d);
      if d == -1 {
        count_minus_one += 1;
      }
    }
  }
  (max_pos, max_neg, count_plus_one, count_minus_one)
}

/// Selects an encoding key (`0..=17`) for `buckets`, a batch's sequence of
/// bucket indices. Key `0` means "no delta coding; store indices
/// verbatim" — returned both when deltas exceed the analyzable range and
/// when every key's actual coverage is narrower than the deltas present
/// (a gap exists between key 16/17's coverage of magnitude 20 and the
/// blanket magnitude-26 cutoff below; magnitudes 21..=26 fall through to
/// key 0 rather than a key that cannot actually represent them).
pub(crate) fn choose_key(buckets: &[u8]) -> u8 {
  let (max_pos, max_neg, count_plus_one, count_minus_one) = histogram(buckets);
  let worst = max_pos.max(max_neg);
  if worst > MAX_ANALYZABLE_DELTA {
    return 0;
  }
  for range in KEY_RANGES {
    if worst <= range.max_magnitude {
      return match range.paired_key {
        None => range.key_even,
        Some(odd) => {
          if count_plus_one >= count_minus_one {
            range.key_even
          } else {
            odd
          }
        }
      };
    }
  }
  0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn constant_sequence_picks_key_one() {
    assert_eq!(choose_key(&[5, 5, 5, 5]), 1);
  }

  #[test]
  fn all_plus_one_deltas_favor_even_key() {
    // deltas: +1, +1, +1 -> count(+1) > count(-1), so the even key wins.
    assert_eq!(choose_key(&[0, 1, 2, 3]), 2);
  }

  #[test]
  fn all_minus_one_deltas_favor_odd_key() {
    assert_eq!(choose_key(&[3, 2, 1, 0]), 3);
  }

  #[test]
  fn magnitude_up_to_twenty_uses_key_sixteen_or_seventeen() {
    assert_eq!(choose_key(&[0, 20]), 16);
    // four -1 deltas outweigh the single -16 delta's lack of a +1/-1 vote,
    // so the odd ("-1 short") variant wins the tie-break.
    assert_eq!(choose_key(&[20, 19, 18, 17, 16, 0]), 17);
  }

  #[test]
  fn magnitude_in_uncovered_gap_falls_back_to_key_zero() {
    assert_eq!(choose_key(&[0, 21]), 0);
    assert_eq!(choose_key(&[0, 26]), 0);
  }

  #[test]
  fn magnitude_beyond_twenty_six_falls_back_to_key_zero() {
    assert_eq!(choose_key(&[0, 27]), 0);
  }
}
