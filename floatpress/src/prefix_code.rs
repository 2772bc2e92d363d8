//! Encodes and decodes signed bucket-index deltas as Elias-like
//! self-delimiting prefix codes, one codeword family per encoding key.
//!
//! The codeword set for each key is expressed as data (a table of literal
//! bit-strings plus, for keys with large-magnitude coverage, a
//! prefix-plus-fixed-width-suffix rule) rather than as a hand-unrolled
//! switch per key — this is the single dispatch the delta analyser's key
//! table was designed to feed.

use crate::bit_stream::{BitReader, BitWriter};
use crate::errors::{Error, Result};

/// One literal codeword: the delta it represents, and its bits written
/// left-to-right in the order they are emitted (so `"11100"` means "write
/// a 1, then a 1, then a 1, then a 0, then a 0").
struct Literal {
  delta: i32,
  pattern: &'static str,
}

/// The large-magnitude fallback for a key: sign is carried by which of
/// `plus_prefix`/`minus_prefix` matched, and the magnitude beyond `base`
/// is carried by `suffix_bits` more bits, LSB first.
struct LargeRule {
  base: i32,
  suffix_bits: u32,
  plus_prefix: &'static str,
  minus_prefix: &'static str,
}

struct KeyTable {
  literals: &'static [Literal],
  large: Option<LargeRule>,
}

macro_rules! lit {
  ($delta:expr, $pattern:expr) => {
    Literal { delta: $delta, pattern: $pattern }
  };
}

const KEY_1: KeyTable = KeyTable {
  literals: &[lit!(0, "0"), lit!(1, "10"), lit!(-1, "11")],
  large: None,
};

const KEY_2: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "10"),
    lit!(-1, "110"),
    lit!(2, "1110"),
    lit!(-2, "1111"),
  ],
  large: None,
};

const KEY_3: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "110"),
    lit!(-1, "10"),
    lit!(2, "1110"),
    lit!(-2, "1111"),
  ],
  large: None,
};

const KEY_4: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "10"),
    lit!(-1, "110"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
    lit!(3, "11110"),
    lit!(-3, "11111"),
  ],
  large: None,
};

const KEY_5: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "110"),
    lit!(-1, "10"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
    lit!(3, "11110"),
    lit!(-3, "11111"),
  ],
  large: None,
};

const KEY_6: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "10"),
    lit!(-1, "110"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
    lit!(3, "111100"),
    lit!(-3, "111101"),
    lit!(4, "111110"),
    lit!(-4, "111111"),
  ],
  large: None,
};

const KEY_7: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "110"),
    lit!(-1, "10"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
    lit!(3, "111100"),
    lit!(-3, "111101"),
    lit!(4, "111110"),
    lit!(-4, "111111"),
  ],
  large: None,
};

const KEY_8: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "10"),
    lit!(-1, "110"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
    lit!(3, "111100"),
    lit!(-3, "111101"),
    lit!(4, "1111100"),
    lit!(-4, "1111101"),
    lit!(5, "1111110"),
    lit!(-5, "1111111"),
  ],
  large: None,
};

const KEY_9: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "110"),
    lit!(-1, "10"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
    lit!(3, "111100"),
    lit!(-3, "111101"),
    lit!(4, "1111100"),
    lit!(-4, "1111101"),
    lit!(5, "1111110"),
    lit!(-5, "1111111"),
  ],
  large: None,
};

const KEY_10: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "10"),
    lit!(-1, "110"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
  ],
  large: Some(LargeRule { base: 3, suffix_bits: 2, plus_prefix: "11110", minus_prefix: "11111" }),
};

const KEY_11: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "110"),
    lit!(-1, "10"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
  ],
  large: Some(LargeRule { base: 3, suffix_bits: 2, plus_prefix: "11110", minus_prefix: "11111" }),
};

const KEY_12: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "10"),
    lit!(-1, "110"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
  ],
  large: Some(LargeRule { base: 3, suffix_bits: 3, plus_prefix: "11110", minus_prefix: "11111" }),
};

const KEY_13: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "110"),
    lit!(-1, "10"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
  ],
  large: Some(LargeRule { base: 3, suffix_bits: 3, plus_prefix: "11110", minus_prefix: "11111" }),
};

const KEY_14: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "10"),
    lit!(-1, "110"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
    lit!(3, "111100"),
    lit!(-3, "111101"),
    lit!(4, "1111100"),
    lit!(-4, "1111101"),
  ],
  large: Some(LargeRule { base: 5, suffix_bits: 3, plus_prefix: "1111110", minus_prefix: "1111111" }),
};

const KEY_15: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "110"),
    lit!(-1, "10"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
    lit!(3, "111100"),
    lit!(-3, "111101"),
    lit!(4, "1111100"),
    lit!(-4, "1111101"),
  ],
  large: Some(LargeRule { base: 5, suffix_bits: 3, plus_prefix: "1111110", minus_prefix: "1111111" }),
};

const KEY_16: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "10"),
    lit!(-1, "110"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
    lit!(3, "111100"),
    lit!(-3, "111101"),
    lit!(4, "1111100"),
    lit!(-4, "1111101"),
  ],
  large: Some(LargeRule { base: 5, suffix_bits: 4, plus_prefix: "1111110", minus_prefix: "1111111" }),
};

const KEY_17: KeyTable = KeyTable {
  literals: &[
    lit!(0, "0"),
    lit!(1, "110"),
    lit!(-1, "10"),
    lit!(2, "11100"),
    lit!(-2, "11101"),
    lit!(3, "111100"),
    lit!(-3, "111101"),
    lit!(4, "1111100"),
    lit!(-4, "1111101"),
  ],
  large: Some(LargeRule { base: 5, suffix_bits: 4, plus_prefix: "1111110", minus_prefix: "1111111" }),
};

fn key_table(key: u8) -> Result<&'static KeyTable> {
  Ok(match key {
    1 => &KEY_1,
    2 => &KEY_2,
    3 => &KEY_3,
    4 => &KEY_4,
    5 => &KEY_5,
    6 => &KEY_6,
    7 => &KEY_7,
    8 => &KEY_8,
    9 => &KEY_9,
    10 => &KEY_10,
    11 => &KEY_11,
    12 => &KEY_12,
    13 => &KEY_13,
    14 => &KEY_14,
    15 => &KEY_15,
    16 => &KEY_16,
    17 => &KEY_17,
    other => return Err(Error::internal_invariant(format!("no codec defined for key {}", other))),
  })
}

/// Parses a left-to-right bit pattern string into `(bit_len, value)` with
/// `value`'s bit `k` equal to the pattern's `k`-th character — i.e. the
/// pattern read left to right is exactly the order bits are written by
/// `BitWriter::write_bits`, which is LSB first.
fn parse_pattern(pattern: &str) -> (u32, u64) {
  let len = pattern.len() as u32;
  let mut value = 0u64;
  for (k, c) in pattern.chars().enumerate() {
    if c == '1' {
      value |= 1 << k;
    }
  }
  (len, value)
}

/// Encodes one delta under the codeword family for `key`.
pub(crate) fn encode_delta(writer: &mut BitWriter, key: u8, delta: i32) -> Result<()> {
  let table = key_table(key)?;
  if let Some(literal) = table.literals.iter().find(|l| l.delta == delta) {
    let (len, value) = parse_pattern(literal.pattern);
    writer.write_bits(len, value);
    return Ok(());
  }
  if let Some(large) = &table.large {
    let magnitude = delta.unsigned_abs() as i32;
    if magnitude < large.base {
      return Err(Error::internal_invariant(format!(
        "delta {} has no literal codeword for key {} and is smaller than the large-rule base {}",
        delta, key, large.base,
      )));
    }
    let offset = (magnitude - large.base) as u64;
    let max_offset = (1u64 << large.suffix_bits) - 1;
    if offset > max_offset {
      return Err(Error::internal_invariant(format!(
        "delta {} exceeds key {}'s coverage (max offset {})",
        delta, key, max_offset,
      )));
    }
    let prefix = if delta > 0 { large.plus_prefix } else { large.minus_prefix };
    let (prefix_len, prefix_value) = parse_pattern(prefix);
    writer.write_bits(prefix_len, prefix_value);
    writer.write_bits(large.suffix_bits, offset);
    return Ok(());
  }
  Err(Error::internal_invariant(format!("delta {} not representable under key {}", delta, key)))
}

/// Decodes one delta under the codeword family for `key`, walking the
/// prefix tree bit by bit (the code set for every key is prefix-free by
/// construction, so the first match is unambiguous).
pub(crate) fn decode_delta(reader: &mut BitReader, key: u8) -> Result<i32> {
  let table = key_table(key)?;
  let mut len = 0u32;
  let mut value = 0u64;
  loop {
    let bit = reader.read_bit()?;
    value |= (bit as u64) << len;
    len += 1;
    if let Some(literal) = table.literals.iter().find(|l| {
      let (l_len, l_val) = parse_pattern(l.pattern);
      l_len == len && l_val == value
    }) {
      return Ok(literal.delta);
    }
    if let Some(large) = &table.large {
      let (plus_len, plus_val) = parse_pattern(large.plus_prefix);
      if plus_len == len && plus_val == value {
        let offset = reader.read_bits(large.suffix_bits)? as i32;
        return Ok(large.base + offset);
      }
      let (minus_len, minus_val) = parse_pattern(large.minus_prefix);
      if minus_len == len && minus_val == value {
        let offset = reader.read_bits(large.suffix_bits)? as i32;
        return Ok(-(large.base + offset));
      }
    }
    if len > 16 {
      return Err(Error::malformed("prefix code did not terminate within 16 bits"));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn round_trip(key: u8, deltas: &[i32]) {
    let mut writer = BitWriter::new();
    for &d in deltas {
      encode_delta(&mut writer, key, d).unwrap();
    }
    let bytes = writer.into_bytes();
    let mut reader = BitReader::new(&bytes);
    for &d in deltas {
      assert_eq!(decode_delta(&mut reader, key).unwrap(), d, "key {} delta {}", key, d);
    }
  }

  #[test]
  fn every_key_round_trips_its_explicit_deltas() {
    let cases: &[(u8, &[i32])] = &[
      (1, &[0, 1, -1]),
      (2, &[0, 1, -1, 2, -2]),
      (3, &[0, 1, -1, 2, -2]),
      (4, &[0, 1, -1, 2, -2, 3, -3]),
      (8, &[0, 1, -1, 2, -2, 3, -3, 4, -4, 5, -5]),
      (9, &[0, 1, -1, 2, -2, 3, -3, 4, -4, 5, -5]),
    ];
    for &(key, deltas) in cases {
      round_trip(key, deltas);
    }
  }

  #[test]
  fn large_rule_round_trips_full_coverage() {
    // key 10/11 cover |delta| in 3..=6 via a 2-bit suffix.
    round_trip(10, &[3, -3, 4, -4, 5, -5, 6, -6]);
    // key 16/17 cover |delta| in 5..=20 via a 4-bit suffix.
    round_trip(16, &[5, -5, 12, -12, 20, -20]);
  }

  #[test]
  fn mixed_sequence_round_trips_in_order() {
    round_trip(12, &[0, 1, -1, 2, -2, 3, -3, 10, -10, 0, 1]);
  }

  #[test]
  fn encoding_a_delta_outside_coverage_is_an_internal_invariant_error() {
    let mut writer = BitWriter::new();
    assert!(encode_delta(&mut writer, 16, 21).is_err());
  }

  #[test]
  fn encoding_under_an_unknown_key_is_an_internal_invariant_error() {
    let mut writer = BitWriter::new();
    assert!(encode_delta(&mut writer, 18, 0).is_err());
  }
}
