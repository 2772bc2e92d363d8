/// Accuracy tier controlling the maximum permitted relative error of a
/// compressed value. Encoded in the container as a 3-bit field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccuracyTier {
  /// Target maximum relative error of roughly 1%.
  HalfPercent,
  /// Target maximum relative error of roughly 0.5%.
  QuarterPercent,
  /// Target maximum relative error of roughly 0.2%.
  TenthPercent,
}

impl AccuracyTier {
  pub(crate) fn to_tag(self) -> u32 {
    match self {
      AccuracyTier::HalfPercent => 0,
      AccuracyTier::QuarterPercent => 1,
      AccuracyTier::TenthPercent => 2,
    }
  }

  pub(crate) fn from_tag(tag: u32) -> crate::errors::Result<Self> {
    match tag {
      0 => Ok(AccuracyTier::HalfPercent),
      1 => Ok(AccuracyTier::QuarterPercent),
      2 => Ok(AccuracyTier::TenthPercent),
      other => Err(crate::errors::Error::malformed(format!(
        "unrecognized accuracy tier tag {}",
        other
      ))),
    }
  }
}

/// Records the caller's source precision so decompression can reproduce the
/// matching output width. All internal arithmetic happens in single
/// precision regardless of this tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Precision {
  Single,
  Double,
}

impl Precision {
  pub(crate) fn to_tag(self) -> u32 {
    match self {
      Precision::Single => 0,
      Precision::Double => 1,
    }
  }

  pub(crate) fn from_tag(tag: u32) -> crate::errors::Result<Self> {
    match tag {
      0 => Ok(Precision::Single),
      1 => Ok(Precision::Double),
      other => Err(crate::errors::Error::malformed(format!(
        "unrecognized precision tag {}",
        other
      ))),
    }
  }
}

/// A batch may never exceed this many samples; the container's `u16` batch
/// length field caps it structurally as well.
pub const MAX_BATCH_LEN: usize = 65_535;

/// `value_to_bucket` never returns this; it marks "no bucket" in the
/// original design and has no Rust representation since lookups return
/// `Option<u8>` instead.
pub const INVALID_BUCKET: u8 = 255;

/// Above this magnitude (exclusive) for either `M₊` or `M₋`, the delta
/// analyser gives up on delta coding entirely and selects key 0.
pub const MAX_ANALYZABLE_DELTA: i32 = 26;

/// A normalized value `v = x/min` is clamped to this constant rather than
/// `2.0` so it always lands in a valid bucket (the bucket tables are closed
/// on the left and open on the right of the top interval).
pub const NEAR_TWO_CLAMP: f32 = 1.999_999_9;

/// Frame header size in bytes: `total_byte_length, metadata, element_count,
/// batch_count`, each a little-endian `u32`.
pub const HEADER_LEN: usize = 16;
