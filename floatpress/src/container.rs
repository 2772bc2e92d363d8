//! Top-level compress/decompress: frames batches into a self-describing
//! little-endian container and inverts the process.

use crate::batch::{carve_batches, Batch};
use crate::bit_stream::{BitReader, BitWriter};
use crate::bucketizer::{bucketize, unbucketize};
use crate::constants::{AccuracyTier, Precision, HEADER_LEN};
use crate::delta::choose_key;
use crate::errors::{Error, Result};
use crate::prefix_code::{decode_delta, encode_delta};

/// Compresses a slice of single-precision floats at the given accuracy
/// tier.
pub fn compress_f32(xs: &[f32], tier: AccuracyTier) -> Result<Vec<u8>> {
  log::debug!("compress_f32: {} elements, tier {:?}", xs.len(), tier);
  compress_core(xs, tier, Precision::Single)
}

/// Compresses a slice of double-precision floats at the given accuracy
/// tier. Values are narrowed to `f32` before the same core pipeline runs;
/// this is a representational narrowing only, not an added-precision
/// promise beyond what the tier already targets.
pub fn compress_f64(xs: &[f64], tier: AccuracyTier) -> Result<Vec<u8>> {
  log::debug!("compress_f64: {} elements, tier {:?}", xs.len(), tier);
  let narrowed: Vec<f32> = xs.iter().map(|&x| x as f32).collect();
  compress_core(&narrowed, tier, Precision::Double)
}

fn compress_core(xs: &[f32], tier: AccuracyTier, precision: Precision) -> Result<Vec<u8>> {
  let batches = carve_batches(xs);
  let mut body = Vec::with_capacity(xs.len() * 2 + batches.len() * 16);
  let mut ranged_count = 0usize;
  let mut fallback_count = 0usize;
  for batch in &batches {
    if let Some(key) = encode_batch_frame(&mut body, batch, tier)? {
      ranged_count += 1;
      if key == 0 {
        fallback_count += 1;
      }
    }
  }
  if ranged_count > 0 && fallback_count * 4 > ranged_count {
    log::warn!(
      "compress: {} of {} ranged batches fell back to key 0 (no delta coding)",
      fallback_count,
      ranged_count,
    );
  }

  let metadata = tier.to_tag() | (precision.to_tag() << 3);
  let element_count = xs.len() as u32;
  let batch_count = batches.len() as u32;
  let total_len = (HEADER_LEN + body.len()) as u32;

  let mut blob = Vec::with_capacity(total_len as usize);
  blob.extend_from_slice(&total_len.to_le_bytes());
  blob.extend_from_slice(&metadata.to_le_bytes());
  blob.extend_from_slice(&element_count.to_le_bytes());
  blob.extend_from_slice(&batch_count.to_le_bytes());
  blob.extend_from_slice(&body);
  log::trace!("compress: {} batches, blob {} bytes", batch_count, blob.len());
  Ok(blob)
}

fn encode_batch_frame(body: &mut Vec<u8>, batch: &Batch, tier: AccuracyTier) -> Result<Option<u8>> {
  match batch {
    Batch::Literal1(x) => {
      body.extend_from_slice(&1u16.to_le_bytes());
      body.extend_from_slice(&x.to_le_bytes());
      Ok(None)
    }
    Batch::Literal2(a, b) => {
      body.extend_from_slice(&2u16.to_le_bytes());
      body.extend_from_slice(&a.to_le_bytes());
      body.extend_from_slice(&b.to_le_bytes());
      Ok(None)
    }
    Batch::Ranged { samples, max, min } => {
      let len = samples.len() as u16;
      body.extend_from_slice(&len.to_le_bytes());
      body.extend_from_slice(&max.to_le_bytes());
      body.extend_from_slice(&min.to_le_bytes());

      let buckets = bucketize(samples, *min, tier)?;
      let key = choose_key(&buckets);
      body.push(key);

      if key == 0 {
        body.extend_from_slice(&buckets);
      } else {
        let mut writer = BitWriter::with_byte_capacity(buckets.len());
        for pair in buckets.windows(2) {
          let delta = pair[1] as i32 - pair[0] as i32;
          encode_delta(&mut writer, key, delta)?;
        }
        let bit_bytes = writer.into_bytes();
        let payload_length = (2 + 1 + bit_bytes.len()) as u16;
        body.extend_from_slice(&payload_length.to_le_bytes());
        body.push(buckets[0]);
        body.extend_from_slice(&bit_bytes);
      }
      Ok(Some(key))
    }
  }
}

/// Reads the little-endian `u32` at offset 0 of a compressed blob: its
/// own total byte length.
pub fn compressed_length(blob: &[u8]) -> Result<u32> {
  if blob.len() < 4 {
    return Err(Error::malformed("blob shorter than its own length field"));
  }
  Ok(u32::from_le_bytes(blob[0..4].try_into().unwrap()))
}

/// Decompresses a blob produced by [`compress_f32`] or [`compress_f64`].
/// The returned buffer is framed as a little-endian `u32` byte length
/// followed by that many bytes of `f32` or `f64` samples, chosen by the
/// precision tag recovered from the blob's header.
pub fn decompress(blob: &[u8]) -> Result<Vec<u8>> {
  log::debug!("decompress: blob of {} bytes", blob.len());
  if blob.len() < HEADER_LEN {
    return Err(Error::malformed("blob shorter than its header"));
  }
  let total_byte_length = u32::from_le_bytes(blob[0..4].try_into().unwrap());
  if total_byte_length as usize != blob.len() {
    return Err(Error::malformed(format!(
      "header declares {} bytes but blob is {} bytes",
      total_byte_length,
      blob.len(),
    )));
  }
  let metadata = u32::from_le_bytes(blob[4..8].try_into().unwrap());
  let tier = AccuracyTier::from_tag(metadata & 0b111)?;
  let precision = Precision::from_tag((metadata >> 3) & 0b111)?;
  let element_count = u32::from_le_bytes(blob[8..12].try_into().unwrap()) as usize;
  let batch_count = u32::from_le_bytes(blob[12..16].try_into().unwrap());

  let mut cursor = HEADER_LEN;
  let mut values: Vec<f32> = Vec::with_capacity(element_count);
  for _ in 0..batch_count {
    cursor = decode_batch_frame(blob, cursor, tier, &mut values)?;
  }
  if values.len() != element_count {
    return Err(Error::malformed(format!(
      "decoded {} elements but header declares {}",
      values.len(),
      element_count,
    )));
  }
  log::trace!("decompress: {} batches, {} elements", batch_count, values.len());

  Ok(frame_output(&values, precision))
}

fn read_u16(blob: &[u8], at: usize) -> Result<u16> {
  blob
    .get(at..at + 2)
    .map(|s| u16::from_le_bytes(s.try_into().unwrap()))
    .ok_or_else(|| Error::malformed("truncated batch frame reading a u16"))
}

fn read_u8(blob: &[u8], at: usize) -> Result<u8> {
  blob
    .get(at)
    .copied()
    .ok_or_else(|| Error::malformed("truncated batch frame reading a u8"))
}

fn read_f32(blob: &[u8], at: usize) -> Result<f32> {
  blob
    .get(at..at + 4)
    .map(|s| f32::from_le_bytes(s.try_into().unwrap()))
    .ok_or_else(|| Error::malformed("truncated batch frame reading an f32"))
}

fn decode_batch_frame(blob: &[u8], cursor: usize, tier: AccuracyTier, out: &mut Vec<f32>) -> Result<usize> {
  let mut cursor = cursor;
  let len = read_u16(blob, cursor)?;
  cursor += 2;
  match len {
    0 => Err(Error::malformed("batch length 0")),
    1 => {
      let x = read_f32(blob, cursor)?;
      cursor += 4;
      out.push(x);
      Ok(cursor)
    }
    2 => {
      let a = read_f32(blob, cursor)?;
      cursor += 4;
      let b = read_f32(blob, cursor)?;
      cursor += 4;
      out.push(a);
      out.push(b);
      Ok(cursor)
    }
    l => {
      cursor += 4; // skip `max`, unused on decode
      let min = read_f32(blob, cursor)?;
      cursor += 4;
      let key = read_u8(blob, cursor)?;
      cursor += 1;
      let l = l as usize;

      if key == 0 {
        let raw = blob
          .get(cursor..cursor + l)
          .ok_or_else(|| Error::malformed("truncated raw bucket payload"))?;
        cursor += l;
        out.extend_from_slice(&unbucketize(raw, min, tier));
        Ok(cursor)
      } else {
        let payload_length = read_u16(blob, cursor)? as usize;
        if payload_length < 3 {
          return Err(Error::malformed(format!(
            "payload_length {} too small to hold a seed byte",
            payload_length,
          )));
        }
        let payload_start = cursor;
        let seed = read_u8(blob, cursor + 2)?;
        let bit_bytes = blob
          .get(cursor + 3..payload_start + payload_length)
          .ok_or_else(|| Error::malformed("truncated encoded payload"))?;

        let mut buckets = Vec::with_capacity(l);
        buckets.push(seed);
        let mut reader = BitReader::new(bit_bytes);
        for _ in 1..l {
          let delta = decode_delta(&mut reader, key)?;
          let prev = *buckets.last().unwrap() as i32;
          buckets.push((prev + delta) as u8);
        }
        cursor = payload_start + payload_length;
        out.extend_from_slice(&unbucketize(&buckets, min, tier));
        Ok(cursor)
      }
    }
  }
}

fn frame_output(values: &[f32], precision: Precision) -> Vec<u8> {
  match precision {
    Precision::Single => {
      let byte_length = (values.len() * 4) as u32;
      let mut out = Vec::with_capacity(4 + byte_length as usize);
      out.extend_from_slice(&byte_length.to_le_bytes());
      for &v in values {
        out.extend_from_slice(&v.to_le_bytes());
      }
      out
    }
    Precision::Double => {
      let byte_length = (values.len() * 8) as u32;
      let mut out = Vec::with_capacity(4 + byte_length as usize);
      out.extend_from_slice(&byte_length.to_le_bytes());
      for &v in values {
        out.extend_from_slice(&(v as f64).to_le_bytes());
      }
      out
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn decode_f32_output(out: &[u8]) -> Vec<f32> {
    let byte_length = u32::from_le_bytes(out[0..4].try_into().unwrap()) as usize;
    out[4..4 + byte_length]
      .chunks_exact(4)
      .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
      .collect()
  }

  fn decode_f64_output(out: &[u8]) -> Vec<f64> {
    let byte_length = u32::from_le_bytes(out[0..4].try_into().unwrap()) as usize;
    out[4..4 + byte_length]
      .chunks_exact(8)
      .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
      .collect()
  }

  #[test]
  fn compressed_length_matches_blob_len() {
    let xs = [1.0f32, 2.0, 3.0];
    let blob = compress_f32(&xs, AccuracyTier::HalfPercent).unwrap();
    assert_eq!(compressed_length(&blob).unwrap() as usize, blob.len());
  }

  #[test]
  fn round_trips_small_inputs() {
    for len in [0usize, 1, 2, 3] {
      let xs: Vec<f32> = (0..len).map(|i| 10.0 + i as f32 * 0.1).collect();
      let blob = compress_f32(&xs, AccuracyTier::QuarterPercent).unwrap();
      let out = decompress(&blob).unwrap();
      let ys = decode_f32_output(&out);
      assert_eq!(ys.len(), xs.len());
    }
  }

  #[test]
  fn round_trip_respects_tier_error_bound() {
    let xs: Vec<f32> = (0..2000).map(|i| 100.0 + (i as f32 * 0.37).sin().abs() * 50.0 + 1.0).collect();
    let blob = compress_f32(&xs, AccuracyTier::TenthPercent).unwrap();
    let out = decompress(&blob).unwrap();
    let ys = decode_f32_output(&out);
    assert_eq!(ys.len(), xs.len());
    for (&x, &y) in xs.iter().zip(ys.iter()) {
      let rel_err = ((y - x) / x).abs();
      assert!(rel_err < 0.002, "rel_err {} exceeds TenthPercent bound", rel_err);
    }
  }

  #[test]
  fn exact_zeros_round_trip_to_exact_zero() {
    let xs = [1.0f32, 2.0, 0.0, 3.0, 0.0, 0.0, 4.0];
    let blob = compress_f32(&xs, AccuracyTier::HalfPercent).unwrap();
    let out = decompress(&blob).unwrap();
    let ys = decode_f32_output(&out);
    for (&x, &y) in xs.iter().zip(ys.iter()) {
      if x == 0.0 {
        assert_eq!(y, 0.0);
      }
    }
  }

  #[test]
  fn compress_f64_narrows_and_widens_representationally() {
    let xs: Vec<f64> = (0..50).map(|i| 1000.0 + i as f64).collect();
    let blob = compress_f64(&xs, AccuracyTier::HalfPercent).unwrap();
    let out = decompress(&blob).unwrap();
    let ys = decode_f64_output(&out);
    assert_eq!(ys.len(), xs.len());
    for (&x, &y) in xs.iter().zip(ys.iter()) {
      let rel_err = ((y - x) / x).abs();
      assert!(rel_err < 0.01);
    }
  }

  #[test]
  fn decompress_rejects_truncated_blob() {
    let xs = [1.0f32, 2.0, 3.0, 4.0, 5.0];
    let mut blob = compress_f32(&xs, AccuracyTier::HalfPercent).unwrap();
    blob.truncate(blob.len() - 3);
    assert!(decompress(&blob).is_err());
  }

  #[test]
  fn decompress_rejects_bad_metadata_tag() {
    let xs = [1.0f32, 2.0, 3.0];
    let mut blob = compress_f32(&xs, AccuracyTier::HalfPercent).unwrap();
    blob[4] = 0b111; // no tier maps to 7
    assert!(decompress(&blob).is_err());
  }

  #[test]
  fn a_single_batch_can_hold_the_maximum_length() {
    let xs = vec![1.0f32; crate::constants::MAX_BATCH_LEN];
    let blob = compress_f32(&xs, AccuracyTier::HalfPercent).unwrap();
    let out = decompress(&blob).unwrap();
    assert_eq!(decode_f32_output(&out).len(), xs.len());
  }

  #[test]
  fn random_positive_series_round_trip_within_tier_error() {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let n = 5000usize;
    let mut xs = Vec::with_capacity(n);
    let mut value = 10.0f32;
    for _ in 0..n {
      value *= rng.gen_range(0.95..1.05);
      xs.push(value);
    }
    let blob = compress_f32(&xs, AccuracyTier::QuarterPercent).unwrap();
    let out = decompress(&blob).unwrap();
    let ys = decode_f32_output(&out);
    assert_eq!(ys.len(), xs.len());
    for (&x, &y) in xs.iter().zip(ys.iter()) {
      let rel_err = ((y - x) / x).abs();
      assert!(rel_err < 0.005, "rel_err {} exceeds QuarterPercent bound", rel_err);
    }
  }

  #[test]
  fn values_near_the_bucket_boundary_round_trip() {
    // Three elements so the middle value is reached via a `Ranged` batch
    // (and therefore `bucketize`'s `NEAR_TWO_CLAMP`), not routed straight
    // to a length-2 literal batch.
    let xs = [10.0f32, 10.1, 10.0 * 1.999_999_9];
    let blob = compress_f32(&xs, AccuracyTier::TenthPercent).unwrap();
    let out = decompress(&blob).unwrap();
    let ys = decode_f32_output(&out);
    assert_eq!(ys.len(), 3);
    for (&x, &y) in xs.iter().zip(ys.iter()) {
      let rel_err = ((y - x) / x).abs();
      assert!(rel_err < 0.002, "rel_err {} exceeds TenthPercent bound", rel_err);
    }
  }
}
