//! Shared helpers for the `floatpress-cli` binaries: raw float file I/O
//! and the `-L`/`-M`/`-H` accuracy tier flag the compress binaries share.

use anyhow::{Context, Result};
use clap::ValueEnum;
use floatpress::AccuracyTier;
use std::fs;
use std::path::Path;

/// The accuracy tier flag shared by `compress-float` and `compress-double`.
/// Named after the CLI's `-L`/`-M`/`-H` shorthand rather than the library's
/// `AccuracyTier` variants, since that shorthand is this crate's own
/// user-facing vocabulary.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TierArg {
  /// `-L`: roughly 1% max relative error.
  L,
  /// `-M`: roughly 0.5% max relative error.
  M,
  /// `-H`: roughly 0.2% max relative error.
  H,
}

impl From<TierArg> for AccuracyTier {
  fn from(arg: TierArg) -> Self {
    match arg {
      TierArg::L => AccuracyTier::HalfPercent,
      TierArg::M => AccuracyTier::QuarterPercent,
      TierArg::H => AccuracyTier::TenthPercent,
    }
  }
}

/// Reads a file of raw little-endian `f32`s with no header, matching the
/// original command-line tools' `fread`-based convention.
pub fn read_f32_file(path: &Path) -> Result<Vec<f32>> {
  let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
  if bytes.len() % 4 != 0 {
    anyhow::bail!("{}: file length {} is not a multiple of 4 bytes", path.display(), bytes.len());
  }
  Ok(bytes.chunks_exact(4).map(|c| f32::from_le_bytes(c.try_into().unwrap())).collect())
}

/// Reads a file of raw little-endian `f64`s with no header.
pub fn read_f64_file(path: &Path) -> Result<Vec<f64>> {
  let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
  if bytes.len() % 8 != 0 {
    anyhow::bail!("{}: file length {} is not a multiple of 8 bytes", path.display(), bytes.len());
  }
  Ok(bytes.chunks_exact(8).map(|c| f64::from_le_bytes(c.try_into().unwrap())).collect())
}

/// Writes a compressed blob as-is: it is already a self-describing,
/// length-prefixed byte buffer.
pub fn write_blob(path: &Path, blob: &[u8]) -> Result<()> {
  fs::write(path, blob).with_context(|| format!("writing {}", path.display()))
}

/// Writes raw little-endian `f32`s with no header.
pub fn write_f32_file(path: &Path, xs: &[f32]) -> Result<()> {
  let mut bytes = Vec::with_capacity(xs.len() * 4);
  for &x in xs {
    bytes.extend_from_slice(&x.to_le_bytes());
  }
  fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

/// Writes raw little-endian `f64`s with no header.
pub fn write_f64_file(path: &Path, xs: &[f64]) -> Result<()> {
  let mut bytes = Vec::with_capacity(xs.len() * 8);
  for &x in xs {
    bytes.extend_from_slice(&x.to_le_bytes());
  }
  fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

/// Reads a compressed blob produced by one of the `compress-*` binaries.
pub fn read_blob(path: &Path) -> Result<Vec<u8>> {
  fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Decodes `decompress`'s self-framed `u32 byte_length` + `f32` output.
pub fn decoded_f32s(framed: &[u8]) -> Result<Vec<f32>> {
  let byte_length = u32::from_le_bytes(framed[0..4].try_into()?) as usize;
  Ok(
    framed[4..4 + byte_length]
      .chunks_exact(4)
      .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
      .collect(),
  )
}

/// Decodes `decompress`'s self-framed `u32 byte_length` + `f64` output.
pub fn decoded_f64s(framed: &[u8]) -> Result<Vec<f64>> {
  let byte_length = u32::from_le_bytes(framed[0..4].try_into()?) as usize;
  Ok(
    framed[4..4 + byte_length]
      .chunks_exact(8)
      .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
      .collect(),
  )
}

/// Mean and max absolute percent error between two equal-length sequences.
pub fn percent_error_stats(a: &[f64], b: &[f64]) -> Result<(f64, f64)> {
  if a.len() != b.len() {
    anyhow::bail!("inputs have different lengths: {} vs {}", a.len(), b.len());
  }
  if a.is_empty() {
    return Ok((0.0, 0.0));
  }
  let mut sum = 0.0f64;
  let mut max = 0.0f64;
  for (&x, &y) in a.iter().zip(b.iter()) {
    let pct_err = if x == 0.0 { (y - x).abs() } else { ((y - x) / x).abs() * 100.0 };
    sum += pct_err;
    if pct_err > max {
      max = pct_err;
    }
  }
  Ok((sum / a.len() as f64, max))
}
