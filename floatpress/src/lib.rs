//! Lossy compression for sequences of strictly-positive IEEE-754
//! floating-point numbers.
//!
//! Samples are batched into runs where consecutive values stay within a
//! factor of two of each other, normalized onto a logarithmic bucket
//! table, and delta-coded between consecutive buckets with a family of
//! Elias-like prefix codes. Typical output is 2-4 bits per sample at a
//! caller-chosen accuracy tier.
//!
//! ```
//! use floatpress::{compress_f32, decompress, AccuracyTier};
//!
//! let xs = [10.0f32, 10.1, 10.3, 9.9, 10.2];
//! let blob = compress_f32(&xs, AccuracyTier::QuarterPercent).unwrap();
//! let out = decompress(&blob).unwrap();
//! assert_eq!(out.len(), 4 + xs.len() * 4);
//! ```

mod batch;
mod bit_stream;
mod bits;
mod bucketizer;
mod buckets;
mod constants;
mod container;
mod delta;
mod errors;
mod prefix_code;

pub use constants::AccuracyTier;
pub use container::{compress_f32, compress_f64, compressed_length, decompress};
pub use errors::{Error, Result};
