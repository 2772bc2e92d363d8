use std::error::Error as StdError;
use std::fmt;
use std::fmt::{Display, Formatter};

/// The error type used in results for all `floatpress` functionality.
///
/// Every fallible operation in this crate returns one of these three kinds.
/// There is intentionally no `AllocationFailure` variant: the standard
/// allocator aborts the process rather than returning a recoverable error,
/// so that distinction from the original design has no expressible Rust
/// counterpart.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
  /// The compressed blob's header or framing is internally inconsistent:
  /// an unrecognized accuracy/precision tag, a batch length of zero, a
  /// total element count that does not match the sum of batch lengths, a
  /// truncated blob, or an encoded-length sentinel of zero.
  MalformedInput { detail: String },
  /// A value fell outside `[1.0, 2.0)` after normalisation by a batch's
  /// minimum. Reaching this indicates the batcher's own invariants were
  /// violated upstream; it is surfaced rather than panicking because
  /// bucketisation sits at a call boundary that must not abort the process
  /// on a library bug.
  OutOfRange { value: f32 },
  /// The delta analyser selected an encoding key the codec does not
  /// recognize, or the codec was asked to decode an unrecognized key.
  /// Always indicates a bug internal to this crate.
  InternalInvariant { detail: String },
}

impl Error {
  pub(crate) fn malformed<S: Into<String>>(detail: S) -> Self {
    Error::MalformedInput { detail: detail.into() }
  }

  pub(crate) fn out_of_range(value: f32) -> Self {
    Error::OutOfRange { value }
  }

  pub(crate) fn internal_invariant<S: Into<String>>(detail: S) -> Self {
    Error::InternalInvariant { detail: detail.into() }
  }

  pub(crate) fn insufficient_data(name: &str, bits_needed: usize, bit_idx: usize, total_bits: usize) -> Self {
    Error::malformed(format!(
      "{}: cannot read {} bits at bit idx {} out of {}",
      name, bits_needed, bit_idx, total_bits,
    ))
  }
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Error::MalformedInput { detail } => write!(f, "floatpress: malformed input: {}", detail),
      Error::OutOfRange { value } => write!(f, "floatpress: value {} out of range [1.0, 2.0)", value),
      Error::InternalInvariant { detail } => write!(f, "floatpress: internal invariant violated: {}", detail),
    }
  }
}

impl StdError for Error {}

pub type Result<T> = std::result::Result<T, Error>;
