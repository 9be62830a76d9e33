use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
  #[error("invalid character {0:?}")]
  InvalidCharacter(char),
  #[error("checksum mismatch")]
  ChecksumMismatch,
  /// Decoded payload has the wrong number of bytes/symbols
  #[error("invalid length: {0}")]
  InvalidLength(usize),
  /// Leftover bits when regrouping 5-bit symbols into bytes
  #[error("invalid padding in 5-bit data")]
  InvalidPadding,
  #[error("mixed-case string")]
  MixedCase,
  #[error("missing prefix separator")]
  MissingSeparator,
  #[error("unexpected prefix {0:?}")]
  InvalidPrefix(String),
  #[error("unsupported witness version {0}")]
  InvalidWitnessVersion(u8),
}
