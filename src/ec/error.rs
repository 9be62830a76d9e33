use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurveError {
  /// Encoded point is neither 33 (compressed) nor 65 (uncompressed) bytes
  #[error("invalid point encoding length: {0}")]
  InvalidLength(usize),
  #[error("invalid point encoding prefix: {0:#04x}")]
  InvalidPrefix(u8),
  /// x has no square root mod p, or (x, y) fails y^2 = x^3 + 7
  #[error("point not on curve")]
  NotOnCurve,
  #[error("point at infinity has no encoding")]
  Infinity,
}
