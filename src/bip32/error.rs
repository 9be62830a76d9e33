use thiserror::Error;

use crate::ec::CurveError;
use crate::encoding::EncodingError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Bip32Error {
  /// Seeds must be 16 to 64 bytes
  #[error("seed must be 16 to 64 bytes, got {0}")]
  InvalidSeedLength(usize),
  /// I_L out of range for master
  #[error("seed produced an invalid master key")]
  InvalidSeed,
  /// I_L out of range or key addition produced zero / infinity
  #[error("invalid child key (I_L out of range or zero)")]
  InvalidChildKey,
  #[error("cannot derive a hardened child from a public key")]
  HardenedFromPublic,
  #[error("invalid derivation path")]
  BadPath,
  /// Path does not begin with the node's own recorded path
  #[error("path does not start at this tree's anchor")]
  AnchorMismatch,
  #[error("tree holds no private key")]
  PublicOnly,
  /// Base58Check payload is not 78 bytes
  #[error("extended key payload must be 78 bytes")]
  InvalidBase58,
  #[error("unrecognized or unexpected version word {0:#010x}")]
  BadVersion(u32),
  /// Key data field malformed (bad prefix or scalar out of range)
  #[error("key data field malformed")]
  BadKeyData,
  /// BIP-32 requires that depth = 0 (master) implies parent fingerprint = 0 and child number = 0
  #[error("depth 0 requires zero parent fingerprint and child number")]
  InvalidRootFields,
  #[error("maximum derivation depth (255) exceeded")]
  DepthOverflow,
  #[error(transparent)]
  Encoding(#[from] EncodingError),
  #[error(transparent)]
  Curve(#[from] CurveError),
}
