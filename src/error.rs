use thiserror::Error;

use crate::address::{AddrScheme, Coin, Network};
use crate::bip32::Bip32Error;
use crate::ec::CurveError;
use crate::encoding::EncodingError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("encoding error: {0}")]
  Encoding(#[from] EncodingError),

  #[error("curve error: {0}")]
  Curve(#[from] CurveError),

  #[error("derivation error: {0}")]
  Bip32(#[from] Bip32Error),

  /// Scalar not in [1, n-1]
  #[error("private key out of range")]
  InvalidPrivateKey,

  #[error("invalid private key length: {0}")]
  InvalidKeyLength(usize),

  /// r or s not in [1, n-1]
  #[error("signature component out of range")]
  SignatureOutOfRange,

  #[error("invalid recovery id {0}")]
  InvalidRecoveryId(u8),

  /// Candidate R for key recovery is off-curve, too large, or not of order n
  #[error("cannot recover a public key from this signature")]
  BadRecoveryPoint,

  #[error("invalid signature header byte {0}")]
  InvalidHeader(u8),

  #[error("invalid signature length: {0}")]
  InvalidSignatureLength(usize),

  #[error("signature is not valid base64")]
  InvalidBase64,

  #[error("signature does not match the address")]
  NoAddressMatch,

  #[error("no prefix available for {coin} {network} {scheme}")]
  NoPrefix {
    coin: Coin,
    network: Network,
    scheme: AddrScheme,
  },

  /// A key-hash scheme was given a script or vice versa
  #[error("address scheme {0} does not accept this payload")]
  PayloadMismatch(AddrScheme),

  #[error("address scheme {0} is not supported for message signatures")]
  UnsupportedScheme(AddrScheme),

  #[error("WIF version byte {0:#04x} does not match the requested network")]
  WifVersionMismatch(u8),

  #[error("unknown {kind} {value:?}")]
  UnknownName { kind: &'static str, value: String },
}
