//! Address construction.
//!
//! Looks the (coin, network, scheme) triple up in [`table`] and dispatches on
//! the coin's [`AddressStyle`]:
//!
//! - Generic: Base58Check(version || HASH160(..)) or segwit bech32
//! - Ethereum: `0x` + last 20 bytes of keccak256(uncompressed key without 0x04)
//! - CashAddr: `prefix:` + base32(version || HASH160(..) || checksum)
//!
//! Unknown combinations are reported as [`Error::NoPrefix`] rather than
//! producing an address with a made-up version.

pub mod table;

pub use table::{AddrScheme, AddressStyle, Coin, Network, VersionPair};

use crate::encoding::{base58, bech32, cashaddr};
use crate::error::{Error, Result};
use crate::hash::{hash160, keccak256, sha256};
use crate::key::PublicKey;

use table::Lookup;

/// What an address commits to.
#[derive(Clone, Copy, Debug)]
pub enum Payload<'a> {
  PublicKey(&'a PublicKey),
  /// Redeem script (P2SH) or witness script (P2WSH, P2WSH-in-P2SH)
  Script(&'a [u8]),
}

pub fn build(coin: Coin, network: Network, scheme: AddrScheme, payload: Payload<'_>) -> Result<String> {
  let spec = table::lookup(coin, network, scheme)?;
  match spec.coin.style {
    AddressStyle::Generic => generic(&spec, payload),
    AddressStyle::Ethereum => ethereum(scheme, payload),
    AddressStyle::CashAddr => cash_addr(&spec, payload),
  }
}

pub fn from_public_key(coin: Coin, network: Network, scheme: AddrScheme, key: &PublicKey) -> Result<String> {
  build(coin, network, scheme, Payload::PublicKey(key))
}

pub fn from_script(coin: Coin, network: Network, scheme: AddrScheme, script: &[u8]) -> Result<String> {
  build(coin, network, scheme, Payload::Script(script))
}

/// `OP_0 PUSH20 HASH160(compressed key)`, the P2SH-wrapped P2WPKH redeem script.
pub fn p2wpkh_redeem_script(key: &PublicKey) -> [u8; 22] {
  let mut script = [0u8; 22];
  script[0] = 0x00;
  script[1] = 0x14;
  script[2..].copy_from_slice(&hash160(&key.to_compressed()));
  script
}

/// `OP_0 PUSH32 SHA256(witness script)`, the P2SH-wrapped P2WSH redeem script.
pub fn p2wsh_redeem_script(witness_script: &[u8]) -> [u8; 34] {
  let mut script = [0u8; 34];
  script[0] = 0x00;
  script[1] = 0x20;
  script[2..].copy_from_slice(&sha256(witness_script));
  script
}

fn base58_versioned(version: &[u8], hash: &[u8]) -> String {
  let mut payload = Vec::with_capacity(version.len() + hash.len());
  payload.extend_from_slice(version);
  payload.extend_from_slice(hash);
  base58::encode_check(&payload)
}

fn hrp_or_missing(spec: &Lookup) -> Result<&'static str> {
  spec.network.hrp.ok_or(Error::NoPrefix {
    coin: spec.coin.coin,
    network: spec.network.network,
    scheme: spec.scheme.scheme,
  })
}

fn generic(spec: &Lookup, payload: Payload<'_>) -> Result<String> {
  let version = spec.scheme.version;
  let scheme = spec.scheme.scheme;
  let addr = match (scheme, payload) {
    (AddrScheme::P2pkh, Payload::PublicKey(key)) => base58_versioned(version, &hash160(&key.to_bytes())),
    (AddrScheme::P2sh, Payload::Script(script)) => base58_versioned(version, &hash160(script)),
    (AddrScheme::P2wpkhInP2sh, Payload::PublicKey(key)) => {
      base58_versioned(version, &hash160(&p2wpkh_redeem_script(key)))
    }
    (AddrScheme::P2wshInP2sh, Payload::Script(script)) => {
      base58_versioned(version, &hash160(&p2wsh_redeem_script(script)))
    }
    (AddrScheme::P2wpkh, Payload::PublicKey(key)) => {
      bech32::encode_segwit(hrp_or_missing(spec)?, 0, &hash160(&key.to_compressed()))?
    }
    (AddrScheme::P2wsh, Payload::Script(script)) => {
      bech32::encode_segwit(hrp_or_missing(spec)?, 0, &sha256(script))?
    }
    (scheme, _) => return Err(Error::PayloadMismatch(scheme)),
  };
  Ok(addr)
}

fn ethereum(scheme: AddrScheme, payload: Payload<'_>) -> Result<String> {
  let Payload::PublicKey(key) = payload else {
    return Err(Error::PayloadMismatch(scheme));
  };
  let uncompressed = key.to_uncompressed();
  let digest = keccak256(&uncompressed[1..]);
  Ok(format!("0x{}", hex::encode(&digest[12..])))
}

fn cash_addr(spec: &Lookup, payload: Payload<'_>) -> Result<String> {
  let prefix = hrp_or_missing(spec)?;
  let hash = match (spec.scheme.scheme, payload) {
    (AddrScheme::P2pkh, Payload::PublicKey(key)) => hash160(&key.to_bytes()),
    (AddrScheme::P2sh, Payload::Script(script)) => hash160(script),
    (scheme, _) => return Err(Error::PayloadMismatch(scheme)),
  };
  let version = spec.scheme.version.first().copied().unwrap_or_default();
  Ok(cashaddr::encode(prefix, version, &hash)?)
}
