//! BIP-32 (HD keys) for secp256k1.
//!
//! Features:
//! - Master key from seed
//! - CKDpriv (hardened & normal) and CKDpub (normal only)
//! - Base58Check serialization under any version pair in the address table
//!   (xprv/xpub, yprv/ypub, tprv/tpub, Ltub, dgub, ...)
//! - Path parser and anchored trees, see [`path`]
//!
//! A degenerate step (I_L outside [1, n-1], or a zero/infinite child) fails
//! with [`Bip32Error::InvalidChildKey`] instead of skipping to the next index.

mod error;
pub mod path;
mod util;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::address::table::{self, VersionPair};
use crate::ec::arith::mod_add;
use crate::ec::{secp256k1, Point};
use crate::encoding::base58;
use crate::hash::hmac_sha512;
use crate::key::{PrivateKey, PublicKey};

pub use error::Bip32Error;
pub use path::{parse_path, ChildNumber, HdTree};

pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";
const PAYLOAD_LEN: usize = 78;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPrivKey {
  pub versions: VersionPair,
  pub depth: u8,
  pub parent_fingerprint: u32,
  pub child_number: u32,
  pub chain_code: [u8; 32],
  pub private_key: PrivateKey,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPubKey {
  pub versions: VersionPair,
  pub depth: u8,
  pub parent_fingerprint: u32,
  pub child_number: u32,
  pub chain_code: [u8; 32],
  pub public_key: PublicKey, // compressed
}

/// Either half of a decoded extended key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtendedKey {
  Private(ExtendedPrivKey),
  Public(ExtendedPubKey),
}

fn in_scalar_range(v: &BigUint) -> bool {
  !v.is_zero() && v < &secp256k1().n
}

fn child_depth(depth: u8) -> Result<u8, Bip32Error> {
  depth.checked_add(1).ok_or(Bip32Error::DepthOverflow)
}

/* --------------------- Master key from seed ---------------------- */

impl ExtendedPrivKey {
  /// Create master extended private key from seed, tagged xprv/xpub.
  pub fn master(seed: &[u8]) -> Result<Self, Bip32Error> {
    Self::master_with_versions(seed, table::XPUB)
  }

  /// I = HMAC-SHA512(key="Bitcoin seed", data=seed)
  /// master secret = I_L, master chain code = I_R
  pub fn master_with_versions(seed: &[u8], versions: VersionPair) -> Result<Self, Bip32Error> {
    if !(16..=64).contains(&seed.len()) {
      return Err(Bip32Error::InvalidSeedLength(seed.len()));
    }
    let (il, ir) = util::split_i(&hmac_sha512(MASTER_HMAC_KEY, seed));
    if !in_scalar_range(&il) {
      return Err(Bip32Error::InvalidSeed);
    }
    Ok(ExtendedPrivKey {
      versions,
      depth: 0,
      parent_fingerprint: 0,
      child_number: 0,
      chain_code: ir,
      private_key: PrivateKey::from_valid_scalar(il, true),
    })
  }

  /// Derive a child private key (CKDpriv) at index `i`.
  /// Hardened if i >= HARDENED_OFFSET.
  pub fn ckd_priv(&self, i: u32) -> Result<Self, Bip32Error> {
    let depth = child_depth(self.depth)?;
    let parent_pub = self.private_key.public_key();

    // Data = (0x00 || ser256(k_par) || ser32(i)) for hardened
    //      = (serP(K_par)     || ser32(i))       for normal
    let mut data = [0u8; 37];
    if i >= HARDENED_OFFSET {
      data[0] = 0x00;
      data[1..33].copy_from_slice(&util::ser256(self.private_key.scalar()));
    } else {
      data[..33].copy_from_slice(&util::ser_p(parent_pub));
    }
    data[33..].copy_from_slice(&util::ser32(i));
    let (il, ir) = util::split_i(&hmac_sha512(&self.chain_code, &data));

    if !in_scalar_range(&il) {
      return Err(Bip32Error::InvalidChildKey);
    }
    let k = mod_add(&il, self.private_key.scalar(), &secp256k1().n);
    if k.is_zero() {
      return Err(Bip32Error::InvalidChildKey);
    }
    log::debug!("CKDpriv depth {} -> {}, index {:#010x}", self.depth, depth, i);

    Ok(ExtendedPrivKey {
      versions: self.versions,
      depth,
      parent_fingerprint: util::fingerprint(parent_pub),
      child_number: i,
      chain_code: ir,
      private_key: PrivateKey::from_valid_scalar(k, true),
    })
  }

  /// Get the corresponding extended public key.
  pub fn to_xpub(&self) -> ExtendedPubKey {
    ExtendedPubKey {
      versions: self.versions,
      depth: self.depth,
      parent_fingerprint: self.parent_fingerprint,
      child_number: self.child_number,
      chain_code: self.chain_code,
      public_key: self.private_key.public_key().with_compression(true),
    }
  }

  /// Fingerprint of this node's own public key.
  pub fn fingerprint(&self) -> u32 {
    util::fingerprint(self.private_key.public_key())
  }

  /// Same node under other version words, e.g. to print a zprv.
  pub fn with_versions(mut self, versions: VersionPair) -> Self {
    self.versions = versions;
    self
  }

  /// Serialize to Base58Check with the private version word.
  pub fn to_base58(&self) -> String {
    let mut key_data = [0u8; 33];
    // key data: 0x00 + ser256(k)
    key_data[1..].copy_from_slice(&util::ser256(self.private_key.scalar()));
    encode_payload(
      self.versions.private,
      self.depth,
      self.parent_fingerprint,
      self.child_number,
      &self.chain_code,
      &key_data,
    )
  }
}

impl ExtendedPubKey {
  /// CKDpub for non-hardened indices.
  pub fn ckd_pub(&self, i: u32) -> Result<Self, Bip32Error> {
    if i >= HARDENED_OFFSET {
      return Err(Bip32Error::HardenedFromPublic);
    }
    let depth = child_depth(self.depth)?;

    // Data = serP(K_par) || ser32(i)
    let mut data = [0u8; 37];
    data[..33].copy_from_slice(&util::ser_p(&self.public_key));
    data[33..].copy_from_slice(&util::ser32(i));
    let (il, ir) = util::split_i(&hmac_sha512(&self.chain_code, &data));

    if !in_scalar_range(&il) {
      return Err(Bip32Error::InvalidChildKey);
    }
    // K_child = point(I_L) + K_par
    let child: Point = util::point(&il).add(self.public_key.point());
    let public_key = PublicKey::from_point(child, true).map_err(|_| Bip32Error::InvalidChildKey)?;
    log::debug!("CKDpub depth {} -> {}, index {:#010x}", self.depth, depth, i);

    Ok(ExtendedPubKey {
      versions: self.versions,
      depth,
      parent_fingerprint: util::fingerprint(&self.public_key),
      child_number: i,
      chain_code: ir,
      public_key,
    })
  }

  pub fn fingerprint(&self) -> u32 {
    util::fingerprint(&self.public_key)
  }

  pub fn with_versions(mut self, versions: VersionPair) -> Self {
    self.versions = versions;
    self
  }

  /// Serialize to Base58Check with the public version word.
  pub fn to_base58(&self) -> String {
    encode_payload(
      self.versions.public,
      self.depth,
      self.parent_fingerprint,
      self.child_number,
      &self.chain_code,
      &util::ser_p(&self.public_key),
    )
  }
}

impl ExtendedKey {
  pub fn depth(&self) -> u8 {
    match self {
      ExtendedKey::Private(k) => k.depth,
      ExtendedKey::Public(k) => k.depth,
    }
  }

  pub fn versions(&self) -> VersionPair {
    match self {
      ExtendedKey::Private(k) => k.versions,
      ExtendedKey::Public(k) => k.versions,
    }
  }

  /// Public projection; a no-op for public nodes.
  pub fn to_xpub(&self) -> ExtendedPubKey {
    match self {
      ExtendedKey::Private(k) => k.to_xpub(),
      ExtendedKey::Public(k) => k.clone(),
    }
  }

  pub fn private(&self) -> Option<&ExtendedPrivKey> {
    match self {
      ExtendedKey::Private(k) => Some(k),
      ExtendedKey::Public(_) => None,
    }
  }

  /// One derivation step, CKDpriv or CKDpub depending on what this node holds.
  pub fn derive_child(&self, i: u32) -> Result<ExtendedKey, Bip32Error> {
    match self {
      ExtendedKey::Private(k) => k.ckd_priv(i).map(ExtendedKey::Private),
      ExtendedKey::Public(k) => k.ckd_pub(i).map(ExtendedKey::Public),
    }
  }

  pub fn to_base58(&self) -> String {
    match self {
      ExtendedKey::Private(k) => k.to_base58(),
      ExtendedKey::Public(k) => k.to_base58(),
    }
  }
}

/* --------------------- Convenience: path derivation --------------------- */

/// Derive an extended private key along a path.
pub fn derive_priv_from_path(
  xprv: &ExtendedPrivKey,
  path: &[ChildNumber],
) -> Result<ExtendedPrivKey, Bip32Error> {
  let mut xprv = xprv.clone();
  for cn in path {
    xprv = xprv.ckd_priv(cn.number())?;
  }
  Ok(xprv)
}

/// Derive an extended public key along a (non-hardened) path.
pub fn derive_pub_from_path(
  xpub: &ExtendedPubKey,
  path: &[ChildNumber],
) -> Result<ExtendedPubKey, Bip32Error> {
  if path.iter().any(ChildNumber::is_hardened) {
    return Err(Bip32Error::HardenedFromPublic);
  }
  let mut xpub = xpub.clone();
  for cn in path {
    xpub = xpub.ckd_pub(cn.number())?;
  }
  Ok(xpub)
}

/* --------------------- Text format ---------------------- */

fn encode_payload(
  version: u32,
  depth: u8,
  parent_fingerprint: u32,
  child_number: u32,
  chain_code: &[u8; 32],
  key_data: &[u8; 33],
) -> String {
  let mut payload = [0u8; PAYLOAD_LEN];
  payload[..4].copy_from_slice(&version.to_be_bytes());
  payload[4] = depth;
  payload[5..9].copy_from_slice(&parent_fingerprint.to_be_bytes());
  payload[9..13].copy_from_slice(&util::ser32(child_number));
  payload[13..45].copy_from_slice(chain_code);
  payload[45..78].copy_from_slice(key_data);
  base58::encode_check(&payload)
}

fn be32(b: &[u8]) -> u32 {
  u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

/// Decode with a caller-supplied version resolver returning (pair, is_public).
fn decode_xkey<F>(s: &str, resolve: F) -> Result<ExtendedKey, Bip32Error>
where
  F: Fn(u32) -> Option<(VersionPair, bool)>,
{
  let data = base58::decode_check(s)?;
  if data.len() != PAYLOAD_LEN {
    return Err(Bip32Error::InvalidBase58);
  }

  let word = be32(&data[..4]);
  let (versions, is_pub) = resolve(word).ok_or(Bip32Error::BadVersion(word))?;

  let depth = data[4];
  let parent_fingerprint = be32(&data[5..9]);
  let child_number = be32(&data[9..13]);
  let mut chain_code = [0u8; 32];
  chain_code.copy_from_slice(&data[13..45]);

  // Reject invalid "root" headers per BIP-32
  if depth == 0 && (parent_fingerprint != 0 || child_number != 0) {
    return Err(Bip32Error::InvalidRootFields);
  }

  let key_data = &data[45..78];
  if is_pub {
    if key_data[0] != 0x02 && key_data[0] != 0x03 {
      return Err(Bip32Error::BadKeyData);
    }
    let point = Point::from_bytes(key_data)?;
    let public_key = PublicKey::from_point(point, true).map_err(|_| Bip32Error::BadKeyData)?;
    Ok(ExtendedKey::Public(ExtendedPubKey {
      versions,
      depth,
      parent_fingerprint,
      child_number,
      chain_code,
      public_key,
    }))
  } else {
    // key data: 0x00 + 32-byte secret
    if key_data[0] != 0x00 {
      return Err(Bip32Error::BadKeyData);
    }
    let d = util::parse256(&key_data[1..]);
    if !in_scalar_range(&d) {
      return Err(Bip32Error::BadKeyData);
    }
    Ok(ExtendedKey::Private(ExtendedPrivKey {
      versions,
      depth,
      parent_fingerprint,
      child_number,
      chain_code,
      private_key: PrivateKey::from_valid_scalar(d, true),
    }))
  }
}

/// Parse any extended key whose version word appears in the address table.
pub fn parse_xkey(s: &str) -> Result<ExtendedKey, Bip32Error> {
  decode_xkey(s, table::find_bip32_version)
}

/// Parse an extended key that must carry one of `expected`'s version words.
pub fn parse_xkey_with(s: &str, expected: VersionPair) -> Result<ExtendedKey, Bip32Error> {
  decode_xkey(s, |word| {
    if word == expected.public {
      Some((expected, true))
    } else if word == expected.private {
      Some((expected, false))
    } else {
      None
    }
  })
}

fn expect_private(key: ExtendedKey) -> Result<ExtendedPrivKey, Bip32Error> {
  match key {
    ExtendedKey::Private(k) => Ok(k),
    ExtendedKey::Public(k) => Err(Bip32Error::BadVersion(k.versions.public)),
  }
}

fn expect_public(key: ExtendedKey) -> Result<ExtendedPubKey, Bip32Error> {
  match key {
    ExtendedKey::Public(k) => Ok(k),
    ExtendedKey::Private(k) => Err(Bip32Error::BadVersion(k.versions.private)),
  }
}

// Convenience wrappers
pub fn parse_xprv(s: &str) -> Result<ExtendedPrivKey, Bip32Error> {
  expect_private(parse_xkey(s)?)
}

pub fn parse_xpub(s: &str) -> Result<ExtendedPubKey, Bip32Error> {
  expect_public(parse_xkey(s)?)
}

pub fn parse_xprv_with(s: &str, expected: VersionPair) -> Result<ExtendedPrivKey, Bip32Error> {
  expect_private(parse_xkey_with(s, expected)?)
}

pub fn parse_xpub_with(s: &str, expected: VersionPair) -> Result<ExtendedPubKey, Bip32Error> {
  expect_public(parse_xkey_with(s, expected)?)
}
