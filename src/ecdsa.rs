//! ECDSA over secp256k1: sign, verify, and public key recovery.
//!
//! Nonces are drawn uniformly from [1, n-1] with a CSPRNG (no RFC 6979).
//! Signatures are not normalized to low-S.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::ec::arith::{mod_add, mod_inv, mod_mul, mod_neg};
use crate::ec::{has_curve_order, secp256k1, to_be_bytes32, Point};
use crate::error::{Error, Result};
use crate::key::{random_scalar, PrivateKey, PublicKey};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
  pub r: BigUint,
  pub s: BigUint,
  /// Which of the candidate R points was used: bit 0 = y parity, bit 1 = x overflowed n.
  pub recovery_id: Option<u8>,
}

fn in_range(v: &BigUint) -> bool {
  !v.is_zero() && v < &secp256k1().n
}

impl Signature {
  pub fn new(r: BigUint, s: BigUint) -> Result<Self> {
    if !in_range(&r) || !in_range(&s) {
      return Err(Error::SignatureOutOfRange);
    }
    Ok(Signature {
      r,
      s,
      recovery_id: None,
    })
  }

  /// `r || s`, 32 bytes each.
  pub fn to_compact(&self) -> [u8; 64] {
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(&to_be_bytes32(&self.r));
    out[32..].copy_from_slice(&to_be_bytes32(&self.s));
    out
  }

  pub fn from_compact(bytes: &[u8]) -> Result<Self> {
    if bytes.len() != 64 {
      return Err(Error::InvalidSignatureLength(bytes.len()));
    }
    Signature::new(
      BigUint::from_bytes_be(&bytes[..32]),
      BigUint::from_bytes_be(&bytes[32..]),
    )
  }
}

/// Leftmost bitlen(n) bits of `hash` as an integer (SEC1 4.1.3 step 5).
pub fn hash_to_scalar(hash: &[u8]) -> BigUint {
  let e = BigUint::from_bytes_be(hash);
  let hash_bits = hash.len() as u64 * 8;
  let n_bits = secp256k1().bit_size;
  if hash_bits > n_bits {
    e >> (hash_bits - n_bits)
  } else {
    e
  }
}

pub fn sign(key: &PrivateKey, hash: &[u8]) -> Signature {
  sign_with_rng(key, hash, &mut OsRng)
}

pub fn sign_with_rng<R: RngCore + CryptoRng>(key: &PrivateKey, hash: &[u8], rng: &mut R) -> Signature {
  let n = &secp256k1().n;
  let d = key.scalar();
  let e = hash_to_scalar(hash) % n;
  loop {
    let k = random_scalar(rng);
    let big_r = Point::mul_generator(&k);
    let r = big_r.x() % n;
    if r.is_zero() {
      log::trace!("r = 0, drawing a new nonce");
      continue;
    }
    let kinv = mod_inv(&k, n);
    let s = mod_mul(&kinv, &mod_add(&e, &mod_mul(&r, d, n), n), n);
    if s.is_zero() {
      log::trace!("s = 0, drawing a new nonce");
      continue;
    }
    let mut recovery_id = u8::from(big_r.y().bit(0));
    if big_r.x() >= n {
      recovery_id |= 2;
    }
    return Signature {
      r,
      s,
      recovery_id: Some(recovery_id),
    };
  }
}

/// Standard ECDSA verification.
///
/// When u1*G and u2*Q share an x coordinate the signature is rejected
/// outright. That covers u1*G = -u2*Q, whose sum is infinity, but also
/// refuses the (negligibly likely) u1*G = u2*Q case that textbook ECDSA
/// would accept after doubling.
pub fn verify(key: &PublicKey, hash: &[u8], sig: &Signature) -> bool {
  let n = &secp256k1().n;
  if !in_range(&sig.r) || !in_range(&sig.s) {
    return false;
  }
  let e = hash_to_scalar(hash) % n;
  let w = mod_inv(&sig.s, n);
  let u1 = mod_mul(&e, &w, n);
  let u2 = mod_mul(&sig.r, &w, n);
  let p1 = Point::mul_generator(&u1);
  let p2 = key.point().mul(&u2);
  if p1.x() == p2.x() {
    return false;
  }
  let sum = p1.add(&p2);
  if sum.is_infinity() {
    return false;
  }
  sum.x() % n == sig.r
}

/// Reconstruct the signer's public key from `(r, s)`, a recovery id and the hash.
///
/// The returned key is marked compressed; callers decide which encoding to try.
pub fn recover_public_key(rec_id: u8, sig: &Signature, hash: &[u8]) -> Result<PublicKey> {
  if rec_id > 3 {
    return Err(Error::InvalidRecoveryId(rec_id));
  }
  if !in_range(&sig.r) || !in_range(&sig.s) {
    return Err(Error::SignatureOutOfRange);
  }
  let curve = secp256k1();
  let n = &curve.n;

  let x = if rec_id & 2 != 0 { &sig.r + n } else { sig.r.clone() };
  if x >= curve.p {
    return Err(Error::BadRecoveryPoint);
  }
  let y = curve.solve(&x).ok_or(Error::BadRecoveryPoint)?;
  let want_odd = rec_id & 1 == 1;
  let y = if y.bit(0) == want_odd { y } else { mod_neg(&y, &curve.p) };
  let big_r = Point::new(x, y)?;
  if !has_curve_order(&big_r) {
    return Err(Error::BadRecoveryPoint);
  }

  let e = hash_to_scalar(hash) % n;
  let rinv = mod_inv(&sig.r, n);
  let u1 = mod_mul(&mod_neg(&e, n), &rinv, n);
  let u2 = mod_mul(&sig.s, &rinv, n);
  let q = Point::mul_generator(&u1).add(&big_r.mul(&u2));
  if q.is_infinity() {
    return Err(Error::BadRecoveryPoint);
  }
  PublicKey::from_point(q, true)
}
