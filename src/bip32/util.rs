//! BIP-32 helper functions:
//! - point(p):    scalar -> EC point p*G
//! - serP(P):     compressed SEC1 (33 bytes)
//! - ser32(i):    big-endian u32 (4 bytes)
//! - ser256(p):   big-endian 256-bit integer (32 bytes)
//! - parse256(p): 32 bytes -> integer

use num_bigint::BigUint;

use crate::ec::{to_be_bytes32, Point};
use crate::hash::hash160;
use crate::key::PublicKey;

/// point(p): compute p * G.
pub fn point(p: &BigUint) -> Point {
  Point::mul_generator(p)
}

/// serP(P): compressed SEC1 encoding of a public key (33 bytes, 0x02/0x03 + X)
pub fn ser_p(pk: &PublicKey) -> [u8; 33] {
  pk.to_compressed()
}

/// ser32(i): 4-byte big-endian serialization of a 32-bit integer
pub fn ser32(i: u32) -> [u8; 4] {
  i.to_be_bytes()
}

/// ser256(p): 32-byte big-endian serialization, left-padded with zeros.
///
/// `p` must be below 2^256, which holds for anything reduced mod n.
pub fn ser256(p: &BigUint) -> [u8; 32] {
  to_be_bytes32(p)
}

pub fn parse256(bytes: &[u8]) -> BigUint {
  BigUint::from_bytes_be(bytes)
}

/// Split HMAC output into (I_L as integer, I_R as chain code).
pub fn split_i(i: &[u8; 64]) -> (BigUint, [u8; 32]) {
  let mut ir = [0u8; 32];
  ir.copy_from_slice(&i[32..]);
  (parse256(&i[..32]), ir)
}

/// First 4 bytes of HASH160(serP(P)), read big-endian.
pub fn fingerprint(pk: &PublicKey) -> u32 {
  let h160 = hash160(&ser_p(pk));
  u32::from_be_bytes([h160[0], h160[1], h160[2], h160[3]])
}
