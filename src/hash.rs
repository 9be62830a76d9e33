//! Hash primitives used across the crate.
//!
//! - sha256(x), sha256d(x) = sha256(sha256(x))
//! - hash160(x) = ripemd160(sha256(x))
//! - hmac_sha512(key, data)
//! - keccak256(x) (original Keccak padding, as used by Ethereum)

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;

type HmacSha512 = Hmac<Sha512>;

pub fn sha256(data: &[u8]) -> [u8; 32] {
  Sha256::digest(data).into()
}

pub fn sha256d(data: &[u8]) -> [u8; 32] {
  Sha256::digest(Sha256::digest(data)).into()
}

pub fn ripemd160(data: &[u8]) -> [u8; 20] {
  Ripemd160::digest(data).into()
}

pub fn hash160(data: &[u8]) -> [u8; 20] {
  ripemd160(&sha256(data))
}

pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
  let mut mac = HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
  mac.update(data);
  let mut out = [0u8; 64];
  out.copy_from_slice(&mac.finalize().into_bytes());
  out
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
  Keccak256::digest(data).into()
}

/// First four bytes of sha256d(payload), the Base58Check checksum.
pub fn checksum4(payload: &[u8]) -> [u8; 4] {
  let h = sha256d(payload);
  [h[0], h[1], h[2], h[3]]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sha256_empty() {
    assert_eq!(
      hex::encode(sha256(b"")),
      "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
  }

  #[test]
  fn sha256d_hello() {
    assert_eq!(
      hex::encode(sha256d(b"hello")),
      "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
    );
  }

  #[test]
  fn hash160_of_generator() {
    let g = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap();
    assert_eq!(hex::encode(hash160(&g)), "751e76e8199196d454941c45d1b3a323f1433bd6");
  }

  #[test]
  fn keccak_empty() {
    assert_eq!(
      hex::encode(keccak256(b"")),
      "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
    );
  }

  #[test]
  fn hmac_sha512_rfc4231_case2() {
    let out = hmac_sha512(b"Jefe", b"what do ya want for nothing?");
    assert_eq!(
      hex::encode(out),
      "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea2505549758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
    );
  }
}
