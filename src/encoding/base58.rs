//! Base58 and Base58Check.
//!
//! Radix conversion is done by `bs58` (Bitcoin alphabet, one leading `1` per
//! leading zero byte); the 4-byte double-SHA256 checksum framing is ours so
//! that a bad checksum surfaces as [`EncodingError::ChecksumMismatch`].

use crate::encoding::EncodingError;
use crate::hash::checksum4;

pub fn encode(data: &[u8]) -> String {
  bs58::encode(data).into_string()
}

pub fn decode(s: &str) -> Result<Vec<u8>, EncodingError> {
  bs58::decode(s).into_vec().map_err(|e| match e {
    bs58::decode::Error::InvalidCharacter { character, .. } => EncodingError::InvalidCharacter(character),
    bs58::decode::Error::NonAsciiCharacter { index } => {
      let c = s.get(index..).and_then(|rest| rest.chars().next());
      EncodingError::InvalidCharacter(c.unwrap_or(char::REPLACEMENT_CHARACTER))
    }
    _ => EncodingError::InvalidLength(s.len()),
  })
}

/// payload || sha256d(payload)[0..4], Base58 encoded.
pub fn encode_check(payload: &[u8]) -> String {
  let mut data = Vec::with_capacity(payload.len() + 4);
  data.extend_from_slice(payload);
  data.extend_from_slice(&checksum4(payload));
  encode(&data)
}

/// Decode and verify the trailing checksum, returning the bare payload.
pub fn decode_check(s: &str) -> Result<Vec<u8>, EncodingError> {
  let mut data = decode(s)?;
  if data.len() < 4 {
    return Err(EncodingError::InvalidLength(data.len()));
  }
  let split = data.len() - 4;
  if checksum4(&data[..split]) != data[split..] {
    return Err(EncodingError::ChecksumMismatch);
  }
  data.truncate(split);
  Ok(data)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn leading_zeros_survive() {
    let b = [0x00, 0xff];
    let s = encode(&b);
    assert!(s.starts_with('1'));
    assert_eq!(decode(&s).unwrap(), b);

    let zeros = [0u8; 3];
    assert_eq!(encode(&zeros), "111");
    assert_eq!(decode("111").unwrap(), zeros);
    assert_eq!(encode(&[]), "");
  }

  #[test]
  fn known_value() {
    assert_eq!(encode(b"hello world"), "StV1DL6CwTryKyV");
    assert_eq!(decode("StV1DL6CwTryKyV").unwrap(), b"hello world");
  }

  #[test]
  fn rejects_characters_outside_alphabet() {
    for bad in ["0abc", "Oabc", "Iabc", "labc"] {
      assert!(matches!(decode(bad), Err(EncodingError::InvalidCharacter(_))));
    }
  }

  #[test]
  fn check_round_trip_and_tamper() {
    let payload = [0x00u8, 0x01, 0x02, 0x03, 0xfe];
    let s = encode_check(&payload);
    assert_eq!(decode_check(&s).unwrap(), payload);

    let mut raw = decode(&s).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0x01;
    assert_eq!(decode_check(&encode(&raw)), Err(EncodingError::ChecksumMismatch));
    assert!(matches!(decode_check("1"), Err(EncodingError::InvalidLength(_))));
  }

  #[test]
  fn p2pkh_of_hash160_zero() {
    // version 0x00 || 20 zero bytes
    assert_eq!(encode_check(&[0u8; 21]), "1111111111111111111114oLvT2");
  }
}
