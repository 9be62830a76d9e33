//! CashAddr: `prefix ":" base32(version || hash || checksum)`.
//!
//! The prefix is not part of the symbol stream but salts the checksum: each
//! prefix character contributes its low five bits, followed by a zero separator.

use crate::encoding::polymod::{self, convert_bits, CASHADDR};
use crate::encoding::EncodingError;

/// Version byte type bits.
pub const TYPE_P2PKH: u8 = 0;
pub const TYPE_P2SH: u8 = 1;

fn prefix_expand(prefix: &str) -> Vec<u8> {
  let mut out: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
  out.push(0);
  out
}

/// Size code of the version byte for a hash of `len` bytes.
fn size_code(len: usize) -> Result<u8, EncodingError> {
  Ok(match len {
    20 => 0,
    24 => 1,
    28 => 2,
    32 => 3,
    40 => 4,
    48 => 5,
    56 => 6,
    64 => 7,
    other => return Err(EncodingError::InvalidLength(other)),
  })
}

/// Version byte for an address type and hash length.
pub fn version_byte(kind: u8, hash_len: usize) -> Result<u8, EncodingError> {
  Ok((kind << 3) | size_code(hash_len)?)
}

pub fn encode(prefix: &str, version: u8, hash: &[u8]) -> Result<String, EncodingError> {
  let prefix = polymod::normalize_case(prefix)?;
  let mut raw = Vec::with_capacity(hash.len() + 1);
  raw.push(version);
  raw.extend_from_slice(hash);
  let payload = convert_bits(&raw, 8, 5, true)?;
  let checksum = CASHADDR.create(&prefix_expand(&prefix), &payload);

  let mut out = String::with_capacity(prefix.len() + 1 + payload.len() + checksum.len());
  out.push_str(&prefix);
  out.push(':');
  out.extend(payload.iter().chain(checksum.iter()).map(|&v| polymod::to_char(v)));
  Ok(out)
}

/// Decode an address, with or without its `prefix:` part. Returns (version, hash).
pub fn decode(expected_prefix: &str, addr: &str) -> Result<(u8, Vec<u8>), EncodingError> {
  let addr = polymod::normalize_case(addr)?;
  let expected = expected_prefix.to_ascii_lowercase();
  let body = match addr.split_once(':') {
    Some((prefix, body)) if prefix == expected => body,
    Some((prefix, _)) => return Err(EncodingError::InvalidPrefix(prefix.to_string())),
    None => addr.as_str(),
  };
  if body.len() <= CASHADDR.width {
    return Err(EncodingError::InvalidLength(body.len()));
  }
  let data = body.chars().map(polymod::from_char).collect::<Result<Vec<u8>, _>>()?;
  if !CASHADDR.verify(&prefix_expand(&expected), &data) {
    return Err(EncodingError::ChecksumMismatch);
  }
  let raw = convert_bits(&data[..data.len() - CASHADDR.width], 5, 8, false)?;
  let (&version, hash) = raw.split_first().ok_or(EncodingError::InvalidLength(0))?;
  if size_code(hash.len())? != version & 0x07 {
    return Err(EncodingError::InvalidLength(hash.len()));
  }
  Ok((version, hash.to_vec()))
}
