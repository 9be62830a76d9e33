//! Shared machinery for the base-32 checksummed formats (segwit bech32, CashAddr):
//! bit regrouping, the 32-symbol charset, and the BCH-code remainder over GF(32).

use crate::encoding::EncodingError;

pub const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Map a 5-bit symbol to its charset character.
pub fn to_char(v: u8) -> char {
  CHARSET[(v & 0x1f) as usize] as char
}

/// Inverse of [`to_char`], lowercase only.
pub fn from_char(c: char) -> Result<u8, EncodingError> {
  if !c.is_ascii() {
    return Err(EncodingError::InvalidCharacter(c));
  }
  CHARSET
    .iter()
    .position(|&x| x == c as u8)
    .map(|i| i as u8)
    .ok_or(EncodingError::InvalidCharacter(c))
}

/// Regroup a stream of `from`-bit values into `to`-bit values, MSB first.
///
/// With `pad`, a trailing partial group is zero-filled; without it, leftover
/// bits must be fewer than `from` and all zero.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, EncodingError> {
  let mut acc: u32 = 0;
  let mut bits: u32 = 0;
  let maxv: u32 = (1 << to) - 1;
  let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
  for &value in data {
    let v = value as u32;
    if v >> from != 0 {
      return Err(EncodingError::InvalidPadding);
    }
    acc = (acc << from) | v;
    bits += from;
    while bits >= to {
      bits -= to;
      out.push(((acc >> bits) & maxv) as u8);
    }
  }
  if pad {
    if bits > 0 {
      out.push(((acc << (to - bits)) & maxv) as u8);
    }
  } else if bits >= from || ((acc << (to - bits)) & maxv) != 0 {
    return Err(EncodingError::InvalidPadding);
  }
  Ok(out)
}

/// A GF(32) polynomial checksum with five generator constants and `width`
/// output symbols.
pub struct Checksum {
  pub generators: [u64; 5],
  pub width: usize,
}

/// Segwit (BIP-173) bech32: 6 symbols.
pub const BECH32: Checksum = Checksum {
  generators: [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3],
  width: 6,
};

/// CashAddr: 8 symbols.
pub const CASHADDR: Checksum = Checksum {
  generators: [0x98f2bc8e61, 0x79b76d99e2, 0xf33e5fb3c4, 0xae2eabe2a8, 0x1e4f43e470],
  width: 8,
};

impl Checksum {
  fn shift(&self) -> usize {
    5 * (self.width - 1)
  }

  /// Remainder of the symbol stream, starting from 1.
  pub fn polymod(&self, values: &[u8]) -> u64 {
    let shift = self.shift();
    let mask = (1u64 << shift) - 1;
    let mut chk: u64 = 1;
    for &v in values {
      let top = chk >> shift;
      chk = ((chk & mask) << 5) ^ v as u64;
      for (i, g) in self.generators.iter().enumerate() {
        if (top >> i) & 1 == 1 {
          chk ^= g;
        }
      }
    }
    chk
  }

  /// `width` checksum symbols for `prefix || data`, where `prefix` is the
  /// already-expanded prefix symbol stream.
  pub fn create(&self, prefix: &[u8], data: &[u8]) -> Vec<u8> {
    let mut values = Vec::with_capacity(prefix.len() + data.len() + self.width);
    values.extend_from_slice(prefix);
    values.extend_from_slice(data);
    values.extend(std::iter::repeat(0u8).take(self.width));
    let pm = self.polymod(&values) ^ 1;
    (0..self.width)
      .map(|i| ((pm >> (5 * (self.width - 1 - i))) & 0x1f) as u8)
      .collect()
  }

  /// True when `data` (payload followed by checksum symbols) verifies.
  pub fn verify(&self, prefix: &[u8], data: &[u8]) -> bool {
    let mut values = Vec::with_capacity(prefix.len() + data.len());
    values.extend_from_slice(prefix);
    values.extend_from_slice(data);
    self.polymod(&values) == 1
  }
}

/// Reject strings that mix upper and lower case, then lowercase.
pub fn normalize_case(s: &str) -> Result<String, EncodingError> {
  let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
  let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
  if has_lower && has_upper {
    return Err(EncodingError::MixedCase);
  }
  Ok(s.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn regroup_8_to_5_and_back() {
    let data = [0xffu8, 0x00, 0xab];
    let five = convert_bits(&data, 8, 5, true).unwrap();
    assert_eq!(five.len(), 5);
    assert!(five.iter().all(|&v| v < 32));
    assert_eq!(convert_bits(&five, 5, 8, false).unwrap(), data);
  }

  #[test]
  fn non_zero_padding_rejected() {
    // 0b00001 as the last symbol leaves a set bit in the discarded tail
    assert_eq!(convert_bits(&[0, 1], 5, 8, false), Err(EncodingError::InvalidPadding));
  }

  #[test]
  fn charset_round_trip() {
    for v in 0..32u8 {
      assert_eq!(from_char(to_char(v)).unwrap(), v);
    }
    assert_eq!(from_char('b'), Err(EncodingError::InvalidCharacter('b')));
    assert_eq!(from_char('1'), Err(EncodingError::InvalidCharacter('1')));
  }

  #[test]
  fn created_checksum_verifies() {
    for ck in [&BECH32, &CASHADDR] {
      let prefix = [3u8, 3, 0, 2, 3];
      let data = [0u8, 14, 20, 15, 7];
      let mut all = data.to_vec();
      all.extend(ck.create(&prefix, &data));
      assert_eq!(all.len(), data.len() + ck.width);
      assert!(ck.verify(&prefix, &all));
      all[1] ^= 1;
      assert!(!ck.verify(&prefix, &all));
    }
  }

  #[test]
  fn mixed_case_rejected() {
    assert_eq!(normalize_case("BC1q").unwrap_err(), EncodingError::MixedCase);
    assert_eq!(normalize_case("BC1Q").unwrap(), "bc1q");
  }
}
