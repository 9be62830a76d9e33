//! Segwit v0 addresses (BIP-173 bech32).
//!
//! Only witness version 0 is accepted. Version 1+ programs (taproot) use the
//! bech32m constant and are rejected here.

use crate::encoding::polymod::{self, convert_bits, BECH32};
use crate::encoding::EncodingError;

/// Expand the human-readable part: high bits of each char, a zero, then the low bits.
pub fn hrp_expand(hrp: &str) -> Vec<u8> {
  let bytes = hrp.as_bytes();
  let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
  out.extend(bytes.iter().map(|b| b >> 5));
  out.push(0);
  out.extend(bytes.iter().map(|b| b & 0x1f));
  out
}

fn check_program(version: u8, program: &[u8]) -> Result<(), EncodingError> {
  if version != 0 {
    return Err(EncodingError::InvalidWitnessVersion(version));
  }
  if program.len() != 20 && program.len() != 32 {
    return Err(EncodingError::InvalidLength(program.len()));
  }
  Ok(())
}

/// Encode a witness program as `hrp || "1" || data || checksum`.
pub fn encode_segwit(hrp: &str, version: u8, program: &[u8]) -> Result<String, EncodingError> {
  check_program(version, program)?;
  let hrp = polymod::normalize_case(hrp)?;
  let mut data = vec![version];
  data.extend(convert_bits(program, 8, 5, true)?);
  let checksum = BECH32.create(&hrp_expand(&hrp), &data);

  let mut out = String::with_capacity(hrp.len() + 1 + data.len() + checksum.len());
  out.push_str(&hrp);
  out.push('1');
  out.extend(data.iter().chain(checksum.iter()).map(|&v| polymod::to_char(v)));
  Ok(out)
}

/// Decode a segwit address, checking that its prefix is `expected_hrp`.
///
/// Returns the witness version and program.
pub fn decode_segwit(expected_hrp: &str, addr: &str) -> Result<(u8, Vec<u8>), EncodingError> {
  let addr = polymod::normalize_case(addr)?;
  let sep = addr.rfind('1').ok_or(EncodingError::MissingSeparator)?;
  let (hrp, rest) = (&addr[..sep], &addr[sep + 1..]);
  if hrp != expected_hrp.to_ascii_lowercase() {
    return Err(EncodingError::InvalidPrefix(hrp.to_string()));
  }
  if rest.len() < BECH32.width + 1 || addr.len() > 90 {
    return Err(EncodingError::InvalidLength(addr.len()));
  }
  let data = rest.chars().map(polymod::from_char).collect::<Result<Vec<u8>, _>>()?;
  if !BECH32.verify(&hrp_expand(hrp), &data) {
    return Err(EncodingError::ChecksumMismatch);
  }
  let payload = &data[..data.len() - BECH32.width];
  let version = payload[0];
  let program = convert_bits(&payload[1..], 5, 8, false)?;
  check_program(version, &program)?;
  Ok((version, program))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bip173_p2wpkh_vector() {
    let program = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
    let addr = encode_segwit("bc", 0, &program).unwrap();
    assert_eq!(addr, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
    assert_eq!(decode_segwit("bc", "BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4").unwrap(), (0, program));
  }

  #[test]
  fn bip173_p2wsh_vector() {
    let program = hex::decode("1863143c14c5166804bd19203356da136c985678cd4d27a1b8c6329604903262").unwrap();
    let addr = encode_segwit("tb", 0, &program).unwrap();
    assert_eq!(addr, "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7");
    assert_eq!(decode_segwit("tb", &addr).unwrap().1, program);
  }

  #[test]
  fn decode_failures() {
    let good = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
    assert!(matches!(decode_segwit("tb", good), Err(EncodingError::InvalidPrefix(_))));
    assert_eq!(decode_segwit("bc", "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t5"), Err(EncodingError::ChecksumMismatch));
    assert_eq!(decode_segwit("bc", "bc1qw508d6qejxtdg4y5r3zarvarY0c5xw7kv8f3t4"), Err(EncodingError::MixedCase));
    assert_eq!(decode_segwit("bc", "bcqw508d6qejxtdg"), Err(EncodingError::MissingSeparator));
    assert_eq!(decode_segwit("bc", "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3tb"), Err(EncodingError::InvalidCharacter('b')));
  }

  #[test]
  fn taproot_versions_rejected() {
    assert_eq!(encode_segwit("bc", 1, &[0u8; 32]), Err(EncodingError::InvalidWitnessVersion(1)));
    assert_eq!(encode_segwit("bc", 0, &[0u8; 21]), Err(EncodingError::InvalidLength(21)));
  }
}
