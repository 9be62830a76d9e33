//! Signed messages in the `Bitcoin Signed Message` format (BIP-137 headers).
//!
//! Wire form: base64(header || r || s). The header encodes the recovery id
//! plus what kind of address the signer claims:
//!
//! | header | address |
//! |---|---|
//! | 27-30 | P2PKH, uncompressed key |
//! | 31-34 | P2PKH, compressed key |
//! | 35-38 | P2WPKH nested in P2SH |
//! | 39-42 | native P2WPKH |
//!
//! Verification ignores the claimed kind and accepts any of the four
//! addresses the recovered key could own. Taproot addresses never match.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::address::{self, AddrScheme, AddressStyle, Coin, Network};
use crate::ecdsa::{self, Signature};
use crate::error::{Error, Result};
use crate::hash::sha256d;
use crate::key::{PrivateKey, PublicKey};

pub const MAGIC: &[u8] = b"Bitcoin Signed Message:\n";

const HEADER_UNCOMPRESSED: u8 = 27;
const HEADER_COMPRESSED: u8 = 31;
const HEADER_P2WPKH_P2SH: u8 = 35;
const HEADER_P2WPKH: u8 = 39;

/// Bitcoin CompactSize length prefix.
pub fn varint(n: u64) -> Vec<u8> {
  match n {
    0..=0xFC => vec![n as u8],
    0xFD..=0xFFFF => {
      let mut v = vec![0xFD];
      v.extend_from_slice(&(n as u16).to_le_bytes());
      v
    }
    0x1_0000..=0xFFFF_FFFF => {
      let mut v = vec![0xFE];
      v.extend_from_slice(&(n as u32).to_le_bytes());
      v
    }
    _ => {
      let mut v = vec![0xFF];
      v.extend_from_slice(&n.to_le_bytes());
      v
    }
  }
}

/// varint(len(magic)) || magic || varint(len(message)) || message
pub fn format_message(message: &[u8]) -> Vec<u8> {
  let mut out = Vec::with_capacity(MAGIC.len() + message.len() + 10);
  out.extend(varint(MAGIC.len() as u64));
  out.extend_from_slice(MAGIC);
  out.extend(varint(message.len() as u64));
  out.extend_from_slice(message);
  out
}

pub fn message_hash(message: &[u8]) -> [u8; 32] {
  sha256d(&format_message(message))
}

fn header_base(key: &PrivateKey, scheme: AddrScheme) -> Result<u8> {
  match scheme {
    AddrScheme::P2pkh if key.is_compressed() => Ok(HEADER_COMPRESSED),
    AddrScheme::P2pkh => Ok(HEADER_UNCOMPRESSED),
    AddrScheme::P2wpkhInP2sh => Ok(HEADER_P2WPKH_P2SH),
    AddrScheme::P2wpkh => Ok(HEADER_P2WPKH),
    other => Err(Error::UnsupportedScheme(other)),
  }
}

fn encode(header: u8, sig: &Signature) -> String {
  let mut raw = [0u8; 65];
  raw[0] = header;
  raw[1..].copy_from_slice(&sig.to_compact());
  STANDARD.encode(raw)
}

fn sign_with_base(key: &PrivateKey, message: &[u8], base: u8) -> String {
  let sig = ecdsa::sign(key, &message_hash(message));
  // sign() always records the recovery id
  let rec_id = sig.recovery_id.unwrap_or_default();
  encode(base + rec_id, &sig)
}

/// Sign for an address of the given scheme. Only key-hash schemes apply.
pub fn sign_message(key: &PrivateKey, message: &[u8], scheme: AddrScheme) -> Result<String> {
  let base = header_base(key, scheme)?;
  Ok(sign_with_base(key, message, base))
}

/// Sign for the key's own P2PKH address.
pub fn sign_bitcoin_msg(key: &PrivateKey, message: &str) -> String {
  let base = if key.is_compressed() {
    HEADER_COMPRESSED
  } else {
    HEADER_UNCOMPRESSED
  };
  sign_with_base(key, message.as_bytes(), base)
}

/// Split a header byte into (recovery id, compressed).
fn classify_header(header: u8) -> Result<(u8, bool)> {
  match header {
    27..=30 => Ok((header - HEADER_UNCOMPRESSED, false)),
    31..=34 => Ok((header - HEADER_COMPRESSED, true)),
    35..=38 => Ok((header - HEADER_P2WPKH_P2SH, true)),
    39..=42 => Ok((header - HEADER_P2WPKH, true)),
    other => Err(Error::InvalidHeader(other)),
  }
}

/// Drop an optional `scheme:` tag in front of the base64 text.
fn strip_tag(signature: &str) -> &str {
  let s = signature.trim();
  s.rsplit_once(':').map_or(s, |(_, rest)| rest)
}

/// Recover the signing key from a base64 signature.
pub fn recover(signature: &str, message: &[u8]) -> Result<PublicKey> {
  let raw = STANDARD.decode(strip_tag(signature)).map_err(|_| Error::InvalidBase64)?;
  if raw.len() != 65 {
    return Err(Error::InvalidSignatureLength(raw.len()));
  }
  let (rec_id, compressed) = classify_header(raw[0])?;
  let sig = Signature::from_compact(&raw[1..])?;
  let key = ecdsa::recover_public_key(rec_id, &sig, &message_hash(message))?;
  Ok(key.with_compression(compressed))
}

/// Addresses a recovered key may own on `coin`/`network`, tagged with their scheme.
///
/// Combinations without a table entry (e.g. segwit on Dogecoin) are skipped.
fn candidate_addresses(coin: Coin, network: Network, key: &PublicKey) -> Vec<(AddrScheme, String)> {
  let compressed = key.with_compression(true);
  let uncompressed = key.with_compression(false);
  [
    (AddrScheme::P2pkh, &uncompressed),
    (AddrScheme::P2pkh, &compressed),
    (AddrScheme::P2wpkhInP2sh, &compressed),
    (AddrScheme::P2wpkh, &compressed),
  ]
  .into_iter()
  .filter_map(|(scheme, pk)| {
    address::from_public_key(coin, network, scheme, pk)
      .ok()
      .map(|addr| (scheme, addr))
  })
  .collect()
}

/// Base58 and hex addresses compare exactly. bech32 and CashAddr also match
/// in all upper case, and a CashAddr may omit its `prefix:` part.
fn same_address(style: AddressStyle, scheme: AddrScheme, candidate: &str, given: &str) -> bool {
  let case_free = match style {
    AddressStyle::CashAddr => true,
    AddressStyle::Generic => scheme == AddrScheme::P2wpkh,
    AddressStyle::Ethereum => false,
  };
  if !case_free {
    return candidate == given;
  }
  // mixed case stays as is and cannot match the lower case candidate
  let folded = if given.bytes().any(|b| b.is_ascii_lowercase()) {
    given.to_string()
  } else {
    given.to_ascii_lowercase()
  };
  if folded == candidate {
    return true;
  }
  style == AddressStyle::CashAddr && candidate.split_once(':').is_some_and(|(_, body)| body == folded)
}

/// Check `signature` over `message` against `address` on `coin`/`network`.
pub fn verify_message(
  coin: Coin,
  network: Network,
  address: &str,
  signature: &str,
  message: &[u8],
) -> Result<()> {
  let key = recover(signature, message)?;
  let address = address.trim();
  let style = address::table::coin_spec(coin).style;
  let candidates = candidate_addresses(coin, network, &key);
  log::debug!("recovered {:?}, candidates {:?}", key, candidates);
  if candidates
    .iter()
    .any(|(scheme, c)| same_address(style, *scheme, c, address))
  {
    Ok(())
  } else {
    Err(Error::NoAddressMatch)
  }
}

/// Bitcoin verification across main, test and regtest addresses.
pub fn verify_bitcoin_msg(address: &str, signature: &str, message: &str) -> bool {
  [Network::Main, Network::Test, Network::Reg]
    .into_iter()
    .any(|network| verify_message(Coin::Btc, network, address, signature, message.as_bytes()).is_ok())
}
