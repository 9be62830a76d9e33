//! secp256k1 key pairs and WIF.
//!
//! A [`PrivateKey`] is a scalar d in [1, n-1] together with its public key
//! Q = d*G. Both carry a compression flag that decides how the public key is
//! serialized (and therefore hashed into legacy addresses).

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::address::{table, Coin, Network};
use crate::ec::{secp256k1, to_be_bytes32, CurveError, Point};
use crate::encoding::base58;
use crate::error::{Error, Result};

/// Uniform scalar in [1, n-1] by rejection sampling 256-bit strings.
pub(crate) fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> BigUint {
  let n = &secp256k1().n;
  let mut buf = [0u8; 32];
  loop {
    rng.fill_bytes(&mut buf);
    let k = BigUint::from_bytes_be(&buf);
    if !k.is_zero() && &k < n {
      return k;
    }
    log::trace!("scalar candidate out of range, redrawing");
  }
}

fn in_scalar_range(d: &BigUint) -> bool {
  !d.is_zero() && d < &secp256k1().n
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
  point: Point,
  compressed: bool,
}

impl PublicKey {
  /// Wrap a curve point. Infinity and off-curve points are rejected.
  pub fn from_point(point: Point, compressed: bool) -> Result<Self> {
    if point.is_infinity() {
      return Err(CurveError::Infinity.into());
    }
    if !point.is_on_curve() {
      return Err(CurveError::NotOnCurve.into());
    }
    Ok(PublicKey { point, compressed })
  }

  /// Parse a 33-byte compressed or 65-byte uncompressed SEC1 encoding.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    let point = Point::from_bytes(bytes)?;
    Ok(PublicKey {
      point,
      compressed: bytes.len() == 33,
    })
  }

  pub fn point(&self) -> &Point {
    &self.point
  }

  pub fn is_compressed(&self) -> bool {
    self.compressed
  }

  /// Same point, other serialization.
  pub fn with_compression(&self, compressed: bool) -> Self {
    PublicKey {
      point: self.point.clone(),
      compressed,
    }
  }

  pub fn to_compressed(&self) -> [u8; 33] {
    let mut out = [0u8; 33];
    out[0] = if self.point.y().bit(0) { 0x03 } else { 0x02 };
    out[1..].copy_from_slice(&to_be_bytes32(self.point.x()));
    out
  }

  pub fn to_uncompressed(&self) -> [u8; 65] {
    let mut out = [0u8; 65];
    out[0] = 0x04;
    out[1..33].copy_from_slice(&to_be_bytes32(self.point.x()));
    out[33..].copy_from_slice(&to_be_bytes32(self.point.y()));
    out
  }

  /// Encoding selected by the compression flag.
  pub fn to_bytes(&self) -> Vec<u8> {
    if self.compressed {
      self.to_compressed().to_vec()
    } else {
      self.to_uncompressed().to_vec()
    }
  }
}

impl fmt::Debug for PublicKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "PublicKey({})", hex::encode(self.to_bytes()))
  }
}

#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
  d: BigUint,
  public: PublicKey,
}

impl PrivateKey {
  /// Fresh key from the operating system's CSPRNG. Compressed by default.
  pub fn random() -> Self {
    Self::generate(&mut OsRng)
  }

  pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
    Self::from_valid_scalar(random_scalar(rng), true)
  }

  pub(crate) fn from_valid_scalar(d: BigUint, compressed: bool) -> Self {
    let point = Point::mul_generator(&d);
    PrivateKey {
      d,
      public: PublicKey { point, compressed },
    }
  }

  /// `d` must lie in [1, n-1].
  pub fn from_scalar(d: BigUint) -> Result<Self> {
    if !in_scalar_range(&d) {
      return Err(Error::InvalidPrivateKey);
    }
    Ok(Self::from_valid_scalar(d, true))
  }

  /// 32-byte big-endian scalar.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    if bytes.len() != 32 {
      return Err(Error::InvalidKeyLength(bytes.len()));
    }
    Self::from_scalar(BigUint::from_bytes_be(bytes))
  }

  pub fn to_bytes(&self) -> [u8; 32] {
    to_be_bytes32(&self.d)
  }

  pub fn scalar(&self) -> &BigUint {
    &self.d
  }

  pub fn public_key(&self) -> &PublicKey {
    &self.public
  }

  pub fn is_compressed(&self) -> bool {
    self.public.compressed
  }

  /// Same scalar with the given compression preference.
  pub fn with_compression(&self, compressed: bool) -> Self {
    PrivateKey {
      d: self.d.clone(),
      public: self.public.with_compression(compressed),
    }
  }

  /// Wallet Import Format: Base58Check(version || d [|| 0x01 if compressed]).
  pub fn to_wif(&self, coin: Coin, network: Network) -> Result<String> {
    let version = wif_version(coin, network)?;
    let mut payload = Vec::with_capacity(34);
    payload.push(version);
    payload.extend_from_slice(&self.to_bytes());
    if self.is_compressed() {
      payload.push(0x01);
    }
    Ok(base58::encode_check(&payload))
  }

  /// Parse a WIF string, checking its version byte against `coin`/`network`.
  pub fn from_wif(wif: &str, coin: Coin, network: Network) -> Result<Self> {
    let expected = wif_version(coin, network)?;
    let payload = base58::decode_check(wif)?;
    let compressed = match payload.len() {
      33 => false,
      34 if payload[33] == 0x01 => true,
      len => return Err(Error::InvalidKeyLength(len)),
    };
    if payload[0] != expected {
      return Err(Error::WifVersionMismatch(payload[0]));
    }
    Ok(Self::from_bytes(&payload[1..33])?.with_compression(compressed))
  }
}

fn wif_version(coin: Coin, network: Network) -> Result<u8> {
  let spec = table::network_spec(coin, network)?;
  spec.wif.ok_or(Error::NoPrefix {
    coin,
    network,
    scheme: crate::address::AddrScheme::P2pkh,
  })
}

impl fmt::Debug for PrivateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PrivateKey")
      .field("d", &"<redacted>")
      .field("public", &self.public)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  const SECRET: &str = "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d";

  #[test]
  fn byte_round_trip() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..4 {
      let k = PrivateKey::generate(&mut rng);
      let back = PrivateKey::from_bytes(&k.to_bytes()).unwrap();
      assert_eq!(back, k);
      assert!(k.public_key().point().is_on_curve());
      assert_eq!(k.public_key().point(), &Point::mul_generator(k.scalar()));
    }
  }

  #[test]
  fn scalar_range_enforced() {
    assert_eq!(PrivateKey::from_bytes(&[0u8; 32]), Err(Error::InvalidPrivateKey));
    let n = to_be_bytes32(&secp256k1().n);
    assert_eq!(PrivateKey::from_bytes(&n), Err(Error::InvalidPrivateKey));
    assert_eq!(PrivateKey::from_bytes(&[1u8; 31]), Err(Error::InvalidKeyLength(31)));
    let n_minus_1 = &secp256k1().n - 1u8;
    assert!(PrivateKey::from_scalar(n_minus_1).is_ok());
  }

  #[test]
  fn wif_vectors() {
    let k = PrivateKey::from_bytes(&hex::decode(SECRET).unwrap()).unwrap();
    assert_eq!(
      k.with_compression(false).to_wif(Coin::Btc, Network::Main).unwrap(),
      "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ"
    );
    assert_eq!(
      k.to_wif(Coin::Btc, Network::Main).unwrap(),
      "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617"
    );
  }

  #[test]
  fn wif_import_checks_network() {
    let k = PrivateKey::from_bytes(&hex::decode(SECRET).unwrap()).unwrap();
    let wif = k.to_wif(Coin::Btc, Network::Test).unwrap();
    let back = PrivateKey::from_wif(&wif, Coin::Btc, Network::Test).unwrap();
    assert_eq!(back, k);
    assert!(back.is_compressed());
    assert_eq!(
      PrivateKey::from_wif(&wif, Coin::Btc, Network::Main),
      Err(Error::WifVersionMismatch(0xEF))
    );
    let uncompressed = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";
    assert!(!PrivateKey::from_wif(uncompressed, Coin::Btc, Network::Main).unwrap().is_compressed());
    assert!(PrivateKey::from_wif(uncompressed, Coin::Eth, Network::Main).is_err());
  }

  #[test]
  fn public_key_encodings() {
    let k = PrivateKey::from_bytes(&hex::decode(SECRET).unwrap()).unwrap();
    let pk = k.public_key();
    assert_eq!(PublicKey::from_bytes(&pk.to_compressed()).unwrap(), *pk);
    let unc = PublicKey::from_bytes(&pk.to_uncompressed()).unwrap();
    assert!(!unc.is_compressed());
    assert_eq!(unc.point(), pk.point());
    assert!(PublicKey::from_point(Point::infinity(), true).is_err());
  }
}
