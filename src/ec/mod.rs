//! secp256k1 curve engine: y^2 = x^3 + 7 over F_p.
//!
//! Points are exposed in affine form only; arithmetic runs in Jacobian
//! coordinates internally and converts back with a single inversion.
//!
//! Scalar multiplication is a plain double-and-add ladder that performs a
//! throwaway addition on zero bits so both branches cost the same number of
//! group operations. That evens out the control flow but the big-integer
//! arithmetic underneath is variable-time: nothing here is constant-time.

pub mod arith;
mod error;
mod jacobian;

use std::fmt;
use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::Zero;

pub use error::CurveError;
use jacobian::Jacobian;

use arith::{mod_add, mod_mul, mod_neg, mod_sqrt};

/// Domain parameters of secp256k1.
#[derive(Debug)]
pub struct Curve {
  /// Field prime
  pub p: BigUint,
  /// Group order
  pub n: BigUint,
  /// Curve coefficient b (a = 0)
  pub b: BigUint,
  /// Generator
  pub g: Point,
  /// Bit length of `n`
  pub bit_size: u64,
}

static SECP256K1: LazyLock<Curve> = LazyLock::new(|| {
  let hex = |s: &str| BigUint::parse_bytes(s.as_bytes(), 16).expect("valid curve constant");
  let n = hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
  Curve {
    p: hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F"),
    b: BigUint::from(7u8),
    g: Point {
      x: hex("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798"),
      y: hex("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8"),
    },
    bit_size: n.bits(),
    n,
  }
});

/// The process-wide curve parameters.
pub fn secp256k1() -> &'static Curve {
  &SECP256K1
}

impl Curve {
  /// x^3 + 7 mod p
  fn rhs(&self, x: &BigUint) -> BigUint {
    let x3 = mod_mul(&mod_mul(x, x, &self.p), x, &self.p);
    mod_add(&x3, &self.b, &self.p)
  }

  /// Find some y with y^2 = x^3 + 7 (mod p). `None` if `x` is not an abscissa.
  pub fn solve(&self, x: &BigUint) -> Option<BigUint> {
    if x >= &self.p {
      return None;
    }
    mod_sqrt(&self.rhs(x), &self.p)
  }
}

/// Big-endian, left-padded to 32 bytes. Values wider than 256 bits keep their low bytes.
pub fn to_be_bytes32(v: &BigUint) -> [u8; 32] {
  let bytes = v.to_bytes_be();
  let mut out = [0u8; 32];
  if bytes.len() >= 32 {
    out.copy_from_slice(&bytes[bytes.len() - 32..]);
  } else {
    out[32 - bytes.len()..].copy_from_slice(&bytes);
  }
  out
}

/// An affine point; (0, 0) is the point at infinity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Point {
  x: BigUint,
  y: BigUint,
}

impl Point {
  pub fn infinity() -> Self {
    Point {
      x: BigUint::zero(),
      y: BigUint::zero(),
    }
  }

  pub fn generator() -> Self {
    secp256k1().g.clone()
  }

  /// Build a point from affine coordinates, checking the curve equation.
  pub fn new(x: BigUint, y: BigUint) -> Result<Self, CurveError> {
    let pt = Point { x, y };
    if pt.is_on_curve() {
      Ok(pt)
    } else {
      Err(CurveError::NotOnCurve)
    }
  }

  pub(crate) fn from_reduced(x: BigUint, y: BigUint) -> Self {
    Point { x, y }
  }

  pub fn x(&self) -> &BigUint {
    &self.x
  }

  pub fn y(&self) -> &BigUint {
    &self.y
  }

  pub fn is_infinity(&self) -> bool {
    self.x.is_zero() && self.y.is_zero()
  }

  /// True for on-curve points. The infinity sentinel is not on the curve.
  pub fn is_on_curve(&self) -> bool {
    let c = secp256k1();
    if self.x >= c.p || self.y >= c.p || self.is_infinity() {
      return false;
    }
    mod_mul(&self.y, &self.y, &c.p) == c.rhs(&self.x)
  }

  pub fn neg(&self) -> Self {
    if self.is_infinity() {
      return Point::infinity();
    }
    Point {
      x: self.x.clone(),
      y: mod_neg(&self.y, &secp256k1().p),
    }
  }

  pub fn add(&self, other: &Point) -> Point {
    Jacobian::from_affine(self)
      .add(&Jacobian::from_affine(other))
      .to_affine()
  }

  pub fn double(&self) -> Point {
    Jacobian::from_affine(self).double().to_affine()
  }

  /// k * self, scanning k from its most significant bit.
  ///
  /// `k` is used as given (not reduced mod n) so that `n * P` can be
  /// evaluated to check a point's order.
  pub fn mul(&self, k: &BigUint) -> Point {
    let base = Jacobian::from_affine(self);
    let mut acc = Jacobian::infinity();
    let mut decoy = Jacobian::infinity();
    for i in (0..k.bits()).rev() {
      acc = acc.double();
      if k.bit(i) {
        acc = acc.add(&base);
      } else {
        decoy = decoy.add(&base);
      }
    }
    std::hint::black_box(&decoy);
    acc.to_affine()
  }

  /// k * G
  pub fn mul_generator(k: &BigUint) -> Point {
    secp256k1().g.mul(k)
  }

  fn y_is_odd(&self) -> bool {
    self.y.bit(0)
  }

  /// SEC1 encoding: `0x02/0x03 || x` when compressed, `0x04 || x || y` otherwise.
  pub fn to_bytes(&self, compressed: bool) -> Result<Vec<u8>, CurveError> {
    if self.is_infinity() {
      return Err(CurveError::Infinity);
    }
    let mut out = Vec::with_capacity(if compressed { 33 } else { 65 });
    if compressed {
      out.push(if self.y_is_odd() { 0x03 } else { 0x02 });
      out.extend_from_slice(&to_be_bytes32(&self.x));
    } else {
      out.push(0x04);
      out.extend_from_slice(&to_be_bytes32(&self.x));
      out.extend_from_slice(&to_be_bytes32(&self.y));
    }
    Ok(out)
  }

  /// Parse a 33-byte compressed or 65-byte uncompressed SEC1 point.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, CurveError> {
    let prefix = *bytes.first().ok_or(CurveError::InvalidLength(0))?;
    match (bytes.len(), prefix) {
      (33, 0x02 | 0x03) => {
        let x = BigUint::from_bytes_be(&bytes[1..]);
        let y = secp256k1().solve(&x).ok_or(CurveError::NotOnCurve)?;
        let want_odd = prefix == 0x03;
        let y = if y.bit(0) == want_odd {
          y
        } else {
          mod_neg(&y, &secp256k1().p)
        };
        Point::new(x, y)
      }
      (65, 0x04) => {
        let x = BigUint::from_bytes_be(&bytes[1..33]);
        let y = BigUint::from_bytes_be(&bytes[33..]);
        Point::new(x, y)
      }
      (33 | 65, other) => Err(CurveError::InvalidPrefix(other)),
      (len, _) => Err(CurveError::InvalidLength(len)),
    }
  }
}

impl fmt::Debug for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_infinity() {
      return write!(f, "Point(infinity)");
    }
    write!(f, "Point({:064x}, {:064x})", self.x, self.y)
  }
}

/// `n * pt == infinity` for a finite `pt`, i.e. `pt` generates the full group.
pub fn has_curve_order(pt: &Point) -> bool {
  !pt.is_infinity() && pt.mul(&secp256k1().n).is_infinity()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn hex_big(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
  }

  #[test]
  fn generator_on_curve() {
    assert!(Point::generator().is_on_curve());
    assert!(!Point::infinity().is_on_curve());
    assert_eq!(secp256k1().bit_size, 256);
  }

  #[test]
  fn two_g_matches_known_value() {
    let g = Point::generator();
    let two_g = g.double();
    assert_eq!(
      two_g.x(),
      &hex_big("C6047F9441ED7D6D3045406E95C07CD85C778E4B8CEF3CA7ABAC09B95C709EE5")
    );
    assert_eq!(
      two_g.y(),
      &hex_big("1AE168FEA63DC339A3C58419466CEAEEF7F632653266D0E1236431A950CFE52A")
    );
    assert_eq!(g.add(&g), two_g);
    assert_eq!(g.mul(&BigUint::from(2u8)), two_g);
  }

  #[test]
  fn three_g_by_add_and_mul() {
    let g = Point::generator();
    let three = g.double().add(&g);
    assert_eq!(
      three.x(),
      &hex_big("F9308A019258C31049344F85F89D5229B531C845836F99B08601F113BCE036F9")
    );
    assert_eq!(g.mul(&BigUint::from(3u8)), three);
  }

  #[test]
  fn infinity_is_identity() {
    let g = Point::generator();
    assert_eq!(g.add(&Point::infinity()), g);
    assert_eq!(Point::infinity().add(&g), g);
    assert!(g.add(&g.neg()).is_infinity());
    assert!(Point::infinity().double().is_infinity());
  }

  #[test]
  fn order_times_generator_is_infinity() {
    assert!(has_curve_order(&Point::generator()));
    let n_minus_1 = &secp256k1().n - 1u8;
    assert_eq!(Point::mul_generator(&n_minus_1), Point::generator().neg());
  }

  #[test]
  fn compressed_round_trip() {
    let pt = Point::mul_generator(&BigUint::from(0xdead_beefu32));
    for compressed in [true, false] {
      let enc = pt.to_bytes(compressed).unwrap();
      assert_eq!(enc.len(), if compressed { 33 } else { 65 });
      assert_eq!(Point::from_bytes(&enc).unwrap(), pt);
    }
  }

  #[test]
  fn decode_rejects_bad_input() {
    assert_eq!(Point::from_bytes(&[]), Err(CurveError::InvalidLength(0)));
    assert_eq!(Point::from_bytes(&[0x02; 10]), Err(CurveError::InvalidLength(10)));
    let mut enc = Point::generator().to_bytes(true).unwrap();
    enc[0] = 0x05;
    assert_eq!(Point::from_bytes(&enc), Err(CurveError::InvalidPrefix(0x05)));

    // x = 7 has no square root for x^3 + 7
    let mut bad = [0u8; 33];
    bad[0] = 0x02;
    bad[32] = 7;
    assert_eq!(Point::from_bytes(&bad), Err(CurveError::NotOnCurve));

    let mut off = Point::generator().to_bytes(false).unwrap();
    off[64] ^= 1;
    assert_eq!(Point::from_bytes(&off), Err(CurveError::NotOnCurve));
  }

  #[test]
  fn infinity_has_no_encoding() {
    assert_eq!(Point::infinity().to_bytes(true), Err(CurveError::Infinity));
  }
}
