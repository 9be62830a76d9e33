//! Jacobian coordinates (X, Y, Z) with x = X/Z^2, y = Y/Z^3.
//!
//! Z = 0 encodes the point at infinity. These never leave the `ec` module;
//! callers only ever see affine [`Point`]s.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use super::arith::{mod_add, mod_inv, mod_mul, mod_sub};
use super::{secp256k1, Point};

#[derive(Clone, Debug)]
pub(crate) struct Jacobian {
  x: BigUint,
  y: BigUint,
  z: BigUint,
}

impl Jacobian {
  pub(crate) fn infinity() -> Self {
    Jacobian {
      x: BigUint::one(),
      y: BigUint::one(),
      z: BigUint::zero(),
    }
  }

  pub(crate) fn is_infinity(&self) -> bool {
    self.z.is_zero()
  }

  pub(crate) fn from_affine(pt: &Point) -> Self {
    if pt.is_infinity() {
      return Self::infinity();
    }
    Jacobian {
      x: pt.x().clone(),
      y: pt.y().clone(),
      z: BigUint::one(),
    }
  }

  /// One field inversion.
  pub(crate) fn to_affine(&self) -> Point {
    if self.is_infinity() {
      return Point::infinity();
    }
    let p = &secp256k1().p;
    let zinv = mod_inv(&self.z, p);
    let zinv2 = mod_mul(&zinv, &zinv, p);
    let zinv3 = mod_mul(&zinv2, &zinv, p);
    Point::from_reduced(mod_mul(&self.x, &zinv2, p), mod_mul(&self.y, &zinv3, p))
  }

  /// dbl-2009-l (a = 0).
  pub(crate) fn double(&self) -> Self {
    if self.is_infinity() || self.y.is_zero() {
      return Self::infinity();
    }
    let p = &secp256k1().p;
    let a = mod_mul(&self.x, &self.x, p);
    let b = mod_mul(&self.y, &self.y, p);
    let c = mod_mul(&b, &b, p);
    // D = 2 * ((X + B)^2 - A - C)
    let xb = mod_add(&self.x, &b, p);
    let d = mod_sub(&mod_sub(&mod_mul(&xb, &xb, p), &a, p), &c, p);
    let d = mod_add(&d, &d, p);
    let e = mod_add(&mod_add(&a, &a, p), &a, p);
    let f = mod_mul(&e, &e, p);

    let x3 = mod_sub(&f, &mod_add(&d, &d, p), p);
    let c8 = mod_mul(&BigUint::from(8u8), &c, p);
    let y3 = mod_sub(&mod_mul(&e, &mod_sub(&d, &x3, p), p), &c8, p);
    let yz = mod_mul(&self.y, &self.z, p);
    let z3 = mod_add(&yz, &yz, p);
    Jacobian { x: x3, y: y3, z: z3 }
  }

  /// add-2007-bl. Falls back to doubling when both operands are the same point.
  pub(crate) fn add(&self, other: &Self) -> Self {
    if self.is_infinity() {
      return other.clone();
    }
    if other.is_infinity() {
      return self.clone();
    }
    let p = &secp256k1().p;
    let z1z1 = mod_mul(&self.z, &self.z, p);
    let z2z2 = mod_mul(&other.z, &other.z, p);
    let u1 = mod_mul(&self.x, &z2z2, p);
    let u2 = mod_mul(&other.x, &z1z1, p);
    let s1 = mod_mul(&mod_mul(&self.y, &other.z, p), &z2z2, p);
    let s2 = mod_mul(&mod_mul(&other.y, &self.z, p), &z1z1, p);

    let h = mod_sub(&u2, &u1, p);
    let r = mod_sub(&s2, &s1, p);
    if h.is_zero() {
      if r.is_zero() {
        return self.double();
      }
      // P + (-P)
      return Self::infinity();
    }
    let r = mod_add(&r, &r, p);
    let h2 = mod_add(&h, &h, p);
    let i = mod_mul(&h2, &h2, p);
    let j = mod_mul(&h, &i, p);
    let v = mod_mul(&u1, &i, p);

    let x3 = mod_sub(&mod_sub(&mod_mul(&r, &r, p), &j, p), &mod_add(&v, &v, p), p);
    let s1j = mod_mul(&s1, &j, p);
    let y3 = mod_sub(&mod_mul(&r, &mod_sub(&v, &x3, p), p), &mod_add(&s1j, &s1j, p), p);
    let zs = mod_add(&self.z, &other.z, p);
    let z3 = mod_mul(&mod_sub(&mod_sub(&mod_mul(&zs, &zs, p), &z1z1, p), &z2z2, p), &h, p);
    Jacobian { x: x3, y: y3, z: z3 }
  }
}
