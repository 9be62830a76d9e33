//! Modular arithmetic over a prime modulus.
//!
//! All inputs are expected to be already reduced (`0 <= a < m`); every output is.

use num_bigint::BigUint;
use num_traits::{One, Zero};

pub fn mod_add(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
  (a + b) % m
}

pub fn mod_sub(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
  if a >= b {
    a - b
  } else {
    m - (b - a)
  }
}

pub fn mod_mul(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
  (a * b) % m
}

pub fn mod_neg(a: &BigUint, m: &BigUint) -> BigUint {
  if a.is_zero() {
    BigUint::zero()
  } else {
    m - a
  }
}

/// Inverse via Fermat's little theorem; `m` must be prime. Returns 0 for 0.
pub fn mod_inv(a: &BigUint, m: &BigUint) -> BigUint {
  let exp = m - BigUint::from(2u8);
  a.modpow(&exp, m)
}

/// Square root mod a prime `p` with `p = 3 (mod 4)`: r = a^((p+1)/4).
///
/// Returns `None` when `a` is a non-residue.
pub fn mod_sqrt(a: &BigUint, p: &BigUint) -> Option<BigUint> {
  let exp = (p + BigUint::one()) >> 2;
  let r = a.modpow(&exp, p);
  if mod_mul(&r, &r, p) == a % p {
    Some(r)
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn big(v: u64) -> BigUint {
    BigUint::from(v)
  }

  #[test]
  fn sub_wraps() {
    assert_eq!(mod_sub(&big(3), &big(5), &big(23)), big(21));
    assert_eq!(mod_sub(&big(5), &big(3), &big(23)), big(2));
  }

  #[test]
  fn inverse_small_prime() {
    let p = big(23);
    for a in 1..23u64 {
      assert_eq!(mod_mul(&big(a), &mod_inv(&big(a), &p), &p), big(1));
    }
  }

  #[test]
  fn sqrt_small_prime() {
    // 23 = 3 mod 4
    let p = big(23);
    let r = mod_sqrt(&big(2), &p).unwrap();
    assert_eq!(mod_mul(&r, &r, &p), big(2));
    // 5 is a non-residue mod 23
    assert!(mod_sqrt(&big(5), &p).is_none());
  }
}
