use core::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use subtle::{Choice, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

use crate::constants::FIELD_PRIME;
use crate::error::{Error, Result};

/// An element of the prime field GF(2053).
///
/// The wrapped value is always canonical, i.e. in `[0, 2052]`. Every operation reduces its
/// result, so no intermediate ever escapes outside that range. Serializes as a plain
/// integer; deserializing a value `>= 2053` fails.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Gf2053(u16);

impl Gf2053 {
    pub const P: u16 = FIELD_PRIME;
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    /// Reduces `value` modulo P.
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value % Self::P)
    }

    /// Reduces an arbitrary-width unsigned value modulo P.
    #[inline]
    pub const fn from_u64(value: u64) -> Self {
        Self((value % Self::P as u64) as u16)
    }

    /// Builds an element from an index-like value, reducing modulo P.
    #[inline]
    pub const fn from_usize(value: usize) -> Self {
        Self::from_u64(value as u64)
    }

    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Square-and-multiply exponentiation.
    pub fn pow(self, mut exp: u32) -> Self {
        let mut base = self;
        let mut acc = Self::ONE;
        while exp > 0 {
            if exp & 1 == 1 {
                acc *= base;
            }
            base *= base;
            exp >>= 1;
        }
        acc
    }

    /// Multiplicative inverse through Fermat's little theorem, `a^(P-2)`.
    pub fn inverse(self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(self.pow(u32::from(Self::P) - 2))
    }

    pub fn checked_div(self, rhs: Self) -> Result<Self> {
        Ok(self * rhs.inverse()?)
    }
}

// Wiping resets to zero, the canonical default.
impl DefaultIsZeroes for Gf2053 {}

impl TryFrom<u16> for Gf2053 {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        if value < Self::P {
            Ok(Self(value))
        } else {
            Err(Error::NotCanonical(value))
        }
    }
}

impl From<Gf2053> for u16 {
    fn from(fe: Gf2053) -> u16 {
        fe.0
    }
}

impl From<Gf2053> for usize {
    fn from(fe: Gf2053) -> usize {
        usize::from(fe.0)
    }
}

impl fmt::Display for Gf2053 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ConstantTimeEq for Gf2053 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Add for Gf2053 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self((self.0 + rhs.0) % Self::P)
    }
}

impl Sub for Gf2053 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self((self.0 + Self::P - rhs.0) % Self::P)
    }
}

impl Mul for Gf2053 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(((u32::from(self.0) * u32::from(rhs.0)) % u32::from(Self::P)) as u16)
    }
}

impl Neg for Gf2053 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

impl AddAssign for Gf2053 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Gf2053 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Gf2053 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Sum for Gf2053 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Gf2053> for Gf2053 {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_wraps_modulo_p() {
        let a = Gf2053::new(2000);
        let b = Gf2053::new(100);

        assert_eq!((a + b).value(), 47);
        assert_eq!((b - a).value(), 153);
        assert_eq!((a * b).value(), (2000u32 * 100 % 2053) as u16);
        assert_eq!((-Gf2053::ONE).value(), 2052);
        assert_eq!(Gf2053::new(2053), Gf2053::ZERO);
        assert_eq!(Gf2053::from_u64(2053 * 7 + 5).value(), 5);
    }

    #[test]
    fn test_subtraction_never_goes_negative() {
        for a in [0u16, 1, 1026, 2052] {
            for b in [0u16, 1, 1026, 2052] {
                let d = Gf2053::new(a) - Gf2053::new(b);
                assert!(d.value() < Gf2053::P);
                assert_eq!(d + Gf2053::new(b), Gf2053::new(a));
            }
        }
    }

    #[test]
    fn test_pow() {
        let g = Gf2053::new(2);
        assert_eq!(g.pow(0), Gf2053::ONE);
        assert_eq!(g.pow(10).value(), 1024);
        assert_eq!(g.pow(11).value(), 2048);
        assert_eq!(g.pow(12).value(), (4096 % 2053) as u16);
        // Fermat: a^(P-1) == 1 for every nonzero a.
        assert_eq!(Gf2053::new(1234).pow(2052), Gf2053::ONE);
    }

    #[test]
    fn test_inverse_of_every_nonzero_element() {
        for v in 1..Gf2053::P {
            let a = Gf2053::new(v);
            assert_eq!(a * a.inverse().unwrap(), Gf2053::ONE, "inverse of {v}");
        }
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        assert_eq!(Gf2053::ZERO.inverse(), Err(Error::DivisionByZero));
        assert_eq!(
            Gf2053::new(5).checked_div(Gf2053::ZERO),
            Err(Error::DivisionByZero)
        );
        assert_eq!(
            Gf2053::new(10).checked_div(Gf2053::new(5)).unwrap(),
            Gf2053::new(2)
        );
    }

    #[test]
    fn test_try_from_rejects_non_canonical() {
        assert_eq!(Gf2053::try_from(2052u16).unwrap().value(), 2052);
        assert_eq!(Gf2053::try_from(2053u16), Err(Error::NotCanonical(2053)));
    }

    #[test]
    fn test_serde_as_plain_integer() {
        let fe = Gf2053::new(2048);
        assert_eq!(serde_json::to_string(&fe).unwrap(), "2048");
        assert_eq!(serde_json::from_str::<Gf2053>("17").unwrap(), Gf2053::new(17));
        assert!(serde_json::from_str::<Gf2053>("2053").is_err());
    }

    #[test]
    fn test_sum() {
        let values = [Gf2053::new(2000), Gf2053::new(50), Gf2053::new(10)];
        assert_eq!(values.iter().sum::<Gf2053>().value(), 7);
    }
}
