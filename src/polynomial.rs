use rand::{CryptoRng, Rng};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};
use crate::field::Gf2053;

/// Represents a polynomial over the prime field GF(2053).
///
/// Coefficients are stored lowest degree first, so `coefficients[0]` is the secret the
/// polynomial shares. A threshold-K polynomial has exactly K coefficients. The coefficients
/// are wiped when the polynomial is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Polynomial {
    /// The coefficients of the polynomial, constant term first.
    pub coefficients: Vec<Gf2053>,
}

impl Polynomial {
    /// Wraps existing coefficients, constant term first.
    pub fn from_coefficients(coefficients: Vec<Gf2053>) -> Self {
        Polynomial { coefficients }
    }

    /// The secret encoded by this polynomial, i.e. its value at zero.
    pub fn secret(&self) -> Gf2053 {
        self.coefficients.first().copied().unwrap_or(Gf2053::ZERO)
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the polynomial at a given point with Horner's method.
    ///
    /// # Arguments
    ///
    /// * `x` - The point at which to evaluate the polynomial.
    ///
    /// # Returns
    ///
    /// The value of the polynomial at point `x`.
    pub fn evaluate(&self, x: Gf2053) -> Gf2053 {
        self.coefficients
            .iter()
            .rev()
            .fold(Gf2053::ZERO, |acc, &coeff| acc * x + coeff)
    }
}

/// Constructs a random polynomial of degree `threshold - 1` whose constant term is `secret`.
///
/// The remaining `threshold - 1` coefficients are drawn independently and uniformly from
/// `[0, P - 1]` using `rng`. The generator is passed in by the caller: production code hands
/// over a cryptographically secure generator, tests may hand over a seeded one.
///
/// # Arguments
///
/// * `secret` - The value shared by the polynomial.
/// * `threshold` - Number of coefficients, i.e. number of points needed to recover `secret`.
/// * `rng` - The randomness source.
pub fn random_polynomial<R>(secret: Gf2053, threshold: usize, rng: &mut R) -> Polynomial
where
    R: Rng + CryptoRng,
{
    let mut coefficients = Vec::with_capacity(threshold.max(1));
    coefficients.push(secret);
    for _ in 1..threshold {
        coefficients.push(Gf2053::new(rng.gen_range(0..Gf2053::P)));
    }
    Polynomial { coefficients }
}

/// Evaluates `poly` at `x`. See [`Polynomial::evaluate`].
pub fn evaluate_polynomial(poly: &Polynomial, x: Gf2053) -> Gf2053 {
    poly.evaluate(x)
}

/// Coefficient-wise sum of polynomials of equal degree.
///
/// Evaluation is linear, so evaluating the sum at any `x` equals the sum of the individual
/// evaluations at `x`. An empty input yields the zero polynomial.
pub fn sum_polynomials(polys: &[Polynomial]) -> Result<Polynomial> {
    let Some(first) = polys.first() else {
        return Ok(Polynomial::from_coefficients(vec![Gf2053::ZERO]));
    };

    let len = first.coefficients.len();
    let mut coefficients = vec![Gf2053::ZERO; len];
    for poly in polys {
        if poly.coefficients.len() != len {
            return Err(Error::PolynomialDegreeMismatch {
                expected: len,
                found: poly.coefficients.len(),
            });
        }
        for (acc, &coeff) in coefficients.iter_mut().zip(&poly.coefficients) {
            *acc += coeff;
        }
    }

    Ok(Polynomial { coefficients })
}
