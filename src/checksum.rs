//! Row checksums and the Global Integrity Check (GIC).
//!
//! A row checksum is the position-weighted sum of the row's word indices,
//!
//! ```text
//! c = 1*w_0 + 2*w_1 + ... + n*w_(n-1)   (mod 2053)
//! ```
//!
//! Every weight is nonzero modulo the prime, so changing any single index always changes
//! the checksum, and swapping two different indices within a row changes it as well. The
//! GIC is the plain sum of all row checksums, which keeps it linear: the GIC polynomial is
//! the sum of the row-check polynomials, so on every share the GIC share equals the sum of
//! that share's checksum shares.

use rand::{CryptoRng, Rng};

use crate::error::{Error, Result};
use crate::field::Gf2053;
use crate::polynomial::{random_polynomial, sum_polynomials, Polynomial};

/// Computes one checksum per row of `words_per_row` consecutive word indices.
///
/// # Errors
///
/// * [`Error::WordCountNotDivisible`] if the indices do not split into whole rows.
pub fn compute_row_checks(word_indices: &[Gf2053], words_per_row: usize) -> Result<Vec<Gf2053>> {
    if words_per_row == 0 || word_indices.len() % words_per_row != 0 {
        return Err(Error::WordCountNotDivisible(word_indices.len()));
    }

    Ok(word_indices
        .chunks(words_per_row)
        .map(row_check)
        .collect())
}

fn row_check(row: &[Gf2053]) -> Gf2053 {
    row.iter()
        .enumerate()
        .map(|(position, &index)| Gf2053::from_usize(position + 1) * index)
        .sum()
}

/// Aggregates the row checksums into the Global Integrity Check.
pub fn compute_global_integrity_check(row_checks: &[Gf2053]) -> Gf2053 {
    row_checks.iter().sum()
}

/// Shares every row checksum with its own random polynomial.
pub fn compute_row_check_polynomials<R>(
    row_checks: &[Gf2053],
    threshold: usize,
    rng: &mut R,
) -> Vec<Polynomial>
where
    R: Rng + CryptoRng,
{
    row_checks
        .iter()
        .map(|&check| random_polynomial(check, threshold, rng))
        .collect()
}

/// The GIC polynomial: the coefficient-wise sum of the row-check polynomials.
///
/// Its constant term is the GIC and its value at any share number is the sum of the row
/// checksum shares at that number.
pub fn compute_global_check_polynomial(row_check_polynomials: &[Polynomial]) -> Result<Polynomial> {
    sum_polynomials(row_check_polynomials)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::constants::WORDS_PER_ROW;

    fn fes(values: &[u16]) -> Vec<Gf2053> {
        values.iter().map(|&v| Gf2053::new(v)).collect()
    }

    #[test]
    fn test_row_check_values_are_pinned() {
        // 1*1 + 2*2 + 3*3 = 14, 1*2048 + 2*2047 + 3*2046 = 12280 = 2053*5 + 2015
        let checks = compute_row_checks(&fes(&[1, 2, 3, 2048, 2047, 2046]), WORDS_PER_ROW).unwrap();
        assert_eq!(checks, fes(&[14, 2015]));
        assert_eq!(compute_global_integrity_check(&checks), Gf2053::new(2029));
    }

    #[test]
    fn test_all_abandon_about_checks() {
        // "abandon" x11 + "about": indices 1 x11 + 4
        let mut indices = vec![Gf2053::ONE; 11];
        indices.push(Gf2053::new(4));
        let checks = compute_row_checks(&indices, WORDS_PER_ROW).unwrap();
        assert_eq!(checks, fes(&[6, 6, 6, 15]));
        assert_eq!(compute_global_integrity_check(&checks).value(), 33);
    }

    #[test]
    fn test_single_word_change_always_changes_row_check() {
        let base = fes(&[100, 200, 300]);
        let original = compute_row_checks(&base, 3).unwrap()[0];
        for position in 0..3 {
            for delta in 1..Gf2053::P {
                let mut changed = base.clone();
                changed[position] += Gf2053::new(delta);
                assert_ne!(compute_row_checks(&changed, 3).unwrap()[0], original);
            }
        }
    }

    #[test]
    fn test_row_check_is_order_sensitive() {
        let a = compute_row_checks(&fes(&[5, 9, 13]), 3).unwrap();
        let b = compute_row_checks(&fes(&[9, 5, 13]), 3).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_partial_rows_are_rejected() {
        assert_eq!(
            compute_row_checks(&fes(&[1, 2, 3, 4]), 3),
            Err(Error::WordCountNotDivisible(4))
        );
    }

    #[test]
    fn test_global_polynomial_shares_match_sum_of_row_shares() {
        let mut rng = StdRng::seed_from_u64(21);
        let checks = fes(&[14, 2015, 6, 99]);
        let row_polys = compute_row_check_polynomials(&checks, 3, &mut rng);
        let global = compute_global_check_polynomial(&row_polys).unwrap();

        assert_eq!(global.secret(), compute_global_integrity_check(&checks));
        for x in 1..=5u16 {
            let x = Gf2053::new(x);
            let row_sum: Gf2053 = row_polys.iter().map(|p| p.evaluate(x)).sum();
            assert_eq!(global.evaluate(x), row_sum);
        }
    }
}
