use rand::{CryptoRng, Rng};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::checksum::{
    compute_global_check_polynomial, compute_row_check_polynomials, compute_row_checks,
};
use crate::constants::{FIELD_PRIME, MIN_THRESHOLD, WORDS_PER_ROW};
use crate::error::{Error, Result};
use crate::field::Gf2053;
use crate::mnemonic::{mnemonic_to_indices, normalize_mnemonic};
use crate::polynomial::{random_polynomial, Polynomial};
use crate::share::Share;
use crate::wordlist::Bip39Context;

/// Splits a BIP39 mnemonic into `total_shares` shares, any `threshold` of which recover it.
///
/// Uses the English wordlist, the built-in BIP39 checksum validator and the thread-local
/// CSPRNG. See [`split_mnemonic_with`] to supply those explicitly.
///
/// # Errors
///
/// * [`Error::InvalidThreshold`] unless `2 <= threshold <= total_shares`.
/// * [`Error::TooManyShares`] if `total_shares >= 2053`.
/// * [`Error::WordCountNotDivisible`] if the word count is not a multiple of 3.
/// * [`Error::InvalidMnemonic`] if the BIP39 checksum does not hold.
///
/// # Examples
///
/// ```rust
/// use schiavinato_sharing::{recover_mnemonic, split_mnemonic};
///
/// let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
/// let shares = split_mnemonic(mnemonic, 2, 3).unwrap();
/// assert_eq!(shares.len(), 3);
///
/// let result = recover_mnemonic(&shares[..2], 12, false).unwrap();
/// assert!(result.success);
/// assert_eq!(result.mnemonic.as_deref(), Some(mnemonic));
/// ```
pub fn split_mnemonic(mnemonic: &str, threshold: usize, total_shares: usize) -> Result<Vec<Share>> {
    let mut rng = rand::thread_rng();
    split_mnemonic_with(
        mnemonic,
        threshold,
        total_shares,
        Bip39Context::default(),
        &mut rng,
    )
}

/// [`split_mnemonic`] with explicit BIP39 collaborators and randomness source.
pub fn split_mnemonic_with<R>(
    mnemonic: &str,
    threshold: usize,
    total_shares: usize,
    ctx: Bip39Context<'_>,
    rng: &mut R,
) -> Result<Vec<Share>>
where
    R: Rng + CryptoRng,
{
    if threshold < MIN_THRESHOLD || threshold > total_shares {
        return Err(Error::InvalidThreshold {
            threshold,
            total_shares,
        });
    }
    if total_shares >= usize::from(FIELD_PRIME) {
        return Err(Error::TooManyShares(total_shares));
    }

    let normalized = Zeroizing::new(normalize_mnemonic(mnemonic));
    let word_count = normalized.split_whitespace().count();
    if word_count == 0 || word_count % WORDS_PER_ROW != 0 {
        return Err(Error::WordCountNotDivisible(word_count));
    }

    if !ctx.validate(&normalized) {
        return Err(Error::InvalidMnemonic);
    }

    let indices = Zeroizing::new(mnemonic_to_indices(&normalized, ctx.wordlist)?);
    debug!(
        "Splitting {} words into {} shares (threshold {})",
        word_count, total_shares, threshold
    );

    let word_polynomials: Vec<Polynomial> = indices
        .iter()
        .map(|&index| random_polynomial(index, threshold, rng))
        .collect();

    let row_checks = Zeroizing::new(compute_row_checks(&indices, WORDS_PER_ROW)?);
    let row_polynomials = compute_row_check_polynomials(&row_checks, threshold, rng);
    let global_polynomial = compute_global_check_polynomial(&row_polynomials)?;

    let shares: Vec<Share> = (1..=total_shares)
        .map(|number| {
            let x = Gf2053::from_usize(number);
            Share {
                share_number: x,
                word_shares: word_polynomials.iter().map(|p| p.evaluate(x)).collect(),
                checksum_shares: row_polynomials.iter().map(|p| p.evaluate(x)).collect(),
                global_integrity_check_share: global_polynomial.evaluate(x),
            }
        })
        .collect();

    info!(
        "🔐 Split mnemonic into {} shares, {} needed to recover",
        shares.len(),
        threshold
    );
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::lagrange::interpolate_at_zero;
    use crate::share::verify_share_integrity;
    use crate::wordlist::{english, Wordlist};

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn always_invalid(_: &str, _: &dyn Wordlist) -> bool {
        false
    }

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_split_shapes() {
        let shares = split_mnemonic(ABANDON_ABOUT, 2, 3).unwrap();
        assert_eq!(shares.len(), 3);
        for (i, share) in shares.iter().enumerate() {
            assert_eq!(usize::from(share.number()), i + 1);
            assert_eq!(share.word_count(), 12);
            assert_eq!(share.row_count(), 4);
            assert!(verify_share_integrity(share));
        }
    }

    #[test]
    fn test_any_threshold_points_give_back_the_indices() {
        let shares = split_mnemonic_with(ABANDON_ABOUT, 3, 5, Bip39Context::default(), &mut seeded(1))
            .unwrap();
        let chosen = [&shares[4], &shares[0], &shares[2]];

        let last_word: Vec<_> = chosen
            .iter()
            .map(|s| (s.share_number, s.word_shares[11]))
            .collect();
        assert_eq!(interpolate_at_zero(&last_word).unwrap(), Gf2053::new(4));

        let last_row: Vec<_> = chosen
            .iter()
            .map(|s| (s.share_number, s.checksum_shares[3]))
            .collect();
        assert_eq!(interpolate_at_zero(&last_row).unwrap(), Gf2053::new(15));

        let gic: Vec<_> = chosen
            .iter()
            .map(|s| (s.share_number, s.global_integrity_check_share))
            .collect();
        assert_eq!(interpolate_at_zero(&gic).unwrap(), Gf2053::new(33));
    }

    #[test]
    fn test_seeded_split_is_reproducible() {
        let a = split_mnemonic_with(ABANDON_ABOUT, 2, 3, Bip39Context::default(), &mut seeded(42))
            .unwrap();
        let b = split_mnemonic_with(ABANDON_ABOUT, 2, 3, Bip39Context::default(), &mut seeded(42))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_input_is_normalized() {
        let messy = format!("  {}  ", ABANDON_ABOUT.to_uppercase().replace(' ', "   "));
        assert!(split_mnemonic(&messy, 2, 2).is_ok());
    }

    #[test]
    fn test_invalid_threshold_and_share_count() {
        assert_eq!(
            split_mnemonic(ABANDON_ABOUT, 1, 5),
            Err(Error::InvalidThreshold {
                threshold: 1,
                total_shares: 5
            })
        );
        assert_eq!(
            split_mnemonic(ABANDON_ABOUT, 6, 5),
            Err(Error::InvalidThreshold {
                threshold: 6,
                total_shares: 5
            })
        );
        assert_eq!(
            split_mnemonic(ABANDON_ABOUT, 2, 2053),
            Err(Error::TooManyShares(2053))
        );
    }

    #[test]
    fn test_word_count_must_fill_rows() {
        assert_eq!(
            split_mnemonic("abandon abandon abandon abandon", 2, 3),
            Err(Error::WordCountNotDivisible(4))
        );
        assert_eq!(split_mnemonic("   ", 2, 3), Err(Error::WordCountNotDivisible(0)));
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let bad = ABANDON_ABOUT.replace("about", "abandon");
        assert_eq!(split_mnemonic(&bad, 2, 3), Err(Error::InvalidMnemonic));
    }

    #[test]
    fn test_split_uses_injected_validator() {
        let ctx = Bip39Context::new(english(), always_invalid);
        let result = split_mnemonic_with(ABANDON_ABOUT, 2, 3, ctx, &mut seeded(3));
        assert_eq!(result, Err(Error::InvalidMnemonic));
        assert_eq!(Error::InvalidMnemonic.to_string(), "invalid BIP39 mnemonic");
    }
}
