//! # Schiavinato Sharing
//!
//! This library splits a BIP39 mnemonic into shares that can be computed and checked by hand,
//! and recovers the mnemonic from a threshold of those shares while pointing at whatever was
//! corrupted along the way.
//!
//! ## Shamir's Secret Sharing over GF(2053)
//!
//! Every word of the mnemonic is turned into its 1-based index in the BIP39 wordlist
//! (`abandon` = 1, `zoo` = 2048) and shared on its own with Shamir's scheme. A random polynomial of
//! degree `k-1` is chosen for each word:
//!
//! ```ignore
//! f(x) = index + a1*x + a2*x^2 + ... + a(k-1)*x^(k-1)   (mod 2053)
//! ```
//!
//! Share `i` holds `f(i)` for every word. Any `k` shares determine the polynomials, and hence the
//! indices, through Lagrange interpolation at `x = 0`. The prime 2053 is the smallest prime above
//! the wordlist size, which keeps every number on a share at four decimal digits.
//!
//! ### Checksums
//!
//! The words are grouped into rows of three. Each row gets a checksum, the position-weighted sum
//! of its indices, which is shared with its own random polynomial. The Global Integrity Check
//! (GIC) is the sum of all row checksums and is shared with the sum of the row polynomials, so on
//! every share the GIC share equals the sum of that share's checksum shares. Recovery compares the
//! interpolated checksums against those recomputed from the interpolated words and reports each
//! row that disagrees.
//!
//! ## Example: Splitting and Recovering
//!
//! ```rust
//! use schiavinato_sharing::{recover_mnemonic, split_mnemonic};
//!
//! let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
//!
//! // Any 2 of these 3 shares recover the mnemonic.
//! let shares = split_mnemonic(mnemonic, 2, 3).unwrap();
//!
//! let result = recover_mnemonic(&shares[1..], 12, true).unwrap();
//! assert!(result.success);
//! assert_eq!(result.mnemonic.as_deref(), Some(mnemonic));
//! ```
//!
//! ## Example: Spotting a Corrupted Share
//!
//! ```rust
//! use schiavinato_sharing::recover::{recover_mnemonic_with, RecoveryOptions};
//! use schiavinato_sharing::{split_mnemonic, Bip39Context, Gf2053};
//!
//! let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
//! let mut shares = split_mnemonic(mnemonic, 2, 4).unwrap();
//! shares[3].word_shares[0] += Gf2053::ONE;
//!
//! let options = RecoveryOptions::default().with_threshold(2);
//! let result = recover_mnemonic_with(&shares, 12, &options, Bip39Context::default()).unwrap();
//! assert_eq!(result.mnemonic.as_deref(), Some(mnemonic));
//! assert!(result.shares_with_invalid_checksums.contains(&4));
//! ```
//!
//! ## Modules
//!
//! - `field`: Arithmetic in GF(2053).
//! - `polynomial`: Random sharing polynomials and their evaluation.
//! - `lagrange`: Lagrange multipliers and interpolation.
//! - `checksum`: Row checksums and the Global Integrity Check.
//! - `split`: Turning a mnemonic into shares.
//! - `recover`: Turning shares back into a mnemonic, with diagnostics.
//! - `share`: The share and recovery result types.
//! - `mnemonic`, `validation`, `wordlist`: BIP39 words, indices and checksums.
//! - `security`: Constant-time comparisons and wiping.
//! - `config`: File and environment configuration.

/// The `checksum` module computes row checksums, the Global Integrity Check and the polynomials
/// that share them.
pub mod checksum;

/// The `config` module loads the recovery settings from TOML files and `SCHIAVINATO_*`
/// environment variables.
pub mod config;

/// The `constants` module defines various constants used in the library.
pub mod constants;

/// The `error` module defines the error type returned when an operation is misused.
pub mod error;

/// The `field` module implements the prime field GF(2053) every share value lives in.
pub mod field;

/// The `lagrange` module computes Lagrange multipliers and interpolates shares back to the
/// value at zero.
pub mod lagrange;

/// The `mnemonic` module converts between words and 1-based wordlist indices and parses user
/// input that mixes both.
pub mod mnemonic;

/// The `polynomial` module builds the random polynomials that share each value and evaluates
/// them at share numbers.
pub mod polynomial;

/// The `recover` module reconstructs a mnemonic from shares. It checks every row and the global
/// checksum, and when more shares than the threshold are supplied it finds which of them agree.
pub mod recover;

/// The `security` module provides constant-time comparisons and wiping of secret buffers.
pub mod security;

/// The `share` module defines the share handed to each participant and the itemized result of a
/// recovery attempt.
pub mod share;

/// The `split` module turns a validated mnemonic into shares.
pub mod split;

/// The `validation` module checks and produces BIP39 checksums at the bit level.
pub mod validation;

/// The `wordlist` module abstracts the BIP39 wordlist and the checksum validator so both can
/// be swapped out.
pub mod wordlist;

pub use checksum::{
    compute_global_check_polynomial, compute_global_integrity_check, compute_row_check_polynomials,
    compute_row_checks,
};
pub use config::SharingConfig;
pub use error::{Error, Result};
pub use field::Gf2053;
pub use lagrange::{
    compute_lagrange_multipliers, compute_lagrange_multipliers_at, interpolate_at_zero,
    lagrange_interpolate_at_zero,
};
pub use mnemonic::{indices_to_mnemonic, mnemonic_to_indices, normalize_mnemonic, parse_input};
pub use polynomial::{evaluate_polynomial, random_polynomial, sum_polynomials, Polynomial};
pub use recover::{recover_mnemonic, recover_mnemonic_with, RecoveryOptions};
pub use security::{
    constant_time_element_equal, constant_time_equal, constant_time_string_equal,
    secure_wipe_bytes, secure_wipe_elements, secure_wipe_share, secure_wipe_string,
};
pub use share::{verify_share_integrity, RecoveryErrors, RecoveryIssue, RecoveryResult, Share};
pub use split::{split_mnemonic, split_mnemonic_with};
pub use validation::{generate_valid_mnemonic, mnemonic_from_entropy, validate_bip39_mnemonic};
pub use wordlist::{english, Bip39Context, Wordlist};
