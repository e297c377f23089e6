use core::fmt;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::field::Gf2053;
use crate::security::constant_time_element_equal;

/// One share of a split mnemonic.
///
/// Every value is the evaluation at `share_number` of one polynomial: one per word, one per
/// row checksum and one for the Global Integrity Check. The share is wiped when dropped.
///
/// # Examples
///
/// ```rust
/// use schiavinato_sharing::{verify_share_integrity, Gf2053, Share};
///
/// let share = Share {
///     share_number: Gf2053::new(1),
///     word_shares: vec![Gf2053::new(10), Gf2053::new(20), Gf2053::new(30)],
///     checksum_shares: vec![Gf2053::new(1000)],
///     global_integrity_check_share: Gf2053::new(1000),
/// };
/// assert!(verify_share_integrity(&share));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    /// The x-coordinate of this share, nonzero and unique within a split.
    pub share_number: Gf2053,
    /// One value per mnemonic word.
    pub word_shares: Vec<Gf2053>,
    /// One value per row of words.
    pub checksum_shares: Vec<Gf2053>,
    /// The Global Integrity Check share.
    pub global_integrity_check_share: Gf2053,
}

impl Share {
    pub fn number(&self) -> u16 {
        self.share_number.value()
    }

    pub fn word_count(&self) -> usize {
        self.word_shares.len()
    }

    pub fn row_count(&self) -> usize {
        self.checksum_shares.len()
    }
}

/// Checks the one invariant a single share can verify on its own:
/// `global_integrity_check_share == sum(checksum_shares) mod 2053`.
///
/// A trustee can run this by hand on their share without anyone else's.
pub fn verify_share_integrity(share: &Share) -> bool {
    let sum: Gf2053 = share.checksum_shares.iter().sum();
    constant_time_element_equal(sum, share.global_integrity_check_share)
}

/// A non-checksum problem found while recovering.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RecoveryIssue {
    /// An interpolated word index fell outside the wordlist.
    IndexOutOfRange { position: usize, index: u16 },
    /// More shares were supplied than the subset search is allowed to examine.
    SearchLimitExceeded { supplied: usize, limit: usize },
}

impl fmt::Display for RecoveryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryIssue::IndexOutOfRange { position, index } => write!(
                f,
                "recovered index {index} at position {position} is outside the wordlist"
            ),
            RecoveryIssue::SearchLimitExceeded { supplied, limit } => write!(
                f,
                "{supplied} shares supplied but at most {limit} can be cross-checked"
            ),
        }
    }
}

/// Itemized data-integrity findings of one recovery attempt.
///
/// Built fresh for every [`RecoveryResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryErrors {
    /// Rows whose recomputed checksum differs from the interpolated one.
    pub row: BTreeSet<usize>,
    /// The recomputed GIC differs from the interpolated one.
    pub global: bool,
    /// Strict validation was requested and the recovered phrase fails the BIP39 checksum.
    pub bip39: bool,
    pub generic: Option<RecoveryIssue>,
    /// Rows on which a supplied share disagrees with the accepted reconstruction.
    pub row_path_mismatch: BTreeSet<usize>,
    /// Some supplied share carries a GIC share inconsistent with its own checksum shares
    /// or with the accepted reconstruction.
    pub global_path_mismatch: bool,
}

impl RecoveryErrors {
    pub fn is_empty(&self) -> bool {
        self.row.is_empty()
            && !self.global
            && !self.bip39
            && self.generic.is_none()
            && self.row_path_mismatch.is_empty()
            && !self.global_path_mismatch
    }
}

/// Outcome of a recovery attempt.
///
/// `success` is only set once a mnemonic was produced and every field of `errors` is
/// clear. The mnemonic is wiped when the result is dropped and is redacted from `Debug`.
#[derive(Clone, Default, Serialize)]
pub struct RecoveryResult {
    pub mnemonic: Option<String>,
    pub success: bool,
    pub errors: RecoveryErrors,
    pub shares_with_invalid_checksums: BTreeSet<u16>,
}

impl RecoveryResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes `success` from the current state.
    pub(crate) fn finalize(&mut self) {
        self.success = self.mnemonic.is_some() && self.errors.is_empty();
    }
}

impl fmt::Debug for RecoveryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryResult")
            .field("mnemonic", &self.mnemonic.as_ref().map(|_| "[REDACTED]"))
            .field("success", &self.success)
            .field("errors", &self.errors)
            .field(
                "shares_with_invalid_checksums",
                &self.shares_with_invalid_checksums,
            )
            .finish()
    }
}

impl Drop for RecoveryResult {
    fn drop(&mut self) {
        self.mnemonic.zeroize();
    }
}
