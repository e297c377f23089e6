use thiserror::Error;

use crate::constants::{FIELD_PRIME, WORDS_PER_ROW};

/// Result type used across this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Precondition violations and hard failures.
///
/// Data-integrity findings made while recovering (checksum mismatches, a failed BIP39
/// checksum, an inconsistent share) are never reported through this type; they are
/// collected in a [`crate::share::RecoveryResult`] instead.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid threshold configuration: need 2 <= threshold ({threshold}) <= total shares ({total_shares})")]
    InvalidThreshold { threshold: usize, total_shares: usize },
    #[error("too many shares: {0} (must be below {p})", p = FIELD_PRIME)]
    TooManyShares(usize),
    #[error("word count {0} is not a positive multiple of {w}", w = WORDS_PER_ROW)]
    WordCountNotDivisible(usize),
    #[error("unsupported mnemonic length: {0} words")]
    UnsupportedWordCount(usize),
    #[error("unsupported entropy length: {0} bytes")]
    UnsupportedEntropyLength(usize),
    #[error("invalid BIP39 mnemonic")]
    InvalidMnemonic,
    #[error("word \"{word}\" at position {position} is not in the BIP39 wordlist")]
    UnknownWord { word: String, position: usize },
    #[error("index {index} at position {position} is out of range (1-{max})")]
    IndexOutOfRange {
        index: usize,
        position: usize,
        max: usize,
    },
    #[error("insufficient shares: need {required}, got {supplied}")]
    InsufficientShares { required: usize, supplied: usize },
    #[error("share {share_number} has {found} {field} but expected {expected}")]
    InconsistentShare {
        share_number: u16,
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("share number must be nonzero")]
    ZeroShareNumber,
    #[error("duplicate share number: {0}")]
    DuplicateShareNumber(u16),
    #[error("polynomials must have the same number of coefficients: {expected} != {found}")]
    PolynomialDegreeMismatch { expected: usize, found: usize },
    #[error("non-canonical field element {0} >= {p}", p = FIELD_PRIME)]
    NotCanonical(u16),
    #[error("division by zero in GF({p})", p = FIELD_PRIME)]
    DivisionByZero,
}
