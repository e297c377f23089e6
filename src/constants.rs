/// The prime modulus of the share field. The smallest prime above 2048, the largest
/// 1-based BIP39 word index.
pub const FIELD_PRIME: u16 = 2053;

/// Number of consecutive words covered by one row checksum.
pub const WORDS_PER_ROW: usize = 3;

/// Number of words in the standard BIP39 wordlist.
pub const BIP39_WORDLIST_LEN: usize = 2048;

/// Bits encoded by one BIP39 word.
pub const BITS_PER_WORD: usize = 11;

/// Upper bound on the number of shares the recovery engine will search through when more
/// shares than the threshold are supplied. The search visits C(n, k) subsets.
pub const DEFAULT_MAX_SEARCH_SHARES: usize = 16;

/// Hard ceiling on the configurable search limit. C(20, 10) is 184756 subsets.
pub const MAX_SEARCH_SHARES_CEILING: usize = 20;

/// Smallest threshold that still splits a secret.
pub const MIN_THRESHOLD: usize = 2;

/// Prefix of the environment variables read by [`crate::config::SharingConfig`].
pub const ENV_PREFIX: &str = "SCHIAVINATO";
