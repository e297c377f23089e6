//! Bit-level BIP39 checksum handling.
//!
//! A mnemonic of `n` words carries `11 * n` bits: `32 * n / 3` bits of entropy followed by
//! `n / 3` checksum bits, which are the leading bits of SHA-256 over the entropy. The
//! validator here is independent of the `bip39` crate's own parser; that crate only
//! supplies the wordlist.

use rand::{CryptoRng, Rng};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::constants::{BIP39_WORDLIST_LEN, BITS_PER_WORD};
use crate::error::{Error, Result};
use crate::wordlist::Wordlist;

/// Word counts defined by BIP39.
pub const SUPPORTED_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

pub fn is_supported_word_count(word_count: usize) -> bool {
    SUPPORTED_WORD_COUNTS.contains(&word_count)
}

/// Checks the embedded BIP39 checksum of `mnemonic`.
///
/// Words are separated by whitespace and must match wordlist entries exactly; normalize
/// first (see [`crate::mnemonic::normalize_mnemonic`]) to accept mixed case. Returns
/// `false` for unsupported lengths, unknown words or a checksum mismatch.
pub fn validate_bip39_mnemonic(mnemonic: &str, wordlist: &dyn Wordlist) -> bool {
    if wordlist.len() != BIP39_WORDLIST_LEN {
        return false;
    }

    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    let word_count = words.len();
    if !is_supported_word_count(word_count) {
        return false;
    }

    let mut indices = Zeroizing::new(Vec::with_capacity(word_count));
    for word in &words {
        match wordlist.index_of(word) {
            Some(index) => indices.push(index as u16),
            None => return false,
        }
    }

    let packed = Zeroizing::new(pack_11_bit_groups(&indices));
    let checksum_bits = word_count / 3;
    let entropy_len = (word_count * BITS_PER_WORD - checksum_bits) / 8;

    // The entropy is byte aligned, so the checksum sits in the top bits of the next byte.
    let embedded = packed[entropy_len] >> (8 - checksum_bits);
    let expected = checksum_byte(&packed[..entropy_len]) >> (8 - checksum_bits);

    embedded.ct_eq(&expected).into()
}

/// Encodes entropy as a mnemonic in `wordlist`.
///
/// # Errors
///
/// * [`Error::UnsupportedEntropyLength`] unless the entropy is 16, 20, 24, 28 or 32 bytes.
pub fn mnemonic_from_entropy(entropy: &[u8], wordlist: &dyn Wordlist) -> Result<String> {
    let word_count = entropy.len() * 3 / 4;
    if entropy.len() % 4 != 0 || !is_supported_word_count(word_count) {
        return Err(Error::UnsupportedEntropyLength(entropy.len()));
    }

    let mut bytes = Zeroizing::new(Vec::with_capacity(entropy.len() + 1));
    bytes.extend_from_slice(entropy);
    bytes.push(checksum_byte(entropy));

    let indices = Zeroizing::new(read_11_bit_groups(&bytes, word_count));
    let mut words = Vec::with_capacity(word_count);
    for (position, &index) in indices.iter().enumerate() {
        let word = wordlist
            .word(usize::from(index))
            .ok_or(Error::IndexOutOfRange {
                index: usize::from(index) + 1,
                position: position + 1,
                max: wordlist.len(),
            })?;
        words.push(word);
    }

    Ok(words.join(" "))
}

/// Generates a fresh mnemonic with `word_count` words from `rng`.
pub fn generate_valid_mnemonic<R>(
    word_count: usize,
    wordlist: &dyn Wordlist,
    rng: &mut R,
) -> Result<String>
where
    R: Rng + CryptoRng,
{
    if !is_supported_word_count(word_count) {
        return Err(Error::UnsupportedWordCount(word_count));
    }

    let mut entropy = Zeroizing::new(vec![0u8; word_count * 4 / 3]);
    rng.fill_bytes(&mut entropy);
    mnemonic_from_entropy(&entropy, wordlist)
}

fn checksum_byte(entropy: &[u8]) -> u8 {
    Sha256::digest(entropy)[0]
}

/// Concatenates 11-bit values, most significant bit first, padding the last byte with zeros.
fn pack_11_bit_groups(indices: &[u16]) -> Vec<u8> {
    let mut out = vec![0u8; (indices.len() * BITS_PER_WORD + 7) / 8];
    for (i, &index) in indices.iter().enumerate() {
        for bit in 0..BITS_PER_WORD {
            if index & (1 << (BITS_PER_WORD - 1 - bit)) != 0 {
                let pos = i * BITS_PER_WORD + bit;
                out[pos / 8] |= 0x80 >> (pos % 8);
            }
        }
    }
    out
}

fn read_11_bit_groups(bytes: &[u8], count: usize) -> Vec<u16> {
    (0..count)
        .map(|i| {
            (0..BITS_PER_WORD).fold(0u16, |acc, bit| {
                let pos = i * BITS_PER_WORD + bit;
                let b = (bytes[pos / 8] >> (7 - pos % 8)) & 1;
                (acc << 1) | u16::from(b)
            })
        })
        .collect()
}
