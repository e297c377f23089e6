//! Conversions between mnemonic text and 1-based word indices.
//!
//! Shares work on 1-based indices (`abandon` = 1, `zoo` = 2048) so that no word maps to
//! the field's zero element.

use std::mem;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};
use crate::field::Gf2053;
use crate::wordlist::Wordlist;

/// Trims, collapses runs of whitespace to one space and lowercases.
///
/// Builds the output in place, so no per-word copies of the phrase are left behind.
pub fn normalize_mnemonic(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.extend(word.chars().flat_map(char::to_lowercase));
    }
    normalized
}

/// Maps every word to its 1-based wordlist index.
///
/// # Errors
///
/// * [`Error::UnknownWord`] with the 1-based position of the first unknown word.
pub fn mnemonic_to_indices(mnemonic: &str, wordlist: &dyn Wordlist) -> Result<Vec<Gf2053>> {
    // Wiped if an unknown word cuts the conversion short.
    let mut indices = Zeroizing::new(Vec::new());
    for (position, word) in mnemonic.split_whitespace().enumerate() {
        let index = wordlist.index_of(word).ok_or_else(|| Error::UnknownWord {
            word: word.to_string(),
            position: position + 1,
        })?;
        indices.push(Gf2053::from_usize(index + 1));
    }
    Ok(mem::take(&mut *indices))
}

/// Maps 1-based indices back to words.
///
/// # Errors
///
/// * [`Error::IndexOutOfRange`] if an index is 0 or past the end of the wordlist.
pub fn indices_to_mnemonic(indices: &[Gf2053], wordlist: &dyn Wordlist) -> Result<String> {
    let mut words = Vec::with_capacity(indices.len());
    for (position, &index) in indices.iter().enumerate() {
        words.push(word_for_index(usize::from(index), position + 1, wordlist)?);
    }
    Ok(words.join(" "))
}

fn word_for_index(index: usize, position: usize, wordlist: &dyn Wordlist) -> Result<&'static str> {
    index
        .checked_sub(1)
        .and_then(|i| wordlist.word(i))
        .ok_or(Error::IndexOutOfRange {
            index,
            position,
            max: wordlist.len(),
        })
}

/// How the tokens of a parsed input were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Words,
    Indices,
    Mixed,
}

/// A mnemonic typed as words, as 1-based indices or as a mix of both.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ParsedInput {
    pub words: Vec<String>,
    pub indices: Vec<u16>,
    #[zeroize(skip)]
    pub kind: InputKind,
}

impl ParsedInput {
    /// The words joined with single spaces.
    pub fn mnemonic(&self) -> String {
        self.words.join(" ")
    }
}

/// Parses user input made of words and/or 1-based indices separated by whitespace, commas
/// or newlines. Case is ignored.
///
/// # Errors
///
/// * [`Error::IndexOutOfRange`] for a numeric token outside `1..=wordlist.len()`.
/// * [`Error::UnknownWord`] for a token that is neither a number nor a listed word.
pub fn parse_input(text: &str, wordlist: &dyn Wordlist) -> Result<ParsedInput> {
    let lowered = Zeroizing::new(text.to_lowercase());
    let tokens = lowered
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty());

    let mut parsed = ParsedInput {
        words: Vec::new(),
        indices: Vec::new(),
        kind: InputKind::Words,
    };
    let mut has_words = false;
    let mut has_indices = false;

    for (position, token) in tokens.enumerate() {
        let position = position + 1;
        if token.chars().all(|c| c.is_ascii_digit()) {
            let index = token.parse::<usize>().unwrap_or(usize::MAX);
            let word = word_for_index(index, position, wordlist)?;
            parsed.words.push(word.to_string());
            parsed.indices.push(index as u16);
            has_indices = true;
        } else {
            let index = wordlist.index_of(token).ok_or_else(|| Error::UnknownWord {
                word: token.to_string(),
                position,
            })?;
            parsed.words.push(token.to_string());
            parsed.indices.push((index + 1) as u16);
            has_words = true;
        }
    }

    parsed.kind = match (has_words, has_indices) {
        (true, true) => InputKind::Mixed,
        (false, true) => InputKind::Indices,
        _ => InputKind::Words,
    };
    Ok(parsed)
}
