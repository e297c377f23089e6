use bip39::Language;

use crate::validation::validate_bip39_mnemonic;

/// An ordered BIP39 wordlist.
///
/// The engine never embeds a wordlist of its own; it is handed one through this trait.
/// [`bip39::Language`] implements it, so `&Language::English` is the usual choice.
pub trait Wordlist: Send + Sync {
    /// All words in wordlist order.
    fn words(&self) -> &[&'static str];

    fn len(&self) -> usize {
        self.words().len()
    }

    fn is_empty(&self) -> bool {
        self.words().is_empty()
    }

    /// 0-based position of `word`, if it is in the list.
    fn index_of(&self, word: &str) -> Option<usize> {
        self.words().iter().position(|w| *w == word)
    }

    /// Word at 0-based `index`.
    fn word(&self, index: usize) -> Option<&'static str> {
        self.words().get(index).copied()
    }
}

impl Wordlist for Language {
    fn words(&self) -> &[&'static str] {
        self.word_list()
    }
}

/// The standard English BIP39 wordlist.
pub fn english() -> &'static dyn Wordlist {
    &Language::English
}

/// Signature of the checksum validator injected into split and recovery.
pub type Bip39Validator = fn(&str, &dyn Wordlist) -> bool;

/// The BIP39 collaborators used by split and recovery: a wordlist for word/index
/// conversion and the checksum validator gating both operations.
///
/// Passing the validator explicitly lets a caller swap it, e.g. to exercise how a checksum
/// failure propagates.
#[derive(Clone, Copy)]
pub struct Bip39Context<'a> {
    pub wordlist: &'a dyn Wordlist,
    pub validator: Bip39Validator,
}

impl<'a> Bip39Context<'a> {
    pub fn new(wordlist: &'a dyn Wordlist, validator: Bip39Validator) -> Self {
        Bip39Context {
            wordlist,
            validator,
        }
    }

    pub fn validate(&self, mnemonic: &str) -> bool {
        (self.validator)(mnemonic, self.wordlist)
    }
}

impl Default for Bip39Context<'static> {
    fn default() -> Self {
        Bip39Context::new(english(), validate_bip39_mnemonic)
    }
}
