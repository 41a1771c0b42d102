//! Mnemonic Word Lists
//!
//! Canonical BIP39 dictionaries, one per supported language. The lists
//! themselves are compiled into the `bip39` crate; this module exposes them
//! behind a uniform lookup interface with stable language identifiers.

use bip39::Language;

/// Number of words in every BIP39 dictionary
pub const WORDLIST_SIZE: usize = 2048;

/// An immutable, process-wide mnemonic word list for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordList {
    language: Language,
}

impl WordList {
    /// Stable identifier for this list ("en", "es", ...)
    pub fn language_id(&self) -> &'static str {
        match self.language {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::Italian => "it",
            Language::Japanese => "ja",
            _ => "unknown",
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Separator used to join words for checksum computation.
    ///
    /// Japanese phrases use the ideographic space per the BIP39 reference
    /// vectors; every other list joins with an ASCII space.
    pub fn separator(&self) -> &'static str {
        match self.language {
            Language::Japanese => "\u{3000}",
            _ => " ",
        }
    }

    /// All 2048 words, in index order.
    pub fn words(&self) -> &'static [&'static str; WORDLIST_SIZE] {
        self.language.word_list()
    }

    /// Word at the given index, if in range.
    pub fn word_at(&self, index: u16) -> Option<&'static str> {
        self.words().get(index as usize).copied()
    }

    /// Index of a word, if it belongs to this list.
    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.language.find_word(word)
    }

    /// Whether every word of the phrase belongs to this list.
    pub fn contains_all(&self, phrase: &str) -> bool {
        phrase
            .split_whitespace()
            .all(|w| self.index_of(w).is_some())
    }
}

const SUPPORTED: &[WordList] = &[
    WordList { language: Language::English },
    WordList { language: Language::Spanish },
    WordList { language: Language::French },
    WordList { language: Language::Italian },
    WordList { language: Language::Japanese },
];

/// Every supported word list.
pub fn all() -> &'static [WordList] {
    SUPPORTED
}

/// Look up a word list by language identifier.
pub fn get(language_id: &str) -> Option<WordList> {
    SUPPORTED
        .iter()
        .copied()
        .find(|list| list.language_id() == language_id)
}

/// The default (English) word list.
pub fn english() -> WordList {
    WordList { language: Language::English }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_lists_have_2048_words() {
        for list in all() {
            assert_eq!(list.words().len(), WORDLIST_SIZE);
        }
    }

    #[test]
    fn test_get_by_language_id() {
        assert_eq!(get("en"), Some(english()));
        assert!(get("es").is_some());
        assert!(get("ja").is_some());
        assert!(get("xx").is_none());
    }

    #[test]
    fn test_word_index_roundtrip() {
        let list = english();
        assert_eq!(list.word_at(0), Some("abandon"));
        assert_eq!(list.index_of("abandon"), Some(0));
        assert_eq!(list.index_of("zoo"), Some(2047));
        assert_eq!(list.word_at(2047), Some("zoo"));
        assert_eq!(list.index_of("notaword"), None);
        assert_eq!(list.word_at(2048), None);
    }

    #[test]
    fn test_separator() {
        assert_eq!(english().separator(), " ");
        assert_eq!(get("ja").unwrap().separator(), "\u{3000}");
    }

    #[test]
    fn test_contains_all() {
        let list = english();
        assert!(list.contains_all("abandon ability able"));
        assert!(!list.contains_all("abandon notaword able"));
    }
}
