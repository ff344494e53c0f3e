//! Wordlist support
//!
//! NOTE: This implementation is not constant time and may leak information
//! via timing side-channels!

use std::collections::BTreeMap;

/// Supported languages.
///
/// Presently only English is specified by the BIP39 standard
#[derive(Copy, Clone, Debug, Default)]
pub enum Language {
    /// English is presently the only supported language
    #[default]
    English,
}

impl Language {
    /// Get the word list for this language
    pub(crate) fn wordlist(&self) -> &'static WordList {
        match *self {
            Language::English => &lazy::WORDLIST_ENGLISH,
        }
    }

    /// Get a wordmap that allows word -> index lookups in the word list
    pub(crate) fn wordmap(&self) -> &'static WordMap {
        match *self {
            Language::English => &lazy::WORDMAP_ENGLISH,
        }
    }
}

pub(crate) struct WordMap {
    inner: BTreeMap<&'static str, u16>,
}

pub(crate) struct WordList {
    inner: Vec<&'static str>,
}

impl WordMap {
    pub fn get_index(&self, word: &str) -> Option<u16> {
        self.inner.get(word).copied()
    }
}

impl WordList {
    pub fn get_word(&self, index: u16) -> &'static str {
        self.inner[index as usize]
    }
}

mod lazy {
    use super::{WordList, WordMap};
    use once_cell::sync::Lazy;

    /// lazy generation of the word list
    fn gen_wordlist(lang_words: &'static str) -> WordList {
        let inner: Vec<_> = lang_words.split_whitespace().collect();

        debug_assert!(inner.len() == 2048, "Invalid wordlist length");

        WordList { inner }
    }

    /// lazy generation of the word map
    fn gen_wordmap(wordlist: &WordList) -> WordMap {
        let inner = wordlist.inner.iter().enumerate().map(|(i, item)| (*item, i as u16)).collect();

        WordMap { inner }
    }

    pub(crate) static WORDLIST_ENGLISH: Lazy<WordList> = Lazy::new(|| gen_wordlist(include_str!("words/english.txt")));

    pub(crate) static WORDMAP_ENGLISH: Lazy<WordMap> = Lazy::new(|| gen_wordmap(&WORDLIST_ENGLISH));
}

#[cfg(test)]
mod tests {
    use super::Language;

    #[test]
    fn wordlist_is_complete_and_ordered() {
        let wordlist = Language::English.wordlist();
        assert_eq!(wordlist.get_word(0), "abandon");
        assert_eq!(wordlist.get_word(1019), "legal");
        assert_eq!(wordlist.get_word(2047), "zoo");

        let wordmap = Language::English.wordmap();
        assert_eq!(wordmap.get_index("abandon"), Some(0));
        assert_eq!(wordmap.get_index("zoo"), Some(2047));
        assert_eq!(wordmap.get_index("zzz"), None);
        assert_eq!(wordmap.get_index("Abandon"), None);
    }
}
