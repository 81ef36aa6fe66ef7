use std::collections::HashMap;

use crate::error::{Result, VocabError};
use crate::tokens::{Reserved, UNK};

/// Id <-> word table for the full target vocabulary.
///
/// Ids need not be contiguous; rendering only requires that every id in a
/// sequence has an entry.
#[derive(Debug, Clone, Default)]
pub struct Vocab {
    /// Word strings, keyed by token ID.
    id_to_word: HashMap<u32, String>,
    /// Reverse mapping from word string to token ID.
    word_to_id: HashMap<String, u32>,
}

impl Vocab {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding only the four reserved tokens.
    pub fn with_reserved() -> Self {
        Reserved::ALL
            .iter()
            .map(|r| (r.id(), r.word().to_string()))
            .collect()
    }

    /// Build a dense table where each word's id is its position.
    pub fn from_words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        words
            .into_iter()
            .enumerate()
            .map(|(id, w)| (id as u32, w.into()))
            .collect()
    }

    /// Insert or replace the word for `id`, returning the previous word.
    ///
    /// A word shared by several ids maps back to the lowest of them.
    pub fn insert(&mut self, id: u32, word: impl Into<String>) -> Option<String> {
        let word = word.into();
        let previous = self.id_to_word.insert(id, word.clone());
        if let Some(old) = previous.as_ref().filter(|old| **old != word) {
            if self.word_to_id.get(old) == Some(&id) {
                self.word_to_id.remove(old);
                let holder = self
                    .id_to_word
                    .iter()
                    .filter(|(_, w)| *w == old)
                    .map(|(&other, _)| other)
                    .min();
                if let Some(other) = holder {
                    self.word_to_id.insert(old.clone(), other);
                }
            }
        }
        self.word_to_id
            .entry(word)
            .and_modify(|held| *held = (*held).min(id))
            .or_insert(id);
        previous
    }

    pub fn word(&self, id: u32) -> Option<&str> {
        self.id_to_word.get(&id).map(String::as_str)
    }

    /// Like [`Vocab::word`] but reports a missing id as `UnknownId`.
    pub fn try_word(&self, id: u32) -> Result<&str> {
        self.word(id).ok_or(VocabError::UnknownId(id))
    }

    /// The word for `id`, or the UNK surface form when absent.
    ///
    /// Rendering never calls this on its own; callers that prefer
    /// substitution over an `UnknownId` error opt in explicitly.
    pub fn word_or_unk(&self, id: u32) -> &str {
        self.word(id)
            .or_else(|| self.word(UNK))
            .unwrap_or(Reserved::Unk.word())
    }

    pub fn id(&self, word: &str) -> Option<u32> {
        self.word_to_id.get(word).copied()
    }

    /// Map a whitespace-separated sentence to ids, using `UNK` for
    /// out-of-vocabulary words.
    pub fn encode(&self, sentence: &str) -> Vec<u32> {
        sentence
            .split_whitespace()
            .map(|w| self.id(w).unwrap_or(UNK))
            .collect()
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.id_to_word.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.id_to_word.is_empty()
    }
}

impl<W: Into<String>> FromIterator<(u32, W)> for Vocab {
    fn from_iter<T: IntoIterator<Item = (u32, W)>>(iter: T) -> Self {
        let mut vocab = Vocab::new();
        for (id, word) in iter {
            vocab.insert(id, word);
        }
        vocab
    }
}
