//! Candidate word lists for building boards.

use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::index;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Errors from loading or drawing on a word pool.
#[derive(Debug, Display, Error)]
pub enum WordPoolError {
    /// The word list could not be read.
    #[display("Failed to read word list {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The pool is smaller than required.
    #[display("Need at least {required} unique words, found {available}")]
    TooFew {
        /// Words demanded.
        required: usize,
        /// Words present.
        available: usize,
    },
}

/// De-duplicated, order-preserving list of candidate words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    /// Builds a pool, trimming entries, skipping blanks and dropping case-insensitive repeats.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let words = words
            .into_iter()
            .filter_map(|w| {
                let word = w.as_ref().trim();
                (!word.is_empty() && seen.insert(word.to_lowercase())).then(|| word.to_string())
            })
            .collect();
        Self { words }
    }

    /// Reads one word per line.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WordPoolError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| WordPoolError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let pool = Self::from_words(content.lines());
        info!(words = pool.len(), "Loaded word pool");
        Ok(pool)
    }

    /// Fails fast when the pool holds fewer than `minimum` words.
    pub fn ensure_minimum(&self, minimum: usize) -> Result<(), WordPoolError> {
        if self.words.len() < minimum {
            return Err(WordPoolError::TooFew {
                required: minimum,
                available: self.words.len(),
            });
        }
        Ok(())
    }

    /// Draws `count` distinct words in random order.
    #[instrument(skip(self, rng), fields(pool = self.words.len()))]
    pub fn sample<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<String>, WordPoolError> {
        self.ensure_minimum(count)?;
        let picked: Vec<String> = index::sample(rng, self.words.len(), count)
            .into_iter()
            .map(|i| self.words[i].clone())
            .collect();
        debug!(count = picked.len(), "Sampled words");
        Ok(picked)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The words in first-seen order.
    pub fn words(&self) -> &[String] {
        &self.words
    }
}
