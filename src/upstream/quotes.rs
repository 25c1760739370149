//! Local quote list
//!
//! Quotes are loaded once at startup and a fresh one is drawn for every request.

use rand::Rng;
use std::fs;
use std::path::Path;

use super::Quote;
use crate::config::ConfigError;

/// Quote list compiled into the binary
const BUNDLED_QUOTES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/quotes.json"));

/// A fixed, non-empty list of quotes
#[derive(Debug, Clone)]
pub struct QuoteSource {
    quotes: Vec<Quote>,
}

impl QuoteSource {
    /// Creates a source over the given quotes
    ///
    /// # Returns
    /// * `Ok(QuoteSource)` if at least one quote was given
    /// * `Err(ConfigError::EmptyQuoteList)` otherwise
    pub fn new(quotes: Vec<Quote>) -> Result<Self, ConfigError> {
        if quotes.is_empty() {
            return Err(ConfigError::EmptyQuoteList);
        }
        Ok(Self { quotes })
    }

    /// Parses a JSON array of `{ "text", "author" }` objects
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let quotes: Vec<Quote> = serde_json::from_str(json).map_err(ConfigError::QuoteParse)?;
        Self::new(quotes)
    }

    /// Loads the quote list from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::QuoteFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// The quote list shipped with the binary
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_json(BUNDLED_QUOTES)
    }

    /// Draws one quote uniformly at random
    pub fn pick_random(&self) -> Quote {
        let index = rand::thread_rng().gen_range(0..self.quotes.len());
        self.quotes[index].clone()
    }

    /// All quotes in load order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
