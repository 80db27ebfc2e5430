use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use rand::{SeedableRng as _, rngs::StdRng, seq::SliceRandom as _};

use crate::foundation::error::{QuoteCardError, QuoteCardResult};

/// A quote and who said it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Quote {
    /// The quote itself.
    #[serde(rename = "quote")]
    pub text: String,
    /// Attributed author.
    pub author: String,
    /// Topic the quote is filed under.
    #[serde(default)]
    pub category: String,
}

/// Supplies quotes by category.
pub trait QuoteSource {
    /// A quote for `category`, or [`QuoteCardError::Source`] when there is none.
    fn quote(&mut self, category: &str) -> QuoteCardResult<Quote>;
}

/// Always returns the same quote regardless of category.
#[derive(Clone, Debug)]
pub struct FixedQuote(pub Quote);

impl FixedQuote {
    /// Wrap a quote/author pair.
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self(Quote {
            text: text.into(),
            author: author.into(),
            category: String::new(),
        })
    }
}

impl QuoteSource for FixedQuote {
    fn quote(&mut self, _category: &str) -> QuoteCardResult<Quote> {
        Ok(self.0.clone())
    }
}

/// Quotes read from a JSON array of `{ "quote", "author", "category" }` records.
///
/// Without a seed the first matching record is returned; with one, a random match.
#[derive(Clone, Debug)]
pub struct QuoteFile {
    quotes: Vec<Quote>,
    rng: Option<StdRng>,
}

impl QuoteFile {
    /// Use an in-memory list.
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self { quotes, rng: None }
    }

    /// Parse a JSON file.
    pub fn from_json_file(path: &Path) -> QuoteCardResult<Self> {
        let f = File::open(path).with_context(|| format!("open quotes '{}'", path.display()))?;
        let quotes: Vec<Quote> = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse quotes JSON '{}'", path.display()))?;
        Ok(Self::new(quotes))
    }

    /// Pick randomly among matches, reproducibly for a given seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    /// Number of records loaded.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Whether no records were loaded.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl QuoteSource for QuoteFile {
    fn quote(&mut self, category: &str) -> QuoteCardResult<Quote> {
        let matches: Vec<&Quote> = self
            .quotes
            .iter()
            .filter(|q| q.category.eq_ignore_ascii_case(category))
            .collect();

        let picked = match self.rng.as_mut() {
            Some(rng) => matches.choose(rng).copied(),
            None => matches.first().copied(),
        };
        picked
            .cloned()
            .ok_or_else(|| QuoteCardError::source(format!("no quotes in category '{category}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sources/quotes.rs"]
mod tests;
