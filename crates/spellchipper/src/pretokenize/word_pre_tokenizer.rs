//! # Word Pre-Tokenizer

use regex::Regex;

use crate::{
    errors::{SCResult, SpellchipperError},
    pretokenize::{CURLY_QUOTES, PreTokenizer, normalize},
};

/// Word runs, or runs of non-word non-space characters.
pub const WORD_PUNCT_PATTERN: &str = r"\w+|[^\w\s]+";

/// Splits normalized text into word and punctuation tokens.
///
/// Quote variants (``` `` ```, `''`, curly quotes) are canonicalized to `"`.
#[derive(Debug, Clone)]
pub struct WordPreTokenizer {
    pattern: Regex,
}

impl WordPreTokenizer {
    /// Create a new word pre-tokenizer.
    pub fn new() -> SCResult<Self> {
        Ok(Self {
            pattern: Regex::new(WORD_PUNCT_PATTERN)
                .map_err(|e| SpellchipperError::External(e.to_string()))?,
        })
    }
}

fn canonicalize(token: &str) -> String {
    let is_quote = token == "``"
        || token == "''"
        || token.chars().eq([CURLY_QUOTES[0]])
        || token.chars().eq([CURLY_QUOTES[1]]);
    if is_quote {
        return "\"".to_string();
    }
    token.chars().filter(|c| !c.is_whitespace()).collect()
}

impl PreTokenizer for WordPreTokenizer {
    fn pre_tokenize(
        &self,
        text: &str,
    ) -> Vec<String> {
        let text = normalize(text);
        self.pattern
            .find_iter(&text)
            .map(|m| canonicalize(m.as_str()))
            .collect()
    }
}
