//! # Character Pre-Tokenizer

use crate::{
    pretokenize::{CURLY_QUOTES, PreTokenizer, normalize},
    vocab::special_tokens::SpecialTokens,
};

/// Explodes normalized text into characters.
///
/// Plain spaces and curly quotes are dropped. A recognized special token
/// passes through whole, so reserved tokens are never decomposed.
#[derive(Debug, Clone, Default)]
pub struct CharPreTokenizer {
    specials: SpecialTokens,
}

impl CharPreTokenizer {
    /// Create a char pre-tokenizer recognizing `specials`.
    pub fn new(specials: SpecialTokens) -> Self {
        Self { specials }
    }

    /// Get the recognized special tokens.
    pub fn specials(&self) -> &SpecialTokens {
        &self.specials
    }
}

impl PreTokenizer for CharPreTokenizer {
    fn pre_tokenize(
        &self,
        text: &str,
    ) -> Vec<String> {
        let trimmed = text.trim();
        if self.specials.contains(trimmed) {
            return vec![trimmed.to_string()];
        }

        let text = normalize(trimmed);
        if self.specials.contains(&text) {
            return vec![text];
        }

        text.chars()
            .filter(|&c| c != ' ' && !CURLY_QUOTES.contains(&c))
            .map(String::from)
            .collect()
    }
}
