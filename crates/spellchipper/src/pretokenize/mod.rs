//! # Pre-Tokenizers
//!
//! Text is normalized (NFKC, lowercase) and split before vocabulary lookup:
//! * [`WordPreTokenizer`] - word and punctuation runs.
//! * [`CharPreTokenizer`] - individual characters.

use unicode_normalization::UnicodeNormalization;

pub mod char_pre_tokenizer;
pub mod word_pre_tokenizer;

#[doc(inline)]
pub use char_pre_tokenizer::CharPreTokenizer;
#[doc(inline)]
pub use word_pre_tokenizer::WordPreTokenizer;

/// Left and right curly double quotes.
pub const CURLY_QUOTES: [char; 2] = ['\u{201C}', '\u{201D}'];

/// Splits text into pre-tokens.
pub trait PreTokenizer: Send + Sync {
    /// Split `text` into a sequence of tokens.
    fn pre_tokenize(
        &self,
        text: &str,
    ) -> Vec<String>;
}

/// Trim, NFKC-normalize, and lowercase `text`.
pub fn normalize(text: &str) -> String {
    text.trim().nfkc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Trận ĐẤU "), "trận đấu");
        // Decomposed input is composed.
        assert_eq!(normalize("vo\u{300}ng"), "vòng");
        // Compatibility forms are folded.
        assert_eq!(normalize("\u{FF21}"), "a");
    }
}
