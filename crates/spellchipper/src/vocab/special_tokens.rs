//! # Special Tokens

use serde::{Deserialize, Serialize};

/// Padding token.
pub const PAD: &str = "[PAD]";

/// Unknown token.
pub const UNK: &str = "[UNK]";

/// Sequence start token.
pub const CLS: &str = "[CLS]";

/// Sequence end token.
pub const SEP: &str = "[SEP]";

/// The reserved tokens shared by the word and char vocabularies.
///
/// Trained vocabularies reserve ids in field order: pad=0, unk=1, cls=2, sep=3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialTokens {
    /// Padding token.
    pub pad: String,

    /// Unknown token.
    pub unk: String,

    /// Sequence start token.
    pub cls: String,

    /// Sequence end token.
    pub sep: String,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self {
            pad: PAD.to_string(),
            unk: UNK.to_string(),
            cls: CLS.to_string(),
            sep: SEP.to_string(),
        }
    }
}

impl SpecialTokens {
    /// All special tokens, in reserved id order.
    pub fn all(&self) -> [&str; 4] {
        [
            self.pad.as_str(),
            self.unk.as_str(),
            self.cls.as_str(),
            self.sep.as_str(),
        ]
    }

    /// Is `token` one of the special tokens?
    pub fn contains(
        &self,
        token: &str,
    ) -> bool {
        self.all().contains(&token)
    }
}
