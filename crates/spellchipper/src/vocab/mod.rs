//! # Vocabulary
//!
//! Trained vocabularies consumed through the [`TokenizationService`] contract.
//!
//! * [`WordLevelVocab`] - a native word-level vocabulary.
//! * `HfTokenizerService` - an adapter over HF `tokenizers` (feature `tokenizers`).

pub mod special_tokens;
pub mod tokenization;
pub mod word_level_vocab;

#[cfg(feature = "tokenizers")]
pub mod hf_tokenizer;

#[cfg(feature = "tokenizers")]
#[doc(inline)]
pub use hf_tokenizer::HfTokenizerService;
#[doc(inline)]
pub use special_tokens::SpecialTokens;
#[doc(inline)]
pub use tokenization::{BatchEncoding, EncodeOptions, Encoding, Padding, TokenizationService};
#[doc(inline)]
pub use word_level_vocab::WordLevelVocab;
