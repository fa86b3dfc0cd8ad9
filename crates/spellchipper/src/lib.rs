//! # `spellchipper` Vietnamese Spelling-Error Data Suite
//!
//! Synthetic spelling-error generation for Vietnamese text, and
//! dual-granularity (word and char) batch encoding for training
//! spell-checking models.
//!
//! See:
//! * [`noise`] to corrupt tokens and sentences with labelled typos.
//! * [`pretokenize`] to split text into words or chars.
//! * [`vocab`] for the tokenization service contract and vocabularies.
//! * [`corpus`] to draw training examples from a sharded corpus.
//! * [`collate`] to encode batches into aligned tensors.
//! * [`loader`] to produce reproducible batches from a corpus.
//!
//! ## Crate Features
//!
//! #### feature: ``default``
//!
//! * ``rayon``
//!
//! #### feature: ``rayon``
//!
//! This enables parallel example synthesis in [`loader::BatchLoader`]
//! using the ``rayon`` crate.
//!
//! #### feature: ``tokenizers``
//!
//! This enables `vocab::HfTokenizerService`, which loads trained HF
//! ``tokenizers`` vocabularies (`tokenizer.json`) as a
//! [`vocab::TokenizationService`]. The `spellchipper` CLI enables it.
//!
//! ## Synthesizing Examples
//!
//! ```rust
//! use rand::{SeedableRng, rngs::StdRng};
//! use spellchipper::noise::Synthesizer;
//! use spellchipper::pretokenize::{PreTokenizer, WordPreTokenizer};
//!
//! let words = WordPreTokenizer::new()?.pre_tokenize("Trong trận đấu thuộc vòng 19 .");
//! let synthesizer = Synthesizer::with_percent_err(0.2)?;
//!
//! let mut rng = StdRng::seed_from_u64(31);
//! let example = synthesizer.synthesize(&mut rng, &words);
//! assert_eq!(example.synthesized_tokens.len(), example.word_error_labels.len());
//! # Ok::<(), spellchipper::errors::SpellchipperError>(())
//! ```
#![warn(missing_docs, unused)]

pub mod collate;
pub mod corpus;
pub mod errors;
pub mod loader;
pub mod noise;
pub mod pretokenize;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use errors::{SCResult, SpellchipperError};
