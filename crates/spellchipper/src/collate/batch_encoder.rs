//! # Dual-Granularity Batch Encoder
//!
//! Encodes a batch of [`TrainingExample`]s into an [`EncodedBatch`]:
//! 1. label rows are padded to `max(len) + 2` (one slot for `[CLS]`, the rest
//!    trailing) and truncated to `max_words`;
//! 2. the synthesized and original sentences are encoded by the word service;
//!    the original ids become the correction labels;
//! 3. every synthesized word id is mapped back to its token, with special
//!    tokens replaced by the unknown token;
//! 4. each word is split into chars, and the flat word list is encoded by
//!    the char service, truncated to `max_chars`;
//! 5. labels are binarized into detection labels.
//!
//! The result is validated before it is returned; shape disagreements are
//! errors, never coerced.

use std::sync::Arc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{
    collate::EncodedBatch,
    errors::{SCResult, SpellchipperError},
    noise::TrainingExample,
    pretokenize::PreTokenizer,
    vocab::{EncodeOptions, TokenizationService, word_level_vocab::TEMPLATE_TOKENS},
};

/// Options for [`BatchEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchEncoderOptions {
    /// Maximum word sequence length, including `[CLS]` and `[SEP]`.
    pub max_words: usize,

    /// Maximum char sequence length per word, including `[CLS]` and `[SEP]`.
    pub max_chars: usize,
}

impl Default for BatchEncoderOptions {
    fn default() -> Self {
        Self {
            max_words: 192,
            max_chars: 16,
        }
    }
}

impl BatchEncoderOptions {
    /// Set the maximum word sequence length.
    pub fn with_max_words(
        self,
        max_words: usize,
    ) -> Self {
        Self { max_words, ..self }
    }

    /// Set the maximum char sequence length.
    pub fn with_max_chars(
        self,
        max_chars: usize,
    ) -> Self {
        Self { max_chars, ..self }
    }

    /// Check the limits leave room for the template tokens.
    pub fn validate(&self) -> SCResult<()> {
        for (name, value) in [("max_words", self.max_words), ("max_chars", self.max_chars)] {
            if value < TEMPLATE_TOKENS {
                return Err(SpellchipperError::InvalidOption {
                    name,
                    reason: format!("{value} < {TEMPLATE_TOKENS}"),
                });
            }
        }
        Ok(())
    }
}

/// Encodes batches at word and char granularity.
///
/// The tokenization services and the char pre-tokenizer are owned by the
/// caller and shared; an encoder is cheap to clone.
#[derive(Clone)]
pub struct BatchEncoder {
    word_service: Arc<dyn TokenizationService>,
    char_service: Arc<dyn TokenizationService>,
    char_pre_tokenizer: Arc<dyn PreTokenizer>,
    options: BatchEncoderOptions,
}

impl BatchEncoder {
    /// Create a batch encoder.
    ///
    /// ## Arguments
    /// * `word_service` - The word-level vocabulary.
    /// * `char_service` - The char-level vocabulary.
    /// * `char_pre_tokenizer` - Splits a word into chars.
    /// * `options` - Sequence limits.
    pub fn new(
        word_service: Arc<dyn TokenizationService>,
        char_service: Arc<dyn TokenizationService>,
        char_pre_tokenizer: Arc<dyn PreTokenizer>,
        options: BatchEncoderOptions,
    ) -> SCResult<Self> {
        options.validate()?;
        Ok(Self {
            word_service,
            char_service,
            char_pre_tokenizer,
            options,
        })
    }

    /// Get the options.
    pub fn options(&self) -> &BatchEncoderOptions {
        &self.options
    }

    /// Encode a batch.
    ///
    /// ## Arguments
    /// * `batch` - The examples; must be non-empty and each aligned.
    ///
    /// ## Returns
    /// The validated [`EncodedBatch`].
    pub fn encode(
        &self,
        batch: &[TrainingExample],
    ) -> SCResult<EncodedBatch> {
        if batch.is_empty() {
            return Err(SpellchipperError::EmptyBatch);
        }
        for example in batch {
            example.validate()?;
        }

        let mut labels = self.pad_labels(batch);

        let word_options = EncodeOptions::padded(self.options.max_words);
        let synth_texts: Vec<String> = batch
            .iter()
            .map(|e| e.synthesized_tokens.join(" "))
            .collect();
        let origin_texts: Vec<String> = batch
            .iter()
            .map(|e| e.original_tokens.join(" "))
            .collect();
        let synth_enc = self
            .word_service
            .encode_batch(&synth_texts, &word_options)?;
        let origin_enc = self
            .word_service
            .encode_batch(&origin_texts, &word_options)?;

        let mut char_texts = Vec::with_capacity(synth_enc.len() * synth_enc.max_len());
        for row in synth_enc.rows() {
            for word in self.word_service.ids_to_tokens(&row.ids)? {
                let word = if self.word_service.is_special_token(&word) {
                    self.word_service.unk_token().to_string()
                } else {
                    word
                };
                char_texts.push(self.char_pre_tokenizer.pre_tokenize(&word).join(" "));
            }
        }
        let char_enc = self
            .char_service
            .encode_batch(&char_texts, &EncodeOptions::padded(self.options.max_chars))?;

        labels.mapv_inplace(|l| u32::from(l != 0));

        let encoded = EncodedBatch {
            word_input_ids: synth_enc.input_ids()?,
            word_attention_mask: synth_enc.attention_mask()?,
            word_token_type_ids: synth_enc.token_type_ids()?,
            char_input_ids: char_enc.input_ids()?,
            char_attention_mask: char_enc.attention_mask()?,
            char_token_type_ids: char_enc.token_type_ids()?,
            correction_labels: origin_enc.input_ids()?,
            detection_labels: labels,
        };
        encoded.validate()?;

        log::debug!(
            "encoded batch: {} x {} words, {} x {} chars, {} errors",
            encoded.batch_size(),
            encoded.word_seq_len(),
            encoded.char_input_ids.nrows(),
            encoded.char_seq_len(),
            encoded.num_errors()
        );

        Ok(encoded)
    }

    /// Pad each label row as `[0] + labels + [0, ...]` to `max(len) + 2`,
    /// then truncate to `max_words`.
    fn pad_labels(
        &self,
        batch: &[TrainingExample],
    ) -> Array2<u32> {
        let max_len = batch.iter().map(TrainingExample::len).max().unwrap_or(0) + TEMPLATE_TOKENS;
        let cols = max_len.min(self.options.max_words);

        let mut labels = Array2::<u32>::zeros((batch.len(), cols));
        for (i, example) in batch.iter().enumerate() {
            for (j, &label) in example.word_error_labels.iter().enumerate() {
                if j + 1 >= cols {
                    break;
                }
                labels[[i, j + 1]] = u32::from(label);
            }
        }
        labels
    }
}
