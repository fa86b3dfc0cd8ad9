//! # Encoded Batch

use ndarray::Array2;

use crate::{
    errors::{SCResult, SpellchipperError},
    types::TokenId,
};

/// The tensor bundle for one batch.
///
/// Word tensors are `batch_size x word_seq_len`; char tensors are
/// `(batch_size * word_seq_len) x char_seq_len`, where row
/// `i * word_seq_len + j` encodes word `j` of item `i` as synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBatch {
    /// Synthesized word ids.
    pub word_input_ids: Array2<u32>,

    /// Synthesized word attention mask.
    pub word_attention_mask: Array2<u32>,

    /// Synthesized word segment ids.
    pub word_token_type_ids: Array2<u32>,

    /// Char ids of every synthesized word position.
    pub char_input_ids: Array2<u32>,

    /// Char attention mask.
    pub char_attention_mask: Array2<u32>,

    /// Char segment ids.
    pub char_token_type_ids: Array2<u32>,

    /// Original word ids; the correction targets.
    pub correction_labels: Array2<u32>,

    /// Binary per-word error flags.
    pub detection_labels: Array2<u32>,
}

impl EncodedBatch {
    /// The number of examples.
    pub fn batch_size(&self) -> usize {
        self.word_input_ids.nrows()
    }

    /// The padded word sequence length.
    pub fn word_seq_len(&self) -> usize {
        self.word_input_ids.ncols()
    }

    /// The padded char sequence length.
    pub fn char_seq_len(&self) -> usize {
        self.char_input_ids.ncols()
    }

    /// Check the tensor shapes agree.
    ///
    /// ## Returns
    /// * [`SpellchipperError::ShapeMismatch`] if the synthesized word ids,
    ///   correction labels and detection labels differ in shape.
    /// * [`SpellchipperError::CharRowMismatch`] if the char row count is not
    ///   `batch_size * word_seq_len`.
    pub fn validate(&self) -> SCResult<()> {
        let word = self.word_input_ids.dim();
        let correction = self.correction_labels.dim();
        let detection = self.detection_labels.dim();
        if word != correction || word != detection {
            return Err(SpellchipperError::ShapeMismatch {
                word,
                correction,
                detection,
            });
        }

        let (batch_size, word_seq_len) = word;
        let rows = self.char_input_ids.nrows();
        if batch_size == 0 || rows != batch_size * word_seq_len {
            return Err(SpellchipperError::CharRowMismatch {
                rows,
                batch_size,
                word_seq_len,
            });
        }

        for (name, tensor, expected) in [
            ("word_attention_mask", &self.word_attention_mask, word),
            ("word_token_type_ids", &self.word_token_type_ids, word),
            ("char_attention_mask", &self.char_attention_mask, self.char_input_ids.dim()),
            ("char_token_type_ids", &self.char_token_type_ids, self.char_input_ids.dim()),
        ] {
            if tensor.dim() != expected {
                return Err(SpellchipperError::TensorShape {
                    name,
                    shape: tensor.dim(),
                    expected,
                });
            }
        }

        Ok(())
    }

    /// The number of words flagged as errors.
    pub fn num_errors(&self) -> usize {
        self.detection_labels.iter().filter(|&&l| l != 0).count()
    }

    /// The `(flat_position, target_id)` pairs at flagged words.
    ///
    /// `flat_position` is `i * word_seq_len + j`, matching the char rows;
    /// `target_id` is the original word id at that position.
    pub fn correction_targets(&self) -> Vec<(usize, TokenId)> {
        let word_seq_len = self.word_seq_len();
        self.detection_labels
            .indexed_iter()
            .filter(|&(_, &flag)| flag != 0)
            .map(|((i, j), _)| (i * word_seq_len + j, self.correction_labels[[i, j]]))
            .collect()
    }
}
