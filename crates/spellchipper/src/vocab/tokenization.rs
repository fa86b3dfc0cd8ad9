//! # Tokenization Service
//!
//! The contract the batch encoder expects of a trained vocabulary:
//! batch encoding with padding and truncation, an inverse id mapping,
//! and a closed set of special tokens.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{SCResult, SpellchipperError},
    types::TokenId,
};

/// Batch padding policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Padding {
    /// Rows keep their own lengths.
    #[default]
    None,

    /// Rows are right-padded to the longest row in the batch.
    Longest,
}

/// Options for [`TokenizationService::encode_batch`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// The padding policy.
    pub padding: Padding,

    /// Truncate rows to `max_length`.
    pub truncation: bool,

    /// The maximum row length, including template tokens.
    pub max_length: Option<usize>,
}

impl EncodeOptions {
    /// Options padding to the longest row and truncating at `max_length`.
    pub fn padded(max_length: usize) -> Self {
        Self::default()
            .with_padding(Padding::Longest)
            .with_truncation(true)
            .with_max_length(Some(max_length))
    }

    /// Set the padding policy.
    pub fn with_padding(
        self,
        padding: Padding,
    ) -> Self {
        Self { padding, ..self }
    }

    /// Enable or disable truncation.
    pub fn with_truncation(
        self,
        truncation: bool,
    ) -> Self {
        Self { truncation, ..self }
    }

    /// Set the maximum row length.
    pub fn with_max_length(
        self,
        max_length: Option<usize>,
    ) -> Self {
        Self { max_length, ..self }
    }

    /// The effective truncation limit, if any.
    pub fn truncation_limit(&self) -> Option<usize> {
        if self.truncation { self.max_length } else { None }
    }
}

/// One encoded row.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Token ids.
    pub ids: Vec<TokenId>,

    /// `1` for real tokens, `0` for padding.
    pub attention_mask: Vec<u32>,

    /// Segment ids.
    pub type_ids: Vec<u32>,
}

impl Encoding {
    /// Build an unpadded single-segment row from `ids`.
    pub fn from_ids(ids: Vec<TokenId>) -> Self {
        let n = ids.len();
        Self {
            ids,
            attention_mask: vec![1; n],
            type_ids: vec![0; n],
        }
    }

    /// The row length.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Is the row empty?
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Right-pad the row to `len` with `pad_id`; longer rows are unchanged.
    pub fn pad_to(
        &mut self,
        len: usize,
        pad_id: TokenId,
    ) {
        if self.len() >= len {
            return;
        }
        self.ids.resize(len, pad_id);
        self.attention_mask.resize(len, 0);
        self.type_ids.resize(len, 0);
    }
}

/// A batch of encoded rows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchEncoding {
    rows: Vec<Encoding>,
}

impl From<Vec<Encoding>> for BatchEncoding {
    fn from(rows: Vec<Encoding>) -> Self {
        Self { rows }
    }
}

impl BatchEncoding {
    /// Get the rows.
    pub fn rows(&self) -> &[Encoding] {
        &self.rows
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Is the batch empty?
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The length of the longest row.
    pub fn max_len(&self) -> usize {
        self.rows.iter().map(Encoding::len).max().unwrap_or(0)
    }

    /// Apply `padding` to every row.
    pub fn pad(
        &mut self,
        padding: Padding,
        pad_id: TokenId,
    ) {
        if padding == Padding::Longest {
            let len = self.max_len();
            for row in self.rows.iter_mut() {
                row.pad_to(len, pad_id);
            }
        }
    }

    /// The `(rows, cols)` shape, or a [`SpellchipperError::RaggedBatch`].
    pub fn shape(&self) -> SCResult<(usize, usize)> {
        let expected = self.rows.first().map(Encoding::len).unwrap_or(0);
        for (row, enc) in self.rows.iter().enumerate() {
            if enc.len() != expected {
                return Err(SpellchipperError::RaggedBatch {
                    row,
                    len: enc.len(),
                    expected,
                });
            }
        }
        Ok((self.rows.len(), expected))
    }

    /// The token id tensor.
    pub fn input_ids(&self) -> SCResult<Array2<u32>> {
        self.stack(|e| &e.ids)
    }

    /// The attention mask tensor.
    pub fn attention_mask(&self) -> SCResult<Array2<u32>> {
        self.stack(|e| &e.attention_mask)
    }

    /// The segment id tensor.
    pub fn token_type_ids(&self) -> SCResult<Array2<u32>> {
        self.stack(|e| &e.type_ids)
    }

    fn stack<F>(
        &self,
        field: F,
    ) -> SCResult<Array2<u32>>
    where
        F: Fn(&Encoding) -> &Vec<u32>,
    {
        let shape = self.shape()?;
        let flat: Vec<u32> = self
            .rows
            .iter()
            .flat_map(|e| field(e).iter().copied())
            .collect();
        Array2::from_shape_vec(shape, flat).map_err(|e| SpellchipperError::External(e.to_string()))
    }
}

/// A trained vocabulary that encodes batches of text.
///
/// Implementations are shared across worker threads, so they must be
/// [`Send`] and [`Sync`].
pub trait TokenizationService: Send + Sync {
    /// Encode a batch of texts.
    ///
    /// ## Arguments
    /// * `texts` - The texts to encode, one row each.
    /// * `options` - Padding and truncation options.
    ///
    /// ## Returns
    /// A `BatchEncoding` with one row per text.
    fn encode_batch(
        &self,
        texts: &[String],
        options: &EncodeOptions,
    ) -> SCResult<BatchEncoding>;

    /// Map token ids back to their token strings.
    fn ids_to_tokens(
        &self,
        ids: &[TokenId],
    ) -> SCResult<Vec<String>>;

    /// The padding token id.
    fn pad_token_id(&self) -> TokenId;

    /// The unknown token string.
    fn unk_token(&self) -> &str;

    /// Is `token` one of the reserved special tokens?
    fn is_special_token(
        &self,
        token: &str,
    ) -> bool;
}
