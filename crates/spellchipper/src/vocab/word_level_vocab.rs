//! # Word-Level Vocabulary
//!
//! A [`TokenizationService`] over a whitespace-split, word-level vocabulary,
//! post-processed with the `[CLS] $A [SEP]` template.
//!
//! This is an in-memory vocabulary built from a token list; trained
//! `tokenizer.json` files are loaded through `HfTokenizerService`
//! (feature `tokenizers`).

use crate::{
    errors::{SCResult, SpellchipperError},
    types::{SCHashMap, TokenId, hash_map_with_capacity},
    vocab::{
        special_tokens::SpecialTokens,
        tokenization::{BatchEncoding, EncodeOptions, Encoding, TokenizationService},
    },
};

/// The number of template tokens wrapped around every row.
pub const TEMPLATE_TOKENS: usize = 2;

/// A word-level vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct WordLevelVocab {
    token_to_id: SCHashMap<String, TokenId>,
    id_to_token: SCHashMap<TokenId, String>,
    specials: SpecialTokens,
    pad_id: TokenId,
    unk_id: TokenId,
    cls_id: TokenId,
    sep_id: TokenId,
}

impl WordLevelVocab {
    /// Build a vocabulary from a token map.
    ///
    /// ## Arguments
    /// * `token_to_id` - The token to id mapping; ids must be unique.
    /// * `specials` - The special tokens; each must be in the map.
    ///
    /// ## Returns
    /// A new `WordLevelVocab`, or a [`SpellchipperError::Vocab`] error.
    pub fn from_map(
        token_to_id: SCHashMap<String, TokenId>,
        specials: SpecialTokens,
    ) -> SCResult<Self> {
        let mut id_to_token = hash_map_with_capacity(token_to_id.len());
        for (token, &id) in token_to_id.iter() {
            if let Some(prev) = id_to_token.insert(id, token.clone()) {
                return Err(SpellchipperError::Vocab(format!(
                    "id {id} is shared by {prev:?} and {token:?}"
                )));
            }
        }

        let lookup = |token: &str| {
            token_to_id.get(token).copied().ok_or_else(|| {
                SpellchipperError::Vocab(format!("special token {token:?} missing from vocab"))
            })
        };
        let pad_id = lookup(&specials.pad)?;
        let unk_id = lookup(&specials.unk)?;
        let cls_id = lookup(&specials.cls)?;
        let sep_id = lookup(&specials.sep)?;

        Ok(Self {
            token_to_id,
            id_to_token,
            specials,
            pad_id,
            unk_id,
            cls_id,
            sep_id,
        })
    }

    /// Build a vocabulary from a token list.
    ///
    /// The special tokens take ids `0..4` in `pad, unk, cls, sep` order;
    /// the listed tokens follow in order, skipping duplicates.
    pub fn from_tokens<I, S>(
        tokens: I,
        specials: SpecialTokens,
    ) -> SCResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut token_to_id: SCHashMap<String, TokenId> = hash_map_with_capacity(64);
        let all = specials.all().map(str::to_string);
        for token in all
            .into_iter()
            .chain(tokens.into_iter().map(|t| t.as_ref().to_string()))
        {
            let next = token_to_id.len() as TokenId;
            token_to_id.entry(token).or_insert(next);
        }
        Self::from_map(token_to_id, specials)
    }

    /// The number of tokens.
    pub fn len(&self) -> usize {
        self.token_to_id.len()
    }

    /// Is the vocabulary empty?
    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }

    /// Get the special tokens.
    pub fn specials(&self) -> &SpecialTokens {
        &self.specials
    }

    /// Look up the id of `token`.
    pub fn token_to_id(
        &self,
        token: &str,
    ) -> Option<TokenId> {
        self.token_to_id.get(token).copied()
    }

    /// Encode one text without padding.
    pub fn encode(
        &self,
        text: &str,
        options: &EncodeOptions,
    ) -> Encoding {
        let mut ids = Vec::with_capacity(text.len() / 2 + TEMPLATE_TOKENS);
        ids.push(self.cls_id);
        ids.extend(
            text.split_whitespace()
                .map(|word| self.token_to_id(word).unwrap_or(self.unk_id)),
        );

        if let Some(max_len) = options.truncation_limit() {
            let body = max_len.saturating_sub(TEMPLATE_TOKENS);
            ids.truncate(body + 1);
        }
        ids.push(self.sep_id);

        Encoding::from_ids(ids)
    }
}

impl TokenizationService for WordLevelVocab {
    fn encode_batch(
        &self,
        texts: &[String],
        options: &EncodeOptions,
    ) -> SCResult<BatchEncoding> {
        let mut batch: BatchEncoding = texts
            .iter()
            .map(|text| self.encode(text, options))
            .collect::<Vec<_>>()
            .into();
        batch.pad(options.padding, self.pad_id);
        Ok(batch)
    }

    fn ids_to_tokens(
        &self,
        ids: &[TokenId],
    ) -> SCResult<Vec<String>> {
        ids.iter()
            .map(|id| {
                self.id_to_token
                    .get(id)
                    .cloned()
                    .ok_or_else(|| SpellchipperError::Vocab(format!("unknown token id {id}")))
            })
            .collect()
    }

    fn pad_token_id(&self) -> TokenId {
        self.pad_id
    }

    fn unk_token(&self) -> &str {
        &self.specials.unk
    }

    fn is_special_token(
        &self,
        token: &str,
    ) -> bool {
        self.specials.contains(token)
    }
}
