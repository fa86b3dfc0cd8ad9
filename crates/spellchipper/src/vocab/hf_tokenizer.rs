//! # HF Tokenizers Adapter
//!
//! Exposes a trained `tokenizers::Tokenizer` as a [`TokenizationService`].

use std::path::Path;

use tokenizers::{PostProcessor, Tokenizer, TruncationDirection};

use crate::{
    errors::{SCResult, SpellchipperError},
    types::TokenId,
    vocab::{
        special_tokens::SpecialTokens,
        tokenization::{BatchEncoding, EncodeOptions, Encoding, TokenizationService},
    },
};

fn external<E: ToString>(err: E) -> SpellchipperError {
    SpellchipperError::External(err.to_string())
}

/// A [`TokenizationService`] backed by a HF `tokenizers::Tokenizer`.
///
/// The tokenizer's normalizer, pre-tokenizer, model and post-processor all
/// apply. Padding and truncation come from the per-call [`EncodeOptions`];
/// any padding or truncation configured in the tokenizer file is cleared
/// when the service is built.
#[derive(Clone)]
pub struct HfTokenizerService {
    tokenizer: Tokenizer,
    specials: SpecialTokens,
    pad_id: TokenId,
}

impl HfTokenizerService {
    /// Wrap a loaded tokenizer.
    ///
    /// ## Arguments
    /// * `tokenizer` - A trained tokenizer; its own padding and truncation
    ///   settings are removed.
    /// * `specials` - The special tokens; `pad` and `unk` must be in the vocab.
    pub fn new(
        mut tokenizer: Tokenizer,
        specials: SpecialTokens,
    ) -> SCResult<Self> {
        tokenizer.with_truncation(None).map_err(external)?;
        tokenizer.with_padding(None);

        let pad_id = tokenizer.token_to_id(&specials.pad).ok_or_else(|| {
            SpellchipperError::Vocab(format!("pad token {:?} missing from vocab", specials.pad))
        })?;
        if tokenizer.token_to_id(&specials.unk).is_none() {
            return Err(SpellchipperError::Vocab(format!(
                "unk token {:?} missing from vocab",
                specials.unk
            )));
        }
        Ok(Self {
            tokenizer,
            specials,
            pad_id,
        })
    }

    /// Load a trained `tokenizer.json` file.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        specials: SpecialTokens,
    ) -> SCResult<Self> {
        let path = path.as_ref();
        let tokenizer = Tokenizer::from_file(path).map_err(external)?;
        let service = Self::new(tokenizer, specials)?;
        log::debug!(
            "loaded {} tokens from {}",
            service.vocab_size(),
            path.display()
        );
        Ok(service)
    }

    /// The vocabulary size, including added tokens.
    pub fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }

    /// Get the wrapped tokenizer.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    fn added_tokens(&self) -> usize {
        self.tokenizer
            .get_post_processor()
            .map(|p| p.added_tokens(false))
            .unwrap_or(0)
    }

    fn encode_one(
        &self,
        text: &str,
        options: &EncodeOptions,
    ) -> SCResult<Encoding> {
        let mut encoding = self.tokenizer.encode(text, false).map_err(external)?;
        if let Some(max_len) = options.truncation_limit() {
            let body = max_len.saturating_sub(self.added_tokens());
            encoding.truncate(body, 0, TruncationDirection::Right);
        }
        let encoding = self
            .tokenizer
            .post_process(encoding, None, true)
            .map_err(external)?;

        Ok(Encoding {
            ids: encoding.get_ids().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
            type_ids: encoding.get_type_ids().to_vec(),
        })
    }
}

impl TokenizationService for HfTokenizerService {
    fn encode_batch(
        &self,
        texts: &[String],
        options: &EncodeOptions,
    ) -> SCResult<BatchEncoding> {
        let mut batch: BatchEncoding = texts
            .iter()
            .map(|text| self.encode_one(text, options))
            .collect::<SCResult<Vec<_>>>()?
            .into();
        batch.pad(options.padding, self.pad_id);
        Ok(batch)
    }

    fn ids_to_tokens(
        &self,
        ids: &[TokenId],
    ) -> SCResult<Vec<String>> {
        ids.iter()
            .map(|&id| {
                self.tokenizer
                    .id_to_token(id)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::tokenization::Padding;

    const WORD_LEVEL_JSON: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": {"type": "Lowercase"},
        "pre_tokenizer": {"type": "WhitespaceSplit"},
        "post_processor": {
            "type": "TemplateProcessing",
            "single": [
                {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                {"Sequence": {"id": "A", "type_id": 0}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 0}}
            ],
            "pair": [
                {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                {"Sequence": {"id": "A", "type_id": 0}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 0}},
                {"Sequence": {"id": "B", "type_id": 1}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 1}}
            ],
            "special_tokens": {
                "[CLS]": {"id": "[CLS]", "ids": [2], "tokens": ["[CLS]"]},
                "[SEP]": {"id": "[SEP]", "ids": [3], "tokens": ["[SEP]"]}
            }
        },
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {"[PAD]": 0, "[UNK]": 1, "[CLS]": 2, "[SEP]": 3, "trong": 4, "trận": 5, "đấu": 6},
            "unk_token": "[UNK]"
        }
    }"#;

    #[test]
    fn test_hf_service_matches_contract() {
        let tokenizer: Tokenizer = WORD_LEVEL_JSON.parse().unwrap();
        let service = HfTokenizerService::new(tokenizer, SpecialTokens::default()).unwrap();

        let texts = vec!["trong trận đấu".to_string(), "xyz".to_string()];
        let batch = service
            .encode_batch(&texts, &EncodeOptions::padded(4))
            .unwrap();

        let ids = batch.input_ids().unwrap();
        assert_eq!(ids.row(0).to_vec(), vec![2, 4, 5, 3]);
        assert_eq!(ids.row(1).to_vec(), vec![2, 1, 3, 0]);

        let unpadded = service
            .encode_batch(&texts, &EncodeOptions::default().with_padding(Padding::None))
            .unwrap();
        assert_eq!(unpadded.rows()[0].len(), 5);

        assert_eq!(
            service.ids_to_tokens(&[2, 4, 3]).unwrap(),
            vec!["[CLS]", "trong", "[SEP]"]
        );
        assert_eq!(service.pad_token_id(), 0);
        assert!(service.is_special_token("[CLS]"));
        assert_eq!(service.vocab_size(), 7);
    }

    #[test]
    fn test_hf_service_applies_normalizer() {
        let tokenizer: Tokenizer = WORD_LEVEL_JSON.parse().unwrap();
        let service = HfTokenizerService::new(tokenizer, SpecialTokens::default()).unwrap();

        let batch = service
            .encode_batch(&["Trận ĐẤU".to_string()], &EncodeOptions::padded(16))
            .unwrap();
        assert_eq!(batch.rows()[0].ids, vec![2, 5, 6, 3]);
    }

    #[test]
    fn test_file_truncation_and_padding_are_cleared() {
        let json = WORD_LEVEL_JSON
            .replace(
                r#""truncation": null"#,
                r#""truncation": {"direction": "Right", "max_length": 2, "strategy": "LongestFirst", "stride": 0}"#,
            )
            .replace(
                r#""padding": null"#,
                r#""padding": {"strategy": {"Fixed": 12}, "direction": "Right", "pad_to_multiple_of": null, "pad_id": 0, "pad_type_id": 0, "pad_token": "[PAD]"}"#,
            );
        let tokenizer: Tokenizer = json.parse().unwrap();
        assert!(tokenizer.get_truncation().is_some());

        let service = HfTokenizerService::new(tokenizer, SpecialTokens::default()).unwrap();
        assert!(service.tokenizer().get_truncation().is_none());
        assert!(service.tokenizer().get_padding().is_none());

        let texts = vec!["trong trận đấu".to_string()];
        let unpadded = service
            .encode_batch(&texts, &EncodeOptions::default().with_padding(Padding::None))
            .unwrap();
        assert_eq!(unpadded.rows()[0].ids, vec![2, 4, 5, 6, 3]);

        let truncated = service
            .encode_batch(&texts, &EncodeOptions::padded(4))
            .unwrap();
        assert_eq!(truncated.rows()[0].ids, vec![2, 4, 5, 3]);
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir::TempDir::new("vocab").unwrap();
        let path = dir.path().join("tokenizer.json");
        std::fs::write(&path, WORD_LEVEL_JSON).unwrap();

        let service = HfTokenizerService::from_file(&path, SpecialTokens::default()).unwrap();
        assert_eq!(service.vocab_size(), 7);

        assert!(
            HfTokenizerService::from_file(dir.path().join("missing.json"), SpecialTokens::default())
                .is_err()
        );
    }
}
