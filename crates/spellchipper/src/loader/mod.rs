//! # Batch Loader
//!
//! Pulls examples from a [`SampleProvider`] and collates them with a
//! [`BatchEncoder`].
//!
//! Batch `i` is generated from its own rng, seeded from the loader seed and
//! `i`; each example in the batch gets a seed drawn from that rng. Batches are
//! therefore reproducible regardless of scheduling, and examples may be
//! synthesized in parallel (feature `rayon`).

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    collate::{BatchEncoder, EncodedBatch},
    corpus::SampleProvider,
    errors::{SCResult, SpellchipperError},
    noise::TrainingExample,
};

/// Odd 64-bit constant used to spread batch indices over the seed space.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Options for [`BatchLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchLoaderOptions {
    /// Examples per batch.
    pub batch_size: usize,

    /// Base seed.
    pub seed: u64,

    /// Synthesize the examples of a batch in parallel.
    pub parallel: bool,
}

impl Default for BatchLoaderOptions {
    fn default() -> Self {
        Self {
            batch_size: 16,
            seed: 0,
            parallel: true,
        }
    }
}

impl BatchLoaderOptions {
    /// Set the batch size.
    pub fn with_batch_size(
        self,
        batch_size: usize,
    ) -> Self {
        Self { batch_size, ..self }
    }

    /// Set the base seed.
    pub fn with_seed(
        self,
        seed: u64,
    ) -> Self {
        Self { seed, ..self }
    }

    /// Enable or disable parallel synthesis.
    pub fn with_parallel(
        self,
        parallel: bool,
    ) -> Self {
        Self { parallel, ..self }
    }
}

/// Produces reproducible encoded batches from a corpus.
#[derive(Clone)]
pub struct BatchLoader {
    provider: SampleProvider,
    encoder: BatchEncoder,
    options: BatchLoaderOptions,
}

impl BatchLoader {
    /// Create a loader.
    pub fn new(
        provider: SampleProvider,
        encoder: BatchEncoder,
        options: BatchLoaderOptions,
    ) -> SCResult<Self> {
        if options.batch_size == 0 {
            return Err(SpellchipperError::InvalidOption {
                name: "batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self {
            provider,
            encoder,
            options,
        })
    }

    /// Get the options.
    pub fn options(&self) -> &BatchLoaderOptions {
        &self.options
    }

    /// Get the sample provider.
    pub fn provider(&self) -> &SampleProvider {
        &self.provider
    }

    /// The number of full batches in one pass; a partial final batch is dropped.
    pub fn len(&self) -> usize {
        self.provider.len() / self.options.batch_size
    }

    /// Is there no full batch?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The rng seed of batch `index`.
    pub fn batch_seed(
        &self,
        index: usize,
    ) -> u64 {
        self.options
            .seed
            .wrapping_add((index as u64).wrapping_mul(SEED_STRIDE))
    }

    /// Synthesize the examples of batch `index`.
    pub fn examples(
        &self,
        index: usize,
    ) -> SCResult<Vec<TrainingExample>> {
        let mut rng = StdRng::seed_from_u64(self.batch_seed(index));
        let seeds: Vec<u64> = (0..self.options.batch_size)
            .map(|_| rng.random())
            .collect();

        let one = |&seed: &u64| {
            self.provider
                .next_example(&mut StdRng::seed_from_u64(seed))
        };

        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                if self.options.parallel {
                    use rayon::prelude::*;
                    return seeds.par_iter().map(one).collect();
                }
            }
        }

        seeds.iter().map(one).collect()
    }

    /// Build and encode batch `index`.
    pub fn batch(
        &self,
        index: usize,
    ) -> SCResult<EncodedBatch> {
        let examples = self.examples(index)?;
        let batch = self.encoder.encode(&examples)?;
        log::debug!("batch {index}: seed {:#x}", self.batch_seed(index));
        Ok(batch)
    }

    /// Iterate over the batches of one pass, in index order.
    pub fn iter(&self) -> impl Iterator<Item = SCResult<EncodedBatch>> + '_ {
        (0..self.len()).map(|index| self.batch(index))
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path, sync::Arc};

    use tempdir::TempDir;

    use super::*;
    use crate::{
        collate::BatchEncoderOptions,
        corpus::{CorpusStats, SampleProviderOptions, corpus_stats::shard_file_name},
        pretokenize::{CharPreTokenizer, PreTokenizer, WordPreTokenizer},
        types::{check_is_send, check_is_sync},
        vocab::{SpecialTokens, WordLevelVocab},
    };

    const LINES: &[&str] = &[
        "Trong trận đấu thuộc vòng 19 giải V-League 2017 trên sân Long An",
        "đội chủ nhà một lần nữa lại để chiến thắng tuột khỏi tầm tay",
        "dù đã dẫn trước Sana Khánh Hoa BVN từ rất sớm .",
        "Vì vậy , viễn cảnh đối đầu với 150.000 quân Tào",
        "vẫn khiến liên minh Tôn - Lưu ... khá dễ chịu .",
    ];

    fn loader(
        dir: &Path,
        options: BatchLoaderOptions,
    ) -> BatchLoader {
        let stats = CorpusStats::for_lines(LINES.len(), 2);
        stats.save(dir).unwrap();
        for (idx, chunk) in LINES.chunks(2).enumerate() {
            fs::write(dir.join(shard_file_name(idx)), chunk.join("\n")).unwrap();
        }

        let word_tok = WordPreTokenizer::new().unwrap();
        let char_tok = CharPreTokenizer::default();
        let words: Vec<String> = LINES.iter().flat_map(|l| word_tok.pre_tokenize(l)).collect();
        let chars: Vec<String> = words.iter().flat_map(|w| char_tok.pre_tokenize(w)).collect();

        let encoder = BatchEncoder::new(
            Arc::new(WordLevelVocab::from_tokens(words, SpecialTokens::default()).unwrap()),
            Arc::new(WordLevelVocab::from_tokens(chars, SpecialTokens::default()).unwrap()),
            Arc::new(char_tok),
            BatchEncoderOptions::default(),
        )
        .unwrap();
        let provider = SampleProviderOptions::default().init(dir).unwrap();

        BatchLoader::new(provider, encoder, options).unwrap()
    }

    #[test]
    fn test_drop_last() {
        let dir = TempDir::new("loader").unwrap();
        let loader = loader(dir.path(), BatchLoaderOptions::default().with_batch_size(2));
        check_is_send(&loader);
        check_is_sync(&loader);

        assert_eq!(loader.len(), 2);
        let batches: Vec<EncodedBatch> = loader.iter().map(|b| b.unwrap()).collect();
        assert_eq!(batches.len(), 2);
        for batch in batches {
            assert_eq!(batch.batch_size(), 2);
            batch.validate().unwrap();
            assert!(batch.detection_labels.iter().all(|&l| l <= 1));
        }

        let big = loader.clone();
        let big = BatchLoader::new(
            big.provider,
            big.encoder,
            BatchLoaderOptions::default().with_batch_size(6),
        )
        .unwrap();
        assert!(big.is_empty());
        assert_eq!(big.iter().count(), 0);
    }

    #[test]
    fn test_batches_are_reproducible() {
        let dir = TempDir::new("loader").unwrap();
        let options = BatchLoaderOptions::default().with_batch_size(2).with_seed(31);

        let parallel = loader(dir.path(), options.with_parallel(true));
        let serial = loader(dir.path(), options.with_parallel(false));

        assert_eq!(parallel.examples(1).unwrap(), serial.examples(1).unwrap());
        assert_eq!(parallel.batch(0).unwrap(), serial.batch(0).unwrap());
        assert_ne!(parallel.batch_seed(0), parallel.batch_seed(1));
    }

    #[test]
    fn test_zero_batch_size() {
        let dir = TempDir::new("loader").unwrap();
        let loader = loader(dir.path(), BatchLoaderOptions::default());
        assert!(
            BatchLoader::new(
                loader.provider.clone(),
                loader.encoder.clone(),
                BatchLoaderOptions::default().with_batch_size(0),
            )
            .is_err()
        );
    }
}
