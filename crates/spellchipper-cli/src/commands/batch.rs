use std::sync::Arc;

use spellchipper::{
    collate::{BatchEncoder, BatchEncoderOptions},
    corpus::SampleProviderOptions,
    loader::{BatchLoader, BatchLoaderOptions},
    pretokenize::CharPreTokenizer,
    vocab::{HfTokenizerService, SpecialTokens},
};

use crate::logging::LogArgs;

/// Args for the batch command.
#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Corpus directory holding `stats.json` and `corpus_<idx>.txt` shards.
    corpus_dir: String,

    #[clap(flatten)]
    pub logging: LogArgs,

    /// Trained word-level `tokenizer.json`.
    #[arg(long)]
    word_vocab: String,

    /// Trained char-level `tokenizer.json`.
    #[arg(long)]
    char_vocab: String,

    /// Examples per batch.
    #[arg(long, default_value_t = 16)]
    batch_size: usize,

    /// Number of batches to build.
    #[arg(long, default_value_t = 4)]
    num_batches: usize,

    /// Rng seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Target error rate.
    #[arg(long, default_value_t = 0.2)]
    percent_err: f64,

    /// Re-roll lines with fewer tokens.
    #[arg(long, default_value_t = 0)]
    min_num_tokens: usize,

    /// Maximum word sequence length.
    #[arg(long, default_value_t = 192)]
    max_words: usize,

    /// Maximum char sequence length.
    #[arg(long, default_value_t = 16)]
    max_chars: usize,

    /// Synthesize examples on one thread.
    #[arg(long)]
    serial: bool,
}

impl BatchArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let specials = SpecialTokens::default();
        let word_vocab = HfTokenizerService::from_file(&self.word_vocab, specials.clone())?;
        let char_vocab = HfTokenizerService::from_file(&self.char_vocab, specials.clone())?;
        log::info!(
            "vocab sizes: {} words, {} chars",
            word_vocab.vocab_size(),
            char_vocab.vocab_size()
        );

        let encoder = BatchEncoder::new(
            Arc::new(word_vocab),
            Arc::new(char_vocab),
            Arc::new(CharPreTokenizer::new(specials)),
            BatchEncoderOptions::default()
                .with_max_words(self.max_words)
                .with_max_chars(self.max_chars),
        )?;

        let provider = SampleProviderOptions::default()
            .with_percent_err(self.percent_err)
            .with_min_num_tokens(self.min_num_tokens)
            .init(&self.corpus_dir)?;

        let loader = BatchLoader::new(
            provider,
            encoder,
            BatchLoaderOptions::default()
                .with_batch_size(self.batch_size)
                .with_seed(self.seed)
                .with_parallel(!self.serial),
        )?;
        log::info!("{} batches per pass", loader.len());

        for index in 0..self.num_batches.min(loader.len()) {
            let batch = loader.batch(index)?;
            log::info!(
                "batch {index}: word {:?}, char {:?}, errors {}",
                batch.word_input_ids.dim(),
                batch.char_input_ids.dim(),
                batch.num_errors()
            );
        }

        Ok(())
    }
}
