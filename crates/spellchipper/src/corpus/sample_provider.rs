//! # Corpus Sample Provider
//!
//! Draws random lines from a sharded corpus and synthesizes training examples.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    sync::Arc,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    corpus::{CorpusStats, LineCleaner, corpus_stats::list_shard_paths},
    errors::{SCResult, SpellchipperError},
    noise::{Synthesizer, TrainingExample, TypoOptions},
    pretokenize::{PreTokenizer, WordPreTokenizer},
};

/// Options for [`SampleProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleProviderOptions {
    /// Target error rate; sets the typo generator's `no_typo_prob` to `1 - percent_err`.
    pub percent_err: f64,

    /// Lines with fewer tokens are re-rolled; `0` disables the check.
    pub min_num_tokens: usize,

    /// The maximum number of lines drawn per example.
    pub max_retries: usize,

    /// Typo generator options; `no_typo_prob` is replaced by `percent_err`.
    pub typo: TypoOptions,
}

impl Default for SampleProviderOptions {
    fn default() -> Self {
        Self {
            percent_err: 0.2,
            min_num_tokens: 0,
            max_retries: 32,
            typo: TypoOptions::default(),
        }
    }
}

impl SampleProviderOptions {
    /// Set the target error rate.
    pub fn with_percent_err(
        self,
        percent_err: f64,
    ) -> Self {
        Self {
            percent_err,
            ..self
        }
    }

    /// Set the minimum token count.
    pub fn with_min_num_tokens(
        self,
        min_num_tokens: usize,
    ) -> Self {
        Self {
            min_num_tokens,
            ..self
        }
    }

    /// Set the retry budget.
    pub fn with_max_retries(
        self,
        max_retries: usize,
    ) -> Self {
        Self {
            max_retries,
            ..self
        }
    }

    /// Set the typo generator options.
    pub fn with_typo(
        self,
        typo: TypoOptions,
    ) -> Self {
        Self { typo, ..self }
    }

    /// Check the option ranges.
    pub fn validate(&self) -> SCResult<()> {
        if !(0.0..=1.0).contains(&self.percent_err) {
            return Err(SpellchipperError::InvalidOption {
                name: "percent_err",
                reason: format!("{} is not in [0, 1]", self.percent_err),
            });
        }
        if self.max_retries == 0 {
            return Err(SpellchipperError::InvalidOption {
                name: "max_retries",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Open a corpus directory.
    pub fn init<P: AsRef<Path>>(
        self,
        corpus_dir: P,
    ) -> SCResult<SampleProvider> {
        SampleProvider::new(corpus_dir, self)
    }
}

/// Produces one [`TrainingExample`] per call from a sharded corpus.
///
/// Lines are drawn with replacement: a global line index is chosen
/// uniformly, so every line is equally likely.
#[derive(Clone)]
pub struct SampleProvider {
    corpus_dir: PathBuf,
    stats: CorpusStats,
    shards: Vec<PathBuf>,
    cleaner: LineCleaner,
    pre_tokenizer: Arc<dyn PreTokenizer>,
    synthesizer: Synthesizer,
    options: SampleProviderOptions,
}

impl SampleProvider {
    /// Open a corpus directory.
    ///
    /// ## Arguments
    /// * `corpus_dir` - A directory holding `stats.json` and `corpus_<idx>.txt` shards.
    /// * `options` - Provider options.
    ///
    /// ## Returns
    /// A provider, or an error if the stats or shards are missing or disagree.
    pub fn new<P: AsRef<Path>>(
        corpus_dir: P,
        options: SampleProviderOptions,
    ) -> SCResult<Self> {
        options.validate()?;
        let corpus_dir = corpus_dir.as_ref().to_path_buf();

        let stats = CorpusStats::load(&corpus_dir)?;
        let shards = list_shard_paths(&corpus_dir)?;
        if shards.len() != stats.num_files {
            return Err(SpellchipperError::CorpusMismatch(format!(
                "found {} shards in {}, stats.json lists {}",
                shards.len(),
                corpus_dir.display(),
                stats.num_files
            )));
        }

        let synthesizer =
            Synthesizer::new(options.typo.with_percent_err(options.percent_err))?;

        log::info!(
            "opened corpus {}: {} lines in {} shards",
            corpus_dir.display(),
            stats.total_lines,
            stats.num_files
        );

        Ok(Self {
            corpus_dir,
            stats,
            shards,
            cleaner: LineCleaner::new()?,
            pre_tokenizer: Arc::new(WordPreTokenizer::new()?),
            synthesizer,
            options,
        })
    }

    /// Replace the word pre-tokenizer.
    pub fn with_pre_tokenizer(
        self,
        pre_tokenizer: Arc<dyn PreTokenizer>,
    ) -> Self {
        Self {
            pre_tokenizer,
            ..self
        }
    }

    /// Get the corpus directory.
    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    /// Get the corpus statistics.
    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    /// Get the options.
    pub fn options(&self) -> &SampleProviderOptions {
        &self.options
    }

    /// Get the shard paths, in index order.
    pub fn shards(&self) -> &[PathBuf] {
        &self.shards
    }

    /// The number of examples in one pass: the total corpus line count.
    pub fn len(&self) -> usize {
        self.stats.total_lines
    }

    /// Is the corpus empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the raw bytes of the line at a global line index.
    ///
    /// The trailing `\n` (and `\r`, if any) is stripped; no decoding is done.
    pub fn read_raw_line(
        &self,
        index: usize,
    ) -> SCResult<Vec<u8>> {
        let (shard, line) = self.stats.locate(index);
        let path = &self.shards[shard];
        let reader = BufReader::new(File::open(path)?);
        match reader.split(b'\n').nth(line) {
            Some(bytes) => {
                let mut bytes = bytes?;
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                Ok(bytes)
            }
            None => Err(SpellchipperError::CorpusMismatch(format!(
                "{} has no line {line}",
                path.display()
            ))),
        }
    }

    /// Read the line at a global line index as UTF-8.
    ///
    /// ## Returns
    /// `None` if the line is not valid UTF-8.
    pub fn read_line(
        &self,
        index: usize,
    ) -> SCResult<Option<String>> {
        Ok(String::from_utf8(self.read_raw_line(index)?).ok())
    }

    /// Draw lines until one is usable, then synthesize an example from it.
    ///
    /// A line is unusable when it is not valid UTF-8, cleans to nothing, or
    /// pre-tokenizes to fewer than `min_num_tokens` tokens. After
    /// `max_retries` draws the provider gives up with
    /// [`SpellchipperError::NoUsableLine`]. I/O errors are returned as-is.
    pub fn next_example<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> SCResult<TrainingExample> {
        for attempt in 0..self.options.max_retries {
            let index = rng.random_range(0..self.stats.total_lines);
            let Some(raw) = self.read_line(index)? else {
                log::warn!("line {index} is not valid UTF-8; redrawing (attempt {attempt})");
                continue;
            };

            let line = self.cleaner.clean(&raw);
            if line.is_empty() {
                log::warn!("line {index} is empty after cleaning; redrawing (attempt {attempt})");
                continue;
            }

            let tokens = self.pre_tokenizer.pre_tokenize(&line);
            if tokens.is_empty() || tokens.len() < self.options.min_num_tokens {
                log::debug!("line {index} has {} tokens; redrawing", tokens.len());
                continue;
            }

            return Ok(self.synthesizer.synthesize(rng, &tokens));
        }

        Err(SpellchipperError::NoUsableLine {
            attempts: self.options.max_retries,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rand::{SeedableRng, rngs::StdRng};
    use tempdir::TempDir;

    use super::*;
    use crate::corpus::corpus_stats::shard_file_name;

    fn write_corpus(
        dir: &Path,
        lines: &[&str],
        lines_per_file: usize,
    ) {
        let stats = CorpusStats::for_lines(lines.len(), lines_per_file);
        stats.save(dir).unwrap();
        for (idx, chunk) in lines.chunks(lines_per_file).enumerate() {
            fs::write(dir.join(shard_file_name(idx)), chunk.join("\n") + "\n").unwrap();
        }
    }

    #[test]
    fn test_options() {
        let options = SampleProviderOptions::default();
        assert_eq!(options.percent_err, 0.2);
        assert_eq!(options.min_num_tokens, 0);
        assert_eq!(options.max_retries, 32);
        options.validate().unwrap();

        assert!(options.with_percent_err(-0.1).validate().is_err());
        assert!(options.with_max_retries(0).validate().is_err());
    }

    #[test]
    fn test_missing_corpus() {
        let dir = TempDir::new("corpus").unwrap();
        assert!(matches!(
            SampleProviderOptions::default().init(dir.path()),
            Err(SpellchipperError::MissingCorpus { .. })
        ));
    }

    #[test]
    fn test_shard_count_mismatch() {
        let dir = TempDir::new("corpus").unwrap();
        write_corpus(dir.path(), &["a b", "c d", "e f"], 1);
        fs::remove_file(dir.path().join(shard_file_name(2))).unwrap();

        assert!(matches!(
            SampleProviderOptions::default().init(dir.path()),
            Err(SpellchipperError::CorpusMismatch(_))
        ));
    }

    #[test]
    fn test_read_line() {
        let dir = TempDir::new("corpus").unwrap();
        write_corpus(dir.path(), &["một", "hai", "ba", "bốn", "năm"], 2);

        let provider = SampleProviderOptions::default().init(dir.path()).unwrap();
        assert_eq!(provider.len(), 5);
        assert_eq!(provider.shards().len(), 3);
        assert_eq!(provider.read_line(0).unwrap().as_deref(), Some("một"));
        assert_eq!(provider.read_line(3).unwrap().as_deref(), Some("bốn"));
        assert_eq!(provider.read_line(4).unwrap().as_deref(), Some("năm"));
    }

    #[test]
    fn test_next_example_skips_unusable_lines() {
        let dir = TempDir::new("corpus").unwrap();
        write_corpus(
            dir.path(),
            &["😀 ✓", "\u{200B}", "Trận đấu thuộc vòng 19 .", "中文"],
            2,
        );

        let provider = SampleProviderOptions::default()
            .with_percent_err(0.0)
            .init(dir.path())
            .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..8 {
            let example = provider.next_example(&mut rng).unwrap();
            assert_eq!(
                example.original_tokens,
                vec!["trận", "đấu", "thuộc", "vòng", "19", "."]
            );
            assert_eq!(example.synthesized_tokens, example.original_tokens);
        }
    }

    #[test]
    fn test_invalid_utf8_line_is_redrawn() {
        let dir = TempDir::new("corpus").unwrap();
        CorpusStats::for_lines(2, 2).save(dir.path()).unwrap();
        fs::write(
            dir.path().join(shard_file_name(0)),
            b"tr\xffan dau\r\nTr\xe1\xba\xadn \xc4\x91\xe1\xba\xa5u .\n",
        )
        .unwrap();

        let provider = SampleProviderOptions::default()
            .with_percent_err(0.0)
            .init(dir.path())
            .unwrap();
        assert_eq!(provider.read_raw_line(0).unwrap(), b"tr\xffan dau".to_vec());
        assert_eq!(provider.read_line(0).unwrap(), None);
        assert_eq!(provider.read_line(1).unwrap().as_deref(), Some("Trận đấu ."));

        for seed in 0..20 {
            let example = provider
                .next_example(&mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert_eq!(example.original_tokens, vec!["trận", "đấu", "."]);
        }
    }

    #[test]
    fn test_only_invalid_lines_exhaust_retries() {
        let dir = TempDir::new("corpus").unwrap();
        CorpusStats::for_lines(1, 1).save(dir.path()).unwrap();
        fs::write(dir.path().join(shard_file_name(0)), b"\xfe\xff\n").unwrap();

        let provider = SampleProviderOptions::default()
            .with_max_retries(3)
            .init(dir.path())
            .unwrap();
        assert!(matches!(
            provider.next_example(&mut StdRng::seed_from_u64(0)),
            Err(SpellchipperError::NoUsableLine { attempts: 3 })
        ));
    }

    #[test]
    fn test_no_usable_line() {
        let dir = TempDir::new("corpus").unwrap();
        write_corpus(dir.path(), &["một hai", "ba"], 1);

        let provider = SampleProviderOptions::default()
            .with_min_num_tokens(5)
            .with_max_retries(4)
            .init(dir.path())
            .unwrap();

        match provider.next_example(&mut StdRng::seed_from_u64(1)) {
            Err(SpellchipperError::NoUsableLine { attempts }) => assert_eq!(attempts, 4),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_seeded_examples_are_reproducible() {
        let dir = TempDir::new("corpus").unwrap();
        write_corpus(
            dir.path(),
            &[
                "Trong trận đấu thuộc vòng 19 giải V-League 2017 trên sân Long An",
                "Vì vậy , viễn cảnh đối đầu với 150.000 quân Tào vẫn khiến liên minh",
                "đội chủ nhà một lần nữa lại để chiến thắng tuột khỏi tầm tay",
            ],
            2,
        );
        let provider = SampleProviderOptions::default().init(dir.path()).unwrap();

        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| provider.next_example(&mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(31), draw(31));
    }
}
