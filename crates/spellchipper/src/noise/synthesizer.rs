//! # Noise Synthesizer

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{SCResult, SpellchipperError},
    noise::{ErrorCategory, TypoGenerator, TypoOptions},
};

/// One synthesized training example.
///
/// `original_tokens`, `synthesized_tokens`, and `word_error_labels` are
/// position-aligned and always the same length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Whether synthesis succeeded; always `true` for generated examples.
    pub success: bool,

    /// The clean tokens.
    pub original_tokens: Vec<String>,

    /// The corrupted tokens.
    pub synthesized_tokens: Vec<String>,

    /// Per-word [`ErrorCategory`] codes; `0` means no error.
    pub word_error_labels: Vec<u8>,
}

impl TrainingExample {
    /// Build an example from pre-aligned parts, checking the lengths agree.
    pub fn try_new(
        original_tokens: Vec<String>,
        synthesized_tokens: Vec<String>,
        word_error_labels: Vec<u8>,
    ) -> SCResult<Self> {
        let example = Self {
            success: true,
            original_tokens,
            synthesized_tokens,
            word_error_labels,
        };
        example.validate()?;
        Ok(example)
    }

    /// The number of words.
    pub fn len(&self) -> usize {
        self.word_error_labels.len()
    }

    /// Is the example empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of corrupted words.
    pub fn num_errors(&self) -> usize {
        self.word_error_labels.iter().filter(|&&l| l != 0).count()
    }

    /// The labels as categories; unknown codes are skipped.
    pub fn categories(&self) -> impl Iterator<Item = ErrorCategory> + '_ {
        self.word_error_labels
            .iter()
            .filter_map(|&code| ErrorCategory::from_code(code))
    }

    /// Check the three sequences are aligned.
    pub fn validate(&self) -> SCResult<()> {
        let (original, synthesized, labels) = (
            self.original_tokens.len(),
            self.synthesized_tokens.len(),
            self.word_error_labels.len(),
        );
        if original != synthesized || synthesized != labels {
            return Err(SpellchipperError::UnalignedExample {
                original,
                synthesized,
                labels,
            });
        }
        Ok(())
    }
}

/// Applies a [`TypoGenerator`] to every token of a sentence.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    generator: TypoGenerator,
}

impl Synthesizer {
    /// Create a synthesizer with the given typo options.
    pub fn new(options: TypoOptions) -> SCResult<Self> {
        Ok(Self {
            generator: options.init()?,
        })
    }

    /// Create a synthesizer targeting an error rate of `percent_err`.
    ///
    /// See [`TypoOptions::with_percent_err`].
    pub fn with_percent_err(percent_err: f64) -> SCResult<Self> {
        Self::new(TypoOptions::default().with_percent_err(percent_err))
    }

    /// Get the underlying generator.
    pub fn generator(&self) -> &TypoGenerator {
        &self.generator
    }

    /// Corrupt every token of `origin_tokens` under the configured options.
    ///
    /// Tokens are processed left to right, so the rng is consumed in token
    /// order.
    pub fn synthesize<R, S>(
        &self,
        rng: &mut R,
        origin_tokens: &[S],
    ) -> TrainingExample
    where
        R: Rng + ?Sized,
        S: AsRef<str>,
    {
        Self::synthesize_with(&self.generator, rng, origin_tokens)
    }

    /// Corrupt every token of `origin_tokens` at the error rate `percent_err`.
    ///
    /// `percent_err` replaces the configured `no_typo_prob` with
    /// `1 - percent_err` for this call; the other rule gates are unchanged.
    pub fn add_noise<R, S>(
        &self,
        rng: &mut R,
        origin_tokens: &[S],
        percent_err: f64,
    ) -> SCResult<TrainingExample>
    where
        R: Rng + ?Sized,
        S: AsRef<str>,
    {
        let options = self.generator.options().with_percent_err(percent_err);
        if options == *self.generator.options() {
            return Ok(self.synthesize(rng, origin_tokens));
        }
        let generator = options.init()?;
        Ok(Self::synthesize_with(&generator, rng, origin_tokens))
    }

    fn synthesize_with<R, S>(
        generator: &TypoGenerator,
        rng: &mut R,
        origin_tokens: &[S],
    ) -> TrainingExample
    where
        R: Rng + ?Sized,
        S: AsRef<str>,
    {
        let mut synthesized_tokens = Vec::with_capacity(origin_tokens.len());
        let mut word_error_labels = Vec::with_capacity(origin_tokens.len());
        for token in origin_tokens {
            let (synth, category) = generator.generate(rng, token.as_ref());
            synthesized_tokens.push(synth);
            word_error_labels.push(category.code());
        }

        TrainingExample {
            success: true,
            original_tokens: origin_tokens
                .iter()
                .map(|t| t.as_ref().to_string())
                .collect(),
            synthesized_tokens,
            word_error_labels,
        }
    }
}
