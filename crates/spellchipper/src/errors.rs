//! # Error Types

use std::path::PathBuf;

/// Errors from spellchipper operations.
#[derive(Debug, thiserror::Error)]
pub enum SpellchipperError {
    /// An option value is out of its valid range.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption {
        /// The option name.
        name: &'static str,

        /// Why the value was rejected.
        reason: String,
    },

    /// The corpus directory, its `stats.json`, or its shard files are missing.
    #[error("missing corpus data: {}", .path.display())]
    MissingCorpus {
        /// The path that could not be found.
        path: PathBuf,
    },

    /// The corpus statistics disagree with the shards on disk.
    #[error("corpus mismatch: {0}")]
    CorpusMismatch(String),

    /// No usable line was found within the retry budget.
    #[error("no usable corpus line after {attempts} attempts")]
    NoUsableLine {
        /// The number of lines drawn.
        attempts: usize,
    },

    /// Vocabulary data is inconsistent or unsupported.
    #[error("vocab error: {0}")]
    Vocab(String),

    /// A batch encoding has rows of differing lengths.
    #[error("ragged batch: row {row} has length {len}, expected {expected}")]
    RaggedBatch {
        /// The offending row.
        row: usize,

        /// The row length.
        len: usize,

        /// The expected length.
        expected: usize,
    },

    /// A batch with no examples was submitted.
    #[error("empty batch")]
    EmptyBatch,

    /// The word ids, correction labels and detection labels disagree in shape.
    #[error("[ERROR] {word:?} {correction:?} {detection:?}")]
    ShapeMismatch {
        /// Shape of the synthesized word-id tensor.
        word: (usize, usize),

        /// Shape of the correction-label tensor.
        correction: (usize, usize),

        /// Shape of the detection-label tensor.
        detection: (usize, usize),
    },

    /// The char tensor row count is not `batch_size * word_seq_len`.
    #[error("char rows ({rows}) != batch_size ({batch_size}) * word_seq_len ({word_seq_len})")]
    CharRowMismatch {
        /// Char tensor row count.
        rows: usize,

        /// The batch size.
        batch_size: usize,

        /// The word sequence length.
        word_seq_len: usize,
    },

    /// An example's original tokens, synthesized tokens and labels differ in length.
    #[error("unaligned example: {original} original, {synthesized} synthesized, {labels} labels")]
    UnalignedExample {
        /// Original token count.
        original: usize,

        /// Synthesized token count.
        synthesized: usize,

        /// Label count.
        labels: usize,
    },

    /// A mask or segment tensor does not match its id tensor.
    #[error("{name} has shape {shape:?}, expected {expected:?}")]
    TensorShape {
        /// The tensor name.
        name: &'static str,

        /// The actual shape.
        shape: (usize, usize),

        /// The shape of the matching id tensor.
        expected: (usize, usize),
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Error from an external component.
    #[error("{0}")]
    External(String),
}

/// Result type for spellchipper operations.
pub type SCResult<T> = core::result::Result<T, SpellchipperError>;
