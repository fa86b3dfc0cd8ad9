//! # Corpus
//!
//! Sharded sentence corpora and the sample provider drawing from them.

pub mod corpus_stats;
pub mod line_cleaner;
pub mod sample_provider;

#[doc(inline)]
pub use corpus_stats::CorpusStats;
#[doc(inline)]
pub use line_cleaner::LineCleaner;
#[doc(inline)]
pub use sample_provider::{SampleProvider, SampleProviderOptions};
