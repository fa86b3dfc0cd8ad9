//! # Noise Synthesis
//!
//! Linguistically motivated spelling-error generation for Vietnamese text.
//!
//! * [`tables`] - static diacritic and tone tables.
//! * [`TypoGenerator`] - corrupts one token, reporting an [`ErrorCategory`].
//! * [`Synthesizer`] - corrupts a sentence into a [`TrainingExample`].

pub mod accents;
pub mod error_category;
pub mod synthesizer;
pub mod tables;
pub mod typo_generator;

#[doc(inline)]
pub use error_category::ErrorCategory;
#[doc(inline)]
pub use synthesizer::{Synthesizer, TrainingExample};
#[doc(inline)]
pub use typo_generator::{TypoGenerator, TypoOptions, TypoOutcome};
