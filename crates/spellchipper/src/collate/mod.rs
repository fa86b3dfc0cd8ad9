//! # Collation
//!
//! Turns batches of training examples into aligned word and char tensors.

pub mod batch_encoder;
pub mod encoded_batch;

#[doc(inline)]
pub use batch_encoder::{BatchEncoder, BatchEncoderOptions};
#[doc(inline)]
pub use encoded_batch::EncodedBatch;
