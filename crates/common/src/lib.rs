//! Error taxonomy and size metadata shared across `strict-aead` crates.

pub mod error;
pub mod sizes;

pub use error::AeadError;
pub use sizes::{CapabilityReport, KeySizes, NONCE_LEN, TAG_LEN};
