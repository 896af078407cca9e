//! Strict AES-GCM primitives.
//!
//! This module is intentionally free of I/O. [`engine`] wraps the RustCrypto
//! cipher; [`strict`] layers the tag-length policy on top of it.
//!
//! # Tag policy
//!
//! ```text
//! encrypt: tag_out.len() == 16  else InvalidTagLength, nothing written
//! decrypt: tag.len()     == 16  else InvalidTagLength, nothing verified
//! ```

pub mod engine;
pub mod strict;

pub use engine::{AesGcmEngine, GcmEngine, KEY_BYTE_SIZES, NONCE_BYTE_SIZES};
pub use strict::{StrictAead, TAG_BYTE_SIZES};
