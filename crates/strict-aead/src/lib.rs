//! `strict-aead` — AES-GCM that refuses truncated authentication tags.
//!
//! [`StrictAead`] is a drop-in for a raw AES-GCM context with one difference:
//! every tag, on encrypt and on decrypt, must be exactly 16 bytes. Anything
//! else fails with [`AeadError::InvalidTagLength`] before the cipher runs.
//!
//! ```
//! use strict_aead::StrictAead;
//!
//! let aead = StrictAead::new(&[0u8; 32])?;
//! let nonce = [0u8; 12];
//! let (ciphertext, tag) = aead.seal(&nonce, b"hello", None)?;
//!
//! let plaintext = aead.open(&nonce, &ciphertext, &tag, None)?;
//! assert_eq!(plaintext.as_slice(), b"hello");
//!
//! // A tag truncated to 12 bytes is never verified.
//! assert!(aead.open(&nonce, &ciphertext, &tag[..12], None).is_err());
//! # Ok::<(), strict_aead::AeadError>(())
//! ```
//!
//! # Logging
//!
//! Events are emitted through `tracing`. No key, nonce, plaintext or tag bytes
//! appear in any field; the host application installs the subscriber.

pub mod crypto;
pub mod platform;

pub use common::{AeadError, CapabilityReport, KeySizes, NONCE_LEN, TAG_LEN};
pub use crypto::StrictAead;
