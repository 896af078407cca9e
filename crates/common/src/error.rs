//! Error taxonomy shared across crates.

use thiserror::Error;

use crate::sizes::TAG_LEN;

/// Every failure a strict AEAD operation can report.
///
/// Variants never carry key, nonce, plaintext or tag bytes; only lengths and
/// argument names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AeadError {
    /// A required input was empty.
    #[error("argument `{name}` must not be empty")]
    NullArgument { name: &'static str },

    /// The key length is not an AES key size.
    #[error("invalid key length: {got} bytes is not a supported AES key size")]
    InvalidKey { got: usize },

    /// The tag buffer (input or output) is not exactly [`TAG_LEN`] bytes.
    #[error("the specified tag is not a valid size for this algorithm (must be {TAG_LEN} bytes, got {got})")]
    InvalidTagLength { got: usize },

    /// Any other length or size mismatch reported by the cipher.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The tag did not verify. The plaintext output has been cleared.
    #[error("the computed authentication tag did not match the input authentication tag")]
    AuthenticationFailed,

    /// The cipher failed internally.
    #[error("cryptographic operation failed")]
    CryptographicOperation,

    /// The instance was disposed before this call.
    #[error("cipher context has been disposed")]
    UseAfterDispose,
}

impl AeadError {
    /// Short machine-readable code for this error, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            AeadError::NullArgument { .. } => "null_argument",
            AeadError::InvalidKey { .. } => "invalid_key",
            AeadError::InvalidTagLength { .. } => "invalid_tag_length",
            AeadError::InvalidArgument { .. } => "invalid_argument",
            AeadError::AuthenticationFailed => "authentication_failed",
            AeadError::CryptographicOperation => "cryptographic_operation",
            AeadError::UseAfterDispose => "use_after_dispose",
        }
    }

    /// Returns `true` when the error is a programming mistake by the caller
    /// rather than an expected rejection or an internal fault.
    pub fn is_caller_error(&self) -> bool {
        !matches!(
            self,
            AeadError::AuthenticationFailed | AeadError::CryptographicOperation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let all = [
            AeadError::NullArgument { name: "key" },
            AeadError::InvalidKey { got: 7 },
            AeadError::InvalidTagLength { got: 12 },
            AeadError::InvalidArgument {
                name: "nonce",
                reason: "x".into(),
            },
            AeadError::AuthenticationFailed,
            AeadError::CryptographicOperation,
            AeadError::UseAfterDispose,
        ];
        let mut codes: Vec<_> = all.iter().map(AeadError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn tag_length_message_names_required_size() {
        let e = AeadError::InvalidTagLength { got: 12 };
        let msg = e.to_string();
        assert!(msg.contains("must be 16 bytes"));
        assert!(msg.contains("got 12"));
    }

    #[test]
    fn display_includes_argument_name() {
        let e = AeadError::InvalidArgument {
            name: "ciphertext",
            reason: "length must match plaintext".into(),
        };
        assert!(e.to_string().contains("ciphertext"));
    }

    #[test]
    fn authentication_failure_is_not_a_caller_error() {
        assert!(!AeadError::AuthenticationFailed.is_caller_error());
        assert!(!AeadError::CryptographicOperation.is_caller_error());
        assert!(AeadError::InvalidTagLength { got: 4 }.is_caller_error());
        assert!(AeadError::UseAfterDispose.is_caller_error());
    }
}
