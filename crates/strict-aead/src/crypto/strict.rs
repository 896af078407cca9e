//! [`StrictAead`]: AES-GCM that only accepts full 16-byte tags.
//!
//! General-purpose AES-GCM APIs often accept tags shorter than 16 bytes, since
//! GCM permits truncation. A tag cut down to 12 bytes verifies against a
//! truncated comparison and shrinks the forgery search space. [`StrictAead`]
//! rejects any tag buffer that is not exactly [`TAG_LEN`] bytes, on both the
//! encrypt and decrypt paths, before the cipher is touched. Everything else is
//! passed through to the engine unchanged.
//!
//! # Thread safety
//!
//! The engine is immutable after key expansion and `encrypt`/`decrypt` take
//! `&self`, so one instance may be shared across threads. [`StrictAead::dispose`]
//! takes `&mut self` and therefore cannot race an in-flight call.

use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

use common::{AeadError, CapabilityReport, KeySizes, TAG_LEN};

use super::engine::{AesGcmEngine, GcmEngine, KEY_BYTE_SIZES, NONCE_BYTE_SIZES};
use crate::platform;

/// Legal tag lengths: exactly one.
pub const TAG_BYTE_SIZES: KeySizes = KeySizes::fixed(TAG_LEN);

/// AES-GCM with a mandatory 16-byte authentication tag.
///
/// One instance per key. Reusable across any number of calls, each with a
/// fresh nonce; nonce uniqueness is the caller's responsibility.
///
/// The instance is either active or disposed. Disposal drops the engine, which
/// zeroizes the expanded key, and is idempotent. Dropping the instance disposes
/// it. Every operation after disposal returns [`AeadError::UseAfterDispose`].
pub struct StrictAead {
    engine: Option<Box<dyn GcmEngine>>,
}

impl StrictAead {
    /// Create a context bound to `key`.
    ///
    /// The key is expanded straight into the cipher's key schedule; no other
    /// copy is retained.
    ///
    /// # Errors
    ///
    /// Returns [`AeadError::NullArgument`] if `key` is empty and
    /// [`AeadError::InvalidKey`] if it is not 16, 24 or 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, AeadError> {
        if key.is_empty() {
            return Err(AeadError::NullArgument { name: "key" });
        }
        let engine = AesGcmEngine::new(key)?;
        debug!(key_bits = engine.key_bits(), "strict AES-GCM context initialised");
        Ok(Self::with_engine(Box::new(engine)))
    }

    pub(crate) fn with_engine(engine: Box<dyn GcmEngine>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// Legal key lengths (16, 24 and 32 bytes).
    pub fn key_byte_sizes() -> KeySizes {
        KEY_BYTE_SIZES
    }

    /// Legal nonce lengths, exactly as the underlying cipher reports them.
    pub fn nonce_byte_sizes() -> KeySizes {
        NONCE_BYTE_SIZES
    }

    /// Legal tag lengths. Always `{16, 16, 1}`.
    pub fn tag_byte_sizes() -> KeySizes {
        TAG_BYTE_SIZES
    }

    /// Whether AES-GCM is usable on this platform.
    pub fn is_supported() -> bool {
        platform::is_supported()
    }

    /// Everything above bundled into one serialisable report.
    pub fn capabilities() -> CapabilityReport {
        CapabilityReport {
            supported: platform::is_supported(),
            hardware_accelerated: platform::is_hardware_accelerated(),
            key_sizes: KEY_BYTE_SIZES,
            nonce_sizes: NONCE_BYTE_SIZES,
            tag_sizes: TAG_BYTE_SIZES,
        }
    }

    /// Encrypt `plaintext` into `ciphertext` and write the tag into `tag`.
    ///
    /// `ciphertext` must be exactly as long as `plaintext` and `tag` exactly
    /// [`TAG_LEN`] bytes. `associated_data` is authenticated but not encrypted;
    /// `None` and `Some(&[])` produce the same tag.
    ///
    /// # Errors
    ///
    /// - [`AeadError::UseAfterDispose`] after [`dispose`](Self::dispose).
    /// - [`AeadError::InvalidTagLength`] if `tag` is not [`TAG_LEN`] bytes. No
    ///   output buffer is written.
    /// - [`AeadError::InvalidArgument`] on a length mismatch or a bad nonce.
    /// - [`AeadError::CryptographicOperation`] if the cipher fails.
    ///
    /// On any error after the tag check both output buffers are zeroed.
    pub fn encrypt(
        &self,
        nonce: &[u8],
        plaintext: &[u8],
        ciphertext: &mut [u8],
        tag: &mut [u8],
        associated_data: Option<&[u8]>,
    ) -> Result<(), AeadError> {
        let engine = self.engine()?;
        check_tag_len(tag.len())?;
        check_same_len("ciphertext", plaintext.len(), ciphertext.len())?;

        ciphertext.copy_from_slice(plaintext);
        match engine.encrypt_detached(nonce, associated_data.unwrap_or_default(), ciphertext) {
            Ok(computed) => {
                tag.copy_from_slice(&computed);
                Ok(())
            }
            Err(e) => {
                ciphertext.zeroize();
                tag.zeroize();
                Err(e)
            }
        }
    }

    /// Verify `tag` and decrypt `ciphertext` into `plaintext`.
    ///
    /// `plaintext` must be exactly as long as `ciphertext` and `tag` exactly
    /// [`TAG_LEN`] bytes. A truncated tag is rejected before verification is
    /// attempted.
    ///
    /// # Errors
    ///
    /// - [`AeadError::UseAfterDispose`] after [`dispose`](Self::dispose).
    /// - [`AeadError::InvalidTagLength`] if `tag` is not [`TAG_LEN`] bytes.
    /// - [`AeadError::InvalidArgument`] on a length mismatch or a bad nonce.
    /// - [`AeadError::AuthenticationFailed`] if the tag does not verify.
    ///
    /// On any error after the tag check `plaintext` is zeroed.
    pub fn decrypt(
        &self,
        nonce: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        plaintext: &mut [u8],
        associated_data: Option<&[u8]>,
    ) -> Result<(), AeadError> {
        let engine = self.engine()?;
        let tag: &[u8; TAG_LEN] = tag
            .try_into()
            .map_err(|_| tag_len_error(tag.len()))?;
        check_same_len("plaintext", ciphertext.len(), plaintext.len())?;

        plaintext.copy_from_slice(ciphertext);
        let result =
            engine.decrypt_detached(nonce, associated_data.unwrap_or_default(), plaintext, tag);
        if let Err(e) = result {
            plaintext.zeroize();
            if e == AeadError::AuthenticationFailed {
                debug!(ciphertext_len = ciphertext.len(), "tag verification failed");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Allocating form of [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// Same as [`encrypt`](Self::encrypt), minus the output length checks.
    pub fn seal(
        &self,
        nonce: &[u8],
        plaintext: &[u8],
        associated_data: Option<&[u8]>,
    ) -> Result<(Vec<u8>, [u8; TAG_LEN]), AeadError> {
        let mut ciphertext = vec![0u8; plaintext.len()];
        let mut tag = [0u8; TAG_LEN];
        self.encrypt(nonce, plaintext, &mut ciphertext, &mut tag, associated_data)?;
        Ok((ciphertext, tag))
    }

    /// Allocating form of [`decrypt`](Self::decrypt).
    ///
    /// The plaintext is returned in a [`Zeroizing`] buffer that is wiped when
    /// dropped.
    ///
    /// # Errors
    ///
    /// Same as [`decrypt`](Self::decrypt).
    pub fn open(
        &self,
        nonce: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        associated_data: Option<&[u8]>,
    ) -> Result<Zeroizing<Vec<u8>>, AeadError> {
        let mut plaintext = Zeroizing::new(vec![0u8; ciphertext.len()]);
        self.decrypt(nonce, ciphertext, tag, &mut plaintext, associated_data)?;
        Ok(plaintext)
    }

    /// Release the cipher context and wipe the expanded key.
    ///
    /// Safe to call more than once; only the first call does anything.
    pub fn dispose(&mut self) {
        if let Some(engine) = self.engine.take() {
            drop(engine);
            debug!("strict AES-GCM context disposed");
        }
    }

    /// Returns `true` once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.engine.is_none()
    }

    fn engine(&self) -> Result<&dyn GcmEngine, AeadError> {
        self.engine.as_deref().ok_or(AeadError::UseAfterDispose)
    }
}

impl Drop for StrictAead {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for StrictAead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.debug_struct("StrictAead")
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

fn tag_len_error(got: usize) -> AeadError {
    warn!(tag_len = got, required = TAG_LEN, "rejected AES-GCM tag of invalid length");
    AeadError::InvalidTagLength { got }
}

fn check_tag_len(got: usize) -> Result<(), AeadError> {
    if TAG_BYTE_SIZES.contains(got) {
        Ok(())
    } else {
        Err(tag_len_error(got))
    }
}

fn check_same_len(name: &'static str, expected: usize, got: usize) -> Result<(), AeadError> {
    if expected == got {
        return Ok(());
    }
    Err(AeadError::InvalidArgument {
        name,
        reason: format!("expected {expected} bytes to match the input, got {got}"),
    })
}
