//! The AES-GCM engine behind [`StrictAead`](super::StrictAead).
//!
//! [`GcmEngine`] is the seam between tag-length policy and the cipher itself.
//! [`AesGcmEngine`] implements it on top of the RustCrypto `aes-gcm` crate with
//! `aes` and `polyval` built with their `zeroize` features, so the AES round
//! keys and the GHASH key are wiped when the engine is dropped.
//!
//! The engine works on detached tags and in-place buffers. It validates nonce,
//! message and associated-data lengths itself because the typed `aes-gcm` API
//! panics on a mis-sized nonce slice.

use aes_gcm::aead::consts::{U12, U16};
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};

use aes::Aes192;
use common::{AeadError, KeySizes, NONCE_LEN, TAG_LEN};

/// Legal AES key lengths: 128, 192 and 256 bits.
pub const KEY_BYTE_SIZES: KeySizes = KeySizes::new(16, 32, 8);

/// Legal nonce lengths for the underlying cipher.
pub const NONCE_BYTE_SIZES: KeySizes = KeySizes::fixed(NONCE_LEN);

/// Largest plaintext or ciphertext GCM can process under one nonce.
const MAX_MESSAGE_LEN: u64 = 1 << 36;

/// Largest associated data GCM can authenticate.
const MAX_AAD_LEN: u64 = 1 << 36;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Detached-tag AEAD operations on caller-owned buffers.
///
/// Implementations must leave tag length policy to the caller: tags reaching
/// the engine are already exactly [`TAG_LEN`] bytes.
#[cfg_attr(test, mockall::automock)]
pub trait GcmEngine: Send + Sync {
    /// Encrypt `buffer` in place and return the authentication tag.
    fn encrypt_detached(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Result<[u8; TAG_LEN], AeadError>;

    /// Verify `tag` and decrypt `buffer` in place.
    ///
    /// On [`AeadError::AuthenticationFailed`] the buffer contents are
    /// unspecified; the caller is responsible for clearing them.
    fn decrypt_detached(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &[u8; TAG_LEN],
    ) -> Result<(), AeadError>;
}

/// AES-GCM keyed with a 128, 192 or 256-bit key.
pub enum AesGcmEngine {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl AesGcmEngine {
    /// Expand `key` into an AES-GCM context.
    ///
    /// # Errors
    ///
    /// Returns [`AeadError::InvalidKey`] if `key` is not 16, 24 or 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, AeadError> {
        let invalid = || AeadError::InvalidKey { got: key.len() };
        let engine = match key.len() {
            16 => Self::Aes128(Aes128Gcm::new_from_slice(key).map_err(|_| invalid())?),
            24 => Self::Aes192(Aes192Gcm::new_from_slice(key).map_err(|_| invalid())?),
            32 => Self::Aes256(Aes256Gcm::new_from_slice(key).map_err(|_| invalid())?),
            _ => return Err(invalid()),
        };
        Ok(engine)
    }

    /// Key size in bits. Safe to log.
    pub fn key_bits(&self) -> usize {
        match self {
            Self::Aes128(_) => 128,
            Self::Aes192(_) => 192,
            Self::Aes256(_) => 256,
        }
    }
}

impl std::fmt::Debug for AesGcmEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AesGcmEngine(AES-{}, [REDACTED])", self.key_bits())
    }
}

impl GcmEngine for AesGcmEngine {
    fn encrypt_detached(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Result<[u8; TAG_LEN], AeadError> {
        match self {
            Self::Aes128(c) => seal(c, nonce, associated_data, buffer),
            Self::Aes192(c) => seal(c, nonce, associated_data, buffer),
            Self::Aes256(c) => seal(c, nonce, associated_data, buffer),
        }
    }

    fn decrypt_detached(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &[u8; TAG_LEN],
    ) -> Result<(), AeadError> {
        match self {
            Self::Aes128(c) => open(c, nonce, associated_data, buffer, tag),
            Self::Aes192(c) => open(c, nonce, associated_data, buffer, tag),
            Self::Aes256(c) => open(c, nonce, associated_data, buffer, tag),
        }
    }
}

fn seal<C>(
    cipher: &C,
    nonce: &[u8],
    associated_data: &[u8],
    buffer: &mut [u8],
) -> Result<[u8; TAG_LEN], AeadError>
where
    C: AeadInPlace<NonceSize = U12, TagSize = U16>,
{
    check_inputs(nonce, associated_data, "plaintext", buffer.len())?;
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(nonce), associated_data, buffer)
        .map_err(|_| AeadError::CryptographicOperation)?;

    let mut out = [0u8; TAG_LEN];
    out.copy_from_slice(&tag);
    Ok(out)
}

fn open<C>(
    cipher: &C,
    nonce: &[u8],
    associated_data: &[u8],
    buffer: &mut [u8],
    tag: &[u8; TAG_LEN],
) -> Result<(), AeadError>
where
    C: AeadInPlace<NonceSize = U12, TagSize = U16>,
{
    check_inputs(nonce, associated_data, "ciphertext", buffer.len())?;
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(nonce),
            associated_data,
            buffer,
            GenericArray::from_slice(tag),
        )
        .map_err(|_| AeadError::AuthenticationFailed)
}

fn check_inputs(
    nonce: &[u8],
    associated_data: &[u8],
    message_name: &'static str,
    message_len: usize,
) -> Result<(), AeadError> {
    if !NONCE_BYTE_SIZES.contains(nonce.len()) {
        return Err(AeadError::InvalidArgument {
            name: "nonce",
            reason: format!("expected {NONCE_LEN} bytes, got {}", nonce.len()),
        });
    }
    if message_len as u64 > MAX_MESSAGE_LEN {
        return Err(AeadError::InvalidArgument {
            name: message_name,
            reason: "message exceeds the GCM length limit".into(),
        });
    }
    if associated_data.len() as u64 > MAX_AAD_LEN {
        return Err(AeadError::InvalidArgument {
            name: "associated_data",
            reason: "associated data exceeds the GCM length limit".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unhex(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    /// Encrypt `plaintext` under an all-zero key and nonce.
    fn zero_vector(key_len: usize, plaintext: &[u8]) -> (Vec<u8>, [u8; TAG_LEN]) {
        let engine = AesGcmEngine::new(&vec![0u8; key_len]).unwrap();
        let mut buf = plaintext.to_vec();
        let tag = engine
            .encrypt_detached(&[0u8; NONCE_LEN], &[], &mut buf)
            .unwrap();
        (buf, tag)
    }

    // Known-answer vectors from the GCM specification (test cases 1, 2, 7, 8,
    // 13 and 14): zero key, zero 96-bit IV, no AAD.

    #[test]
    fn aes128_known_answer() {
        let (_, tag) = zero_vector(16, b"");
        assert_eq!(tag.to_vec(), unhex("58e2fccefa7e3061367f1d57a4e7455a"));

        let (ct, tag) = zero_vector(16, &[0u8; 16]);
        assert_eq!(ct, unhex("0388dace60b6a392f328c2b971b2fe78"));
        assert_eq!(tag.to_vec(), unhex("ab6e47d42cec13bdf53a67b21257bddf"));
    }

    #[test]
    fn aes192_known_answer() {
        let (_, tag) = zero_vector(24, b"");
        assert_eq!(tag.to_vec(), unhex("cd33b28ac773f74ba00ed1f312572435"));

        let (ct, tag) = zero_vector(24, &[0u8; 16]);
        assert_eq!(ct, unhex("98e7247c07f0fe411c267e4384b0f600"));
        assert_eq!(tag.to_vec(), unhex("2ff58d80033927ab8ef4d4587514f0fb"));
    }

    #[test]
    fn aes256_known_answer() {
        let (_, tag) = zero_vector(32, b"");
        assert_eq!(tag.to_vec(), unhex("530f8afbc74536b9a963b4f1c4cb738b"));

        let (ct, tag) = zero_vector(32, &[0u8; 16]);
        assert_eq!(ct, unhex("cea7403d4d606b6e074ec5d3baf39d18"));
        assert_eq!(tag.to_vec(), unhex("d0d1c8a799996bf0265b98b5d48ab919"));
    }

    #[test]
    fn key_bits_follow_key_length() {
        assert_eq!(AesGcmEngine::new(&[1u8; 16]).unwrap().key_bits(), 128);
        assert_eq!(AesGcmEngine::new(&[1u8; 24]).unwrap().key_bits(), 192);
        assert_eq!(AesGcmEngine::new(&[1u8; 32]).unwrap().key_bits(), 256);
    }

    #[test]
    fn rejects_non_aes_key_lengths() {
        for len in [1, 8, 15, 17, 20, 31, 33, 64] {
            let err = AesGcmEngine::new(&vec![0u8; len]).unwrap_err();
            assert_eq!(err, AeadError::InvalidKey { got: len });
        }
    }

    #[test]
    fn rejects_wrong_nonce_length_without_panicking() {
        let engine = AesGcmEngine::new(&[7u8; 32]).unwrap();
        let mut buf = b"data".to_vec();
        for len in [0, 8, 11, 13, 16] {
            let err = engine
                .encrypt_detached(&vec![0u8; len], &[], &mut buf)
                .unwrap_err();
            assert!(matches!(err, AeadError::InvalidArgument { name: "nonce", .. }));
        }
        assert_eq!(buf, b"data");
    }

    #[test]
    fn decrypt_detects_tampering() {
        let engine = AesGcmEngine::new(&[7u8; 16]).unwrap();
        let nonce = [3u8; NONCE_LEN];
        let mut buf = b"attack at dawn".to_vec();
        let mut tag = engine.encrypt_detached(&nonce, b"hdr", &mut buf).unwrap();
        tag[0] ^= 0x01;
        let err = engine
            .decrypt_detached(&nonce, b"hdr", &mut buf, &tag)
            .unwrap_err();
        assert_eq!(err, AeadError::AuthenticationFailed);
    }

    fn assert_wiped_on_drop<T: zeroize::ZeroizeOnDrop>() {}

    #[test]
    fn round_keys_are_wiped_on_drop() {
        assert_wiped_on_drop::<aes::Aes128>();
        assert_wiped_on_drop::<aes::Aes192>();
        assert_wiped_on_drop::<aes::Aes256>();
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversize_message_names_the_input() {
        let too_long = (MAX_MESSAGE_LEN + 1) as usize;
        let nonce = [0u8; NONCE_LEN];

        let err = check_inputs(&nonce, &[], "ciphertext", too_long).unwrap_err();
        assert!(matches!(err, AeadError::InvalidArgument { name: "ciphertext", .. }));

        let err = check_inputs(&nonce, &[], "plaintext", too_long).unwrap_err();
        assert!(matches!(err, AeadError::InvalidArgument { name: "plaintext", .. }));

        assert!(check_inputs(&nonce, &[], "plaintext", MAX_MESSAGE_LEN as usize).is_ok());
    }

    #[test]
    fn debug_redacts_key() {
        let engine = AesGcmEngine::new(&[0xABu8; 32]).unwrap();
        let s = format!("{engine:?}");
        assert!(s.contains("REDACTED"));
        assert!(s.contains("AES-256"));
        assert!(!s.to_lowercase().contains("abab"));
    }
}
