//! Opaque session tokens sealed with AES-256-GCM.
//!
//! Token text is `v1.local.` followed by the unpadded URL-safe base64 of
//! `nonce || ciphertext || tag`. The header is authenticated as associated
//! data, so a token cannot be replayed under a different header. Every seal
//! draws a fresh 96-bit nonce from the OS RNG: sealing the same payload twice
//! never yields the same token.

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

/// Version/purpose header prepended to every token.
pub const TOKEN_HEADER: &str = "v1.local.";

/// Symmetric key length in bytes.
pub const KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Failures while building the codec or handling a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid token key: {0}")]
    InvalidKey(String),

    /// Authentication failed, or the payload is not a well-formed claim.
    #[error("Invalid token")]
    Invalid,

    #[error("Token has expired")]
    Expired,

    #[error("Token could not be sealed: {0}")]
    Seal(String),
}

/// Server-held symmetric key.
#[derive(Clone)]
pub struct TokenKey([u8; KEY_LEN]);

impl TokenKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Decode a standard-alphabet base64 key. It must decode to exactly
    /// [`KEY_LEN`] bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, TokenError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        let len = bytes.len();
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            TokenError::InvalidKey(format!("expected {KEY_LEN} bytes, got {len}"))
        })?;
        Ok(Self(key))
    }
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenKey(<redacted>)")
    }
}

/// Seals and opens token payloads under one key.
pub struct TokenCodec {
    cipher: Aes256Gcm,
}

impl TokenCodec {
    pub fn new(key: &TokenKey) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(&key.0);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypt and authenticate `payload`, returning the token text.
    pub fn seal(&self, payload: &[u8]) -> Result<String, TokenError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: payload,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|e| TokenError::Seal(e.to_string()))?;

        let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);

        Ok(format!("{TOKEN_HEADER}{}", URL_SAFE_NO_PAD.encode(raw)))
    }

    /// Authenticate and decrypt token text, returning the payload.
    ///
    /// Every failure (wrong header, bad base64, truncation, tampering, wrong
    /// key) is reported as [`TokenError::Invalid`].
    pub fn open(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        let body = token
            .strip_prefix(TOKEN_HEADER)
            .ok_or(TokenError::Invalid)?;
        let raw = URL_SAFE_NO_PAD
            .decode(body)
            .map_err(|_| TokenError::Invalid)?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(TokenError::Invalid);
        }

        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        self.cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|_| TokenError::Invalid)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}
