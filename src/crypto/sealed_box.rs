// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Anonymous public-key sealing, wire compatible with libsodium's
//! `crypto_box_seal`.
//!
//! ## Construction
//!
//! 1. A fresh X25519 key pair `(epk, esk)` is drawn from the OS entropy source.
//! 2. `nonce = BLAKE2b-192(epk ‖ recipient_pk)`.
//! 3. `ciphertext = crypto_box(plaintext, nonce, recipient_pk, esk)`, i.e.
//!    X25519 → HSalsa20 → XSalsa20-Poly1305 with the 16-byte tag first.
//! 4. Output is `epk ‖ ciphertext`.
//!
//! The ephemeral secret is consumed by the sealing call and zeroized on drop.
//! The nonce is never taken from the ephemeral key bytes directly: only the
//! hash binds it to both public keys, which is what every standard opener
//! recomputes.

use blake2::{digest::consts::U24, Blake2b, Digest};
use crypto_box::{
    aead::{generic_array::GenericArray, Aead},
    PublicKey, SalsaBox, SecretKey,
};
use zeroize::Zeroize;

use super::CryptoError;

/// X25519 key length in bytes.
pub const KEY_LEN: usize = 32;
/// Box nonce length in bytes.
pub const NONCE_LEN: usize = 24;
/// Poly1305 tag length in bytes.
pub const TAG_LEN: usize = 16;
/// Bytes a sealed message adds on top of the plaintext.
pub const SEAL_OVERHEAD: usize = KEY_LEN + TAG_LEN;

type Blake2b192 = Blake2b<U24>;

/// `ephemeral_public_key ‖ ciphertext`, as stored by the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage(Vec<u8>);

impl SealedMessage {
    /// The sender's single-use public key (first 32 bytes).
    pub fn ephemeral_public_key(&self) -> &[u8] {
        &self.0[..KEY_LEN]
    }

    /// Authenticated ciphertext (tag followed by the encrypted plaintext).
    pub fn ciphertext(&self) -> &[u8] {
        &self.0[KEY_LEN..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for SealedMessage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recipient X25519 key pair.
///
/// Only needed to open sealed messages, which this service never does outside
/// of tests and local tooling.
pub struct RecipientKeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl RecipientKeyPair {
    /// Generate a new random recipient key pair.
    pub fn generate() -> Result<Self, CryptoError> {
        let secret = random_secret_key()?;
        let public = secret.public_key();
        Ok(Self { secret, public })
    }

    /// Build a key pair from raw secret key bytes.
    pub fn from_secret_bytes(secret_bytes: &[u8]) -> Result<Self, CryptoError> {
        let mut bytes = key_array(secret_bytes)?;
        let secret = SecretKey::from(bytes);
        bytes.zeroize();
        let public = secret.public_key();
        Ok(Self { secret, public })
    }

    pub fn public_bytes(&self) -> [u8; KEY_LEN] {
        *self.public.as_bytes()
    }
}

impl std::fmt::Debug for RecipientKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipientKeyPair")
            .field("public", &hex::encode(self.public.as_bytes()))
            .finish_non_exhaustive()
    }
}

/// Seal `plaintext` to `recipient_public_key`.
///
/// Every call uses a new ephemeral key, so sealing the same plaintext twice
/// yields different messages that both open to the same value.
pub fn seal(plaintext: &[u8], recipient_public_key: &[u8]) -> Result<SealedMessage, CryptoError> {
    let recipient = PublicKey::from(key_array(recipient_public_key)?);
    let ephemeral = random_secret_key()?;
    seal_with_ephemeral(ephemeral, &recipient, plaintext)
}

/// Open a sealed message with the recipient's key pair.
///
/// Fails closed: a truncated message or any tag mismatch returns
/// [`CryptoError::AuthenticationFailure`] and no plaintext.
pub fn open(sealed: &[u8], recipient: &RecipientKeyPair) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < SEAL_OVERHEAD {
        return Err(CryptoError::AuthenticationFailure);
    }

    let (epk_bytes, ciphertext) = sealed.split_at(KEY_LEN);
    let epk_bytes = key_array(epk_bytes)?;
    let nonce = derive_nonce(&epk_bytes, recipient.public.as_bytes());
    let ephemeral_public = PublicKey::from(epk_bytes);

    SalsaBox::new(&ephemeral_public, &recipient.secret)
        .decrypt(GenericArray::from_slice(&nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailure)
}

/// Takes the ephemeral secret by value so it is dropped (and zeroized) here.
fn seal_with_ephemeral(
    ephemeral: SecretKey,
    recipient: &PublicKey,
    plaintext: &[u8],
) -> Result<SealedMessage, CryptoError> {
    let epk = ephemeral.public_key();
    let nonce = derive_nonce(epk.as_bytes(), recipient.as_bytes());

    let ciphertext = SalsaBox::new(recipient, &ephemeral)
        .encrypt(GenericArray::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::Encryption)?;

    let mut out = Vec::with_capacity(KEY_LEN + ciphertext.len());
    out.extend_from_slice(epk.as_bytes());
    out.extend_from_slice(&ciphertext);
    Ok(SealedMessage(out))
}

fn derive_nonce(ephemeral_pk: &[u8; KEY_LEN], recipient_pk: &[u8; KEY_LEN]) -> [u8; NONCE_LEN] {
    let mut hasher = Blake2b192::new();
    hasher.update(ephemeral_pk);
    hasher.update(recipient_pk);
    let digest = hasher.finalize();

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&digest);
    nonce
}

fn random_secret_key() -> Result<SecretKey, CryptoError> {
    let mut bytes = [0u8; KEY_LEN];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;
    let secret = SecretKey::from(bytes);
    bytes.zeroize();
    Ok(secret)
}

fn key_array(bytes: &[u8]) -> Result<[u8; KEY_LEN], CryptoError> {
    bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
        expected: KEY_LEN,
        actual: bytes.len(),
    })
}
