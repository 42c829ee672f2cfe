use base64::{engine::general_purpose, Engine as _};
use rand::rngs::OsRng;
use rsa::{
    pkcs8::{DecodePublicKey, EncodePublicKey},
    traits::PublicKeyParts,
    RsaPrivateKey, RsaPublicKey,
};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::{debug, info};

use crate::error::{ChatError, ChatResult};
use crate::session::Participant;

/// Modulus size for every key pair the core generates.
pub const KEY_BITS: usize = 2048;

/// Recipient half of a key pair. Only usable for encryption.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    /// Import a public key from its exported fingerprint (base64 SPKI DER).
    ///
    /// The key is accepted as-is; nothing vouches for who owns it.
    pub fn from_fingerprint(fingerprint: &str) -> ChatResult<Self> {
        let der = general_purpose::STANDARD.decode(fingerprint.trim())?;
        let key = RsaPublicKey::from_public_key_der(&der)?;
        Ok(Self(key))
    }

    /// Modulus size in bytes
    pub fn size(&self) -> usize {
        self.0.size()
    }

    pub(crate) fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(RSA-{})", self.0.n().bits())
    }
}

/// Holder half of a key pair. Only usable for decryption.
///
/// The wrapped RSA key zeroizes its secret components on drop.
#[derive(Clone)]
pub struct PrivateKey(RsaPrivateKey);

impl PrivateKey {
    pub(crate) fn as_rsa(&self) -> &RsaPrivateKey {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A participant's complete key material.
///
/// The exported fingerprint is computed once at generation and travels with
/// the pair, so the three can never disagree.
#[derive(Debug, Clone)]
pub struct KeyPair {
    public_key: PublicKey,
    private_key: PrivateKey,
    fingerprint: String,
}

impl KeyPair {
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Base64 SPKI export of the public key
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Key lifecycle: generation, export and assignment.
pub struct KeyManager;

impl KeyManager {
    /// Generate a fresh RSA-2048 key pair (e = 65537) from the OS CSPRNG
    pub fn generate_key_pair() -> ChatResult<KeyPair> {
        let mut rng = OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, KEY_BITS)
            .map_err(|e| ChatError::KeyGeneration(e.to_string()))?;
        let public_key = PublicKey(RsaPublicKey::from(&private_key));
        let fingerprint = Self::export_fingerprint(&public_key)?;

        debug!(bits = KEY_BITS, "Generated RSA key pair");

        Ok(KeyPair {
            public_key,
            private_key: PrivateKey(private_key),
            fingerprint,
        })
    }

    /// Export a public key as base64 of its SubjectPublicKeyInfo DER encoding
    pub fn export_fingerprint(key: &PublicKey) -> ChatResult<String> {
        let der = key
            .as_rsa()
            .to_public_key_der()
            .map_err(|e| ChatError::KeyExport(e.to_string()))?;
        Ok(general_purpose::STANDARD.encode(der.as_bytes()))
    }

    /// Compact display form: first 8 bytes of SHA-256 over the SPKI DER,
    /// formatted as XXXX-XXXX-XXXX-XXXX
    pub fn short_fingerprint(key: &PublicKey) -> ChatResult<String> {
        let der = key
            .as_rsa()
            .to_public_key_der()
            .map_err(|e| ChatError::KeyExport(e.to_string()))?;
        let hash = Sha256::digest(der.as_bytes());

        let hex = hex::encode_upper(&hash[..8]);
        Ok(format!(
            "{}-{}-{}-{}",
            &hex[0..4],
            &hex[4..8],
            &hex[8..12],
            &hex[12..16]
        ))
    }

    /// Replace a participant's key pair in one swap.
    ///
    /// Envelopes encrypted to the previous public key become permanently
    /// undecryptable; no key history is kept.
    pub fn assign_keys(participant: &Participant, key_pair: KeyPair) {
        let short = Self::short_fingerprint(key_pair.public_key()).ok();
        let replaced = participant.replace_keys(key_pair);

        info!(
            participant = %participant.id(),
            fingerprint = short.as_deref().unwrap_or("-"),
            replaced,
            "Assigned key pair"
        );
    }
}
