//! RSA-OAEP message codec.
//!
//! Every payload is a single OAEP block (SHA-256 for both the label hash and
//! MGF1). There is no chunking and no hybrid mode: a plaintext that does not
//! fit in one block is rejected.

use base64::{engine::general_purpose, Engine as _};
use rand::rngs::OsRng;
use rsa::{traits::PublicKeyParts, Oaep};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use std::borrow::Cow;
use std::fmt;

use super::keys::{PrivateKey, PublicKey};
use crate::error::{ChatError, ChatResult};

/// Output size of the OAEP hash (SHA-256)
pub const OAEP_HASH_LEN: usize = 32;

/// Largest plaintext one OAEP block can carry under `key`.
///
/// 190 bytes for a 2048-bit modulus.
pub fn max_plaintext_len(key: &PublicKey) -> usize {
    key.size().saturating_sub(2 * OAEP_HASH_LEN + 2)
}

/// Encrypt `plaintext` to the holder of `recipient`'s private key
pub fn encrypt(plaintext: &[u8], recipient: &PublicKey) -> ChatResult<Ciphertext> {
    let max = max_plaintext_len(recipient);
    if plaintext.len() > max {
        return Err(ChatError::PayloadTooLarge {
            len: plaintext.len(),
            max,
        });
    }

    let mut rng = OsRng;
    let bytes = recipient
        .as_rsa()
        .encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext)
        .map_err(|e| ChatError::Encryption(e.to_string()))?;

    Ok(Ciphertext(bytes))
}

/// Decrypt a ciphertext with `key`.
///
/// All failures collapse into [`ChatError::Decryption`]. A block of the wrong
/// length still goes through a full blinded private-key operation so it costs
/// the same as a padding failure.
pub fn decrypt(ciphertext: &Ciphertext, key: &PrivateKey) -> ChatResult<Vec<u8>> {
    let rsa_key = key.as_rsa();
    let size = rsa_key.size();

    let well_formed = ciphertext.len() == size;
    let block: Cow<'_, [u8]> = if well_formed {
        Cow::Borrowed(ciphertext.as_bytes())
    } else {
        Cow::Owned(vec![0u8; size])
    };

    let mut rng = OsRng;
    match rsa_key.decrypt_blinded(&mut rng, Oaep::new::<Sha256>(), &block) {
        Ok(plaintext) if well_formed => Ok(plaintext),
        _ => Err(ChatError::Decryption),
    }
}

/// Opaque RSA-OAEP output.
///
/// Travels as standard padded base64; see [`Ciphertext::to_base64`].
#[derive(Clone, PartialEq, Eq)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Wire form of the ciphertext
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.0)
    }

    /// Parse the wire form. Malformed input is reported exactly like a failed
    /// decryption.
    pub fn from_base64(encoded: &str) -> ChatResult<Self> {
        general_purpose::STANDARD
            .decode(encoded)
            .map(Self)
            .map_err(|_| ChatError::Decryption)
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({} bytes)", self.0.len())
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl Serialize for Ciphertext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Ciphertext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(|_| de::Error::custom("invalid base64 ciphertext"))
    }
}
