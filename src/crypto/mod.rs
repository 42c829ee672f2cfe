//! Cryptography module for the secure chat core
//!
//! This module provides:
//! - Key management (RSA-2048 key pairs, SPKI fingerprints, atomic assignment)
//! - Message codec (RSA-OAEP/SHA-256 single-block encryption, base64 wire form)

mod codec;
mod keys;

pub use codec::{decrypt, encrypt, max_plaintext_len, Ciphertext, OAEP_HASH_LEN};
pub use keys::{KeyManager, KeyPair, PrivateKey, PublicKey, KEY_BITS};
