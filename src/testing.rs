//! Shared key material for unit tests.

use std::sync::OnceLock;

use crate::crypto::{KeyManager, KeyPair};

static KEY_PAIRS: OnceLock<Vec<KeyPair>> = OnceLock::new();

/// One of three fixed, independently generated key pairs
pub fn key_pair(index: usize) -> KeyPair {
    KEY_PAIRS.get_or_init(|| {
        (0..3)
            .map(|_| KeyManager::generate_key_pair().unwrap())
            .collect()
    })[index]
        .clone()
}
