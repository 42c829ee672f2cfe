use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::crypto::{KeyPair, PublicKey};

/// Opaque, stable participant identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One side of a conversation.
///
/// Key material lives behind a single shared handle: readers clone the
/// handle and keep a consistent snapshot, writers swap the handle whole.
#[derive(Debug)]
pub struct Participant {
    id: ParticipantId,
    display_name: String,
    keys: RwLock<Option<Arc<KeyPair>>>,
}

impl Participant {
    /// Create a participant with no keys
    pub fn new(id: impl Into<ParticipantId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            keys: RwLock::new(None),
        }
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Snapshot of the current key pair
    pub fn key_pair(&self) -> Option<Arc<KeyPair>> {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_keys(&self) -> bool {
        self.key_pair().is_some()
    }

    pub fn public_key(&self) -> Option<PublicKey> {
        self.key_pair().map(|pair| pair.public_key().clone())
    }

    /// Exported fingerprint of the current public key
    pub fn fingerprint(&self) -> Option<String> {
        self.key_pair().map(|pair| pair.fingerprint().to_owned())
    }

    /// Swap in a new key pair. Returns whether a previous pair was replaced.
    pub(crate) fn replace_keys(&self, key_pair: KeyPair) -> bool {
        let next = Arc::new(key_pair);
        // The slot only ever holds a complete pair, so a poisoned lock is safe to reuse.
        let mut slot = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        slot.replace(next).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_new_participant_has_no_keys() {
        let alice = Participant::new("A", "Alice");

        assert_eq!(alice.id().as_str(), "A");
        assert_eq!(alice.display_name(), "Alice");
        assert!(!alice.has_keys());
        assert!(alice.public_key().is_none());
        assert!(alice.fingerprint().is_none());
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let bob = Participant::new("B", "Bob");
        assert!(!bob.replace_keys(testing::key_pair(0)));

        let snapshot = bob.key_pair().unwrap();
        assert!(bob.replace_keys(testing::key_pair(1)));

        // The old snapshot is untouched; the participant now reports the new pair.
        assert_eq!(snapshot.public_key(), testing::key_pair(0).public_key());
        assert_eq!(bob.public_key().as_ref(), Some(testing::key_pair(1).public_key()));
    }

    #[test]
    fn test_concurrent_readers_see_whole_pairs() {
        let bob = Arc::new(Participant::new("B", "Bob"));
        let pairs = [testing::key_pair(0), testing::key_pair(1)];
        bob.replace_keys(pairs[0].clone());

        let reader = {
            let bob = Arc::clone(&bob);
            let pairs = pairs.clone();
            std::thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = bob.key_pair().unwrap();
                    let matched = pairs.iter().any(|pair| {
                        pair.public_key() == snapshot.public_key()
                            && pair.fingerprint() == snapshot.fingerprint()
                    });
                    assert!(matched);
                }
            })
        };

        for i in 0..500 {
            bob.replace_keys(pairs[i % 2].clone());
        }
        reader.join().unwrap();
    }

    #[test]
    fn test_participant_id_serializes_transparently() {
        let id = ParticipantId::from("A");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"A\"");
        assert_eq!(id.to_string(), "A");
    }
}
