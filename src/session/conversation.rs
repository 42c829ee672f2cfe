use std::sync::Arc;
use tracing::{debug, info};

use super::visibility::{resolve, Disclosure};
use super::{Envelope, MessageStore, Participant, ParticipantId};
use crate::crypto::{self, KeyManager, KeyPair};
use crate::error::{ChatError, ChatResult};

/// A two-party conversation: both participants, their current keys and the
/// shared envelope log.
///
/// Every read takes the viewer explicitly; the conversation has no notion of
/// an active user.
#[derive(Debug)]
pub struct Conversation {
    participants: [Participant; 2],
    store: MessageStore,
}

impl Conversation {
    pub fn new(first: Participant, second: Participant) -> ChatResult<Self> {
        let store = MessageStore::new(first.id().clone(), second.id().clone())?;
        Ok(Self {
            participants: [first, second],
            store,
        })
    }

    pub fn participants(&self) -> &[Participant; 2] {
        &self.participants
    }

    pub fn participant(&self, id: &ParticipantId) -> ChatResult<&Participant> {
        self.participants
            .iter()
            .find(|participant| participant.id() == id)
            .ok_or_else(|| ChatError::UnknownParticipant(id.clone()))
    }

    /// The other side of the conversation from `id`
    pub fn counterpart(&self, id: &ParticipantId) -> ChatResult<&Participant> {
        self.participant(id)?;
        self.participants
            .iter()
            .find(|participant| participant.id() != id)
            .ok_or_else(|| ChatError::UnknownParticipant(id.clone()))
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Generate and assign a fresh key pair, returning the new fingerprint
    pub fn generate_keys(&self, id: &ParticipantId) -> ChatResult<String> {
        let participant = self.participant(id)?;
        let key_pair = KeyManager::generate_key_pair()?;
        Ok(Self::install(participant, key_pair))
    }

    /// Like [`Conversation::generate_keys`], with generation run on the
    /// blocking worker pool.
    pub async fn generate_keys_offloaded(&self, id: &ParticipantId) -> ChatResult<String> {
        let participant = self.participant(id)?;
        let key_pair = tokio::task::spawn_blocking(KeyManager::generate_key_pair)
            .await
            .map_err(|e| ChatError::KeyGeneration(format!("Key generation worker failed: {}", e)))??;
        Ok(Self::install(participant, key_pair))
    }

    fn install(participant: &Participant, key_pair: KeyPair) -> String {
        let fingerprint = key_pair.fingerprint().to_owned();
        KeyManager::assign_keys(participant, key_pair);
        fingerprint
    }

    /// Encrypt `text` to the sender's counterpart and append it to the log.
    ///
    /// Both sides must hold keys before anything is sent.
    pub fn send(&self, sender: &ParticipantId, text: &str) -> ChatResult<Arc<Envelope>> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let from = self.participant(sender)?;
        let to = self.counterpart(sender)?;

        if !from.has_keys() {
            return Err(ChatError::KeysMissing(from.id().clone()));
        }
        let recipient_key = to
            .public_key()
            .ok_or_else(|| ChatError::KeysMissing(to.id().clone()))?;

        let ciphertext = crypto::encrypt(text.as_bytes(), &recipient_key)?;
        let envelope = self.store.append(from.id(), to.id(), ciphertext)?;

        info!(
            envelope = %envelope.id(),
            sender = %from.id(),
            receiver = %to.id(),
            "Message sent"
        );

        Ok(envelope)
    }

    pub fn list_for(&self, viewer: &ParticipantId) -> Vec<Arc<Envelope>> {
        self.store.list_for(viewer)
    }

    /// Every envelope `viewer` is party to, paired with what `viewer` may see of it.
    ///
    /// The viewer's keys are snapshotted once so the whole view is computed
    /// against one key pair.
    pub fn view(&self, viewer: &ParticipantId) -> ChatResult<Vec<(Arc<Envelope>, Disclosure)>> {
        let participant = self
            .participant(viewer)
            .map_err(|_| ChatError::UnauthorizedViewer(viewer.clone()))?;
        let keys = participant.key_pair();
        let private_key = keys.as_deref().map(KeyPair::private_key);

        let view = self
            .list_for(viewer)
            .into_iter()
            .map(|envelope| {
                let disclosure = resolve(&envelope, viewer, private_key)?;
                Ok((envelope, disclosure))
            })
            .collect::<ChatResult<Vec<_>>>()?;

        debug!(viewer = %viewer, envelopes = view.len(), "Resolved view");
        Ok(view)
    }
}
