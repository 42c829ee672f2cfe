use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;
use uuid::Uuid;

use super::ParticipantId;
use crate::crypto::Ciphertext;
use crate::error::{ChatError, ChatResult};

/// One encrypted message, immutable once stored.
///
/// Sender and receiver always differ, including for envelopes read back
/// from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EnvelopeFields")]
pub struct Envelope {
    id: Uuid,
    sequence: u64,
    sender: ParticipantId,
    receiver: ParticipantId,
    ciphertext: Ciphertext,
    created_at: DateTime<Utc>,
}

/// Unchecked wire shape of an [`Envelope`]
#[derive(Deserialize)]
struct EnvelopeFields {
    id: Uuid,
    sequence: u64,
    sender: ParticipantId,
    receiver: ParticipantId,
    ciphertext: Ciphertext,
    created_at: DateTime<Utc>,
}

impl TryFrom<EnvelopeFields> for Envelope {
    type Error = ChatError;

    fn try_from(fields: EnvelopeFields) -> ChatResult<Self> {
        if fields.sender == fields.receiver {
            return Err(ChatError::SelfAddressed(fields.sender));
        }

        Ok(Self {
            id: fields.id,
            sequence: fields.sequence,
            sender: fields.sender,
            receiver: fields.receiver,
            ciphertext: fields.ciphertext,
            created_at: fields.created_at,
        })
    }
}

impl Envelope {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Position in the conversation log, starting at 0
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn sender(&self) -> &ParticipantId {
        &self.sender
    }

    pub fn receiver(&self) -> &ParticipantId {
        &self.receiver
    }

    pub fn ciphertext(&self) -> &Ciphertext {
        &self.ciphertext
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `id` sent or received this envelope
    pub fn involves(&self, id: &ParticipantId) -> bool {
        &self.sender == id || &self.receiver == id
    }

    /// Serialize the envelope to JSON, ciphertext in its base64 wire form
    pub fn to_json(&self) -> ChatResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize an envelope from JSON. Self-addressed envelopes are rejected.
    pub fn from_json(json: &str) -> ChatResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Default)]
struct Log {
    envelopes: Vec<Arc<Envelope>>,
    // id -> position in `envelopes`
    index: HashMap<Uuid, usize>,
}

/// Append-only log of the envelopes exchanged between two participants.
///
/// There is no update or delete path; history lasts as long as the store.
#[derive(Debug)]
pub struct MessageStore {
    participants: [ParticipantId; 2],
    log: RwLock<Log>,
}

impl MessageStore {
    pub fn new(first: ParticipantId, second: ParticipantId) -> ChatResult<Self> {
        if first == second {
            return Err(ChatError::SelfAddressed(first));
        }

        Ok(Self {
            participants: [first, second],
            log: RwLock::new(Log::default()),
        })
    }

    pub fn participants(&self) -> &[ParticipantId; 2] {
        &self.participants
    }

    pub fn is_participant(&self, id: &ParticipantId) -> bool {
        self.participants.contains(id)
    }

    /// Store a new envelope with a fresh id, the current time and the next
    /// sequence number.
    pub fn append(
        &self,
        sender: &ParticipantId,
        receiver: &ParticipantId,
        ciphertext: Ciphertext,
    ) -> ChatResult<Arc<Envelope>> {
        for id in [sender, receiver] {
            if !self.is_participant(id) {
                return Err(ChatError::UnknownParticipant(id.clone()));
            }
        }
        if sender == receiver {
            return Err(ChatError::SelfAddressed(sender.clone()));
        }

        // Readers see the log before or after the push, never in between.
        let mut log = self.log.write().unwrap_or_else(PoisonError::into_inner);

        let mut id = Uuid::new_v4();
        while log.index.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let position = log.envelopes.len();
        let envelope = Arc::new(Envelope {
            id,
            sequence: position as u64,
            sender: sender.clone(),
            receiver: receiver.clone(),
            ciphertext,
            created_at: Utc::now(),
        });
        log.envelopes.push(Arc::clone(&envelope));
        log.index.insert(id, position);

        debug!(
            envelope = %envelope.id,
            sequence = envelope.sequence,
            sender = %envelope.sender,
            receiver = %envelope.receiver,
            "Appended envelope"
        );

        Ok(envelope)
    }

    /// All envelopes `viewer` sent or received, in insertion order
    pub fn list_for(&self, viewer: &ParticipantId) -> Vec<Arc<Envelope>> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .envelopes
            .iter()
            .filter(|envelope| envelope.involves(viewer))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Envelope>> {
        let log = self.log.read().unwrap_or_else(PoisonError::into_inner);
        log.index
            .get(&id)
            .and_then(|&position| log.envelopes.get(position))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .envelopes
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
