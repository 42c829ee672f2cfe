//! Conversation state: participants, the envelope log and per-viewer disclosure.

mod conversation;
mod participant;
mod store;
mod visibility;

pub use conversation::Conversation;
pub use participant::{Participant, ParticipantId};
pub use store::{Envelope, MessageStore};
pub use visibility::{resolve, Disclosure, UndisclosedReason};
