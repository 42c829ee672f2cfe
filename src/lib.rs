//! # SecureChat
//!
//! Core of a two-party end-to-end encrypted conversation.
//!
//! Each participant holds an RSA-2048 key pair. A message is encrypted with
//! RSA-OAEP/SHA-256 to the recipient's public key and stored as an immutable
//! [`Envelope`]. On read, [`resolve`] decides per viewer what is shown: the
//! recipient sees the plaintext if their current key opens it, the sender
//! never does, and anyone else is refused.
//!
//! ```rust,no_run
//! use securechat::{Conversation, Participant, ParticipantId};
//!
//! # fn main() -> securechat::ChatResult<()> {
//! let alice = ParticipantId::from("A");
//! let bob = ParticipantId::from("B");
//! let chat = Conversation::new(Participant::new("A", "Alice"), Participant::new("B", "Bob"))?;
//! chat.generate_keys(&alice)?;
//! chat.generate_keys(&bob)?;
//!
//! chat.send(&alice, "hello")?;
//! let view = chat.view(&bob)?;
//! assert_eq!(view[0].1.plaintext(), Some("hello"));
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod crypto;
pub mod error;
pub mod session;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod testing;

pub use crypto::{decrypt, encrypt, Ciphertext, KeyManager, KeyPair, PrivateKey, PublicKey};
pub use error::{ChatError, ChatResult};
pub use session::{
    resolve, Conversation, Disclosure, Envelope, MessageStore, Participant, ParticipantId,
    UndisclosedReason,
};
