//! Per-viewer disclosure of stored envelopes.
//!
//! Messages are encrypted only to the receiver's public key, so the sender of
//! an envelope can never read it back. The resolver makes that explicit as a
//! policy outcome, separate from genuine decryption failures. Outcomes are
//! recomputed from the viewer's current keys on every read; nothing is cached.

use std::fmt;
use zeroize::Zeroizing;

use super::{Envelope, ParticipantId};
use crate::crypto::{self, PrivateKey};
use crate::error::{ChatError, ChatResult};

/// What a given viewer gets to see of one envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disclosure {
    Plaintext(String),
    Undisclosed(UndisclosedReason),
}

impl Disclosure {
    pub fn plaintext(&self) -> Option<&str> {
        match self {
            Disclosure::Plaintext(text) => Some(text),
            Disclosure::Undisclosed(_) => None,
        }
    }

    pub fn reason(&self) -> Option<UndisclosedReason> {
        match self {
            Disclosure::Plaintext(_) => None,
            Disclosure::Undisclosed(reason) => Some(*reason),
        }
    }
}

/// Why an envelope's content is withheld from a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UndisclosedReason {
    /// The receiver has no private key yet
    NoPrivateKey,
    /// The receiver's current key does not open the envelope
    DecryptionFailed,
    /// The viewer sent the envelope; it was encrypted for the recipient only
    SenderCannotDecrypt,
}

impl UndisclosedReason {
    pub fn description(&self) -> &'static str {
        match self {
            UndisclosedReason::NoPrivateKey => "no private key available",
            UndisclosedReason::DecryptionFailed => "decryption failed",
            UndisclosedReason::SenderCannotDecrypt => {
                "sender cannot decrypt content encrypted for the recipient"
            }
        }
    }

    /// True for the sender policy outcome, which is expected rather than an error
    pub fn is_policy(&self) -> bool {
        matches!(self, UndisclosedReason::SenderCannotDecrypt)
    }
}

impl fmt::Display for UndisclosedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Decide what `viewer` sees of `envelope` given the viewer's current private key
pub fn resolve(
    envelope: &Envelope,
    viewer: &ParticipantId,
    viewer_key: Option<&PrivateKey>,
) -> ChatResult<Disclosure> {
    if viewer == envelope.receiver() {
        let Some(key) = viewer_key else {
            return Ok(Disclosure::Undisclosed(UndisclosedReason::NoPrivateKey));
        };

        let disclosure = match crypto::decrypt(envelope.ciphertext(), key) {
            Ok(bytes) => {
                let bytes = Zeroizing::new(bytes);
                match std::str::from_utf8(&bytes) {
                    Ok(text) => Disclosure::Plaintext(text.to_owned()),
                    Err(_) => Disclosure::Undisclosed(UndisclosedReason::DecryptionFailed),
                }
            }
            Err(_) => Disclosure::Undisclosed(UndisclosedReason::DecryptionFailed),
        };
        return Ok(disclosure);
    }

    if viewer == envelope.sender() {
        return Ok(Disclosure::Undisclosed(
            UndisclosedReason::SenderCannotDecrypt,
        ));
    }

    Err(ChatError::UnauthorizedViewer(viewer.clone()))
}
