use crate::crypto::{KeyManager, KEY_BITS};
use crate::error::ChatResult;
use crate::session::{Conversation, Disclosure, Participant, ParticipantId};

/// Plain-text renderer for one participant's view of a conversation
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    /// Also print the base64 ciphertext under each message
    pub show_raw: bool,
}

impl Renderer {
    pub fn new(show_raw: bool) -> Self {
        Self { show_raw }
    }

    /// Render the key status header and every message as seen by `viewer`
    pub fn render(&self, conversation: &Conversation, viewer: &ParticipantId) -> ChatResult<Vec<String>> {
        let participant = conversation.participant(viewer)?;
        let mut lines = vec![
            format!("=== {} ({}) ===", participant.display_name(), participant.id()),
            Self::key_status(participant),
        ];

        let view = conversation.view(viewer)?;
        if view.is_empty() {
            lines.push("  (no messages)".to_string());
        }

        for (envelope, disclosure) in &view {
            let from = conversation.participant(envelope.sender())?.display_name();
            let to = conversation.participant(envelope.receiver())?.display_name();
            let time = envelope.created_at().format("%H:%M:%S");

            let body = match disclosure {
                Disclosure::Plaintext(text) => format!("DECRYPTED  {}", text),
                Disclosure::Undisclosed(reason) if reason.is_policy() => {
                    format!("ENCRYPTED FOR RECIPIENT ONLY  ({})", reason)
                }
                Disclosure::Undisclosed(reason) => format!("LOCKED  ({})", reason),
            };
            lines.push(format!("  [{}] {} -> {}  {}", time, from, to, body));

            if self.show_raw {
                lines.push(format!("      RSA-ENCRYPTED {}", envelope.ciphertext()));
            }
        }

        Ok(lines)
    }

    fn key_status(participant: &Participant) -> String {
        match participant.key_pair() {
            Some(pair) => {
                let short = KeyManager::short_fingerprint(pair.public_key())
                    .unwrap_or_else(|_| "unavailable".to_string());
                format!("  Encryption Active (RSA-{}) fingerprint {}", KEY_BITS, short)
            }
            None => "  Keys Missing: messages cannot be sent or received until keys are generated"
                .to_string(),
        }
    }
}
