//! Application layer around the core: configuration, a scripted two-party
//! session and transcript rendering.

pub mod config;
pub mod transcript;

pub use config::AppConfig;
pub use transcript::Renderer;

use tracing::info;

use crate::error::ChatResult;
use crate::session::{Conversation, Participant, ParticipantId};
use config::participant_key;

/// Messages used when none are supplied
pub const DEFAULT_SCRIPT: [&str; 2] = ["hello", "hi! this one is for your eyes only"];

/// Drives a demonstration conversation between the two configured participants
pub struct App {
    config: AppConfig,
    conversation: Conversation,
}

impl App {
    /// Create a new application instance
    pub fn new(config: AppConfig) -> ChatResult<Self> {
        config.validate()?;

        let first = Participant::new(participant_id(&config.first_name), config.first_name.trim());
        let second = Participant::new(participant_id(&config.second_name), config.second_name.trim());
        let conversation = Conversation::new(first, second)?;

        Ok(Self {
            config,
            conversation,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    fn ids(&self) -> (ParticipantId, ParticipantId) {
        let [first, second] = self.conversation.participants();
        (first.id().clone(), second.id().clone())
    }

    /// Run the script and return the transcript.
    ///
    /// Both sides generate keys, the messages are sent alternately starting
    /// with the first participant, each side's view is rendered, then the
    /// second participant regenerates keys and their view is rendered again.
    pub async fn run_script(&self, messages: &[String]) -> ChatResult<Vec<String>> {
        let (first, second) = self.ids();
        let renderer = Renderer::new(self.config.show_raw);

        for id in [&first, &second] {
            self.conversation.generate_keys_offloaded(id).await?;
        }

        for (i, text) in messages.iter().enumerate() {
            let sender = if i % 2 == 0 { &first } else { &second };
            self.conversation.send(sender, text)?;
        }

        let mut transcript = Vec::new();
        for id in [&first, &second] {
            transcript.extend(renderer.render(&self.conversation, id)?);
            transcript.push(String::new());
        }

        info!(participant = %second, "Regenerating keys; earlier messages to this participant become unreadable");
        self.conversation.generate_keys_offloaded(&second).await?;

        transcript.push("--- after key regeneration ---".to_string());
        transcript.extend(renderer.render(&self.conversation, &second)?);

        Ok(transcript)
    }
}

fn participant_id(name: &str) -> ParticipantId {
    ParticipantId::new(participant_key(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_builds_participants_from_config() {
        let app = App::new(AppConfig::new("Carol", "Dave")).unwrap();
        let [first, second] = app.conversation().participants();

        assert_eq!(first.id().as_str(), "carol");
        assert_eq!(first.display_name(), "Carol");
        assert_eq!(second.id().as_str(), "dave");
        assert!(!first.has_keys());
    }

    #[test]
    fn test_app_rejects_invalid_config() {
        assert!(App::new(AppConfig::new("Bob", "bob")).is_err());
        assert!(matches!(
            App::new(AppConfig::new("Émile", "émile")),
            Err(crate::error::ChatError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_run_script_shows_raw_ciphertext_when_configured() {
        let config = AppConfig {
            show_raw: true,
            ..AppConfig::default()
        };
        let app = App::new(config).unwrap();

        let transcript = app.run_script(&["hello".to_string()]).await.unwrap();
        assert!(transcript.iter().any(|line| line.contains("RSA-ENCRYPTED")));

        let plain = App::new(AppConfig::default()).unwrap();
        let transcript = plain.run_script(&["hello".to_string()]).await.unwrap();
        assert!(!transcript.iter().any(|line| line.contains("RSA-ENCRYPTED")));
    }

    #[tokio::test]
    async fn test_run_script() {
        let app = App::new(AppConfig::default()).unwrap();
        let script: Vec<String> = DEFAULT_SCRIPT.iter().map(|s| s.to_string()).collect();

        let transcript = app.run_script(&script).await.unwrap();
        let text = transcript.join("\n");

        assert!(text.contains("Alice -> Bob  DECRYPTED  hello"));
        assert!(text.contains("Bob -> Alice  DECRYPTED  hi! this one is for your eyes only"));
        assert!(text.contains("ENCRYPTED FOR RECIPIENT ONLY"));

        let after = text.split("--- after key regeneration ---").nth(1).unwrap();
        assert!(after.contains("Alice -> Bob  LOCKED  (decryption failed)"));
        assert!(!after.contains("DECRYPTED  hello"));
    }
}
