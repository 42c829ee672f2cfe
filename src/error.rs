use thiserror::Error;

use crate::session::ParticipantId;

/// Main error type for the secure chat core and its application layer
#[derive(Error, Debug)]
pub enum ChatError {
    // Key errors
    #[error("RSA key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Public key export failed: {0}")]
    KeyExport(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    // Codec errors
    #[error("Payload too large: {len} bytes exceeds the {max} byte capacity of the key")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Carries no detail: wrong key, bad padding and malformed input all
    /// produce this same value.
    #[error("Decryption failed")]
    Decryption,

    // Conversation errors
    #[error("Viewer {0} is not a participant of this conversation")]
    UnauthorizedViewer(ParticipantId),

    #[error("Unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    #[error("Participant {0} cannot address a message to themselves")]
    SelfAddressed(ParticipantId),

    #[error("Encryption keys required: {0} has no key pair")]
    KeysMissing(ParticipantId),

    #[error("Message is empty")]
    EmptyMessage,

    // Application errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for secure chat operations
pub type ChatResult<T> = Result<T, ChatError>;

impl From<rsa::pkcs8::spki::Error> for ChatError {
    fn from(err: rsa::pkcs8::spki::Error) -> Self {
        ChatError::InvalidPublicKey(err.to_string())
    }
}

impl From<base64::DecodeError> for ChatError {
    fn from(err: base64::DecodeError) -> Self {
        ChatError::InvalidPublicKey(format!("Base64 decode error: {}", err))
    }
}
