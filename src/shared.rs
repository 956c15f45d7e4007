use thiserror::Error;

use crate::websockets::{MessageType, SocketError};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connect error: {0}")]
    Connect(String),

    #[error("Socket error: {0}")]
    Socket(#[from] SocketError),

    #[error("Malformed envelope: {0}")]
    Malformed(String),

    #[error("Invalid {message_type:?} payload: {reason}")]
    Payload {
        message_type: MessageType,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn payload(message_type: MessageType, err: serde_json::Error) -> Self {
        ClientError::Payload {
            message_type,
            reason: err.to_string(),
        }
    }
}
