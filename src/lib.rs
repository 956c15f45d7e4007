// Client library for the Guandan card game server
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod game;
pub mod shared;
pub mod view;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::ClientConfig;
pub use game::{Card, CardId, Rank, Seat, Suit};
pub use shared::ClientError;
pub use view::{ViewReconciler, ViewSnapshot, ViewTimings};
pub use websockets::{ConnectionStatus, Envelope, MessageType, Transport, TransportFault};
