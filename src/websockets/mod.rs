// Public API
pub use messages::{
    CreateRoomPayload, DealCardsPayload, EmptyPayload, Envelope, ErrorPayload, GameEndPayload,
    HandEndPayload, JoinRoomPayload, MessageType, PlayCardsPayload, PlayMadePayload,
    PlayerInfo, PlayerNoticePayload, RoomStatePayload, TributeGivePayload, TributePayload,
    TributeRecvPayload, TurnPayload,
};
pub use registry::{EnvelopeHandler, FnHandler, HandlerRegistry, Subscription};
pub use socket::{Connection, MessageHandler, Outbound, SocketError, SocketWrapper};
pub use transport::{ConnectionStatus, Transport, TransportFault};

// Internal modules
mod messages;
mod registry;
mod socket;
mod transport;
