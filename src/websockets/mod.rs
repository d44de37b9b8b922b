// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::{websocket_handler, WebsocketReceiveHandler};
pub use messages::{
    ChatMessage, EventName, InboundEvent, MessageKind, Notification, OutboundEvent,
    ProtocolError, RoomArgs, SendChatMessagePayload, WebSocketMessage,
};
pub use socket::{Connection, MessageHandler, SocketError, SocketFrame, SocketWrapper};

// Internal modules
mod connection_manager;
mod handler;
pub mod messages;
mod socket;
