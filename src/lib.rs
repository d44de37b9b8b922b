// Library crate for the Nexus chat relay
// This file exposes the public API for integration tests

pub mod config;
pub mod registry;
pub mod server;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::ServerConfig;
pub use registry::{spawn_registry, ConnectionId, RegistryHandle, RoomRegistry};
pub use server::build_router;
pub use shared::{AppError, AppState};
pub use websockets::{
    ConnectionManager, EventName, InMemoryConnectionManager, MessageHandler, WebSocketMessage,
    WebsocketReceiveHandler,
};
