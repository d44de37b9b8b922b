use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::registry::{ConnectionId, RegistryHandle};
use crate::shared::AppState;
use crate::websockets::messages::InboundEvent;

use super::socket::{Connection, MessageHandler};

/// Message handler for receiving WebSocket messages from the client
///
/// Decodes each frame and forwards it to the room registry. Frames that fail
/// to decode are logged and dropped.
pub struct WebsocketReceiveHandler {
    registry: RegistryHandle,
}

impl WebsocketReceiveHandler {
    pub fn new(registry: RegistryHandle) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, connection: &ConnectionId, message: String) {
        debug!(
            connection_id = %connection,
            message = %message,
            "Received message"
        );

        match InboundEvent::parse(&message) {
            Ok(InboundEvent::JoinMeetingRoom(args)) => {
                self.registry
                    .join(args.room_id, args.user_id, args.user_name, connection.clone());
            }
            Ok(InboundEvent::SendChatMessage(payload)) => {
                self.registry.send_message(connection.clone(), payload);
            }
            Ok(InboundEvent::LeaveMeetingRoom(args)) => {
                self.registry
                    .leave(args.room_id, args.user_id, args.user_name, connection.clone());
            }
            Err(e) => {
                warn!(
                    connection_id = %connection,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
            }
        }
    }
}

/// WebSocket endpoint
/// GET /ws
#[instrument(name = "websocket_handler", skip(ws, app_state))]
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    info!("WebSocket connection requested");
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: axum::extract::ws::WebSocket, app_state: AppState) {
    let connection_id = ConnectionId::generate();
    info!(connection_id = %connection_id, "Socket connected");

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    let message_handler = Arc::new(WebsocketReceiveHandler::new(app_state.registry.clone()));

    let connection = Connection::new(
        connection_id.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(connection_id = %connection_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = %e,
                "WebSocket connection error"
            );
        }
    }

    // Cleanup: stop routing to this connection, then reconcile its rooms
    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;
    app_state.registry.disconnect(connection_id.clone());

    info!(connection_id = %connection_id, "Socket disconnected");
}
