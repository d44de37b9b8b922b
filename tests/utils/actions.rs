use serde_json::{json, Value};

use nexus_chat::{ConnectionId, MessageHandler};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

#[allow(dead_code)]
impl TestSetup {
    /// Send a raw frame from a connection and wait until the registry has applied it
    pub async fn send_frame(&self, connection: &str, frame: String) {
        self.input_handler
            .handle_message(&ConnectionId::from(connection), frame)
            .await;
        self.settle().await;
    }

    /// Wait for every queued registry command to be applied and delivered
    pub async fn settle(&self) {
        self.registry
            .stats()
            .await
            .expect("registry task should be running");
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn send_event(&self, connection: &str, event: &str, data: Value) {
        let frame = json!({ "event": event, "data": data }).to_string();
        self.send_frame(connection, frame).await;
    }

    pub async fn join(&self, connection: &str, room_id: &str, user_id: &str, user_name: &str) {
        self.send_event(
            connection,
            "join-meeting-room",
            json!([room_id, user_id, user_name]),
        )
        .await;
    }

    pub async fn leave(&self, connection: &str, room_id: &str, user_id: &str, user_name: &str) {
        self.send_event(
            connection,
            "leave-meeting-room",
            json!([room_id, user_id, user_name]),
        )
        .await;
    }

    pub async fn send_chat(
        &self,
        connection: &str,
        room_id: &str,
        sender_id: &str,
        sender_name: &str,
        text: &str,
    ) {
        self.send_event(
            connection,
            "send-chat-message",
            json!({
                "meetingId": room_id,
                "senderId": sender_id,
                "senderName": sender_name,
                "text": text,
                "timestamp": 1700000000000_i64,
            }),
        )
        .await;
    }

    /// Simulate the transport reporting a closed socket
    pub async fn disconnect(&self, connection: &str) {
        self.registry.disconnect(ConnectionId::from(connection));
        self.settle().await;
    }
}
