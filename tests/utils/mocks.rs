use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use nexus_chat::{ConnectionId, ConnectionManager};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Records every frame sent to each connection instead of writing to sockets
#[derive(Clone, Default)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<ConnectionId, Vec<String>>>>,
    connected: Arc<RwLock<Vec<ConnectionId>>>,
}

#[allow(dead_code)]
impl MockConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_connected(&self, connection: &str) {
        self.connected
            .write()
            .await
            .push(ConnectionId::from(connection));
    }

    pub async fn get_messages_for(&self, connection: &str) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(&ConnectionId::from(connection))
            .cloned()
            .unwrap_or_default()
    }

    /// Pops the oldest unread message for a connection
    pub async fn consume_message_for(&self, connection: &str) -> Option<String> {
        let mut sent = self.sent_messages.write().await;
        let queue = sent.get_mut(&ConnectionId::from(connection))?;
        if queue.is_empty() {
            None
        } else {
            Some(queue.remove(0))
        }
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }

    async fn record(&self, connection: &ConnectionId, message: &str) {
        self.sent_messages
            .write()
            .await
            .entry(connection.clone())
            .or_default()
            .push(message.to_string());
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(&self, connection: ConnectionId, _sender: mpsc::UnboundedSender<String>) {
        self.connected.write().await.push(connection);
    }

    async fn remove_connection(&self, connection: &ConnectionId) {
        self.connected.write().await.retain(|c| c != connection);
    }

    async fn send_to_connections(&self, connections: &[ConnectionId], message: &str) {
        for connection in connections {
            self.record(connection, message).await;
        }
    }

    async fn count_connections(&self) -> usize {
        self.connected.read().await.len()
    }
}
