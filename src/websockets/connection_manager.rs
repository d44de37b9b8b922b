use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use crate::registry::ConnectionId;

#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, connection: ConnectionId, sender: mpsc::UnboundedSender<String>);

    async fn remove_connection(&self, connection: &ConnectionId);

    async fn send_to_connections(&self, connections: &[ConnectionId], message: &str);

    async fn count_connections(&self) -> usize;
}

pub struct InMemoryConnectionManager {
    // connection id -> outbound sender
    connections: Arc<RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<String>>>>,
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, connection: ConnectionId, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.insert(connection, sender);
    }

    async fn remove_connection(&self, connection: &ConnectionId) {
        let mut connections = self.connections.write().await;
        connections.remove(connection);
    }

    async fn send_to_connections(&self, recipients: &[ConnectionId], message: &str) {
        let connections = self.connections.read().await;
        for connection in recipients {
            if let Some(sender) = connections.get(connection) {
                let _ = sender.send(message.to_string());
            } else {
                debug!(connection_id = %connection, "Dropping message for unknown connection");
            }
        }
    }

    async fn count_connections(&self) -> usize {
        self.connections.read().await.len()
    }
}
