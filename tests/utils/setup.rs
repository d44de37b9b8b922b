use std::sync::Arc;
use tokio::task::JoinHandle;

use nexus_chat::{spawn_registry, RegistryHandle, WebsocketReceiveHandler};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub registry: RegistryHandle,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub input_handler: WebsocketReceiveHandler,
    pub connections: Vec<String>,
    pub _registry_handle: JoinHandle<()>,
}

pub struct TestSetupBuilder {
    connections: Vec<String>,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            connections: vec![],
        }
    }

    pub fn with_connections(mut self, connections: Vec<&str>) -> Self {
        self.connections = connections.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_connections(self) -> Self {
        self.with_connections(vec!["c1", "c2"])
    }

    pub fn with_three_connections(self) -> Self {
        self.with_connections(vec!["c1", "c2", "c3"])
    }

    pub async fn build(self) -> TestSetup {
        let mock_conn_manager = Arc::new(MockConnectionManager::new());

        for connection in &self.connections {
            mock_conn_manager.add_connected(connection).await;
        }

        let (registry, registry_handle) = spawn_registry(mock_conn_manager.clone());
        let input_handler = WebsocketReceiveHandler::new(registry.clone());

        TestSetup {
            registry,
            mock_conn_manager,
            input_handler,
            connections: self.connections,
            _registry_handle: registry_handle,
        }
    }
}
