//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use nexus_chat::{EventName, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    connections: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for all connections in the setup
    pub fn for_all_connections(setup: &'a TestSetup) -> Self {
        let connections = setup.connections.iter().map(|s| s.as_str()).collect();
        Self { setup, connections }
    }

    /// Create an assertion for specific connections
    pub fn for_connections(setup: &'a TestSetup, connections: Vec<&'a str>) -> Self {
        Self { setup, connections }
    }

    /// Assert that every connection received the event next (consumes the message from queue)
    pub async fn received_event(self, expected: EventName) -> MessageContent {
        let mut messages = vec![];

        for connection in &self.connections {
            let message = self
                .setup
                .mock_conn_manager
                .consume_message_for(connection)
                .await;
            assert!(
                message.is_some(),
                "{} should have received a message",
                connection
            );

            let msg: WebSocketMessage = serde_json::from_str(&message.unwrap()).unwrap();
            assert_eq!(
                msg.event_name().unwrap(),
                expected,
                "{} received wrong event",
                connection
            );
            messages.push(msg);
        }

        assert!(!messages.is_empty(), "no connections to check");

        // Everyone in a room sees the same payload
        let first_data = &messages[0].data;
        for (i, msg) in messages.iter().enumerate().skip(1) {
            assert_eq!(
                &msg.data, first_data,
                "{} payload differs from {}",
                self.connections[i], self.connections[0]
            );
        }

        MessageContent {
            data: messages[0].data.clone(),
        }
    }

    /// Assert that connections have no unread messages
    pub async fn received_no_messages(self) {
        for connection in &self.connections {
            let messages = self
                .setup
                .mock_conn_manager
                .get_messages_for(connection)
                .await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                connection,
                messages
            );
        }
    }

    /// Count how many messages of an event a connection has unread (non-consuming)
    pub async fn count_event(&self, connection: &str, event: EventName) -> usize {
        let messages = self
            .setup
            .mock_conn_manager
            .get_messages_for(connection)
            .await;
        messages
            .iter()
            .filter_map(|msg_str| serde_json::from_str::<WebSocketMessage>(msg_str).ok())
            .filter(|msg| msg.event_name().ok() == Some(event))
            .count()
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    data: serde_json::Value,
}

impl MessageContent {
    pub fn with_text(self, expected_text: &str) -> Self {
        assert_eq!(self.data["text"], expected_text);
        self
    }

    pub fn with_sender(self, expected_id: &str, expected_name: &str) -> Self {
        assert_eq!(self.data["senderId"], expected_id);
        assert_eq!(self.data["senderName"], expected_name);
        self
    }

    pub fn from_system(self) -> Self {
        assert_eq!(self.data["type"], "notification");
        self.with_sender("system", "System")
    }

    pub fn with_id_suffix(self, suffix: &str) -> Self {
        assert!(
            self.data["id"].as_str().is_some_and(|id| id.ends_with(suffix)),
            "id {} should end with {}",
            self.data["id"],
            suffix
        );
        self
    }

    pub fn as_user_message(self) -> Self {
        assert_eq!(self.data["type"], "user-message");
        assert!(
            self.data["id"].as_str().is_some_and(|id| !id.is_empty()),
            "user message should carry an id"
        );
        self
    }
}
