use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::errors::RegistryError;
use super::models::ConnectionId;
use super::room_registry::{Dispatch, RoomRegistry};
use crate::websockets::messages::SendChatMessagePayload;
use crate::websockets::ConnectionManager;

/// Commands processed by the registry task, one at a time
#[derive(Debug)]
pub enum RegistryCommand {
    Join {
        room_id: String,
        user_id: String,
        user_name: String,
        connection: ConnectionId,
    },
    SendMessage {
        connection: ConnectionId,
        payload: SendChatMessagePayload,
    },
    Leave {
        room_id: String,
        user_id: String,
        user_name: String,
        connection: ConnectionId,
    },
    Disconnect {
        connection: ConnectionId,
    },
    PruneEmptyRooms {
        reply: oneshot::Sender<usize>,
    },
    Stats {
        reply: oneshot::Sender<RegistryStats>,
    },
}

/// Point-in-time registry counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub rooms: usize,
    pub memberships: usize,
}

/// Cloneable entry point to the registry task
///
/// Fire-and-forget commands never wait on the task. Queries return `None`
/// once the task has stopped.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    sender: mpsc::UnboundedSender<RegistryCommand>,
}

impl RegistryHandle {
    fn send(&self, command: RegistryCommand) {
        if let Err(e) = self.sender.send(command) {
            warn!(command = ?e.0, "Registry task stopped, dropping command");
        }
    }

    pub fn join(
        &self,
        room_id: impl Into<String>,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        connection: ConnectionId,
    ) {
        self.send(RegistryCommand::Join {
            room_id: room_id.into(),
            user_id: user_id.into(),
            user_name: user_name.into(),
            connection,
        });
    }

    pub fn send_message(&self, connection: ConnectionId, payload: SendChatMessagePayload) {
        self.send(RegistryCommand::SendMessage {
            connection,
            payload,
        });
    }

    pub fn leave(
        &self,
        room_id: impl Into<String>,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        connection: ConnectionId,
    ) {
        self.send(RegistryCommand::Leave {
            room_id: room_id.into(),
            user_id: user_id.into(),
            user_name: user_name.into(),
            connection,
        });
    }

    pub fn disconnect(&self, connection: ConnectionId) {
        self.send(RegistryCommand::Disconnect { connection });
    }

    pub async fn prune_empty_rooms(&self) -> Option<usize> {
        let (reply, response) = oneshot::channel();
        self.send(RegistryCommand::PruneEmptyRooms { reply });
        response.await.ok()
    }

    /// Also acts as a barrier: every command sent before it has been applied
    /// and delivered by the time it resolves.
    pub async fn stats(&self) -> Option<RegistryStats> {
        let (reply, response) = oneshot::channel();
        self.send(RegistryCommand::Stats { reply });
        response.await.ok()
    }
}

/// Sole owner of the [`RoomRegistry`]
pub struct RegistryActor {
    registry: RoomRegistry,
    connection_manager: Arc<dyn ConnectionManager>,
    receiver: mpsc::UnboundedReceiver<RegistryCommand>,
}

impl RegistryActor {
    pub fn new(
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> (Self, RegistryHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = Self {
            registry: RoomRegistry::new(),
            connection_manager,
            receiver,
        };
        (actor, RegistryHandle { sender })
    }

    /// Runs until every handle has been dropped
    pub async fn run(mut self) {
        info!("Room registry started");

        while let Some(command) = self.receiver.recv().await {
            self.handle_command(command).await;
        }

        info!(
            rooms = self.registry.room_count(),
            "Room registry stopped - all handles dropped"
        );
    }

    async fn handle_command(&mut self, command: RegistryCommand) {
        let result: Result<Vec<Dispatch>, RegistryError> = match command {
            RegistryCommand::Join {
                room_id,
                user_id,
                user_name,
                connection,
            } => self
                .registry
                .join(&room_id, &user_id, &user_name, &connection)
                .map(|d| vec![d]),
            RegistryCommand::SendMessage {
                connection,
                payload,
            } => {
                debug!(connection_id = %connection, "Chat message received");
                self.registry
                    .broadcast_message(
                        payload.meeting_id.as_deref().unwrap_or_default(),
                        payload.sender_id.as_deref().unwrap_or_default(),
                        payload.sender_name.as_deref().unwrap_or_default(),
                        payload.text.as_deref().unwrap_or_default(),
                        payload.timestamp.unwrap_or_default(),
                    )
                    .map(|d| vec![d])
            }
            RegistryCommand::Leave {
                room_id,
                user_id,
                user_name,
                connection,
            } => self
                .registry
                .leave(&room_id, &user_id, &user_name, &connection)
                .map(|d| vec![d]),
            RegistryCommand::Disconnect { connection } => {
                Ok(self.registry.handle_disconnect(&connection))
            }
            RegistryCommand::PruneEmptyRooms { reply } => {
                let removed = self.registry.prune_empty_rooms();
                debug!(removed = removed, "Pruned empty rooms");
                let _ = reply.send(removed);
                Ok(Vec::new())
            }
            RegistryCommand::Stats { reply } => {
                let _ = reply.send(RegistryStats {
                    rooms: self.registry.room_count(),
                    memberships: self.registry.membership_count(),
                });
                Ok(Vec::new())
            }
        };

        match result {
            Ok(dispatches) => self.deliver(dispatches).await,
            Err(e) => warn!(error = %e, "Dropping registry event"),
        }
    }

    async fn deliver(&self, dispatches: Vec<Dispatch>) {
        for dispatch in dispatches {
            if dispatch.recipients.is_empty() {
                continue;
            }

            match dispatch.event.to_json() {
                Ok(json) => {
                    self.connection_manager
                        .send_to_connections(&dispatch.recipients, &json)
                        .await;
                    debug!(
                        event = %dispatch.event.name(),
                        recipients = dispatch.recipients.len(),
                        "Dispatched room event"
                    );
                }
                Err(e) => {
                    error!(
                        event = %dispatch.event.name(),
                        error = %e,
                        "Failed to serialize outbound event"
                    );
                }
            }
        }
    }
}

/// Spawns the registry task and returns its handle
pub fn spawn_registry(
    connection_manager: Arc<dyn ConnectionManager>,
) -> (RegistryHandle, JoinHandle<()>) {
    let (actor, handle) = RegistryActor::new(connection_manager);
    (handle, tokio::spawn(actor.run()))
}
