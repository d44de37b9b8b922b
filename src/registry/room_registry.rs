use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

use super::errors::RegistryError;
use super::ids;
use super::models::{display_name_or_default, ConnectionId, Member};
use crate::websockets::messages::{ChatMessage, MessageKind, Notification, OutboundEvent};

/// An outbound event and the connections it must reach
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub recipients: Vec<ConnectionId>,
    pub event: OutboundEvent,
}

/// Room membership state
///
/// Owns `room_id -> (connection -> member)`. Every operation validates its
/// input, mutates membership, and returns the dispatches the caller must
/// deliver. Nothing here performs I/O, so the caller decides how delivery and
/// exclusive access are arranged (see `RegistryActor`).
///
/// Rooms are created lazily on first join and are not removed when they empty
/// out; [`RoomRegistry::prune_empty_rooms`] drops them on request.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: BTreeMap<String, HashMap<ConnectionId, Member>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `connection` to `room_id` and announces it to the other members
    #[instrument(skip(self))]
    pub fn join(
        &mut self,
        room_id: &str,
        user_id: &str,
        user_name: &str,
        connection: &ConnectionId,
    ) -> Result<Dispatch, RegistryError> {
        if room_id.is_empty() || user_id.is_empty() {
            return Err(RegistryError::malformed(
                "join-meeting-room requires roomId and userId",
            ));
        }

        let members = self.rooms.entry(room_id.to_string()).or_default();
        let member = Member::new(user_id, user_name);
        let text = format!("{} has joined the chat.", member.display_name());
        members.insert(connection.clone(), member);

        info!(
            room_id = %room_id,
            user_id = %user_id,
            user_name = %user_name,
            connection_id = %connection,
            member_count = members.len(),
            "User joined meeting room"
        );

        let recipients = Self::others(members, connection);
        Ok(Dispatch {
            recipients,
            event: OutboundEvent::UserJoinedChat(Notification::new(
                ids::notification_id(),
                text,
                ids::now_millis(),
            )),
        })
    }

    /// Relays a chat message to every member of the room, sender included
    #[instrument(skip(self, text, timestamp))]
    pub fn broadcast_message(
        &self,
        room_id: &str,
        sender_id: &str,
        sender_name: &str,
        text: &str,
        timestamp: Value,
    ) -> Result<Dispatch, RegistryError> {
        if room_id.is_empty() || sender_id.is_empty() || text.is_empty() {
            return Err(RegistryError::malformed(
                "send-chat-message requires meetingId, senderId and text",
            ));
        }

        let recipients: Vec<ConnectionId> = self
            .rooms
            .get(room_id)
            .map(|members| members.keys().cloned().collect())
            .unwrap_or_default();

        if recipients.is_empty() {
            debug!(room_id = %room_id, "Chat message sent to a room with no members");
        }

        info!(
            room_id = %room_id,
            sender_id = %sender_id,
            sender_name = %sender_name,
            recipients = recipients.len(),
            "Broadcasting chat message"
        );

        let timestamp = match timestamp {
            Value::Null => Value::from(ids::now_millis()),
            other => other,
        };

        Ok(Dispatch {
            recipients,
            event: OutboundEvent::ReceiveChatMessage(ChatMessage {
                id: ids::chat_message_id(),
                sender_id: sender_id.to_string(),
                sender_name: sender_name.to_string(),
                text: text.to_string(),
                timestamp,
                kind: MessageKind::UserMessage,
            }),
        })
    }

    /// Removes `connection` from `room_id` and tells the remaining members
    ///
    /// The stored member name wins over `user_name`, which comes from the
    /// client and may be stale.
    #[instrument(skip(self))]
    pub fn leave(
        &mut self,
        room_id: &str,
        user_id: &str,
        user_name: &str,
        connection: &ConnectionId,
    ) -> Result<Dispatch, RegistryError> {
        let stale = || RegistryError::StaleMembership {
            room_id: room_id.to_string(),
            connection_id: connection.to_string(),
        };

        let members = self.rooms.get_mut(room_id).ok_or_else(stale)?;
        let member = members.remove(connection).ok_or_else(stale)?;

        let resolved_name = if member.user_name.is_empty() {
            display_name_or_default(user_name)
        } else {
            member.user_name.as_str()
        };

        info!(
            room_id = %room_id,
            user_id = %member.user_id,
            claimed_user_id = %user_id,
            user_name = %resolved_name,
            connection_id = %connection,
            "User left meeting room"
        );

        Ok(Dispatch {
            recipients: members.keys().cloned().collect(),
            event: OutboundEvent::UserLeftChat(Notification::new(
                ids::notification_id(),
                format!("{} has left the chat.", resolved_name),
                ids::now_millis(),
            )),
        })
    }

    /// Drops `connection` from every room it belongs to
    ///
    /// Yields one dispatch per affected room, in room id order.
    #[instrument(skip(self))]
    pub fn handle_disconnect(&mut self, connection: &ConnectionId) -> Vec<Dispatch> {
        let mut dispatches = Vec::new();

        for (room_id, members) in self.rooms.iter_mut() {
            let Some(member) = members.remove(connection) else {
                continue;
            };

            info!(
                room_id = %room_id,
                user_id = %member.user_id,
                user_name = %member.user_name,
                connection_id = %connection,
                "User auto-left room on disconnect"
            );

            dispatches.push(Dispatch {
                recipients: members.keys().cloned().collect(),
                event: OutboundEvent::UserLeftChat(Notification::new(
                    ids::disconnect_notification_id(),
                    format!("{} has disconnected.", member.display_name()),
                    ids::now_millis(),
                )),
            });
        }

        debug!(
            connection_id = %connection,
            rooms_left = dispatches.len(),
            "Disconnect reconciled"
        );

        dispatches
    }

    /// Removes room entries that have no members, returning how many went
    pub fn prune_empty_rooms(&mut self) -> usize {
        let before = self.rooms.len();
        self.rooms.retain(|_, members| !members.is_empty());
        before - self.rooms.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Total memberships across all rooms
    pub fn membership_count(&self) -> usize {
        self.rooms.values().map(HashMap::len).sum()
    }

    pub fn members(&self, room_id: &str) -> Vec<Member> {
        self.rooms
            .get(room_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_member(&self, room_id: &str, connection: &ConnectionId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|members| members.contains_key(connection))
    }

    pub fn rooms_for(&self, connection: &ConnectionId) -> Vec<String> {
        self.rooms
            .iter()
            .filter(|(_, members)| members.contains_key(connection))
            .map(|(room_id, _)| room_id.clone())
            .collect()
    }

    fn others(
        members: &HashMap<ConnectionId, Member>,
        connection: &ConnectionId,
    ) -> Vec<ConnectionId> {
        members
            .keys()
            .filter(|c| *c != connection)
            .cloned()
            .collect()
    }
}
