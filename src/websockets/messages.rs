use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Event names on the wire
///
/// These strings are the compatibility contract with existing clients and must
/// not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum EventName {
    // Client -> Server
    JoinMeetingRoom,
    SendChatMessage,
    LeaveMeetingRoom,

    // Server -> Client
    UserJoinedChat,
    ReceiveChatMessage,
    UserLeftChat,
}

/// Errors raised while decoding an inbound frame
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid JSON frame: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Event {event} is not accepted from clients")]
    NotInbound { event: EventName },

    #[error("Invalid payload for {event}: {reason}")]
    InvalidPayload { event: EventName, reason: String },
}

/// Envelope for every frame in both directions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl WebSocketMessage {
    pub fn new(event: EventName, data: Value) -> Self {
        Self {
            event: event.to_string(),
            data,
        }
    }

    pub fn event_name(&self) -> Result<EventName, ProtocolError> {
        EventName::from_str(&self.event).map_err(|_| ProtocolError::UnknownEvent(self.event.clone()))
    }
}

/// Value of the `type` field on outbound messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    Notification,
    UserMessage,
}

pub const SYSTEM_SENDER_ID: &str = "system";
pub const SYSTEM_SENDER_NAME: &str = "System";

/// System-generated message about a membership change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

impl Notification {
    pub fn new(id: String, text: String, timestamp: i64) -> Self {
        Self {
            id,
            sender_id: SYSTEM_SENDER_ID.to_string(),
            sender_name: SYSTEM_SENDER_NAME.to_string(),
            text,
            timestamp,
            kind: MessageKind::Notification,
        }
    }
}

/// User-authored message relayed to a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
    /// Whatever the client sent, passed through untouched
    pub timestamp: Value,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

/// Server -> client events
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    UserJoinedChat(Notification),
    ReceiveChatMessage(ChatMessage),
    UserLeftChat(Notification),
}

impl OutboundEvent {
    pub fn name(&self) -> EventName {
        match self {
            OutboundEvent::UserJoinedChat(_) => EventName::UserJoinedChat,
            OutboundEvent::ReceiveChatMessage(_) => EventName::ReceiveChatMessage,
            OutboundEvent::UserLeftChat(_) => EventName::UserLeftChat,
        }
    }

    pub fn to_message(&self) -> Result<WebSocketMessage, serde_json::Error> {
        let data = match self {
            OutboundEvent::UserJoinedChat(n) | OutboundEvent::UserLeftChat(n) => {
                serde_json::to_value(n)?
            }
            OutboundEvent::ReceiveChatMessage(m) => serde_json::to_value(m)?,
        };
        Ok(WebSocketMessage::new(self.name(), data))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_message()?)
    }
}

/// Payload of `send-chat-message`
///
/// Every field is optional on the wire; the registry decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendChatMessagePayload {
    pub meeting_id: Option<String>,
    pub sender_id: Option<String>,
    pub sender_name: Option<String>,
    pub text: Option<String>,
    pub timestamp: Option<Value>,
}

/// Positional arguments of `join-meeting-room` / `leave-meeting-room`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomArgs {
    pub room_id: String,
    pub user_id: String,
    pub user_name: String,
}

impl RoomArgs {
    fn from_positional(event: EventName, data: &Value) -> Result<Self, ProtocolError> {
        let args = data.as_array().ok_or_else(|| ProtocolError::InvalidPayload {
            event,
            reason: "expected an argument array".to_string(),
        })?;
        let arg = |i: usize| {
            args.get(i)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Ok(Self {
            room_id: arg(0),
            user_id: arg(1),
            user_name: arg(2),
        })
    }
}

/// Client -> server events, decoded
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    JoinMeetingRoom(RoomArgs),
    SendChatMessage(SendChatMessagePayload),
    LeaveMeetingRoom(RoomArgs),
}

impl InboundEvent {
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        let message: WebSocketMessage = serde_json::from_str(frame)?;
        let event = message.event_name()?;

        match event {
            EventName::JoinMeetingRoom => Ok(InboundEvent::JoinMeetingRoom(
                RoomArgs::from_positional(event, &message.data)?,
            )),
            EventName::LeaveMeetingRoom => Ok(InboundEvent::LeaveMeetingRoom(
                RoomArgs::from_positional(event, &message.data)?,
            )),
            EventName::SendChatMessage => serde_json::from_value(message.data)
                .map(InboundEvent::SendChatMessage)
                .map_err(|e| ProtocolError::InvalidPayload {
                    event,
                    reason: e.to_string(),
                }),
            _ => Err(ProtocolError::NotInbound { event }),
        }
    }
}
