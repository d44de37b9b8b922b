use thiserror::Error;

/// Reasons a registry event is dropped
///
/// Neither variant is fatal. The registry actor logs them and moves on; the
/// client never hears about it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Connection {connection_id} is not a member of room {room_id}")]
    StaleMembership {
        room_id: String,
        connection_id: String,
    },
}

impl RegistryError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        RegistryError::MalformedInput(msg.into())
    }
}
