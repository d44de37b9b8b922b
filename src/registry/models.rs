use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Display name used when a member joined without one
pub const ANONYMOUS_USER_NAME: &str = "A user";

/// Opaque identifier for one live transport session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generates a fresh connection id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConnectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConnectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity bound to a connection within a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: String,
    pub user_name: String,
}

impl Member {
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
        }
    }

    /// Name shown in notifications, falling back to a generic label
    pub fn display_name(&self) -> &str {
        display_name_or_default(&self.user_name)
    }
}

pub(crate) fn display_name_or_default(name: &str) -> &str {
    if name.is_empty() {
        ANONYMOUS_USER_NAME
    } else {
        name
    }
}
