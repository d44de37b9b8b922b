// Room membership and broadcast
//
// `RoomRegistry` holds the state and decides who hears what. `RegistryActor`
// owns it exclusively and is reached through `RegistryHandle`.

// Public API
pub use actor::{spawn_registry, RegistryActor, RegistryCommand, RegistryHandle, RegistryStats};
pub use cleanup_task::{start_cleanup_task, CleanupConfig};
pub use errors::RegistryError;
pub use models::{ConnectionId, Member, ANONYMOUS_USER_NAME};
pub use room_registry::{Dispatch, RoomRegistry};

// Internal modules
mod actor;
mod cleanup_task;
mod errors;
mod ids;
mod models;
mod room_registry;
