use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use super::actor::RegistryHandle;

/// Configuration for the empty-room cleanup task
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to prune rooms with no members
    pub cleanup_interval: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(10 * 60), // 10 minutes
        }
    }
}

/// Periodically removes empty room entries until the registry stops
#[instrument(skip(registry))]
pub async fn start_cleanup_task(registry: RegistryHandle, config: CleanupConfig) {
    info!(
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        "Starting empty room cleanup task"
    );

    let mut cleanup_interval = interval(config.cleanup_interval);
    cleanup_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    cleanup_interval.tick().await;

    loop {
        cleanup_interval.tick().await;

        match registry.prune_empty_rooms().await {
            Some(0) => debug!("No empty rooms to clean up"),
            Some(removed) => info!(removed = removed, "Empty room cleanup completed"),
            None => {
                warn!("Room registry stopped, ending cleanup task");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{spawn_registry, ConnectionId};
    use crate::websockets::InMemoryConnectionManager;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_cleanup_task_prunes_empty_rooms() {
        let manager = Arc::new(InMemoryConnectionManager::new());
        let (registry, _task) = spawn_registry(manager);

        registry.join("R1", "u1", "Alice", ConnectionId::from("c1"));
        registry.join("R2", "u2", "Bob", ConnectionId::from("c2"));
        registry.leave("R1", "u1", "Alice", ConnectionId::from("c1"));
        assert_eq!(registry.stats().await.unwrap().rooms, 2);

        let config = CleanupConfig {
            cleanup_interval: Duration::from_millis(20),
        };
        let cleanup = tokio::spawn(start_cleanup_task(registry.clone(), config));

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(registry.stats().await.unwrap().rooms, 1);
        cleanup.abort();
    }
}
