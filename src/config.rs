use std::time::Duration;
use tracing::warn;

use crate::registry::CleanupConfig;

pub const PRODUCTION_ORIGIN: &str = "https://nexus-2ne2.vercel.app";
pub const DEVELOPMENT_ORIGIN: &str = "http://localhost:3000";

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Browser origins admitted by the CORS layer
    pub allowed_origins: Vec<String>,
    /// `None` keeps empty rooms around for the life of the process
    pub room_cleanup_interval: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3001,
            allowed_origins: vec![DEVELOPMENT_ORIGIN.to_string()],
            room_cleanup_interval: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; missing or unparseable values
    /// fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid PORT, using default");
                defaults.port
            }),
            None => defaults.port,
        };

        let bind_address = lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address);

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .filter(|origin| {
                    // The CORS layer only accepts an explicit origin list
                    if *origin == "*" {
                        warn!("Ignoring wildcard in ALLOWED_ORIGINS");
                    }
                    *origin != "*"
                })
                .map(str::to_string)
                .collect(),
            None if lookup("NODE_ENV").as_deref() == Some("production") => {
                vec![PRODUCTION_ORIGIN.to_string()]
            }
            None => defaults.allowed_origins,
        };

        let room_cleanup_interval = lookup("ROOM_CLEANUP_INTERVAL_SECS")
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            bind_address,
            port,
            allowed_origins,
            room_cleanup_interval,
        }
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn cleanup_config(&self) -> Option<CleanupConfig> {
        self.room_cleanup_interval
            .map(|cleanup_interval| CleanupConfig { cleanup_interval })
    }
}
