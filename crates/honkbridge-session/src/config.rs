//! Connection configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use honkbridge_protocol::DEFAULT_GAME;
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Loopback port the relay listens on for us.
pub const LOCAL_RELAY_PORT: u16 = 38282;

/// Default port of a multiworld server.
pub const DEFAULT_SERVER_PORT: u16 = 38281;

/// File name of the relay program.
pub const RELAY_BINARY: &str = if cfg!(windows) { "ap-relay.exe" } else { "ap-relay" };

// ---------------------------------------------------------------------------
// RelayConfig
// ---------------------------------------------------------------------------

/// Where to find the relay and how long to give it to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Candidate paths, checked in order; the first existing file wins.
    pub search_paths: Vec<PathBuf>,

    /// Wait between spawning the relay and the first connect attempt.
    pub startup_grace: Duration,
}

impl RelayConfig {
    /// The usual install locations relative to `dir`: next to it, one
    /// level up, in a sibling `relay/` folder two levels up, and three
    /// levels up.
    pub fn near(dir: &Path) -> Self {
        Self {
            search_paths: vec![
                dir.join(RELAY_BINARY),
                dir.join("..").join(RELAY_BINARY),
                dir.join("..").join("..").join("relay").join(RELAY_BINARY),
                dir.join("..").join("..").join("..").join(RELAY_BINARY),
            ],
            ..Self::default()
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from(RELAY_BINARY)],
            startup_grace: Duration::from_millis(1500),
        }
    }
}

// ---------------------------------------------------------------------------
// RetryPolicy / TimerConfig
// ---------------------------------------------------------------------------

/// Connect retries against the local relay. The remote server is never
/// retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Post-handshake timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Spacing between resync notifications.
    pub resync_interval: Duration,
    /// Resync notifications per arming.
    pub resync_attempts: u32,
    /// How long to wait for the first item delta before forcing a resync.
    pub items_wait: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            resync_interval: Duration::from_secs(2),
            resync_attempts: 3,
            items_wait: Duration::from_secs(5),
        }
    }
}

// ---------------------------------------------------------------------------
// ConnectConfig
// ---------------------------------------------------------------------------

/// Everything one connection attempt needs.
///
/// Start from [`ConnectConfig::new`] or [`Default`] and override fields,
/// or load overrides from a JSON file with
/// [`ConnectConfig::from_json_file`]; any field the file leaves out keeps
/// its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Address of the remote server, passed through to the relay.
    pub server: String,
    pub port: u16,

    /// Our slot name.
    pub slot_name: String,
    /// Room password; empty or absent means none.
    pub password: Option<String>,

    /// Advertise and honor the companion-failure broadcast.
    pub companion_failure: bool,

    /// Game identifier sent in the handshake.
    pub game: String,

    /// Port the relay listens on.
    pub local_port: u16,

    /// How to start the relay. `None` means the relay is already running
    /// (started by something else) and we only connect to it.
    pub relay: Option<RelayConfig>,

    pub retry: RetryPolicy,
    pub timers: TimerConfig,

    /// Upper bound on buffered catalog text, in bytes. `None` buffers
    /// without limit.
    pub catalog_buffer_limit: Option<usize>,
}

impl ConnectConfig {
    pub fn new(server: impl Into<String>, port: u16, slot_name: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            port,
            slot_name: slot_name.into(),
            ..Self::default()
        }
    }

    /// Reads a JSON object of overrides from `path`.
    ///
    /// # Errors
    /// [`SessionError::ConfigRead`] when the file cannot be read,
    /// [`SessionError::ConfigParse`] when it is not a valid config object.
    pub fn from_json_file(path: &Path) -> Result<Self, SessionError> {
        let text = std::fs::read_to_string(path).map_err(|source| SessionError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SessionError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks the fields a connection cannot do without.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.slot_name.trim().is_empty() {
            return Err(SessionError::Config("slot name is empty".into()));
        }
        if self.server.trim().is_empty() {
            return Err(SessionError::Config("server address is empty".into()));
        }
        Ok(())
    }
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            server: "archipelago.gg".to_string(),
            port: DEFAULT_SERVER_PORT,
            slot_name: String::new(),
            password: None,
            companion_failure: false,
            game: DEFAULT_GAME.to_string(),
            local_port: LOCAL_RELAY_PORT,
            relay: Some(RelayConfig::default()),
            retry: RetryPolicy::default(),
            timers: TimerConfig::default(),
            catalog_buffer_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_config_defaults() {
        let config = ConnectConfig::default();
        assert_eq!(config.local_port, 38282);
        assert_eq!(config.game, "Untitled Goose Game");
        assert_eq!(config.retry.attempts, 5);
        assert_eq!(config.retry.backoff, Duration::from_millis(500));
        assert_eq!(config.timers.resync_attempts, 3);
        assert_eq!(config.timers.resync_interval, Duration::from_secs(2));
        assert_eq!(config.timers.items_wait, Duration::from_secs(5));
        assert_eq!(
            config.relay.as_ref().map(|r| r.startup_grace),
            Some(Duration::from_millis(1500))
        );
        assert!(config.catalog_buffer_limit.is_none());
    }

    #[test]
    fn test_validate_requires_slot_name() {
        let config = ConnectConfig::new("localhost", 38281, "  ");
        assert!(matches!(config.validate(), Err(SessionError::Config(_))));
        assert!(ConnectConfig::new("localhost", 38281, "Goose").validate().is_ok());
    }

    #[test]
    fn test_from_json_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connect.json");
        std::fs::write(
            &path,
            r#"{"server":"localhost","slot_name":"Goose","companion_failure":true,"relay":null}"#,
        )
        .unwrap();

        let config = ConnectConfig::from_json_file(&path).unwrap();
        assert_eq!(config.server, "localhost");
        assert_eq!(config.slot_name, "Goose");
        assert!(config.companion_failure);
        assert!(config.relay.is_none());
        assert_eq!(config.port, DEFAULT_SERVER_PORT);
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_from_json_file_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connect.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = ConnectConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, SessionError::ConfigParse { .. }));
        assert!(err.to_string().contains("connect.json"));
    }

    #[test]
    fn test_from_json_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            ConnectConfig::from_json_file(&path),
            Err(SessionError::ConfigRead { .. })
        ));
    }

    #[test]
    fn test_relay_near_lists_four_candidates() {
        let relay = RelayConfig::near(Path::new("/games/goose"));
        assert_eq!(relay.search_paths.len(), 4);
        assert!(relay.search_paths[0].ends_with(RELAY_BINARY));
    }
}
