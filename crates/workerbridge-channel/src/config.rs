use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use workerbridge_frame::DEFAULT_MAX_PAYLOAD;

/// Transport family used to reach the worker process.
///
/// Both sides must agree on the family; there is no negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportFamily {
    /// Unix-domain stream socket.
    UnixStream,
}

/// Addressing and framing configuration for one bridge.
///
/// Injected at channel construction rather than baked in as a process-wide
/// constant, so independent bridges (and their tests) can each use their own
/// socket path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Transport family shared by host and worker.
    #[serde(default = "default_transport")]
    pub transport: TransportFamily,
    /// Filesystem path of the worker socket.
    pub socket_path: PathBuf,
    /// Maximum accepted frame payload size in bytes.
    #[serde(default = "default_max_payload")]
    pub max_payload_size: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            transport: TransportFamily::UnixStream,
            socket_path: PathBuf::from("/tmp/workerbridge.socket"),
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}

impl BridgeConfig {
    /// Configuration for a bridge at `socket_path`, defaults elsewhere.
    pub fn at(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            ..Self::default()
        }
    }
}

fn default_transport() -> TransportFamily {
    TransportFamily::UnixStream
}

fn default_max_payload() -> usize {
    DEFAULT_MAX_PAYLOAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.transport, TransportFamily::UnixStream);
        assert_eq!(config.socket_path, PathBuf::from("/tmp/workerbridge.socket"));
        assert_eq!(config.max_payload_size, DEFAULT_MAX_PAYLOAD);
    }

    #[test]
    fn at_overrides_only_the_path() {
        let config = BridgeConfig::at("/run/bridge/worker-7.sock");
        assert_eq!(
            config.socket_path,
            PathBuf::from("/run/bridge/worker-7.sock")
        );
        assert_eq!(config.max_payload_size, DEFAULT_MAX_PAYLOAD);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{"socket_path": "/tmp/alt.sock"}"#).unwrap();

        assert_eq!(config.transport, TransportFamily::UnixStream);
        assert_eq!(config.socket_path, PathBuf::from("/tmp/alt.sock"));
        assert_eq!(config.max_payload_size, DEFAULT_MAX_PAYLOAD);
    }

    #[test]
    fn serde_roundtrip() {
        let config = BridgeConfig {
            transport: TransportFamily::UnixStream,
            socket_path: PathBuf::from("/tmp/rt.sock"),
            max_payload_size: 4096,
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"unix-stream\""));

        let parsed: BridgeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
