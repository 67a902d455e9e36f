use serde::Deserialize;

/// Top-level configuration settings for a broker instance.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub peers: PeerSettings,
    pub log: LogSettings,
}

/// Listen address of the broker.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Peer-mesh settings: the brokers to dial, the address we advertise to
/// them in the handshake, and the reconnect cadence.
#[derive(Debug, Deserialize, Clone)]
pub struct PeerSettings {
    pub addresses: Vec<String>,
    pub advertised: Option<String>,
    pub reconnect_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub peers: Option<PartialPeerSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialPeerSettings {
    pub addresses: Option<Vec<String>>,
    pub advertised: Option<String>,
    pub reconnect_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures the broker has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            peers: PeerSettings {
                addresses: Vec::new(),
                advertised: None,
                reconnect_interval_secs: 5,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}
