mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{LogSettings, PeerSettings, ServerSettings, Settings};

/// Loads the configuration from the default file and environment variables
/// and merges it with default values.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        peers: PeerSettings {
            addresses: partial
                .peers
                .as_ref()
                .and_then(|p| p.addresses.clone())
                .unwrap_or(default.peers.addresses),
            advertised: partial
                .peers
                .as_ref()
                .and_then(|p| p.advertised.clone())
                .or(default.peers.advertised),
            reconnect_interval_secs: partial
                .peers
                .as_ref()
                .and_then(|p| p.reconnect_interval_secs)
                .unwrap_or(default.peers.reconnect_interval_secs),
        },
        log: LogSettings {
            level: partial
                .log
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.log.level),
        },
    })
}

/// Applies command-line overrides on top of the loaded settings.
///
/// Grammar: `[<port>] [-b <addr:port> [<addr:port> ...] <advertised>]`.
/// The positional port overrides the listen port. Everything after `-b` is a
/// peer address to dial, except the last token, which is this broker's own
/// advertised address; a single token after `-b` is a peer with no
/// advertised address.
pub fn apply_cli_overrides(
    mut settings: Settings,
    args: Vec<String>,
) -> Result<Settings, String> {
    let mut iter = args.into_iter().peekable();

    if let Some(first) = iter.peek() {
        if first != "-b" {
            let port = first
                .parse::<u16>()
                .map_err(|_| format!("invalid port number: {first}"))?;
            settings.server.port = port;
            iter.next();
        }
    }

    match iter.next() {
        None => Ok(settings),
        Some(flag) if flag == "-b" => {
            let mut rest: Vec<String> = iter.collect();
            if rest.is_empty() {
                return Err("-b requires at least one <addr:port>".to_string());
            }
            if rest.len() >= 2 {
                settings.peers.advertised = rest.pop();
            }
            settings.peers.addresses = rest;
            Ok(settings)
        }
        Some(other) => Err(format!("unrecognized argument: {other}")),
    }
}

#[cfg(test)]
mod tests;
