use super::apply_cli_overrides;
use super::settings::Settings;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert!(settings.peers.addresses.is_empty());
    assert_eq!(settings.peers.advertised, None);
    assert_eq!(settings.peers.reconnect_interval_secs, 5);
    assert_eq!(settings.log.level, "info");
}

#[test]
fn test_cli_positional_port() {
    let settings = apply_cli_overrides(Settings::default(), vec!["9100".to_string()]).unwrap();
    assert_eq!(settings.server.port, 9100);
}

#[test]
fn test_cli_peers_and_advertised() {
    let args = ["9100", "-b", "10.0.0.1:9101", "10.0.0.2:9102", "10.0.0.3:9100"]
        .map(str::to_string)
        .to_vec();
    let settings = apply_cli_overrides(Settings::default(), args).unwrap();
    assert_eq!(settings.server.port, 9100);
    assert_eq!(
        settings.peers.addresses,
        vec!["10.0.0.1:9101".to_string(), "10.0.0.2:9102".to_string()]
    );
    assert_eq!(settings.peers.advertised, Some("10.0.0.3:9100".to_string()));
}

#[test]
fn test_cli_single_peer_without_advertised() {
    let args = ["-b", "10.0.0.1:9101"].map(str::to_string).to_vec();
    let settings = apply_cli_overrides(Settings::default(), args).unwrap();
    assert_eq!(settings.peers.addresses, vec!["10.0.0.1:9101".to_string()]);
    assert_eq!(settings.peers.advertised, None);
}

#[test]
fn test_cli_rejects_garbage() {
    assert!(apply_cli_overrides(Settings::default(), vec!["not-a-port".to_string()]).is_err());
    assert!(apply_cli_overrides(Settings::default(), vec!["-b".to_string()]).is_err());
    assert!(
        apply_cli_overrides(
            Settings::default(),
            ["9100", "--verbose"].map(str::to_string).to_vec()
        )
        .is_err()
    );
}
