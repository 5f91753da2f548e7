// Integration tests for the draft board scaffold.

use std::path::Path;

/// Verify that config/server.toml is valid TOML.
#[test]
fn server_toml_is_valid() {
    let content = std::fs::read_to_string("config/server.toml")
        .expect("config/server.toml should exist");
    let parsed: Result<toml::Value, _> = toml::from_str(&content);
    assert!(
        parsed.is_ok(),
        "config/server.toml is not valid TOML: {:?}",
        parsed.err()
    );
}

/// Verify that the shipped config file loads and matches the built-in
/// defaults it documents.
#[test]
fn server_toml_matches_builtin_defaults() {
    let from_file = draft_board::config::load_config_from(Path::new("."))
        .expect("shipped config should load");

    assert_eq!(from_file.server.bind, "127.0.0.1");
    assert_eq!(from_file.server.port, 5000);
    assert_eq!(from_file.storage.path, "draft_data.json");
    assert_eq!(
        from_file.upstream.players_url,
        "https://fantasy.nrl.com/data/nrl/players.json"
    );
}
