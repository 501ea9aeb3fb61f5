//! Integration tests for configuration file loading

use std::fs;
use std::time::Duration;

use subnet_client::config::loader::{ConfigFormat, ConfigLoader};
use subnet_client::config::{Config, ConfigError};
use subnet_client::Error;
use tempfile::TempDir;

#[test]
fn test_load_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[connection]
host = "bbs.example.net"
port = 4000
nickname = "zero_cool"
connect_timeout_secs = 0

[ui]
font_size = 16.0
show_timestamps = true
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.connection.host, "bbs.example.net");
    assert_eq!(config.connection.port, 4000);
    assert_eq!(config.connection.nickname, "zero_cool");
    assert_eq!(config.connection.connect_timeout(), None);
    assert_eq!(config.ui.font_size, 16.0);
    assert!(config.ui.show_timestamps);
    // Untouched keys keep their defaults
    assert_eq!(config.ui.scrollback_lines, 5000);
}

#[test]
fn test_load_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("subnet.json");
    fs::write(&path, r#"{"connection": {"port": 2424, "connect_timeout_secs": 3}}"#).unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.connection.port, 2424);
    assert_eq!(config.connection.host, "127.0.0.1");
    assert_eq!(config.connection.connect_timeout(), Some(Duration::from_secs(3)));
}

#[test]
fn test_default_request_from_config() {
    let config = ConfigLoader::parse("[connection]\nnickname = \"  \"\n", ConfigFormat::Toml).unwrap();
    let request = config.connection.default_request();
    assert_eq!(request.peer_label(), "127.0.0.1:2323");
    assert_eq!(request.nick_command(), "/nick guest");
}

#[test]
fn test_invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();

    let cases = [
        ("[connection]\nport = 0\n", ConfigError::InvalidPort),
        ("[connection]\nhost = \" \"\n", ConfigError::EmptyHost),
        ("[ui]\nfont_size = 4.0\n", ConfigError::InvalidFontSize(4.0)),
        ("[ui]\nscrollback_lines = 0\n", ConfigError::InvalidScrollbackLines(0)),
    ];

    for (i, (content, expected)) in cases.iter().enumerate() {
        let path = dir.path().join(format!("case{}.toml", i));
        fs::write(&path, content).unwrap();
        match ConfigLoader::load_from_file(&path) {
            Err(Error::ConfigValidation(err)) => assert_eq!(&err, expected),
            other => panic!("expected validation error for {:?}, got {:?}", content, other),
        }
    }
}

#[test]
fn test_nickname_with_spaces_is_rejected() {
    let config = ConfigLoader::parse("[connection]\nnickname = \"two words\"\n", ConfigFormat::Toml)
        .unwrap();
    assert_eq!(
        config.validate(),
        Err(ConfigError::InvalidNickname("two words".to_string()))
    );
}

#[test]
fn test_malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[connection\nhost = ").unwrap();

    let err = ConfigLoader::load_from_file(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigParseFailed { .. }));
    assert_eq!(err.title(), "Configuration error");
}

#[test]
fn test_missing_file_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::ConfigLoadFailed { .. }));
}

#[test]
fn test_search_paths_first_existing_wins() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");
    let first = dir.path().join("first.toml");
    let second = dir.path().join("second.toml");
    fs::write(&first, "[connection]\nport = 1111\n").unwrap();
    fs::write(&second, "[connection]\nport = 2222\n").unwrap();

    let loader = ConfigLoader::with_search_paths(vec![missing, first.clone(), second]);
    let runtime_config = loader.load().unwrap();
    assert_eq!(runtime_config.config().connection.port, 1111);
    assert_eq!(runtime_config.source(), Some(first.as_path()));
}

#[test]
fn test_no_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_search_paths(vec![dir.path().join("nothing.toml")]);

    let runtime_config = loader.load().unwrap();
    assert!(runtime_config.source().is_none());
    assert_eq!(runtime_config.config(), &Config::default());
}

#[test]
fn test_invalid_candidate_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[ui]\nwindow_width = 10.0\n").unwrap();

    let loader = ConfigLoader::with_search_paths(vec![path]);
    assert!(matches!(
        loader.load(),
        Err(Error::ConfigValidation(ConfigError::InvalidWindowSize(..)))
    ));
}

#[test]
fn test_default_config_roundtrips_through_toml() {
    let text = toml::to_string(&Config::default()).unwrap();
    let parsed = ConfigLoader::parse(&text, ConfigFormat::Toml).unwrap();
    assert_eq!(parsed, Config::default());
}
