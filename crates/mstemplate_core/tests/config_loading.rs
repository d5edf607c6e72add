use mstemplate_core::{read_config, ConfigError, StoreKind};
use std::io::Write;
use std::path::Path;

#[test]
fn read_config_parses_store_and_logging_sections() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "storeConfig:
  type: sqlite
  host: localhost
  port: 3306
  path: /var/lib/mstemplate/examples.sqlite3
logging:
  level: info
  dir: /var/log/mstemplate"
    )
    .unwrap();

    let config = read_config(file.path()).unwrap();
    assert_eq!(config.store_config.kind, StoreKind::Sqlite);
    assert_eq!(
        config.store_config.endpoint().as_deref(),
        Some("localhost:3306")
    );
    assert_eq!(
        config.store_config.path.as_deref(),
        Some(Path::new("/var/lib/mstemplate/examples.sqlite3"))
    );
    let logging = config.logging.unwrap();
    assert_eq!(logging.level, "info");
    assert_eq!(logging.dir, Path::new("/var/log/mstemplate"));
}

#[test]
fn read_config_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yml");

    let err = read_config(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Read { ref path, .. } if path == &missing));
}

#[test]
fn read_config_reports_invalid_yaml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "storeConfig: [not, a, map]").unwrap();

    let err = read_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("invalid config"));
}
