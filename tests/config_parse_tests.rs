use std::path::PathBuf;

use receipt_book::config::Config;

#[test]
fn parses_directories() {
    let toml = r#"
[storage]
data_dir = "/var/lib/receipts"

[export]
output_dir = "out"
"#;
    let cfg = Config::from_toml(toml).unwrap();
    assert_eq!(cfg.storage.data_dir, PathBuf::from("/var/lib/receipts"));
    assert_eq!(cfg.export.output_dir, PathBuf::from("out"));
}

#[test]
fn missing_sections_use_defaults() {
    let cfg = Config::from_toml("[export]\noutput_dir = \"pdf\"\n").unwrap();
    assert_eq!(cfg.storage.data_dir, PathBuf::from("receipts"));
    assert_eq!(cfg.export.output_dir, PathBuf::from("pdf"));
}

#[test]
fn missing_file_is_default() {
    let path = std::env::temp_dir().join(format!("missing_{}.toml", uuid::Uuid::new_v4()));
    assert_eq!(Config::load(&path).unwrap(), Config::default());
}

#[test]
fn invalid_toml_fails() {
    let result = Config::from_toml("[storage\ndata_dir = 3");
    assert!(result.is_err(), "Malformed config should fail");
}
