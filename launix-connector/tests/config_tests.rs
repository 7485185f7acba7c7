use launix_connector::{ConnectorConfig, ConnectorError};
use std::io::Write;
use std::time::Duration;

// ── Defaults ────────────────────────────────────────────────────

#[test]
fn defaults_point_at_standard_endpoints() {
    let cfg = ConnectorConfig::default();
    assert_eq!(cfg.descriptor_path, "FOP/Index/api");
    assert_eq!(cfg.tables_api_path, "TablesAPI");
    assert_eq!(cfg.timeout(), Duration::from_secs(60));
    assert!(cfg.base_url.is_empty());
}

#[test]
fn base_url_is_joined_without_double_slashes() {
    let cfg = ConnectorConfig::new("https://erp.example.com//", "t");
    assert_eq!(cfg.base_url(), "https://erp.example.com");
    assert_eq!(cfg.url("/FOP/Index/api"), "https://erp.example.com/FOP/Index/api");
    assert_eq!(cfg.url("files/1/x"), "https://erp.example.com/files/1/x");
}

#[test]
fn table_paths_encode_the_table() {
    let cfg = ConnectorConfig::new("https://erp.example.com", "t");
    assert_eq!(cfg.table_path("orders", "list"), "TablesAPI/orders/list");
    assert_eq!(cfg.table_path("open items", "view"), "TablesAPI/open%20items/view");
}

#[test]
fn validation_rejects_missing_url_and_zero_timeout() {
    assert!(matches!(
        ConnectorConfig::default().validate(),
        Err(ConnectorError::Config(_))
    ));

    let mut cfg = ConnectorConfig::new("https://erp.example.com", "t");
    assert!(cfg.validate().is_ok());
    cfg.timeout_secs = 0;
    assert!(matches!(cfg.validate(), Err(ConnectorError::Config(_))));
}

// ── TOML loading ────────────────────────────────────────────────

#[test]
fn partial_toml_keeps_defaults() {
    let cfg = ConnectorConfig::from_toml_str(
        r#"
        base_url = "https://erp.example.com"
        token = "abc"
        "#,
    )
    .unwrap();
    assert_eq!(cfg.base_url, "https://erp.example.com");
    assert_eq!(cfg.token, "abc");
    assert_eq!(cfg.descriptor_path, "FOP/Index/api");
    assert_eq!(cfg.timeout_secs, 60);
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "base_url = \"https://erp.example.com\"").unwrap();
    writeln!(file, "timeout_secs = 5").unwrap();
    writeln!(file, "tables_api_path = \"/api/tables/\"").unwrap();

    let cfg = ConnectorConfig::load(file.path()).unwrap();
    assert_eq!(cfg.timeout(), Duration::from_secs(5));
    assert_eq!(cfg.table_path("orders", "create"), "api/tables/orders/create");
}

#[test]
fn load_reports_missing_file_and_bad_toml() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConnectorConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConnectorError::Config(_)));

    let err = ConnectorConfig::from_toml_str("timeout_secs = \"soon\"").unwrap_err();
    assert!(matches!(err, ConnectorError::Config(_)));
}

#[tokio::test]
async fn connector_refuses_invalid_config() {
    let result = launix_connector::Connector::new(ConnectorConfig::default());
    assert!(matches!(result, Err(ConnectorError::Config(_))));
}
