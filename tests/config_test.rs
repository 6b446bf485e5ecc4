// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 配置文件加载、键值覆写与分配器行为联动
// ==========================================

mod helpers;

use helpers::test_data_builder::*;
use lot_allocator::config::{config_keys, ConfigError};
use lot_allocator::{AllocationRequest, ConfigManager, StockAllocator, StockOrdering};
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_file_drives_allocator() {
    let file = config_file(r#"{"allow_backorder": false, "stock_ordering": "FIFO"}"#);
    let config = ConfigManager::new(file.path()).unwrap();
    assert_eq!(config.source(), Some(file.path()));
    assert_eq!(config.locale(), "zh-CN");

    let batches = vec![
        StockBuilder::new("NEW", 5).manufactured(date(2026, 9, 1)).build(),
        StockBuilder::new("OLD", 2).manufactured(date(2026, 1, 1)).build(),
    ];
    let mut allocator = StockAllocator::new(&config);
    allocator.open(AllocationRequest::new(10, batches)).unwrap();

    assert_eq!(line_view(&allocator), view(&[("OLD", 2), ("NEW", 5)]));
    assert!(!allocator.summary().unwrap().has_backorder);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = ConfigManager::new("/nonexistent/lot-allocator/config.json").unwrap();
    assert!(config.source().is_none());
    assert!(config.allow_backorder());
    assert_eq!(config.stock_ordering(), StockOrdering::AsSupplied);
}

#[test]
fn test_malformed_file_is_an_error() {
    let file = config_file("{ not json");
    assert!(matches!(
        ConfigManager::new(file.path()),
        Err(ConfigError::Parse { .. })
    ));

    let file = config_file(r#"{"locale": "fr"}"#);
    assert!(matches!(
        ConfigManager::new(file.path()),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_key_overrides() {
    let mut config = ConfigManager::default();
    config
        .set_config_value(config_keys::STOCK_ORDERING, "fefo")
        .unwrap();
    config
        .set_config_value(config_keys::ALLOW_BACKORDER, "false")
        .unwrap();
    assert_eq!(config.get_config_value(config_keys::STOCK_ORDERING).unwrap(), "FEFO");
    assert_eq!(config.get_config_value(config_keys::ALLOW_BACKORDER).unwrap(), "false");

    assert!(config.set_config_value(config_keys::ALLOW_BACKORDER, "maybe").is_err());
    assert!(config.set_config_value("max_lines", "3").is_err());

    let snapshot: serde_json::Value =
        serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot["stock_ordering"], "FEFO");
}
