use crate::domain::types::StockOrdering;
use serde::{Deserialize, Serialize};

/// 默认语言
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// 分配器配置（持久化对象）
///
/// 存储位置：JSON 文件（见 [`get_default_config_path`](crate::config::get_default_config_path)）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// 是否允许缺货（自动填充时将不足部分记为缺货行）
    #[serde(default = "default_allow_backorder")]
    pub allow_backorder: bool,

    /// 自动填充前的批次排序策略
    #[serde(default)]
    pub stock_ordering: StockOrdering,

    /// 提示信息语言（zh-CN / en）
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_allow_backorder() -> bool {
    true
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            allow_backorder: default_allow_backorder(),
            stock_ordering: StockOrdering::default(),
            locale: default_locale(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AllocatorConfig = serde_json::from_str(r#"{"stock_ordering":"FEFO"}"#).unwrap();
        assert!(config.allow_backorder);
        assert_eq!(config.stock_ordering, StockOrdering::Fefo);
        assert_eq!(config.locale, "zh-CN");
    }
}
