// ==========================================
// 库存批次分配引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: JSON 文件 (缺失时使用默认值)
// ==========================================

use crate::config::allocator_config::AllocatorConfig;
use crate::domain::types::StockOrdering;
use crate::i18n::SUPPORTED_LOCALES;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "LOT_ALLOCATOR_CONFIG";

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 (path={path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败 (path={path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置值无效 (key={key}): {value}")]
    InvalidValue { key: String, value: String },

    #[error("未知配置键: {0}")]
    UnknownKey(String),

    #[error("配置序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AllocatorConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 从 JSON 文件加载配置
    ///
    /// # 参数
    /// - path: 配置文件路径（不存在时使用默认配置）
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        if !path.exists() {
            tracing::debug!(path = %path_str, "配置文件不存在，使用默认配置");
            return Ok(Self {
                config: AllocatorConfig::default(),
                source: None,
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        let config: AllocatorConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path_str.clone(),
                source,
            })?;
        validate_locale(&config.locale)?;

        tracing::info!(path = %path_str, "配置加载完成");
        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    /// 从默认位置加载配置
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::new(get_default_config_path())
    }

    /// 从已有配置创建（测试/嵌入场景）
    pub fn from_config(config: AllocatorConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// 实际加载的文件（None 表示默认配置）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    // ===== 分配配置 =====

    pub fn allow_backorder(&self) -> bool {
        self.config.allow_backorder
    }

    pub fn stock_ordering(&self) -> StockOrdering {
        self.config.stock_ordering
    }

    pub fn locale(&self) -> &str {
        &self.config.locale
    }

    // ===== 键值访问 =====

    /// 按配置键读取配置值（字符串形式）
    pub fn get_config_value(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            config_keys::ALLOW_BACKORDER => Ok(self.config.allow_backorder.to_string()),
            config_keys::STOCK_ORDERING => Ok(self.config.stock_ordering.to_string()),
            config_keys::LOCALE => Ok(self.config.locale.clone()),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// 按配置键覆写配置值（CLI 参数覆写）
    pub fn set_config_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            config_keys::ALLOW_BACKORDER => {
                self.config.allow_backorder = value.trim().parse().map_err(|_| invalid())?;
            }
            config_keys::STOCK_ORDERING => {
                self.config.stock_ordering = StockOrdering::parse(value).ok_or_else(invalid)?;
            }
            config_keys::LOCALE => {
                validate_locale(value.trim())?;
                self.config.locale = value.trim().to_string();
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        tracing::debug!(key, value, "配置已覆写");
        Ok(())
    }

    /// 获取有效配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(&self.config)?)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::from_config(AllocatorConfig::default())
    }
}

fn validate_locale(locale: &str) -> Result<(), ConfigError> {
    if SUPPORTED_LOCALES.contains(&locale) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: config_keys::LOCALE.to_string(),
            value: locale.to_string(),
        })
    }
}

/// 默认配置文件路径
///
/// 优先级：环境变量 LOT_ALLOCATOR_CONFIG > 用户配置目录 > 当前目录
pub fn get_default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("lot-allocator").join("config.json"),
        None => PathBuf::from("./lot-allocator.json"),
    }
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const ALLOW_BACKORDER: &str = "allow_backorder";
    pub const STOCK_ORDERING: &str = "stock_ordering";
    pub const LOCALE: &str = "locale";
}
