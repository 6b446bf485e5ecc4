// ==========================================
// 库存批次分配引擎 - 配置层
// ==========================================
// 职责: 分配器配置管理，支持文件加载与键值覆写
// 存储: JSON 文件
// ==========================================

pub mod allocator_config;
pub mod config_manager;

// 重导出核心配置管理器
pub use allocator_config::AllocatorConfig;
pub use config_manager::{config_keys, get_default_config_path, ConfigError, ConfigManager};
