// ==========================================
// 库存批次分配引擎 - 核心库
// ==========================================
// 职责: 为销售/出库行选择批次并对不足部分记缺货
// 定位: 进程内组件，不做 I/O，结果以纯数据交还调用方
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 分配规则
pub mod engine;

// 导入层 - 库存快照文件
pub mod importer;

// 配置层 - 分配器配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AllocatorPhase, LineRef, StockOrdering};

// 领域实体
pub use domain::{
    AllocationLine, AllocationRecord, AllocationRequest, AllocationSet, AllocationSummary,
    RegularLine, StockBatch,
};

// 引擎
pub use engine::{
    AllocationError, AllocationResult, AutoPopulator, StockAllocator, StockSorter,
};

// 配置
pub use config::{AllocatorConfig, ConfigManager};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存批次分配引擎";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
