// ==========================================
// 库存批次分配引擎 - 领域类型定义
// ==========================================
// 职责: 分配器状态、批次排序策略、分配行引用
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 分配器阶段 (Allocator Phase)
// ==========================================
// Closed → Initializing → Editing → {Saved | Cancelled} → Closed
// 只有 Editing 阶段允许修改分配集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocatorPhase {
    Closed,       // 未打开
    Initializing, // 自动填充 / 回填中
    Editing,      // 编辑中
    Saved,        // 已保存（已交付调用方）
    Cancelled,    // 已取消（已丢弃）
}

impl AllocatorPhase {
    /// 是否为终止态（保存或取消）
    pub fn is_terminal(&self) -> bool {
        matches!(self, AllocatorPhase::Saved | AllocatorPhase::Cancelled)
    }
}

impl fmt::Display for AllocatorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocatorPhase::Closed => write!(f, "CLOSED"),
            AllocatorPhase::Initializing => write!(f, "INITIALIZING"),
            AllocatorPhase::Editing => write!(f, "EDITING"),
            AllocatorPhase::Saved => write!(f, "SAVED"),
            AllocatorPhase::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ==========================================
// 批次排序策略 (Stock Ordering)
// ==========================================
// 默认保持调用方给定顺序；FEFO/FIFO 仅在配置显式指定时生效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockOrdering {
    #[default]
    AsSupplied, // 调用方顺序
    Fefo,       // 先到期先出
    Fifo,       // 先生产先出
}

impl StockOrdering {
    /// 从字符串解析（兼容 CLI 参数与配置值）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "AS_SUPPLIED" => Some(StockOrdering::AsSupplied),
            "FEFO" => Some(StockOrdering::Fefo),
            "FIFO" => Some(StockOrdering::Fifo),
            _ => None,
        }
    }
}

impl fmt::Display for StockOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockOrdering::AsSupplied => write!(f, "AS_SUPPLIED"),
            StockOrdering::Fefo => write!(f, "FEFO"),
            StockOrdering::Fifo => write!(f, "FIFO"),
        }
    }
}

// ==========================================
// 分配行引用 (Line Reference)
// ==========================================
// 编辑/删除操作用于定位分配行
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "batch_id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineRef {
    Batch(String),
    Backorder,
}

impl LineRef {
    pub fn batch(id: impl Into<String>) -> Self {
        LineRef::Batch(id.into())
    }
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineRef::Batch(id) => write!(f, "BATCH({})", id),
            LineRef::Backorder => write!(f, "BACKORDER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_ordering_parse() {
        assert_eq!(StockOrdering::parse("fefo"), Some(StockOrdering::Fefo));
        assert_eq!(StockOrdering::parse("as-supplied"), Some(StockOrdering::AsSupplied));
        assert_eq!(StockOrdering::parse(" FIFO "), Some(StockOrdering::Fifo));
        assert_eq!(StockOrdering::parse("lifo"), None);
    }

    #[test]
    fn test_phase_terminal() {
        assert!(AllocatorPhase::Saved.is_terminal());
        assert!(AllocatorPhase::Cancelled.is_terminal());
        assert!(!AllocatorPhase::Editing.is_terminal());
        assert_eq!(AllocatorPhase::Initializing.to_string(), "INITIALIZING");
    }
}
