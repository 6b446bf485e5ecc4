// ==========================================
// 库存批次分配引擎 - 分配事件发布
// ==========================================
// 职责: 定义分配会话事件发布 trait
// 说明: 引擎只定义 trait，宿主系统实现适配器（落库、通知等）
// 红线: 发布失败只记录日志，不影响分配操作结果
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

// ==========================================
// 分配事件类型
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationEventType {
    /// 分配器打开（自动填充或回填完成）
    Opened,
    /// 分配已保存并交付调用方
    Saved,
    /// 分配已取消
    Cancelled,
}

impl AllocationEventType {
    pub fn as_str(&self) -> &str {
        match self {
            AllocationEventType::Opened => "Opened",
            AllocationEventType::Saved => "Saved",
            AllocationEventType::Cancelled => "Cancelled",
        }
    }
}

/// 分配事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationEvent {
    /// 分配会话 ID（每次 open 生成）
    pub session_id: Uuid,
    pub event_type: AllocationEventType,
    pub required_quantity: u64,
    /// 分配行数（Saved 时为交付记录数）
    pub line_count: usize,
    /// 缺货数量
    pub backordered_quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

impl AllocationEvent {
    pub fn new(
        session_id: Uuid,
        event_type: AllocationEventType,
        required_quantity: u64,
        line_count: usize,
        backordered_quantity: u64,
    ) -> Self {
        Self {
            session_id,
            event_type,
            required_quantity,
            line_count,
            backordered_quantity,
            occurred_at: Utc::now(),
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 分配事件发布者
pub trait AllocationEventPublisher: Send + Sync {
    fn publish(&self, event: &AllocationEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl AllocationEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: &AllocationEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - session_id={}, event_type={}",
            event.session_id,
            event.event_type.as_str()
        );
        Ok(())
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn AllocationEventPublisher>> 的使用
#[derive(Clone, Default)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn AllocationEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn AllocationEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件；失败时记录 warn 并吞掉错误
    pub fn publish(&self, event: AllocationEvent) {
        let Some(publisher) = &self.inner else {
            return;
        };
        if let Err(e) = publisher.publish(&event) {
            tracing::warn!(
                session_id = %event.session_id,
                event_type = event.event_type.as_str(),
                error = %e,
                "分配事件发布失败"
            );
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl std::fmt::Debug for OptionalEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionalEventPublisher")
            .field("configured", &self.is_configured())
            .finish()
    }
}
