// ==========================================
// 库存批次分配引擎 - 分配错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 所有错误均为可就地恢复的用户输入问题，保存是全有或全无
// ==========================================

use crate::domain::types::AllocatorPhase;
use crate::i18n::{t, t_with_args};
use thiserror::Error;

/// 分配引擎错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    // ===== 保存校验错误 =====
    #[error("分配不足: 还需分配 {shortfall}")]
    UnderAllocated { shortfall: u64 },

    #[error("分配超量: 超出 {excess}")]
    OverAllocated { excess: u64 },

    #[error("分配为空: 保存前请先分配库存")]
    EmptyAllocation,

    // ===== 引用错误 =====
    #[error("批次不存在: {0}")]
    BatchNotFound(String),

    #[error("分配行不存在: {0}")]
    LineNotFound(String),

    // ===== 状态机错误 =====
    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition {
        from: AllocatorPhase,
        to: AllocatorPhase,
    },
}

impl AllocationError {
    /// 面向用户的本地化提示
    pub fn user_message(&self) -> String {
        match self {
            AllocationError::UnderAllocated { shortfall } => t_with_args(
                "allocation.under_allocated",
                &[("count", &shortfall.to_string())],
            ),
            AllocationError::OverAllocated { excess } => t_with_args(
                "allocation.over_allocated",
                &[("count", &excess.to_string())],
            ),
            AllocationError::EmptyAllocation => t("allocation.empty"),
            AllocationError::BatchNotFound(id) => {
                t_with_args("allocation.batch_not_found", &[("id", id)])
            }
            AllocationError::LineNotFound(line) => {
                t_with_args("allocation.line_not_found", &[("line", line)])
            }
            AllocationError::InvalidStateTransition { from, to } => t_with_args(
                "allocation.invalid_transition",
                &[("from", &from.to_string()), ("to", &to.to_string())],
            ),
        }
    }

    /// 是否为保存校验失败（用户调整后可重试）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AllocationError::UnderAllocated { .. }
                | AllocationError::OverAllocated { .. }
                | AllocationError::EmptyAllocation
        )
    }
}

/// 分配引擎结果类型
pub type AllocationResult<T> = Result<T, AllocationError>;
