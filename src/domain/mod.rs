// ==========================================
// 库存批次分配引擎 - 领域模型层
// ==========================================
// 职责: 定义库存批次、分配行、分配集等领域实体与类型
// 红线: 不含 I/O，不含引擎逻辑
// ==========================================

pub mod allocation;
pub mod stock;
pub mod types;

// 重导出核心类型
pub use allocation::{
    AllocationLine, AllocationRecord, AllocationRequest, AllocationSet, AllocationSummary,
    RegularLine,
};
pub use stock::{total_available, StockBatch};
pub use types::{AllocatorPhase, LineRef, StockOrdering};
