// ==========================================
// 库存批次分配引擎 - 引擎层
// ==========================================
// 职责: 自动填充、交互编辑、保存校验
// 红线: 引擎不做 I/O，批次快照由调用方加载，结果以纯数据交还调用方
// ==========================================

pub mod allocator;
pub mod auto_populate;
pub mod error;
pub mod events;
pub mod ordering;
pub mod rehydrate;
pub mod validation;

// 重导出核心引擎
pub use allocator::StockAllocator;
pub use auto_populate::AutoPopulator;
pub use error::{AllocationError, AllocationResult};
pub use events::{
    AllocationEvent, AllocationEventPublisher, AllocationEventType, NoOpEventPublisher,
    OptionalEventPublisher,
};
pub use ordering::StockSorter;
pub use rehydrate::rehydrate;
pub use validation::AllocationValidator;
