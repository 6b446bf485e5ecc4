// ==========================================
// 库存批次分配引擎 - 导入层
// ==========================================
// 职责: 从 CSV / JSON 文件加载库存快照（供命令行使用）
// 红线: 只产出 StockBatch，不参与分配逻辑
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;

pub use error::{ImportResult, StockImportError};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, StockSnapshotLoader};
