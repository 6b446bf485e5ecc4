// ==========================================
// 库存批次分配引擎 - 库存快照导入错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 库存快照导入错误类型
#[derive(Error, Debug)]
pub enum StockImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.json）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(#[from] csv::Error),

    #[error("JSON 解析失败: {0}")]
    JsonParseError(#[from] serde_json::Error),

    // ===== 数据映射错误 =====
    #[error("主键缺失 (行 {0}): 批次ID为空")]
    PrimaryKeyMissing(usize),

    #[error("类型转换失败 (行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("日期格式错误 (行 {row}, 字段 {field}): 期望 YYYY-MM-DD 或 YYYYMMDD，实际 {value}")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },

    #[error("批次ID重复 (行 {row}): {id}")]
    DuplicateBatch { row: usize, id: String },
}

/// 导入结果类型
pub type ImportResult<T> = Result<T, StockImportError>;
