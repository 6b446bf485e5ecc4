// ==========================================
// 库存批次分配引擎 - 字段映射器
// ==========================================
// 职责: 源字段 → StockBatch 映射 + 类型转换
// 说明: 列名支持中英文别名
// ==========================================

use crate::domain::stock::StockBatch;
use crate::importer::error::{ImportResult, StockImportError};
use chrono::NaiveDate;
use std::collections::HashMap;

/// 标准字段名
pub mod fields {
    pub const ID: &str = "id";
    pub const LOT_NUMBER: &str = "lot_number";
    pub const AVAILABLE_QUANTITY: &str = "available_quantity";
    pub const EXPIRY_DATE: &str = "expiry_date";
    pub const MANUFACTURE_DATE: &str = "manufacture_date";
}

pub struct FieldMapper;

impl FieldMapper {
    /// 将一行源数据映射为库存批次
    ///
    /// # 参数
    /// - row: 列名 → 值
    /// - row_number: 源文件行号（从 1 开始，不含表头）
    pub fn map_to_stock_batch(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<StockBatch> {
        let id = self
            .get_string(row, fields::ID)
            .ok_or(StockImportError::PrimaryKeyMissing(row_number))?;

        Ok(StockBatch {
            lot_number: self.get_string(row, fields::LOT_NUMBER).unwrap_or_else(|| id.clone()),
            available_quantity: self
                .parse_u64(row, fields::AVAILABLE_QUANTITY, row_number)?
                .unwrap_or(0),
            expiry_date: self.parse_date(row, fields::EXPIRY_DATE, row_number)?,
            manufacture_date: self.parse_date(row, fields::MANUFACTURE_DATE, row_number)?,
            id,
        })
    }

    /// 提取字符串字段（空白视为缺失），支持多个可能的列名（别名）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        let aliases: &[&str] = match key {
            fields::ID => &["id", "batch_id", "批次ID", "批次号"],
            fields::LOT_NUMBER => &["lot_number", "lot", "批号"],
            fields::AVAILABLE_QUANTITY => &["available_quantity", "quantity", "可用数量"],
            fields::EXPIRY_DATE => &["expiry_date", "到期日", "有效期至"],
            fields::MANUFACTURE_DATE => &["manufacture_date", "生产日期"],
            _ => &[],
        };

        aliases
            .iter()
            .filter_map(|alias| row.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn parse_u64(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<u64>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => value.parse::<u64>().map(Some).map_err(|e| {
                StockImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("{} ({})", e, value),
                }
            }),
        }
    }

    fn parse_date(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<NaiveDate>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(&value, "%Y%m%d"))
                .map(Some)
                .map_err(|_| StockImportError::DateFormatError {
                    row: row_number,
                    field: key.to_string(),
                    value,
                }),
        }
    }
}
