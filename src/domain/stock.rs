// ==========================================
// 库存批次分配引擎 - 库存批次模型
// ==========================================
// 用途: 调用方提供的现有库存快照（已按产品/库位过滤）
// 红线: 分配器只读，不修改批次数量
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// StockBatch - 库存批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBatch {
    pub id: String,                          // 批次唯一标识
    pub lot_number: String,                  // 批号
    pub available_quantity: u64,             // 可用数量
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,      // 到期日
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>, // 生产日期
}

impl StockBatch {
    /// 创建不含日期信息的批次
    pub fn new(id: impl Into<String>, lot_number: impl Into<String>, available_quantity: u64) -> Self {
        Self {
            id: id.into(),
            lot_number: lot_number.into(),
            available_quantity,
            expiry_date: None,
            manufacture_date: None,
        }
    }

    pub fn with_expiry(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    pub fn with_manufacture(mut self, manufacture_date: NaiveDate) -> Self {
        self.manufacture_date = Some(manufacture_date);
        self
    }
}

/// 库存快照的可用总量
pub fn total_available(stocks: &[StockBatch]) -> u64 {
    stocks
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.available_quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_available() {
        let stocks = vec![StockBatch::new("A", "LOT-A", 4), StockBatch::new("B", "LOT-B", 3)];
        assert_eq!(total_available(&stocks), 7);
        assert_eq!(total_available(&[]), 0);
    }

    #[test]
    fn test_deserialize_without_dates() {
        let json = r#"{"id":"A","lot_number":"LOT-A","available_quantity":4}"#;
        let batch: StockBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch, StockBatch::new("A", "LOT-A", 4));
    }
}
