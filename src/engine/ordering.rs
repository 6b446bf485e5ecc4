// ==========================================
// 库存批次分配引擎 - 批次排序
// ==========================================
// 职责: 在自动填充前按配置策略整理库存快照
// 说明: 稳定排序，同键批次保持调用方原顺序；缺日期的批次排在最后
// ==========================================

use crate::domain::stock::StockBatch;
use crate::domain::types::StockOrdering;
use chrono::NaiveDate;
use std::cmp::Ordering;

// ==========================================
// StockSorter - 批次排序器
// ==========================================
pub struct StockSorter {
    // 无状态
}

impl StockSorter {
    pub fn new() -> Self {
        Self {}
    }

    /// 按策略排序库存批次
    ///
    /// - AsSupplied: 原样返回
    /// - Fefo: expiry_date 升序
    /// - Fifo: manufacture_date 升序
    pub fn sort(&self, mut stocks: Vec<StockBatch>, ordering: StockOrdering) -> Vec<StockBatch> {
        match ordering {
            StockOrdering::AsSupplied => {}
            StockOrdering::Fefo => {
                stocks.sort_by(|a, b| compare_dates(a.expiry_date, b.expiry_date));
            }
            StockOrdering::Fifo => {
                stocks.sort_by(|a, b| compare_dates(a.manufacture_date, b.manufacture_date));
            }
        }
        stocks
    }
}

impl Default for StockSorter {
    fn default() -> Self {
        Self::new()
    }
}

// 有日期者优先
fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
