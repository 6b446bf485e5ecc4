// ==========================================
// 库存批次分配引擎 - 自动填充
// ==========================================
// 输入: 需求数量 + 已排序的库存批次 + 是否允许缺货
// 输出: 初始分配集（无交互）
// 红线: 不改变批次顺序，排序由调用方（或 StockSorter）负责
// ==========================================

use crate::domain::allocation::{AllocationSet, RegularLine};
use crate::domain::stock::StockBatch;
use tracing::{debug, instrument};

// ==========================================
// AutoPopulator - 自动填充引擎
// ==========================================
pub struct AutoPopulator {
    // 无状态引擎，不需要注入依赖
}

impl AutoPopulator {
    pub fn new() -> Self {
        Self {}
    }

    /// 按批次给定顺序贪心填充
    ///
    /// 规则：
    /// 1) 跳过可用量为 0 的批次
    /// 2) 每个批次取 min(可用量, 剩余需求)
    /// 3) 剩余需求归零即停止
    /// 4) 批次耗尽仍有剩余且允许缺货时，追加一行缺货
    ///
    /// 允许缺货时，返回的分配集总量恒等于需求数量。
    #[instrument(skip(self, stocks), fields(batches = stocks.len()))]
    pub fn populate(
        &self,
        required_quantity: u64,
        stocks: &[StockBatch],
        allow_backorder: bool,
    ) -> AllocationSet {
        let mut set = AllocationSet::new();
        let mut remaining = required_quantity;

        for batch in stocks {
            if remaining == 0 {
                break;
            }
            if batch.available_quantity == 0 {
                continue;
            }

            let take = batch.available_quantity.min(remaining);
            set.merge_regular(RegularLine::from_batch(batch, take));
            remaining -= take;
        }

        if remaining > 0 && allow_backorder {
            set.set_backorder(remaining);
        }

        debug!(
            lines = set.len(),
            backorder = set.backorder_quantity().unwrap_or(0),
            unallocated = if allow_backorder { 0 } else { remaining },
            "auto-population finished"
        );
        set
    }
}

impl Default for AutoPopulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::AllocationLine;

    fn batches() -> Vec<StockBatch> {
        vec![StockBatch::new("A", "LOT-A", 4), StockBatch::new("B", "LOT-B", 3)]
    }

    #[test]
    fn test_shortfall_becomes_backorder() {
        let set = AutoPopulator::new().populate(10, &batches(), true);
        let quantities: Vec<u64> = set.lines().iter().map(|l| l.quantity()).collect();
        assert_eq!(quantities, vec![4, 3, 3]);
        assert_eq!(set.find_regular("A").map(|l| l.quantity), Some(4));
        assert_eq!(set.find_regular("B").map(|l| l.quantity), Some(3));
        assert_eq!(set.backorder_quantity(), Some(3));
        assert_eq!(set.total_allocated(), 10);
    }

    #[test]
    fn test_stops_when_satisfied() {
        let set = AutoPopulator::new().populate(5, &batches(), true);
        assert_eq!(set.regular_lines().len(), 2);
        assert_eq!(set.find_regular("B").map(|l| l.quantity), Some(1));
        assert!(!set.has_backorder());

        let set = AutoPopulator::new().populate(4, &batches(), true);
        assert_eq!(set.regular_lines().len(), 1);
    }

    #[test]
    fn test_no_batches_fully_backordered() {
        let set = AutoPopulator::new().populate(6, &[], true);
        assert_eq!(set.lines(), vec![AllocationLine::Backorder { quantity: 6 }]);
    }

    #[test]
    fn test_backorder_disallowed_leaves_gap() {
        let set = AutoPopulator::new().populate(10, &batches(), false);
        assert!(!set.has_backorder());
        assert_eq!(set.total_allocated(), 7);
    }

    #[test]
    fn test_skips_empty_batches() {
        let stocks = vec![
            StockBatch::new("Z", "LOT-Z", 0),
            StockBatch::new("A", "LOT-A", 4),
        ];
        let set = AutoPopulator::new().populate(2, &stocks, true);
        assert!(set.find_regular("Z").is_none());
        assert_eq!(set.find_regular("A").map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_zero_requirement_is_empty() {
        let set = AutoPopulator::new().populate(0, &batches(), true);
        assert!(set.is_empty());
    }
}
