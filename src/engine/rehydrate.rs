// ==========================================
// 库存批次分配引擎 - 已保存分配回填
// ==========================================
// 用途: 编辑已保存的分配时，将扁平记录恢复为分配集
// 规则:
// - 按批次ID匹配库存快照以恢复可用量；快照中不存在的批次以已存数量作为可用量（已预留）
// - 重复批次合并为一行；多条缺货记录合并为一行
// - 数量按原值保留，不重新裁剪
// ==========================================

use crate::domain::allocation::{AllocationRecord, AllocationSet, RegularLine};
use crate::domain::stock::StockBatch;
use tracing::debug;

pub fn rehydrate(records: &[AllocationRecord], stocks: &[StockBatch]) -> AllocationSet {
    let mut set = AllocationSet::new();
    let mut backorder: Option<u64> = None;

    for record in records {
        if record.is_backorder() {
            backorder = Some(backorder.unwrap_or(0).saturating_add(record.quantity));
            continue;
        }

        let batch_id = record.legacy_batch_id();
        let line = match stocks.iter().find(|s| s.id == batch_id) {
            Some(batch) => RegularLine::from_batch(batch, record.quantity),
            None => {
                debug!(batch_id, "rehydrated batch missing from snapshot");
                // 已预留量为该批次所有记录之和
                let reserved = set
                    .find_regular(batch_id)
                    .map_or(0, |l| l.available_quantity)
                    .saturating_add(record.quantity);
                RegularLine {
                    batch_id: batch_id.to_string(),
                    lot_number: record.lot_number.clone().unwrap_or_default(),
                    available_quantity: reserved,
                    quantity: record.quantity,
                }
            }
        };
        set.merge_regular(line);
    }

    if let Some(quantity) = backorder {
        set.set_backorder(quantity);
    }
    set
}
