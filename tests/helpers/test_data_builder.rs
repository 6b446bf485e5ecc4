// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use lot_allocator::{
    AllocationLine, AllocationRequest, AllocatorConfig, ConfigManager, StockAllocator, StockBatch,
};

// ==========================================
// StockBatch 构建器
// ==========================================

pub struct StockBuilder {
    id: String,
    lot_number: Option<String>,
    available_quantity: u64,
    expiry_date: Option<NaiveDate>,
    manufacture_date: Option<NaiveDate>,
}

impl StockBuilder {
    pub fn new(id: &str, available_quantity: u64) -> Self {
        Self {
            id: id.to_string(),
            lot_number: None,
            available_quantity,
            expiry_date: None,
            manufacture_date: None,
        }
    }

    pub fn lot(mut self, lot_number: &str) -> Self {
        self.lot_number = Some(lot_number.to_string());
        self
    }

    pub fn expires(mut self, date: NaiveDate) -> Self {
        self.expiry_date = Some(date);
        self
    }

    pub fn manufactured(mut self, date: NaiveDate) -> Self {
        self.manufacture_date = Some(date);
        self
    }

    pub fn build(self) -> StockBatch {
        StockBatch {
            lot_number: self.lot_number.unwrap_or_else(|| format!("LOT-{}", self.id)),
            id: self.id,
            available_quantity: self.available_quantity,
            expiry_date: self.expiry_date,
            manufacture_date: self.manufacture_date,
        }
    }
}

/// 快速构建批次列表: [("A", 4), ("B", 3)]
pub fn stocks(entries: &[(&str, u64)]) -> Vec<StockBatch> {
    entries.iter()
        .map(|(id, qty)| StockBuilder::new(id, *qty).build())
        .collect()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

// ==========================================
// 分配器构建
// ==========================================

pub fn allocator_with(config: AllocatorConfig) -> StockAllocator {
    lot_allocator::logging::init_test();
    StockAllocator::new(&ConfigManager::from_config(config))
}

/// 使用默认配置（允许缺货、保持调用方顺序）打开分配器
pub fn open_default(required: u64, batches: Vec<StockBatch>) -> StockAllocator {
    lot_allocator::logging::init_test();
    let mut allocator = StockAllocator::default();
    allocator
        .open(AllocationRequest::new(required, batches))
        .expect("open should succeed from Closed");
    allocator
}

/// 分配行简写: (批次ID 或 "BACKORDER", 数量)
pub fn line_view(allocator: &StockAllocator) -> Vec<(String, u64)> {
    allocator
        .lines()
        .iter()
        .map(|line| match line {
            AllocationLine::Regular(l) => (l.batch_id.clone(), l.quantity),
            AllocationLine::Backorder { quantity } => ("BACKORDER".to_string(), *quantity),
        })
        .collect()
}

pub fn view(entries: &[(&str, u64)]) -> Vec<(String, u64)> {
    entries.iter().map(|(id, q)| (id.to_string(), *q)).collect()
}
