// ==========================================
// 库存批次分配引擎 - 分配领域模型
// ==========================================
// 红线: 同一批次至多一行（添加时合并）
// 红线: 缺货行至多一行且始终位于末尾（结构保证，不做运行时检查）
// ==========================================

use crate::domain::stock::StockBatch;
use serde::{Deserialize, Serialize};

// ==========================================
// RegularLine - 常规分配行（引用真实批次）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegularLine {
    pub batch_id: String,        // 批次ID
    pub lot_number: String,      // 批号
    pub available_quantity: u64, // 批次可用量（编辑上限）
    pub quantity: u64,           // 本次分配数量
}

impl RegularLine {
    pub fn from_batch(batch: &StockBatch, quantity: u64) -> Self {
        Self {
            batch_id: batch.id.clone(),
            lot_number: batch.lot_number.clone(),
            available_quantity: batch.available_quantity,
            quantity,
        }
    }

    /// 该批次还可追加的数量
    pub fn headroom(&self) -> u64 {
        self.available_quantity.saturating_sub(self.quantity)
    }
}

// ==========================================
// AllocationLine - 分配行（常规 / 缺货）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationLine {
    Regular(RegularLine),
    Backorder { quantity: u64 },
}

impl AllocationLine {
    pub fn quantity(&self) -> u64 {
        match self {
            AllocationLine::Regular(line) => line.quantity,
            AllocationLine::Backorder { quantity } => *quantity,
        }
    }

    pub fn is_backorder(&self) -> bool {
        matches!(self, AllocationLine::Backorder { .. })
    }

    pub fn batch_id(&self) -> Option<&str> {
        match self {
            AllocationLine::Regular(line) => Some(line.batch_id.as_str()),
            AllocationLine::Backorder { .. } => None,
        }
    }

    pub fn to_record(&self) -> AllocationRecord {
        match self {
            AllocationLine::Regular(line) => AllocationRecord {
                batch_id: Some(line.batch_id.clone()),
                lot_number: Some(line.lot_number.clone()),
                quantity: line.quantity,
            },
            AllocationLine::Backorder { quantity } => AllocationRecord::backorder(*quantity),
        }
    }
}

// ==========================================
// AllocationSet - 分配集
// ==========================================
// 常规行保持插入顺序；缺货行单独存放，输出时追加在末尾
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSet {
    regular: Vec<RegularLine>,
    backorder: Option<u64>,
}

impl AllocationSet {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== 查询 =====

    pub fn regular_lines(&self) -> &[RegularLine] {
        &self.regular
    }

    pub fn backorder_quantity(&self) -> Option<u64> {
        self.backorder
    }

    pub fn has_backorder(&self) -> bool {
        self.backorder.is_some()
    }

    pub fn len(&self) -> usize {
        self.regular.len() + usize::from(self.backorder.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find_regular(&self, batch_id: &str) -> Option<&RegularLine> {
        self.regular.iter().find(|l| l.batch_id == batch_id)
    }

    pub fn total_allocated(&self) -> u64 {
        self.regular
            .iter()
            .map(|l| l.quantity)
            .chain(self.backorder)
            .fold(0u64, |acc, q| acc.saturating_add(q))
    }

    /// 有效行数（数量 > 0）
    pub fn positive_line_count(&self) -> usize {
        self.lines().iter().filter(|l| l.quantity() > 0).count()
    }

    /// 按展示顺序输出全部分配行（缺货行在末尾）
    pub fn lines(&self) -> Vec<AllocationLine> {
        let mut lines: Vec<AllocationLine> = self
            .regular
            .iter()
            .cloned()
            .map(AllocationLine::Regular)
            .collect();
        if let Some(quantity) = self.backorder {
            lines.push(AllocationLine::Backorder { quantity });
        }
        lines
    }

    /// 输出交付给调用方的记录（过滤数量为 0 的行）
    pub fn to_records(&self) -> Vec<AllocationRecord> {
        self.lines()
            .iter()
            .filter(|l| l.quantity() > 0)
            .map(AllocationLine::to_record)
            .collect()
    }

    // ===== 修改 =====

    /// 追加常规行；批次已存在时合并数量（同一批次至多一行）
    pub fn merge_regular(&mut self, line: RegularLine) {
        match self.regular.iter_mut().find(|l| l.batch_id == line.batch_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                existing.available_quantity = existing.available_quantity.max(line.available_quantity);
            }
            None => self.regular.push(line),
        }
    }

    pub fn find_regular_mut(&mut self, batch_id: &str) -> Option<&mut RegularLine> {
        self.regular.iter_mut().find(|l| l.batch_id == batch_id)
    }

    pub fn remove_regular(&mut self, batch_id: &str) -> Option<RegularLine> {
        let idx = self.regular.iter().position(|l| l.batch_id == batch_id)?;
        Some(self.regular.remove(idx))
    }

    pub fn set_backorder(&mut self, quantity: u64) {
        self.backorder = Some(quantity);
    }

    pub fn take_backorder(&mut self) -> Option<u64> {
        self.backorder.take()
    }
}

// ==========================================
// AllocationRecord - 交付给调用方的扁平记录
// ==========================================
// batch_id = None 表示缺货
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    #[serde(default)]
    pub batch_id: Option<String>,
    #[serde(default)]
    pub lot_number: Option<String>,
    pub quantity: u64,
}

impl AllocationRecord {
    pub fn regular(batch_id: impl Into<String>, lot_number: impl Into<String>, quantity: u64) -> Self {
        Self {
            batch_id: Some(batch_id.into()),
            lot_number: Some(lot_number.into()),
            quantity,
        }
    }

    pub fn backorder(quantity: u64) -> Self {
        Self {
            batch_id: None,
            lot_number: None,
            quantity,
        }
    }

    /// 旧数据兼容：空批次ID（或空字符串）视为缺货
    pub fn is_backorder(&self) -> bool {
        self.batch_id.as_deref().map_or(true, str::is_empty)
    }

    /// 旧格式批次ID（缺货为空字符串）
    pub fn legacy_batch_id(&self) -> &str {
        self.batch_id.as_deref().unwrap_or("")
    }
}

// ==========================================
// AllocationRequest - 打开分配器的输入
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub required_quantity: u64,
    #[serde(default)]
    pub available_stocks: Vec<StockBatch>,
    #[serde(default)]
    pub existing_allocation: Option<Vec<AllocationRecord>>,
}

impl AllocationRequest {
    pub fn new(required_quantity: u64, available_stocks: Vec<StockBatch>) -> Self {
        Self {
            required_quantity,
            available_stocks,
            existing_allocation: None,
        }
    }

    pub fn with_existing(mut self, existing: Vec<AllocationRecord>) -> Self {
        self.existing_allocation = Some(existing);
        self
    }
}

// ==========================================
// AllocationSummary - 派生汇总值
// ==========================================
// 每次变更后由分配集重新计算，不单独存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub required_quantity: u64,
    pub total_allocated: u64,
    pub remaining: i64, // required - allocated，可为负（超量）
    pub has_backorder: bool,
    pub total_available: u64,
    pub backorder_toggle_visible: bool, // 库存不足时才展示缺货开关
}

impl AllocationSummary {
    pub fn compute(required_quantity: u64, set: &AllocationSet, total_available: u64) -> Self {
        let total_allocated = set.total_allocated();
        Self {
            required_quantity,
            total_allocated,
            remaining: signed_diff(required_quantity, total_allocated),
            has_backorder: set.has_backorder(),
            total_available,
            backorder_toggle_visible: total_available < required_quantity,
        }
    }

    /// 未分配数量（不足部分，非负）
    pub fn shortfall(&self) -> u64 {
        self.remaining.max(0).unsigned_abs()
    }
}

fn signed_diff(a: u64, b: u64) -> i64 {
    if a >= b {
        i64::try_from(a - b).unwrap_or(i64::MAX)
    } else {
        i64::try_from(b - a).map(|d| -d).unwrap_or(i64::MIN)
    }
}
