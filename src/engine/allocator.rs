// ==========================================
// 库存批次分配引擎 - 分配器（交互状态机）
// ==========================================
// 状态机: Closed → Initializing → Editing → {Saved | Cancelled} → Closed
// 红线:
// - 编辑时裁剪，分配总量永不超过需求数量
// - 同一批次至多一行（添加时合并）
// - 缺货开关为边沿触发，只在开关值变化时增删缺货行
// - 保存全有或全无，失败时状态不变
// ==========================================

use crate::config::ConfigManager;
use crate::domain::allocation::{
    AllocationLine, AllocationRecord, AllocationRequest, AllocationSet, AllocationSummary,
    RegularLine,
};
use crate::domain::stock::{total_available, StockBatch};
use crate::domain::types::{AllocatorPhase, LineRef, StockOrdering};
use crate::engine::auto_populate::AutoPopulator;
use crate::engine::error::{AllocationError, AllocationResult};
use crate::engine::events::{
    AllocationEvent, AllocationEventPublisher, AllocationEventType, OptionalEventPublisher,
};
use crate::engine::ordering::StockSorter;
use crate::engine::rehydrate::rehydrate;
use crate::engine::validation::AllocationValidator;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// AllocationSession - 单次打开的分配会话
// ==========================================
#[derive(Debug, Clone)]
struct AllocationSession {
    id: Uuid,
    required_quantity: u64,
    stocks: Vec<StockBatch>,
    total_available: u64,
    set: AllocationSet,
    include_backorder: bool,
    allow_backorder: bool,
}

impl AllocationSession {
    fn summary(&self) -> AllocationSummary {
        let mut summary =
            AllocationSummary::compute(self.required_quantity, &self.set, self.total_available);
        // 配置禁止缺货时不展示开关
        summary.backorder_toggle_visible &= self.allow_backorder;
        summary
    }

    fn find_batch(&self, batch_id: &str) -> Option<&StockBatch> {
        self.stocks.iter().find(|s| s.id == batch_id)
    }

    fn line_quantity(&self, line: &LineRef) -> Option<u64> {
        match line {
            LineRef::Batch(id) => self.set.find_regular(id).map(|l| l.quantity),
            LineRef::Backorder => self.set.backorder_quantity(),
        }
    }

    fn event(&self, event_type: AllocationEventType, line_count: usize) -> AllocationEvent {
        AllocationEvent::new(
            self.id,
            event_type,
            self.required_quantity,
            line_count,
            self.set.backorder_quantity().unwrap_or(0),
        )
    }
}

// ==========================================
// StockAllocator - 库存批次分配器
// ==========================================
#[derive(Debug)]
pub struct StockAllocator {
    allow_backorder: bool,
    stock_ordering: StockOrdering,
    publisher: OptionalEventPublisher,
    phase: AllocatorPhase,
    session: Option<AllocationSession>,
}

impl StockAllocator {
    /// 构造函数
    ///
    /// # 参数
    /// - `config`: 配置管理器（读取是否允许缺货、批次排序策略）
    pub fn new(config: &ConfigManager) -> Self {
        Self {
            allow_backorder: config.allow_backorder(),
            stock_ordering: config.stock_ordering(),
            publisher: OptionalEventPublisher::none(),
            phase: AllocatorPhase::Closed,
            session: None,
        }
    }

    /// 注入事件发布者
    pub fn with_event_publisher(mut self, publisher: Arc<dyn AllocationEventPublisher>) -> Self {
        self.publisher = OptionalEventPublisher::with_publisher(publisher);
        self
    }

    // ==========================================
    // 生命周期
    // ==========================================

    /// 打开分配器
    ///
    /// 有已保存分配时回填，否则按配置排序后自动填充。
    /// Editing 中不允许重复打开（需先保存或取消）。
    #[instrument(skip(self, request), fields(
        required = request.required_quantity,
        batches = request.available_stocks.len(),
        rehydrate = request.existing_allocation.as_ref().map_or(false, |e| !e.is_empty())
    ))]
    pub fn open(&mut self, request: AllocationRequest) -> AllocationResult<AllocationSummary> {
        if self.phase != AllocatorPhase::Closed && !self.phase.is_terminal() {
            return Err(AllocationError::InvalidStateTransition {
                from: self.phase,
                to: AllocatorPhase::Initializing,
            });
        }
        self.phase = AllocatorPhase::Initializing;

        let AllocationRequest {
            required_quantity,
            available_stocks,
            existing_allocation,
        } = request;

        let stocks = StockSorter::new().sort(available_stocks, self.stock_ordering);
        let set = match existing_allocation {
            Some(records) if !records.is_empty() => rehydrate(&records, &stocks),
            _ => AutoPopulator::new().populate(required_quantity, &stocks, self.allow_backorder),
        };

        let session = AllocationSession {
            id: Uuid::new_v4(),
            required_quantity,
            total_available: total_available(&stocks),
            include_backorder: set.has_backorder(),
            allow_backorder: self.allow_backorder,
            stocks,
            set,
        };
        let summary = session.summary();
        let event = session.event(AllocationEventType::Opened, session.set.len());

        debug!(
            session_id = %session.id,
            lines = session.set.len(),
            remaining = summary.remaining,
            "allocator opened"
        );
        self.session = Some(session);
        self.phase = AllocatorPhase::Editing;
        self.publisher.publish(event);

        Ok(summary)
    }

    /// 取消：丢弃本地状态，不产生输出
    pub fn cancel(&mut self) -> AllocationResult<()> {
        let session = self.take_session(AllocatorPhase::Cancelled)?;
        debug!(session_id = %session.id, "allocator cancelled");
        self.phase = AllocatorPhase::Cancelled;
        self.publisher
            .publish(session.event(AllocationEventType::Cancelled, 0));
        Ok(())
    }

    /// 保存：校验通过后过滤 0 数量行并交付调用方，随后丢弃本地状态
    ///
    /// 校验失败时保持 Editing，分配集不变。
    pub fn save(&mut self) -> AllocationResult<Vec<AllocationRecord>> {
        self.validate()?;

        let session = self.take_session(AllocatorPhase::Saved)?;
        let records = session.set.to_records();
        info!(
            session_id = %session.id,
            required = session.required_quantity,
            records = records.len(),
            backorder = session.set.backorder_quantity().unwrap_or(0),
            "allocation saved"
        );
        self.phase = AllocatorPhase::Saved;
        self.publisher
            .publish(session.event(AllocationEventType::Saved, records.len()));

        Ok(records)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 当前阶段；Saved / Cancelled 保留到下次 open
    pub fn phase(&self) -> AllocatorPhase {
        self.phase
    }

    pub fn is_editing(&self) -> bool {
        self.phase == AllocatorPhase::Editing
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.id)
    }

    /// 派生汇总（每次调用重新计算）
    pub fn summary(&self) -> Option<AllocationSummary> {
        self.session.as_ref().map(AllocationSession::summary)
    }

    /// 当前分配行（缺货行在末尾）
    pub fn lines(&self) -> Vec<AllocationLine> {
        self.session
            .as_ref()
            .map(|s| s.set.lines())
            .unwrap_or_default()
    }

    pub fn include_backorder(&self) -> bool {
        self.session.as_ref().map_or(false, |s| s.include_backorder)
    }

    /// 可选批次（已按配置排序）
    pub fn available_stocks(&self) -> &[StockBatch] {
        self.session
            .as_ref()
            .map(|s| s.stocks.as_slice())
            .unwrap_or(&[])
    }

    /// 若现在保存将交付的记录（不做校验，不改变状态）
    pub fn preview_records(&self) -> Vec<AllocationRecord> {
        self.session
            .as_ref()
            .map(|s| s.set.to_records())
            .unwrap_or_default()
    }

    /// 保存前校验（不改变状态）
    pub fn validate(&self) -> AllocationResult<()> {
        let session = self.session_ref(AllocatorPhase::Saved)?;
        let summary = session.summary();
        let result = AllocationValidator::new().validate(&summary, &session.set);
        if let Err(e) = &result {
            warn!(session_id = %session.id, error = %e, "allocation rejected");
        }
        result
    }

    // ==========================================
    // 编辑操作
    // ==========================================

    /// 手动添加批次
    ///
    /// - 剩余需求 ≤ 0 时不做任何操作
    /// - 新批次：追加 min(可用量, 剩余需求)
    /// - 已有批次：增加 min(可用量 − 已分配, 剩余需求)
    ///
    /// # 返回
    /// 实际增加的数量
    pub fn add_batch(&mut self, batch_id: &str) -> AllocationResult<u64> {
        let session = self.session_mut()?;
        let batch = session
            .find_batch(batch_id)
            .cloned()
            .ok_or_else(|| AllocationError::BatchNotFound(batch_id.to_string()))?;

        let remaining = session.summary().remaining;
        if remaining <= 0 {
            debug!(batch_id, "nothing remaining, add ignored");
            return Ok(0);
        }
        let remaining = remaining.unsigned_abs();

        let added = match session.set.find_regular_mut(batch_id) {
            Some(line) => {
                let add = line.headroom().min(remaining);
                line.quantity += add;
                add
            }
            None => {
                let add = batch.available_quantity.min(remaining);
                if add > 0 {
                    session.set.merge_regular(RegularLine::from_batch(&batch, add));
                }
                add
            }
        };

        debug!(batch_id, added, "batch added");
        Ok(added)
    }

    /// 修改分配行数量
    ///
    /// 裁剪规则：
    /// 1) 常规行裁剪到 [0, 批次可用量]，缺货行裁剪到 [0, ∞)
    /// 2) 再裁剪到 需求数量 − 其余行合计，保证总量不超过需求
    ///
    /// # 返回
    /// 实际生效的数量
    pub fn set_quantity(&mut self, line: &LineRef, requested: i64) -> AllocationResult<u64> {
        let session = self.session_mut()?;
        let current = session
            .line_quantity(line)
            .ok_or_else(|| AllocationError::LineNotFound(line.to_string()))?;

        let others = session.set.total_allocated().saturating_sub(current);
        let total_cap = session.required_quantity.saturating_sub(others);
        let requested = u64::try_from(requested).unwrap_or(0);

        let applied = match line {
            LineRef::Batch(id) => {
                // line_quantity 已确认该行存在
                let Some(regular) = session.set.find_regular_mut(id) else {
                    return Err(AllocationError::LineNotFound(line.to_string()));
                };
                let applied = requested.min(regular.available_quantity).min(total_cap);
                regular.quantity = applied;
                applied
            }
            LineRef::Backorder => {
                let applied = requested.min(total_cap);
                session.set.set_backorder(applied);
                applied
            }
        };

        debug!(line = %line, requested, applied, "quantity edited");
        Ok(applied)
    }

    /// 删除分配行；删除缺货行时同步关闭缺货开关
    pub fn remove_line(&mut self, line: &LineRef) -> AllocationResult<()> {
        let session = self.session_mut()?;
        match line {
            LineRef::Batch(id) => {
                session
                    .set
                    .remove_regular(id)
                    .ok_or_else(|| AllocationError::LineNotFound(line.to_string()))?;
            }
            LineRef::Backorder => {
                session
                    .set
                    .take_backorder()
                    .ok_or_else(|| AllocationError::LineNotFound(line.to_string()))?;
                session.include_backorder = false;
            }
        }

        debug!(line = %line, "line removed");
        Ok(())
    }

    /// 设置缺货开关（边沿触发）
    ///
    /// - 与当前开关值相同：不做任何操作
    /// - false → true：有剩余需求且无缺货行时，追加剩余数量的缺货行
    /// - true → false：删除缺货行
    /// - 配置禁止缺货时，开启请求被忽略
    ///
    /// # 返回
    /// 开关值是否发生变化
    pub fn set_include_backorder(&mut self, include: bool) -> AllocationResult<bool> {
        let session = self.session_mut()?;
        if session.include_backorder == include {
            return Ok(false);
        }
        if include && !session.allow_backorder {
            debug!("backorder disallowed by config, toggle ignored");
            return Ok(false);
        }
        session.include_backorder = include;

        if include {
            let remaining = session.summary().remaining;
            if remaining > 0 && !session.set.has_backorder() {
                session.set.set_backorder(remaining.unsigned_abs());
            }
        } else {
            session.set.take_backorder();
        }

        debug!(include, "backorder toggled");
        Ok(true)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn session_mut(&mut self) -> AllocationResult<&mut AllocationSession> {
        if self.phase != AllocatorPhase::Editing {
            return Err(AllocationError::InvalidStateTransition {
                from: self.phase,
                to: AllocatorPhase::Editing,
            });
        }
        self.session.as_mut().ok_or(AllocationError::InvalidStateTransition {
            from: self.phase,
            to: AllocatorPhase::Editing,
        })
    }

    fn session_ref(&self, to: AllocatorPhase) -> AllocationResult<&AllocationSession> {
        match (&self.session, self.phase) {
            (Some(session), AllocatorPhase::Editing) => Ok(session),
            _ => Err(AllocationError::InvalidStateTransition {
                from: self.phase,
                to,
            }),
        }
    }

    fn take_session(&mut self, to: AllocatorPhase) -> AllocationResult<AllocationSession> {
        self.session_ref(to)?;
        self.session.take().ok_or(AllocationError::InvalidStateTransition {
            from: self.phase,
            to,
        })
    }
}

impl Default for StockAllocator {
    fn default() -> Self {
        Self::new(&ConfigManager::default())
    }
}
