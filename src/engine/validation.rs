// ==========================================
// 库存批次分配引擎 - 保存校验
// ==========================================
// 校验顺序:
// 1) 分配不足（remaining > 0）
// 2) 分配超量（remaining < 0，编辑时已裁剪，此处兜底）
// 3) 无有效行
// ==========================================

use crate::domain::allocation::{AllocationSet, AllocationSummary};
use crate::engine::error::{AllocationError, AllocationResult};

pub struct AllocationValidator {
    // 无状态
}

impl AllocationValidator {
    pub fn new() -> Self {
        Self {}
    }

    pub fn validate(&self, summary: &AllocationSummary, set: &AllocationSet) -> AllocationResult<()> {
        if summary.remaining > 0 {
            return Err(AllocationError::UnderAllocated {
                shortfall: summary.shortfall(),
            });
        }

        if summary.remaining < 0 {
            return Err(AllocationError::OverAllocated {
                excess: summary.remaining.unsigned_abs(),
            });
        }

        if set.positive_line_count() == 0 {
            return Err(AllocationError::EmptyAllocation);
        }

        Ok(())
    }
}

impl Default for AllocationValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::RegularLine;

    fn set_with(quantity: u64) -> AllocationSet {
        let mut set = AllocationSet::new();
        set.merge_regular(RegularLine {
            batch_id: "A".to_string(),
            lot_number: "LOT-A".to_string(),
            available_quantity: 20,
            quantity,
        });
        set
    }

    #[test]
    fn test_under_allocated() {
        let set = set_with(6);
        let summary = AllocationSummary::compute(10, &set, 20);
        assert_eq!(
            AllocationValidator::new().validate(&summary, &set),
            Err(AllocationError::UnderAllocated { shortfall: 4 })
        );
    }

    #[test]
    fn test_over_allocated() {
        let set = set_with(12);
        let summary = AllocationSummary::compute(10, &set, 20);
        assert_eq!(
            AllocationValidator::new().validate(&summary, &set),
            Err(AllocationError::OverAllocated { excess: 2 })
        );
    }

    #[test]
    fn test_empty_allocation() {
        let set = AllocationSet::new();
        let summary = AllocationSummary::compute(0, &set, 20);
        assert_eq!(
            AllocationValidator::new().validate(&summary, &set),
            Err(AllocationError::EmptyAllocation)
        );

        let zero_line = set_with(0);
        let summary = AllocationSummary::compute(0, &zero_line, 20);
        assert_eq!(
            AllocationValidator::new().validate(&summary, &zero_line),
            Err(AllocationError::EmptyAllocation)
        );
    }

    #[test]
    fn test_exact_allocation_passes() {
        let set = set_with(10);
        let summary = AllocationSummary::compute(10, &set, 20);
        assert!(AllocationValidator::new().validate(&summary, &set).is_ok());
    }
}
