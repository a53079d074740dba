// ==========================================
// 烘焙生产排盘系统 - 排盘文档组装
// ==========================================
// 职责: 组合分配结果与网格视图,不做任何计算
// ==========================================

use chrono::NaiveDate;

use crate::domain::plan::{ProductionPlan, TrayGrid};
use crate::engine::allocation::AllocationResult;

pub struct PlanAssembler {
    // 无状态
}

impl PlanAssembler {
    pub fn new() -> Self {
        Self {}
    }

    /// 组装输出文档
    pub fn assemble(
        &self,
        delivery_date: NaiveDate,
        allocation: AllocationResult,
        tray_grid: TrayGrid,
    ) -> ProductionPlan {
        ProductionPlan {
            delivery_date,
            total_trays: allocation.total_trays,
            destination_groups: allocation.destination_plans,
            tray_grid,
        }
    }
}

impl Default for PlanAssembler {
    fn default() -> Self {
        Self::new()
    }
}
