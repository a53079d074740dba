// ==========================================
// 烘焙生产排盘系统 - 托盘分配引擎
// ==========================================
// 流程（每个目的地组）:
//   for 烘焙组 in 优先级顺序:
//     for 产品 in display_order 顺序（有需求的）:
//       容量 C = CapacityResolver
//       当前托盘容量 != C -> 先封盘
//       循环装载,装满即封盘
//     烘焙组结束 -> 未满托盘也封盘
// ==========================================

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::domain::plan::{DestinationGroupPlan, EquipmentUnit, PlanSummary};
use crate::engine::capacity_resolver::CapacityResolver;
use crate::engine::catalog::ProductCatalog;
use crate::engine::destinations::PlannedDestination;
use crate::engine::order_aggregator::OrderDemand;

use super::accumulator::{AllocationState, FlushTrigger};

/// 产品ID -> (全局托盘号 -> 数量)
pub type TrayAssignmentMap = BTreeMap<String, BTreeMap<u32, u32>>;

/// 分配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationResult {
    pub destination_plans: Vec<DestinationGroupPlan>,
    pub tray_assignments: TrayAssignmentMap,
    pub total_trays: u32,
}

// ==========================================
// AllocationEngine - 托盘分配引擎
// ==========================================
pub struct AllocationEngine {
    resolver: CapacityResolver,
}

impl AllocationEngine {
    pub fn new(resolver: CapacityResolver) -> Self {
        Self { resolver }
    }

    /// 执行分配
    ///
    /// # 参数
    /// - destinations: 已排序的目的地组
    /// - catalog: 产品目录（烘焙组、产品已排序）
    /// - demand: 聚合需求
    ///
    /// # 说明
    /// 所有计数器都在本次调用内创建,调用结束即丢弃。
    pub fn allocate(
        &self,
        destinations: &[PlannedDestination],
        catalog: &ProductCatalog,
        demand: &OrderDemand,
    ) -> AllocationResult {
        let mut state = AllocationState::new();
        let mut destination_plans = Vec::new();

        for destination in destinations {
            if let Some(plan) = self.allocate_destination(&mut state, destination, catalog, demand) {
                destination_plans.push(plan);
            }
        }

        let (tray_assignments, total_trays) = state.finish();

        AllocationResult {
            destination_plans,
            tray_assignments,
            total_trays,
        }
    }

    /// 单个目的地组的分配
    ///
    /// 没有产生任何托盘的目的地组返回 None,且不消耗托盘号。
    fn allocate_destination(
        &self,
        state: &mut AllocationState,
        destination: &PlannedDestination,
        catalog: &ProductCatalog,
        demand: &OrderDemand,
    ) -> Option<DestinationGroupPlan> {
        let products_demand = demand.for_destination(&destination.destination)?;

        state.begin_destination();
        let tray_start = state.next_global();

        for bake_group in catalog.bake_groups() {
            for product in catalog.products_in(&bake_group.id) {
                let mut remaining = products_demand.get(&product.id).copied().unwrap_or(0);
                if remaining == 0 {
                    continue;
                }

                let capacity = self
                    .resolver
                    .resolve(product, Some(bake_group), catalog.equipment_types());

                state.flush_if(FlushTrigger::CapacityChanged {
                    next_capacity: capacity,
                });

                while remaining > 0 {
                    // 容量恒为正且满盘立即封盘,每轮至少放入 1 件
                    let placed = state.place(bake_group, capacity, product, remaining);
                    remaining -= u64::from(placed);
                    state.flush_if(FlushTrigger::CapacityReached);
                }
            }

            state.flush_if(FlushTrigger::EndOfBakeGroup);
        }

        state.flush_if(FlushTrigger::EndOfDestinationGroup);

        let equipment = state.drain_sealed();
        if equipment.is_empty() {
            debug!(
                destination_group_id = %destination.destination,
                "目的地组无可排盘需求，跳过"
            );
            return None;
        }

        let tray_end = state.next_global() - 1;
        let summary = summarize(&equipment);

        info!(
            destination_group_id = %destination.destination,
            tray_start,
            tray_end,
            total_equipment = summary.total_equipment,
            total_items = summary.total_items,
            utilization_percent = summary.utilization_percent,
            "目的地组排盘完成"
        );

        Some(DestinationGroupPlan {
            destination_group_id: destination.destination.as_id().to_string(),
            destination_group_name: destination.name.clone(),
            bake_deadline: destination.bake_deadline.clone(),
            dispatch_time: destination.dispatch_time.clone(),
            tray_start,
            tray_end,
            equipment,
            summary,
        })
    }
}

impl Default for AllocationEngine {
    fn default() -> Self {
        Self::new(CapacityResolver::default())
    }
}

/// 目的地组汇总
///
/// utilization_percent = round(100 * Σused / Σcapacity),Σcapacity 为 0 时取 0
pub fn summarize(equipment: &[EquipmentUnit]) -> PlanSummary {
    let total_items: u64 = equipment.iter().map(|u| u64::from(u.used)).sum();
    let total_capacity: u64 = equipment.iter().map(|u| u64::from(u.capacity)).sum();

    PlanSummary {
        total_equipment: equipment.len() as u32,
        total_items,
        utilization_percent: utilization_percent(total_items, total_capacity),
    }
}

/// 四舍五入的百分比（非负数,半数向上）
pub fn utilization_percent(used: u64, capacity: u64) -> u32 {
    if capacity == 0 {
        return 0;
    }
    ((200 * used + capacity) / (2 * capacity)) as u32
}
