// ==========================================
// 烘焙生产排盘系统 - 目的地组排序
// ==========================================
// 规则:
//   1) 只取启用的目的地组,且当日有需求
//   2) 按 priority 升序,同优先级保持输入顺序
//   3) 未分配组（哨兵优先级）有需求时追加,
//      与真实组同优先级时固定排在真实组之后
// ==========================================

use tracing::warn;

use crate::config::planner_config::PlannerConfig;
use crate::domain::destination::DestinationGroup;
use crate::domain::types::{DestinationRef, UNASSIGNED_GROUP_ID};
use crate::engine::order_aggregator::OrderDemand;

// ==========================================
// PlannedDestination - 参与排盘的目的地组
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDestination {
    pub destination: DestinationRef,
    pub name: String,
    pub bake_deadline: Option<String>,
    pub dispatch_time: Option<String>,
    pub priority: i32,
}

impl PlannedDestination {
    pub fn from_group(group: &DestinationGroup) -> Self {
        Self {
            destination: DestinationRef::Assigned(group.id.clone()),
            name: group.name.clone(),
            bake_deadline: group.bake_deadline.clone(),
            dispatch_time: group.dispatch_time.clone(),
            priority: group.priority,
        }
    }

    pub fn unassigned(config: &PlannerConfig) -> Self {
        Self {
            destination: DestinationRef::Unassigned,
            name: config.unassigned_name.clone(),
            bake_deadline: None,
            dispatch_time: None,
            priority: config.unassigned_priority,
        }
    }
}

/// 是否占用了未分配组的保留ID
pub fn is_reserved_id(destination_group_id: &str) -> bool {
    destination_group_id == UNASSIGNED_GROUP_ID
}

/// 生成排盘顺序下的目的地组列表
pub fn order_destinations(
    groups: &[DestinationGroup],
    demand: &OrderDemand,
    config: &PlannerConfig,
) -> Vec<PlannedDestination> {
    let mut planned: Vec<PlannedDestination> = Vec::new();

    for group in groups.iter().filter(|g| g.is_active) {
        if is_reserved_id(&group.id) {
            warn!(
                destination_group_id = %group.id,
                name = %group.name,
                "目的地组ID与未分配组保留ID冲突，不单独排盘"
            );
            continue;
        }
        if planned
            .iter()
            .any(|p| p.destination.as_id() == group.id.as_str())
        {
            warn!(destination_group_id = %group.id, "目的地组ID重复，保留第一条");
            continue;
        }
        let planned_group = PlannedDestination::from_group(group);
        if demand.has_demand(&planned_group.destination) {
            planned.push(planned_group);
        }
    }

    if demand.has_demand(&DestinationRef::Unassigned) {
        planned.push(PlannedDestination::unassigned(config));
    }

    // 稳定排序: (priority, 是否未分配组)
    planned.sort_by_key(|p| (p.priority, p.destination.is_unassigned()));
    planned
}
