// ==========================================
// 烘焙生产排盘系统 - 引擎层
// ==========================================
// 职责: 实现排盘规则,不拼 SQL
// 红线: 引擎是纯函数式计算,不读写数据库、不持有跨请求状态
// ==========================================

pub mod allocation;
pub mod capacity_resolver;
pub mod catalog;
pub mod destinations;
pub mod grid_projector;
pub mod orchestrator;
pub mod order_aggregator;
pub mod plan_assembler;

// 重导出核心引擎
pub use allocation::{
    AllocationEngine, AllocationResult, AllocationState, FlushTrigger, TrayAccumulator,
    TrayAssignmentMap,
};
pub use capacity_resolver::{CapacityResolver, CapacitySource};
pub use catalog::ProductCatalog;
pub use destinations::{is_reserved_id, order_destinations, PlannedDestination};
pub use grid_projector::GridProjector;
pub use orchestrator::ProductionPlanOrchestrator;
pub use order_aggregator::{OrderAggregator, OrderDemand};
pub use plan_assembler::PlanAssembler;
