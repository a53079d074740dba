// ==========================================
// 烘焙生产排盘系统 - 领域模型层
// ==========================================
// 职责: 定义输入快照实体、输出文档与领域类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod bake_group;
pub mod destination;
pub mod order;
pub mod plan;
pub mod product;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use bake_group::{BakeGroup, CapacityProfile, EquipmentType};
pub use destination::DestinationGroup;
pub use order::OrderLine;
pub use plan::{
    DestinationGroupPlan, EquipmentUnit, PlanSummary, ProductionPlan, TrayGrid, TrayGridRow,
    TrayGridSection, TrayItem,
};
pub use product::Product;
pub use snapshot::PlanningSnapshot;
pub use types::{
    DestinationRef, OrderStatus, ShipState, DEFAULT_PREP_METHOD, GRID_PREP_METHODS,
    UNASSIGNED_GROUP_ID,
};
