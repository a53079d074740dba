// ==========================================
// 烘焙生产排盘系统 - 核心库
// ==========================================
// 职责: 按交货日期将订单需求分配到烘焙托盘/设备
// 技术栈: Rust + SQLite
// 性质: 只读计算,同一输入快照产出完全相同的计划
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排盘规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DestinationRef, OrderStatus, ShipState};

// 领域实体
pub use domain::{
    BakeGroup, DestinationGroup, DestinationGroupPlan, EquipmentType, EquipmentUnit, OrderLine,
    PlanSummary, PlanningSnapshot, Product, ProductionPlan, TrayGrid,
};

// 引擎
pub use engine::{
    AllocationEngine, CapacityResolver, GridProjector, OrderAggregator, PlanAssembler,
    ProductionPlanOrchestrator,
};

// API
pub use api::{ApiError, ApiResult, PlanRequest, ProductionPlanApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "烘焙生产排盘系统";
