// ==========================================
// 烘焙生产排盘系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供应用层与命令行工具调用
// ==========================================

pub mod error;
pub mod production_plan_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use production_plan_api::{PlanRequest, ProductionPlanApi};
