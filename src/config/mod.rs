// ==========================================
// 烘焙生产排盘系统 - 配置层
// ==========================================
// 职责: 排盘配置读取,缺省值回退
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod planner_config;
pub mod planner_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use planner_config::{InMemoryPlannerConfig, PlannerConfig};
pub use planner_config_trait::PlannerConfigReader;
