// ==========================================
// 烘焙生产排盘系统 - 排盘配置
// ==========================================
// 职责: 单次请求内使用的强类型配置值
// 红线: 每次请求在分配开始前读取一次,计算中途不变
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::warn;

use crate::config::planner_config_trait::PlannerConfigReader;
use crate::domain::types::DEFAULT_PREP_METHOD;

/// 容量解析的固定回退值
pub const DEFAULT_FALLBACK_CAPACITY: u32 = 18;

/// 未分配目的地组的默认优先级（哨兵值）
pub const DEFAULT_UNASSIGNED_PRIORITY: i32 = 999;

/// 未分配目的地组的默认名称
pub const DEFAULT_UNASSIGNED_NAME: &str = "Unassigned";

// ==========================================
// PlannerConfig - 排盘配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub fallback_capacity: u32,
    pub unassigned_priority: i32,
    pub unassigned_name: String,
    pub default_prep_method: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            fallback_capacity: DEFAULT_FALLBACK_CAPACITY,
            unassigned_priority: DEFAULT_UNASSIGNED_PRIORITY,
            unassigned_name: DEFAULT_UNASSIGNED_NAME.to_string(),
            default_prep_method: DEFAULT_PREP_METHOD.to_string(),
        }
    }
}

impl PlannerConfig {
    /// 从配置读取器加载
    ///
    /// 任一配置项读取失败时记录告警并使用默认值,不中断排盘。
    pub async fn load<R: PlannerConfigReader + ?Sized>(reader: &R) -> Self {
        let defaults = Self::default();

        let fallback_capacity = match reader.get_fallback_capacity().await {
            Ok(v) if v > 0 => v,
            Ok(v) => {
                warn!(value = v, "回退容量必须为正数，使用默认值");
                defaults.fallback_capacity
            }
            Err(e) => {
                warn!(error = %e, "读取回退容量失败，使用默认值");
                defaults.fallback_capacity
            }
        };

        let unassigned_priority = reader
            .get_unassigned_group_priority()
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "读取未分配组优先级失败，使用默认值");
                defaults.unassigned_priority
            });

        let unassigned_name = match reader.get_unassigned_group_name().await {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            Ok(_) => defaults.unassigned_name.clone(),
            Err(e) => {
                warn!(error = %e, "读取未分配组名称失败，使用默认值");
                defaults.unassigned_name.clone()
            }
        };

        let default_prep_method = match reader.get_default_prep_method().await {
            Ok(v) if !v.trim().is_empty() => v.trim().to_ascii_lowercase(),
            Ok(_) => defaults.default_prep_method.clone(),
            Err(e) => {
                warn!(error = %e, "读取默认制作工艺失败，使用默认值");
                defaults.default_prep_method.clone()
            }
        };

        Self {
            fallback_capacity,
            unassigned_priority,
            unassigned_name,
            default_prep_method,
        }
    }
}

// ==========================================
// InMemoryPlannerConfig - 内存配置
// ==========================================
// 用途: 无数据库场景（单元测试、纯库调用）
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlannerConfig {
    pub config: PlannerConfig,
}

impl InMemoryPlannerConfig {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PlannerConfigReader for InMemoryPlannerConfig {
    async fn get_fallback_capacity(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.config.fallback_capacity)
    }

    async fn get_unassigned_group_priority(&self) -> Result<i32, Box<dyn Error>> {
        Ok(self.config.unassigned_priority)
    }

    async fn get_unassigned_group_name(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.config.unassigned_name.clone())
    }

    async fn get_default_prep_method(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.config.default_prep_method.clone())
    }
}
