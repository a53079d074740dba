// ==========================================
// 烘焙生产排盘系统 - 排盘配置读取 Trait
// ==========================================
// 职责: 定义排盘所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// PlannerConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）、InMemoryPlannerConfig（测试/默认）
#[async_trait]
pub trait PlannerConfigReader: Send + Sync {
    /// 容量解析最终回退值
    ///
    /// # 默认值
    /// - 18
    async fn get_fallback_capacity(&self) -> Result<u32, Box<dyn Error>>;

    /// 未分配目的地组的排序优先级
    ///
    /// # 默认值
    /// - 999
    async fn get_unassigned_group_priority(&self) -> Result<i32, Box<dyn Error>>;

    /// 未分配目的地组的显示名称
    ///
    /// # 默认值
    /// - "Unassigned"
    async fn get_unassigned_group_name(&self) -> Result<String, Box<dyn Error>>;

    /// 产品未配置制作工艺时的默认值
    ///
    /// # 默认值
    /// - "fresh"
    async fn get_default_prep_method(&self) -> Result<String, Box<dyn Error>>;
}
