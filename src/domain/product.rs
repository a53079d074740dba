// ==========================================
// 烘焙生产排盘系统 - 产品领域模型
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::DEFAULT_PREP_METHOD;

// ==========================================
// Product - 产品
// ==========================================
// 容量相关字段均为可选,由 CapacityResolver 按优先级解析
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub bake_group_id: String,
    pub equipment_type_id: Option<String>,
    pub items_per_equipment: Option<i32>, // 单品覆盖容量
    pub items_per_tray: Option<i32>,      // 旧版每盘数量
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_prep_method")]
    pub prep_method: String,
}

fn default_prep_method() -> String {
    DEFAULT_PREP_METHOD.to_string()
}

impl Product {
    pub fn new(id: &str, name: &str, bake_group_id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            bake_group_id: bake_group_id.to_string(),
            equipment_type_id: None,
            items_per_equipment: None,
            items_per_tray: None,
            display_order: 0,
            prep_method: default_prep_method(),
        }
    }
}
