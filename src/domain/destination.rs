// ==========================================
// 烘焙生产排盘系统 - 目的地组领域模型
// ==========================================
// 用途: 配送路线 / 门店,拥有独立的烘焙截止时间、发车时间与优先级
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DestinationGroup - 目的地组
// ==========================================
// 优先级: 数值越小越优先
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationGroup {
    pub id: String,
    pub name: String,
    pub bake_deadline: Option<String>, // 烘焙截止时间 (HH:MM)
    pub dispatch_time: Option<String>, // 发车时间 (HH:MM)
    pub priority: i32,
    pub is_active: bool,
}

impl DestinationGroup {
    pub fn new(id: &str, name: &str, priority: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            bake_deadline: None,
            dispatch_time: None,
            priority,
            is_active: true,
        }
    }
}
