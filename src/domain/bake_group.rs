// ==========================================
// 烘焙生产排盘系统 - 烘焙组与设备类型
// ==========================================
// 烘焙组: 一起出炉的产品类别,带优先级与可选的产能档位标签
// 设备类型: 默认容量 + 按标签命名的产能档位
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// BakeGroup - 烘焙组
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakeGroup {
    pub id: String,
    pub name: String,
    pub priority: i32,
    pub capacity_profile: Option<String>, // 选用的产能档位标签
}

impl BakeGroup {
    pub fn new(id: &str, name: &str, priority: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            priority,
            capacity_profile: None,
        }
    }

    pub fn with_capacity_profile(mut self, label: &str) -> Self {
        self.capacity_profile = Some(label.to_string());
        self
    }
}

// ==========================================
// CapacityProfile - 产能档位
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityProfile {
    pub label: String,
    pub capacity: i32,
}

// ==========================================
// EquipmentType - 设备类型
// ==========================================
// 站点级设备类型优先,缺失时回退到公司级设备类型（由仓储层完成）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentType {
    pub id: String,
    pub default_capacity: i32,
    #[serde(default)]
    pub capacity_profiles: Vec<CapacityProfile>,
}

impl EquipmentType {
    pub fn new(id: &str, default_capacity: i32) -> Self {
        Self {
            id: id.to_string(),
            default_capacity,
            capacity_profiles: Vec::new(),
        }
    }

    pub fn with_profile(mut self, label: &str, capacity: i32) -> Self {
        self.capacity_profiles.push(CapacityProfile {
            label: label.to_string(),
            capacity,
        });
        self
    }

    /// 按标签查找产能档位（忽略大小写与首尾空白）
    pub fn find_profile(&self, label: &str) -> Option<&CapacityProfile> {
        let wanted = label.trim();
        self.capacity_profiles
            .iter()
            .find(|p| p.label.trim().eq_ignore_ascii_case(wanted))
    }
}
