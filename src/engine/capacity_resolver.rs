// ==========================================
// 烘焙生产排盘系统 - 容量解析引擎
// ==========================================
// 职责: 解析单个产品在一个设备单元上的有效容量
// 规则: 按优先级取第一个正数
//   1) product.items_per_equipment
//   2) 烘焙组产能档位 + 设备类型档位（标签忽略大小写）
//   3) equipment_type.default_capacity
//   4) product.items_per_tray（旧字段）
//   5) 固定回退值（默认 18）
// 红线: 无失败路径,始终返回正整数
// ==========================================

use std::collections::HashMap;

use crate::config::planner_config::DEFAULT_FALLBACK_CAPACITY;
use crate::domain::bake_group::{BakeGroup, EquipmentType};
use crate::domain::product::Product;

/// 容量来源（用于日志与排查）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacitySource {
    ProductOverride,
    CapacityProfile,
    EquipmentDefault,
    LegacyItemsPerTray,
    Fallback,
}

// ==========================================
// CapacityResolver - 容量解析引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct CapacityResolver {
    fallback_capacity: u32,
}

impl CapacityResolver {
    /// 创建解析器
    ///
    /// 回退值为 0 时使用默认值 18,保证解析结果恒为正数。
    pub fn new(fallback_capacity: u32) -> Self {
        let fallback_capacity = if fallback_capacity > 0 {
            fallback_capacity
        } else {
            DEFAULT_FALLBACK_CAPACITY
        };
        Self { fallback_capacity }
    }

    /// 解析有效容量
    pub fn resolve(
        &self,
        product: &Product,
        bake_group: Option<&BakeGroup>,
        equipment_types: &HashMap<String, EquipmentType>,
    ) -> u32 {
        self.resolve_with_source(product, bake_group, equipment_types).0
    }

    /// 解析有效容量并返回命中的规则
    pub fn resolve_with_source(
        &self,
        product: &Product,
        bake_group: Option<&BakeGroup>,
        equipment_types: &HashMap<String, EquipmentType>,
    ) -> (u32, CapacitySource) {
        if let Some(v) = positive(product.items_per_equipment) {
            return (v, CapacitySource::ProductOverride);
        }

        let equipment_type = product
            .equipment_type_id
            .as_deref()
            .and_then(|id| equipment_types.get(id));

        if let Some(et) = equipment_type {
            let profile_label = bake_group
                .and_then(|bg| bg.capacity_profile.as_deref())
                .filter(|label| !label.trim().is_empty());

            if let Some(label) = profile_label {
                if let Some(v) = et.find_profile(label).and_then(|p| positive(Some(p.capacity))) {
                    return (v, CapacitySource::CapacityProfile);
                }
            }

            if let Some(v) = positive(Some(et.default_capacity)) {
                return (v, CapacitySource::EquipmentDefault);
            }
        }

        if let Some(v) = positive(product.items_per_tray) {
            return (v, CapacitySource::LegacyItemsPerTray);
        }

        (self.fallback_capacity, CapacitySource::Fallback)
    }
}

impl Default for CapacityResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_CAPACITY)
    }
}

fn positive(value: Option<i32>) -> Option<u32> {
    value.filter(|v| *v > 0).map(|v| v as u32)
}
