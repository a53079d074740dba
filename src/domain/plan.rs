// ==========================================
// 烘焙生产排盘系统 - 排盘输出文档
// ==========================================
// 用途: 供 HTTP/JSON 调用方与打印/界面渲染使用
// 字段命名: snake_case（与对外 JSON 契约一致）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 设备视图
// ==========================================

/// 托盘上的一个产品条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayItem {
    pub product: String, // 产品名称
    pub product_id: String,
    pub qty: u32,
}

/// 设备单元（托盘）
///
/// 只由 AllocationEngine 创建与封盘,封盘后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentUnit {
    pub number: u32,       // 全局托盘号
    pub local_number: u32, // 目的地组内托盘号
    pub bake_group: String,
    pub bake_group_id: String,
    pub items: Vec<TrayItem>,
    pub used: u32,
    pub capacity: u32,
}

/// 目的地组汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_equipment: u32,
    pub total_items: u64,
    pub utilization_percent: u32,
}

/// 单个目的地组的排盘结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationGroupPlan {
    pub destination_group_id: String,
    pub destination_group_name: String,
    pub bake_deadline: Option<String>,
    pub dispatch_time: Option<String>,
    pub tray_start: u32,
    pub tray_end: u32,
    pub equipment: Vec<EquipmentUnit>,
    pub summary: PlanSummary,
}

// ==========================================
// 网格视图（产品 × 托盘）
// ==========================================

/// 网格行：一个产品在各托盘上的数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayGridRow {
    pub product_id: String,
    pub product_name: String,
    pub bake_group_id: String,
    pub bake_group_name: String,
    pub prep_method: String,
    pub trays: BTreeMap<u32, u32>, // 全局托盘号 -> 数量
    pub total: u64,
}

/// 按制作工艺划分的网格分区
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayGridSection {
    pub prep_method: String,
    pub products: Vec<TrayGridRow>,
    pub tray_numbers: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayGrid {
    pub all_tray_numbers: Vec<u32>,
    pub sections: Vec<TrayGridSection>,
    pub products: Vec<TrayGridRow>,
}

// ==========================================
// ProductionPlan - 完整输出文档
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionPlan {
    pub delivery_date: NaiveDate,
    pub total_trays: u32,
    pub destination_groups: Vec<DestinationGroupPlan>,
    pub tray_grid: TrayGrid,
}

impl ProductionPlan {
    /// 遍历全部设备单元（按全局托盘号顺序）
    pub fn all_equipment(&self) -> impl Iterator<Item = &EquipmentUnit> {
        self.destination_groups.iter().flat_map(|g| g.equipment.iter())
    }
}
