// ==========================================
// 烘焙生产排盘系统 - 排盘输入快照
// ==========================================
// 红线: 快照在分配开始前一次性读取,计算过程中不再重新读取
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::bake_group::{BakeGroup, EquipmentType};
use crate::domain::destination::DestinationGroup;
use crate::domain::order::OrderLine;
use crate::domain::product::Product;

// ==========================================
// PlanningSnapshot - 单个交货日期的不可变输入
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningSnapshot {
    pub delivery_date: NaiveDate,
    pub destination_groups: Vec<DestinationGroup>,
    pub bake_groups: Vec<BakeGroup>,
    pub equipment_types: Vec<EquipmentType>,
    pub products: Vec<Product>,
    pub order_lines: Vec<OrderLine>,
}

impl PlanningSnapshot {
    /// 空快照（上游全部读取失败时降级使用）
    pub fn empty(delivery_date: NaiveDate) -> Self {
        Self {
            delivery_date,
            destination_groups: Vec::new(),
            bake_groups: Vec::new(),
            equipment_types: Vec::new(),
            products: Vec::new(),
            order_lines: Vec::new(),
        }
    }
}
