// ==========================================
// 烘焙生产排盘系统 - 领域类型定义
// ==========================================
// 职责: 订单行状态、发运状态、目的地引用、制作工艺常量
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 未分配目的地组的对外标识
pub const UNASSIGNED_GROUP_ID: &str = "unassigned";

/// 产品未配置制作工艺时的默认值
pub const DEFAULT_PREP_METHOD: &str = "fresh";

/// 托盘网格视图的固定分区顺序
///
/// 不在此列表中的制作工艺只出现在设备视图，不进入网格视图。
pub const GRID_PREP_METHODS: [&str; 4] = ["laminated", "fresh", "frozen", "par_baked"];

// ==========================================
// 发运状态 (Ship State)
// ==========================================
// 红线: FROZEN 走冷链独立发运,不占用任何托盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipState {
    Fresh,
    Frozen,
    Other(String),
}

impl ShipState {
    /// 从数据库字符串解析（大小写不敏感，空值视为 fresh）
    pub fn from_db_str(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" | "fresh" => ShipState::Fresh,
            "frozen" => ShipState::Frozen,
            _ => ShipState::Other(normalized),
        }
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self, ShipState::Frozen)
    }
}

impl fmt::Display for ShipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipState::Fresh => write!(f, "fresh"),
            ShipState::Frozen => write!(f, "frozen"),
            ShipState::Other(s) => write!(f, "{}", s),
        }
    }
}

// ==========================================
// 订单状态 (Order Status)
// ==========================================
// 只有 confirmed / locked 的订单参与排盘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    Confirmed,
    Locked,
    Cancelled,
}

impl OrderStatus {
    /// 参与排盘的状态集合
    pub const PLANNABLE: [OrderStatus; 2] = [OrderStatus::Confirmed, OrderStatus::Locked];

    pub fn from_db_str(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(OrderStatus::Draft),
            "confirmed" => Some(OrderStatus::Confirmed),
            "locked" => Some(OrderStatus::Locked),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Locked => "locked",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_plannable(&self) -> bool {
        Self::PLANNABLE.contains(self)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 目的地引用 (Destination Reference)
// ==========================================
// 客户未绑定目的地组时归入 Unassigned
// 排序: Assigned 在前, Unassigned 在后 (仅用于需求表的确定性遍历)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DestinationRef {
    Assigned(String),
    Unassigned,
}

impl DestinationRef {
    /// 由可空的目的地组ID构造（空字符串视为未分配）
    pub fn from_optional(id: Option<&str>) -> Self {
        match id.map(str::trim) {
            Some(v) if !v.is_empty() => DestinationRef::Assigned(v.to_string()),
            _ => DestinationRef::Unassigned,
        }
    }

    pub fn as_id(&self) -> &str {
        match self {
            DestinationRef::Assigned(id) => id,
            DestinationRef::Unassigned => UNASSIGNED_GROUP_ID,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self, DestinationRef::Unassigned)
    }
}

impl fmt::Display for DestinationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_id())
    }
}
