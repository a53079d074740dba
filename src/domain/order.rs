// ==========================================
// 烘焙生产排盘系统 - 订单行
// ==========================================
// 来源: 已按交货日期与订单状态预过滤的订单行
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::{DestinationRef, OrderStatus, ShipState};

// ==========================================
// OrderLine - 订单行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i64,
    pub ship_state: ShipState,
    pub destination: DestinationRef, // 由客户推导,未绑定时为 Unassigned
    pub order_status: OrderStatus,
}

impl OrderLine {
    pub fn new(destination: DestinationRef, product_id: &str, quantity: i64) -> Self {
        Self {
            product_id: product_id.to_string(),
            quantity,
            ship_state: ShipState::Fresh,
            destination,
            order_status: OrderStatus::Confirmed,
        }
    }

    pub fn with_ship_state(mut self, ship_state: ShipState) -> Self {
        self.ship_state = ship_state;
        self
    }
}
