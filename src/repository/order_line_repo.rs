// ==========================================
// 烘焙生产排盘系统 - 订单行数据仓储
// ==========================================
// 过滤: 公司 + 交货日期 + 订单状态 ∈ {confirmed, locked}
// 目的地组: 由客户推导,客户未绑定时为 Unassigned
// ==========================================

use crate::domain::order::OrderLine;
use crate::domain::types::{DestinationRef, OrderStatus, ShipState};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 订单行仓储
/// 职责: 读取 order_header / order_line / customer 表
pub struct OrderLineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderLineRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = Connection::open(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询某交货日期可排盘的订单行
    pub fn find_plannable_by_delivery_date(
        &self,
        company_id: &str,
        delivery_date: NaiveDate,
    ) -> RepositoryResult<Vec<OrderLine>> {
        let conn = self.get_conn()?;
        let delivery_date_str = delivery_date.format("%Y-%m-%d").to_string();

        let mut stmt = conn.prepare(
            r#"
            SELECT
                ol.product_id, ol.quantity, ol.ship_state,
                c.destination_group_id, oh.status
            FROM order_line ol
            JOIN order_header oh ON oh.order_id = ol.order_id
            LEFT JOIN customer c ON c.customer_id = oh.customer_id
            WHERE oh.company_id = ?1
              AND oh.delivery_date = ?2
              AND lower(trim(oh.status)) IN (?3, ?4)
            ORDER BY ol.line_id
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![
                    company_id,
                    delivery_date_str,
                    OrderStatus::Confirmed.as_str(),
                    OrderStatus::Locked.as_str(),
                ],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter()
            .map(|(product_id, quantity, ship_state, destination_group_id, status)| {
                let order_status = OrderStatus::from_db_str(&status).ok_or_else(|| {
                    RepositoryError::FieldValueError {
                        field: "order_header.status".to_string(),
                        message: format!("未知订单状态: {}", status),
                    }
                })?;
                Ok(OrderLine {
                    product_id,
                    quantity,
                    ship_state: ShipState::from_db_str(&ship_state),
                    destination: DestinationRef::from_optional(destination_group_id.as_deref()),
                    order_status,
                })
            })
            .collect()
    }
}
