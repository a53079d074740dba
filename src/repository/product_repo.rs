// ==========================================
// 烘焙生产排盘系统 - 产品数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: prep_method 为空时原样返回空串,由引擎按配置补默认值
// ==========================================

use crate::domain::product::Product;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 产品仓储
/// 职责: 读取 product 表
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
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

    /// 查询公司下全部产品
    pub fn find_by_company(&self, company_id: &str) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                product_id, name, bake_group_id, equipment_type_id,
                items_per_equipment, items_per_tray,
                COALESCE(display_order, 0), COALESCE(prep_method, '')
            FROM product
            WHERE company_id = ?1
            ORDER BY product_id
            "#,
        )?;

        let products = stmt
            .query_map(params![company_id], |row| {
                Ok(Product {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    bake_group_id: row.get(2)?,
                    equipment_type_id: row.get(3)?,
                    items_per_equipment: row.get(4)?,
                    items_per_tray: row.get(5)?,
                    display_order: row.get(6)?,
                    prep_method: row.get(7)?,
                })
            })?
            .collect::<SqliteResult<Vec<Product>>>()?;

        Ok(products)
    }
}
