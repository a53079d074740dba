// ==========================================
// 烘焙生产排盘系统 - 目的地组数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::destination::DestinationGroup;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// DestinationGroupRepository - 目的地组仓储
// ==========================================
/// 目的地组仓储
/// 职责: 读取 destination_group 表
pub struct DestinationGroupRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DestinationGroupRepository {
    /// 创建新的 DestinationGroupRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = Connection::open(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询公司下启用的目的地组
    ///
    /// # 返回
    /// 按 priority、destination_group_id 排序的列表
    pub fn find_active_by_company(&self, company_id: &str) -> RepositoryResult<Vec<DestinationGroup>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT destination_group_id, name, bake_deadline, dispatch_time, priority, is_active
            FROM destination_group
            WHERE company_id = ?1 AND is_active = 1
            ORDER BY priority, destination_group_id
            "#,
        )?;

        let groups = stmt
            .query_map(params![company_id], |row| {
                Ok(DestinationGroup {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    bake_deadline: row.get(2)?,
                    dispatch_time: row.get(3)?,
                    priority: row.get(4)?,
                    is_active: row.get::<_, i64>(5)? != 0,
                })
            })?
            .collect::<SqliteResult<Vec<DestinationGroup>>>()?;

        Ok(groups)
    }
}
