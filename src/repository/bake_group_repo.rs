// ==========================================
// 烘焙生产排盘系统 - 烘焙组数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::bake_group::BakeGroup;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 烘焙组仓储
/// 职责: 读取 bake_group 表
pub struct BakeGroupRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BakeGroupRepository {
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

    /// 查询公司下全部烘焙组
    pub fn find_by_company(&self, company_id: &str) -> RepositoryResult<Vec<BakeGroup>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT bake_group_id, name, priority, capacity_profile
            FROM bake_group
            WHERE company_id = ?1
            ORDER BY priority, bake_group_id
            "#,
        )?;

        let groups = stmt
            .query_map(params![company_id], |row| {
                let profile: Option<String> = row.get(3)?;
                Ok(BakeGroup {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    priority: row.get(2)?,
                    capacity_profile: profile.filter(|p| !p.trim().is_empty()),
                })
            })?
            .collect::<SqliteResult<Vec<BakeGroup>>>()?;

        Ok(groups)
    }
}
