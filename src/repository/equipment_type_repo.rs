// ==========================================
// 烘焙生产排盘系统 - 设备类型数据仓储
// ==========================================
// 作用域: 站点级设备类型 + 公司级设备类型（site_id IS NULL）
// 同一 equipment_type_id 同时存在两级时,站点级优先
// ==========================================

use crate::domain::bake_group::{CapacityProfile, EquipmentType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// 设备类型仓储
/// 职责: 读取 equipment_type / equipment_capacity_profile 表
pub struct EquipmentTypeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EquipmentTypeRepository {
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

    /// 查询站点可见的设备类型（含产能档位）
    ///
    /// # 参数
    /// - company_id: 公司ID
    /// - site_id: 站点ID；None 时只返回公司级设备类型
    pub fn find_for_site(
        &self,
        company_id: &str,
        site_id: Option<&str>,
    ) -> RepositoryResult<Vec<EquipmentType>> {
        let conn = self.get_conn()?;

        // 站点级排在公司级之前,按 equipment_type_id 去重时保留第一条
        let mut stmt = conn.prepare(
            r#"
            SELECT row_id, equipment_type_id, default_capacity
            FROM equipment_type
            WHERE company_id = ?1
              AND (site_id IS NULL OR site_id = ?2)
            ORDER BY equipment_type_id, (site_id IS NULL), row_id
            "#,
        )?;

        let rows = stmt
            .query_map(params![company_id, site_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i32>(2)?,
                ))
            })?
            .collect::<SqliteResult<Vec<(i64, String, i32)>>>()?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut selected: Vec<(i64, EquipmentType)> = Vec::new();
        for (row_id, equipment_type_id, default_capacity) in rows {
            if !seen.insert(equipment_type_id.clone()) {
                continue;
            }
            selected.push((row_id, EquipmentType::new(&equipment_type_id, default_capacity)));
        }

        let mut profile_stmt = conn.prepare(
            r#"
            SELECT p.equipment_row_id, p.label, p.capacity
            FROM equipment_capacity_profile p
            JOIN equipment_type t ON t.row_id = p.equipment_row_id
            WHERE t.company_id = ?1
            ORDER BY p.equipment_row_id, p.label
            "#,
        )?;

        let mut profiles: HashMap<i64, Vec<CapacityProfile>> = HashMap::new();
        let profile_rows = profile_stmt
            .query_map(params![company_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    CapacityProfile {
                        label: row.get(1)?,
                        capacity: row.get(2)?,
                    },
                ))
            })?
            .collect::<SqliteResult<Vec<(i64, CapacityProfile)>>>()?;
        for (row_id, profile) in profile_rows {
            profiles.entry(row_id).or_default().push(profile);
        }

        Ok(selected
            .into_iter()
            .map(|(row_id, mut et)| {
                et.capacity_profiles = profiles.remove(&row_id).unwrap_or_default();
                et
            })
            .collect())
    }
}
