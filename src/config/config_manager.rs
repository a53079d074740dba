// ==========================================
// 烘焙生产排盘系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::planner_config::{
    DEFAULT_FALLBACK_CAPACITY, DEFAULT_UNASSIGNED_NAME, DEFAULT_UNASSIGNED_PRIORITY,
};
use crate::config::planner_config_trait::PlannerConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::types::DEFAULT_PREP_METHOD;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 排盘结果排查时记录当次使用的配置
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// PlannerConfigReader Trait 实现
// ==========================================
#[async_trait]
impl PlannerConfigReader for ConfigManager {
    async fn get_fallback_capacity(&self) -> Result<u32, Box<dyn Error>> {
        let default = DEFAULT_FALLBACK_CAPACITY.to_string();
        let value = self.get_config_or_default(config_keys::TRAY_FALLBACK_CAPACITY, &default)?;
        match value.trim().parse::<u32>() {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!(
                    key = config_keys::TRAY_FALLBACK_CAPACITY,
                    value = %value,
                    error = %e,
                    "配置值无法解析，使用默认值"
                );
                Ok(DEFAULT_FALLBACK_CAPACITY)
            }
        }
    }

    async fn get_unassigned_group_priority(&self) -> Result<i32, Box<dyn Error>> {
        let default = DEFAULT_UNASSIGNED_PRIORITY.to_string();
        let value =
            self.get_config_or_default(config_keys::UNASSIGNED_GROUP_PRIORITY, &default)?;
        match value.trim().parse::<i32>() {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!(
                    key = config_keys::UNASSIGNED_GROUP_PRIORITY,
                    value = %value,
                    error = %e,
                    "配置值无法解析，使用默认值"
                );
                Ok(DEFAULT_UNASSIGNED_PRIORITY)
            }
        }
    }

    async fn get_unassigned_group_name(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::UNASSIGNED_GROUP_NAME, DEFAULT_UNASSIGNED_NAME)
    }

    async fn get_default_prep_method(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::DEFAULT_PREP_METHOD, DEFAULT_PREP_METHOD)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 容量解析
    pub const TRAY_FALLBACK_CAPACITY: &str = "tray_fallback_capacity";

    // 未分配目的地组
    pub const UNASSIGNED_GROUP_PRIORITY: &str = "unassigned_group_priority";
    pub const UNASSIGNED_GROUP_NAME: &str = "unassigned_group_name";

    // 产品默认值
    pub const DEFAULT_PREP_METHOD: &str = "default_prep_method";
}
