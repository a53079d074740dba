// ==========================================
// 烘焙生产排盘系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::ProductionPlanApi;
use crate::config::config_manager::ConfigManager;
use crate::config::planner_config_trait::PlannerConfigReader;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{
    BakeGroupRepository, DestinationGroupRepository, EquipmentTypeRepository,
    OrderLineRepository, ProductRepository,
};

/// 应用状态
///
/// 所有仓储共享同一个数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 生产排盘API
    pub production_plan_api: Arc<ProductionPlanApi>,

    /// 配置管理器（同时作为排盘配置读取器）
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库结构初始化失败: {}", e))?;

        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接组装应用状态（不做建表）
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Result<Self, String> {
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let destination_group_repo = Arc::new(DestinationGroupRepository::from_connection(conn.clone()));
        let bake_group_repo = Arc::new(BakeGroupRepository::from_connection(conn.clone()));
        let equipment_type_repo = Arc::new(EquipmentTypeRepository::from_connection(conn.clone()));
        let product_repo = Arc::new(ProductRepository::from_connection(conn.clone()));
        let order_line_repo = Arc::new(OrderLineRepository::from_connection(conn));

        // ==========================================
        // 初始化API层
        // ==========================================
        let config_reader: Arc<dyn PlannerConfigReader> = config_manager.clone();
        let production_plan_api = Arc::new(ProductionPlanApi::new(
            destination_group_repo,
            bake_group_repo,
            equipment_type_repo,
            product_repo,
            order_line_repo,
            config_reader,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            production_plan_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 TRAY_PLANNING_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("TRAY_PLANNING_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./tray_planning.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("tray-planning-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("tray-planning");
        }

        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&path).is_ok() {
            path = path.join("tray_planning.db");
        } else {
            path = PathBuf::from("./tray_planning.db");
        }
    }

    path.to_string_lossy().to_string()
}
