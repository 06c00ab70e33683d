// ==========================================
// 农场周期订单排产系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::ScheduleApi;
use crate::config::config_manager::ConfigManager;
use crate::db::{init_snapshot_schema, open_sqlite_connection};
use crate::repository::SqliteSnapshotRepository;

/// 应用状态
///
/// 配置与快照仓储共用同一个连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器（同时作为排产参数读取器）
    pub config_manager: Arc<ConfigManager>,

    /// 排产快照仓储
    pub snapshot_repo: Arc<SqliteSnapshotRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库并确保表结构存在
    /// 2. 初始化配置管理器与快照仓储
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_snapshot_schema(&conn).map_err(|e| format!("无法初始化表结构: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        Ok(Self {
            db_path,
            config_manager: Arc::new(ConfigManager::from_connection(conn.clone())),
            snapshot_repo: Arc::new(SqliteSnapshotRepository::from_connection(conn)),
        })
    }

    /// 构造排产查询API
    pub fn schedule_api(&self) -> ScheduleApi {
        ScheduleApi::new(self.config_manager.clone(), self.snapshot_repo.clone())
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 FARM_SOW_SCHEDULER_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("FARM_SOW_SCHEDULER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./farm_sow_scheduler.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("farm-sow-scheduler");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("farm_sow_scheduler.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_initializes_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("state.db").to_string_lossy().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        assert_eq!(state.db_path, db_path);

        let snapshot =
            crate::repository::SchedulingDataSource::load_snapshot(state.snapshot_repo.as_ref())
                .unwrap();
        assert!(snapshot.orders.is_empty());
    }
}
