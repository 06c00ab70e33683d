// ==========================================
// 农场周期订单排产系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::scheduler_config::{defaults, ConfigError, ConfigResult, SchedulerConfig};
use crate::config::scheduler_config_trait::SchedulerConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::types::WeekdayMask;
use crate::repository::normalize::parse_weekday_list;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

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
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> ConfigResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 读取 global scope 的配置值（公开方法,供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取整数配置,缺失或格式错误时使用默认值
    fn get_i64_or_default(&self, key: &str, default: i64) -> ConfigResult<i64> {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<i64>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 获取所有 global 配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 随排产报告一起输出,便于复现某次计算
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 以 SchedulerConfig 整体写回 config_kv
    pub fn save_scheduler_config(&self, config: &SchedulerConfig) -> ConfigResult<()> {
        config.validate()?;
        self.set_global_config_value(
            config_keys::FALLBACK_GROWTH_DAYS,
            &config.fallback_growth_days.to_string(),
        )?;
        self.set_global_config_value(
            config_keys::RECONCILIATION_TOLERANCE_DAYS,
            &config.reconciliation_tolerance_days.to_string(),
        )?;
        self.set_global_config_value(
            config_keys::OPEN_ENDED_HORIZON_DAYS,
            &config.open_ended_horizon_days.to_string(),
        )?;
        self.set_global_config_value(
            config_keys::SOW_WEEKDAYS,
            &serde_json::to_string(&config.sow_weekdays)?,
        )?;
        Ok(())
    }
}

// ==========================================
// SchedulerConfigReader Trait 实现
// ==========================================
#[async_trait]
impl SchedulerConfigReader for ConfigManager {
    async fn get_fallback_growth_days(&self) -> ConfigResult<i64> {
        self.get_i64_or_default(
            config_keys::FALLBACK_GROWTH_DAYS,
            defaults::FALLBACK_GROWTH_DAYS,
        )
    }

    async fn get_reconciliation_tolerance_days(&self) -> ConfigResult<i64> {
        self.get_i64_or_default(
            config_keys::RECONCILIATION_TOLERANCE_DAYS,
            defaults::RECONCILIATION_TOLERANCE_DAYS,
        )
    }

    async fn get_open_ended_horizon_days(&self) -> ConfigResult<i64> {
        self.get_i64_or_default(
            config_keys::OPEN_ENDED_HORIZON_DAYS,
            defaults::OPEN_ENDED_HORIZON_DAYS,
        )
    }

    async fn get_sow_weekdays(&self) -> ConfigResult<WeekdayMask> {
        let Some(raw) = self.get_config_value(config_keys::SOW_WEEKDAYS)? else {
            return Ok(WeekdayMask::EMPTY);
        };

        let (mask, rejected) = parse_weekday_list(&raw);
        if !rejected.is_empty() {
            tracing::warn!(
                config_key = config_keys::SOW_WEEKDAYS,
                raw_value = %raw,
                rejected = ?rejected,
                "播种日配置含无法识别的星期，已忽略"
            );
        }
        Ok(mask)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 生长周期
    pub const FALLBACK_GROWTH_DAYS: &str = "fallback_growth_days";

    // 核销
    pub const RECONCILIATION_TOLERANCE_DAYS: &str = "reconciliation_tolerance_days";

    // 周期展开
    pub const OPEN_ENDED_HORIZON_DAYS: &str = "open_ended_horizon_days";

    // 播种日对齐 (JSON 数组或逗号分隔)
    pub const SOW_WEEKDAYS: &str = "sow_weekdays";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_snapshot_schema;
    use chrono::Weekday;

    fn in_memory_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_snapshot_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_missing_keys_fall_back_to_defaults() {
        let manager = in_memory_manager();
        let config = SchedulerConfig::load(&manager).await.unwrap();
        assert_eq!(config, SchedulerConfig::default());
    }

    #[tokio::test]
    async fn test_round_trip_through_config_kv() {
        let manager = in_memory_manager();
        let config = SchedulerConfig {
            fallback_growth_days: 12,
            reconciliation_tolerance_days: 2,
            open_ended_horizon_days: 400,
            sow_weekdays: vec![Weekday::Mon, Weekday::Thu].into_iter().collect(),
        };
        manager.save_scheduler_config(&config).unwrap();

        let loaded = SchedulerConfig::load(&manager).await.unwrap();
        assert_eq!(loaded, config);

        let snapshot = manager.get_config_snapshot().unwrap();
        assert!(snapshot.contains("\"sow_weekdays\""));
    }

    #[tokio::test]
    async fn test_malformed_number_uses_default() {
        let manager = in_memory_manager();
        manager
            .set_global_config_value(config_keys::RECONCILIATION_TOLERANCE_DAYS, "one")
            .unwrap();
        let tolerance = manager.get_reconciliation_tolerance_days().await.unwrap();
        assert_eq!(tolerance, defaults::RECONCILIATION_TOLERANCE_DAYS);
    }

    #[tokio::test]
    async fn test_out_of_range_horizon_is_fatal() {
        let manager = in_memory_manager();
        manager
            .set_global_config_value(config_keys::OPEN_ENDED_HORIZON_DAYS, "0")
            .unwrap();
        let result = SchedulerConfig::load(&manager).await;
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }
}
