// ==========================================
// 农场周期订单排产系统 - 排产参数
// ==========================================
// 职责: 排产参数的默认值、加载与校验
// 红线: 参数在进入引擎前校验完毕,引擎内不再兜底
// ==========================================

use crate::config::scheduler_config_trait::SchedulerConfigReader;
use crate::domain::types::WeekdayMask;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置默认值
pub mod defaults {
    /// 配方无步骤时的兜底生长天数
    pub const FALLBACK_GROWTH_DAYS: i64 = 10;
    /// 核销容差（天）
    pub const RECONCILIATION_TOLERANCE_DAYS: i64 = 1;
    /// 长期订单展开视界（天）
    pub const OPEN_ENDED_HORIZON_DAYS: i64 = 366;
}

/// 视界上限（约十年）
pub const MAX_HORIZON_DAYS: i64 = 3660;
/// 兜底生长天数上限
pub const MAX_FALLBACK_GROWTH_DAYS: i64 = 365;
/// 核销容差上限
pub const MAX_TOLERANCE_DAYS: i64 = 30;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置存储访问失败: {0}")]
    Storage(String),

    #[error("配置锁获取失败: {0}")]
    LockError(String),

    #[error("配置值非法 (key={key}): {message}")]
    Invalid { key: String, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::Storage(err.to_string())
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// SchedulerConfig - 排产参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// 配方无步骤时的兜底生长天数（必须 ≥ 1,零提前期会导致当天播当天交）
    #[serde(default = "default_fallback_growth_days")]
    pub fallback_growth_days: i64,

    /// 核销容差（天）: 生产记录与播种日相差不超过此值即视为已完成
    #[serde(default = "default_tolerance_days")]
    pub reconciliation_tolerance_days: i64,

    /// 长期订单（无结束日期）展开视界（天）
    #[serde(default = "default_horizon_days")]
    pub open_ended_horizon_days: i64,

    /// 允许播种的星期（空集表示不限制）
    #[serde(default)]
    pub sow_weekdays: WeekdayMask,
}

fn default_fallback_growth_days() -> i64 {
    defaults::FALLBACK_GROWTH_DAYS
}

fn default_tolerance_days() -> i64 {
    defaults::RECONCILIATION_TOLERANCE_DAYS
}

fn default_horizon_days() -> i64 {
    defaults::OPEN_ENDED_HORIZON_DAYS
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fallback_growth_days: defaults::FALLBACK_GROWTH_DAYS,
            reconciliation_tolerance_days: defaults::RECONCILIATION_TOLERANCE_DAYS,
            open_ended_horizon_days: defaults::OPEN_ENDED_HORIZON_DAYS,
            sow_weekdays: WeekdayMask::EMPTY,
        }
    }
}

impl SchedulerConfig {
    /// 从配置读取器加载并校验
    pub async fn load<R>(reader: &R) -> ConfigResult<Self>
    where
        R: SchedulerConfigReader + ?Sized,
    {
        let config = Self {
            fallback_growth_days: reader.get_fallback_growth_days().await?,
            reconciliation_tolerance_days: reader.get_reconciliation_tolerance_days().await?,
            open_ended_horizon_days: reader.get_open_ended_horizon_days().await?,
            sow_weekdays: reader.get_sow_weekdays().await?,
        };
        config.validate()?;
        Ok(config)
    }

    /// 校验参数范围
    ///
    /// - fallback_growth_days ∈ [1, 365]
    /// - reconciliation_tolerance_days ∈ [0, 30]
    /// - open_ended_horizon_days ∈ [1, 3660]（视界无界即为致命配置错误）
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=MAX_FALLBACK_GROWTH_DAYS).contains(&self.fallback_growth_days) {
            return Err(ConfigError::Invalid {
                key: "fallback_growth_days".to_string(),
                message: format!(
                    "must be within 1..={}, got {}",
                    MAX_FALLBACK_GROWTH_DAYS, self.fallback_growth_days
                ),
            });
        }

        if !(0..=MAX_TOLERANCE_DAYS).contains(&self.reconciliation_tolerance_days) {
            return Err(ConfigError::Invalid {
                key: "reconciliation_tolerance_days".to_string(),
                message: format!(
                    "must be within 0..={}, got {}",
                    MAX_TOLERANCE_DAYS, self.reconciliation_tolerance_days
                ),
            });
        }

        if !(1..=MAX_HORIZON_DAYS).contains(&self.open_ended_horizon_days) {
            return Err(ConfigError::Invalid {
                key: "open_ended_horizon_days".to_string(),
                message: format!(
                    "must be within 1..={}, got {}",
                    MAX_HORIZON_DAYS, self.open_ended_horizon_days
                ),
            });
        }

        Ok(())
    }
}
