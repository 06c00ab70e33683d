// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use chrono::Weekday;
use farm_sow_scheduler::config::{ConfigError, ConfigResult, SchedulerConfigReader};
use farm_sow_scheduler::domain::types::WeekdayMask;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub fallback_growth_days: i64,
    pub reconciliation_tolerance_days: i64,
    pub open_ended_horizon_days: i64,
    pub sow_weekdays: WeekdayMask,
    /// 模拟配置存储不可用
    pub fail_storage: bool,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            fallback_growth_days: 10,
            reconciliation_tolerance_days: 1,
            open_ended_horizon_days: 366,
            sow_weekdays: WeekdayMask::EMPTY,
            fail_storage: false,
        }
    }

    /// 自定义核销容差
    pub fn with_tolerance(tolerance_days: i64) -> Self {
        let mut config = Self::default();
        config.reconciliation_tolerance_days = tolerance_days;
        config
    }

    /// 自定义播种星期
    pub fn with_sow_weekdays(days: &[Weekday]) -> Self {
        let mut config = Self::default();
        config.sow_weekdays = days.iter().copied().collect();
        config
    }

    /// 自定义长期订单视界
    pub fn with_horizon(horizon_days: i64) -> Self {
        let mut config = Self::default();
        config.open_ended_horizon_days = horizon_days;
        config
    }

    /// 存储不可用
    pub fn failing() -> Self {
        let mut config = Self::default();
        config.fail_storage = true;
        config
    }

    fn check(&self) -> ConfigResult<()> {
        if self.fail_storage {
            return Err(ConfigError::Storage("mock storage offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SchedulerConfigReader for MockConfig {
    async fn get_fallback_growth_days(&self) -> ConfigResult<i64> {
        self.check()?;
        Ok(self.fallback_growth_days)
    }

    async fn get_reconciliation_tolerance_days(&self) -> ConfigResult<i64> {
        self.check()?;
        Ok(self.reconciliation_tolerance_days)
    }

    async fn get_open_ended_horizon_days(&self) -> ConfigResult<i64> {
        self.check()?;
        Ok(self.open_ended_horizon_days)
    }

    async fn get_sow_weekdays(&self) -> ConfigResult<WeekdayMask> {
        self.check()?;
        Ok(self.sow_weekdays)
    }
}
