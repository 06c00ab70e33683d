// ==========================================
// 农场周期订单排产系统 - 排产配置读取 Trait
// ==========================================
// 职责: 定义排产所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::scheduler_config::ConfigResult;
use crate::domain::types::WeekdayMask;
use async_trait::async_trait;

// ==========================================
// SchedulerConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）,测试中的 MockConfig
#[async_trait]
pub trait SchedulerConfigReader: Send + Sync {
    /// 获取兜底生长天数（配方无任何步骤时使用）
    ///
    /// # 默认值
    /// - 10
    async fn get_fallback_growth_days(&self) -> ConfigResult<i64>;

    /// 获取核销容差天数
    ///
    /// # 默认值
    /// - 1
    async fn get_reconciliation_tolerance_days(&self) -> ConfigResult<i64>;

    /// 获取长期订单的展开视界（天）
    ///
    /// # 默认值
    /// - 366
    async fn get_open_ended_horizon_days(&self) -> ConfigResult<i64>;

    /// 获取允许播种的星期
    ///
    /// # 返回
    /// - 空集: 不做播种日对齐
    ///
    /// # 默认值
    /// - []
    async fn get_sow_weekdays(&self) -> ConfigResult<WeekdayMask>;
}
