// ==========================================
// 农场周期订单排产系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 播种待办生成（周期订单 → 倒排播种建议）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排产规则
pub mod engine;

// 配置层 - 排产参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DurationUnit, Frequency, ProductionRecordKind, WeekdayMask};

// 领域实体
pub use domain::{
    OrderItem, ProductRecipeMapping, ProductionRecord, Recipe, RecurringOrder,
    ScheduleDiagnostics, ScheduleEntry, SchedulingSnapshot, Step,
};

// 引擎
pub use engine::{
    BackwardScheduler, DemandDecomposer, FulfillmentScheduler, GrowthDurationResolver,
    ReconciliationFilter, RecurrenceExpander, ScheduleOutcome, ScheduleWindow,
};

// 配置
pub use config::{ConfigManager, SchedulerConfig, SchedulerConfigReader};

// API
pub use api::{ScheduleApi, ScheduleReport};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "农场周期订单排产系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
