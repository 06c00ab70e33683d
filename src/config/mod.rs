// ==========================================
// 农场周期订单排产系统 - 配置层
// ==========================================
// 职责: 排产参数管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod scheduler_config;
pub mod scheduler_config_trait;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use scheduler_config::{ConfigError, ConfigResult, SchedulerConfig};
pub use scheduler_config_trait::SchedulerConfigReader;
