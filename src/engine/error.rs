// ==========================================
// 农场周期订单排产系统 - 引擎层错误类型
// ==========================================
// 分类:
// - 软错误: 跳过受影响单元继续计算,记录在 ScheduleDiagnostics
// - 致命错误: 中止本次计算,即本枚举
// ==========================================

use crate::config::ConfigError;
use thiserror::Error;

/// 引擎致命错误
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("排产参数非法: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("周期订单结束边界无法确定: order_id={order_id}")]
    UnboundedRecurrence { order_id: String },

    #[error("并行排产任务失败: {0}")]
    TaskJoin(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
