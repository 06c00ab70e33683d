// ==========================================
// 农场周期订单排产系统 - API 层
// ==========================================
// 职责: 对外业务接口,串联配置/仓储/引擎
// ==========================================

pub mod error;
pub mod schedule_api;

pub use error::{ApiError, ApiResult};
pub use schedule_api::{ScheduleApi, ScheduleReport};
