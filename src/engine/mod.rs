// ==========================================
// 农场周期订单排产系统 - 引擎层
// ==========================================
// 职责: 纯计算的排产规则,不访问数据库
// 红线: 输入为只读快照,输出无副作用
// ==========================================

pub mod backward;
pub mod calendar;
pub mod demand;
pub mod error;
pub mod growth_duration;
pub mod orchestrator;
pub mod reconciliation;
pub mod recurrence;
pub mod window;

// 重导出核心引擎
pub use backward::BackwardScheduler;
pub use demand::{DemandDecomposer, ItemDecomposition, MappingIndex};
pub use error::{EngineError, EngineResult};
pub use growth_duration::GrowthDurationResolver;
pub use orchestrator::{FulfillmentScheduler, PlanningContext, ScheduleOutcome};
pub use reconciliation::{RecordedDates, ReconciliationFilter, ReconciliationReport};
pub use recurrence::RecurrenceExpander;
pub use window::ScheduleWindow;
