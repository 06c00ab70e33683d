// ==========================================
// 农场周期订单排产系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod order;
pub mod production;
pub mod recipe;
pub mod schedule;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use order::{OrderItem, RecurringOrder};
pub use production::ProductionRecord;
pub use recipe::{ProductRecipeMapping, Recipe, Step};
pub use schedule::{ScheduleDiagnostics, ScheduleEntry, SkipRecord};
pub use snapshot::SchedulingSnapshot;
pub use types::{DurationUnit, Frequency, ProductionRecordKind, WeekdayMask};
