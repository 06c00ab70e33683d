// ==========================================
// 农场周期订单排产系统 - 生产记录领域模型
// ==========================================
// 职责: 已发生的生产活动（育苗盘创建 / 任务完成）
// 红线: 对排产核心只读
// ==========================================

use crate::domain::types::ProductionRecordKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub recipe_id: String,
    pub recorded_date: NaiveDate,
    pub kind: ProductionRecordKind,
}
