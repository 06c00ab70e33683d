// ==========================================
// 农场周期订单排产系统 - 排产输入快照
// ==========================================
// 职责: 一次排产计算所需的全部只读数据
// 红线: 计算期间不可变;数据更新须提供新快照
// ==========================================

use crate::domain::order::RecurringOrder;
use crate::domain::production::ProductionRecord;
use crate::domain::recipe::{ProductRecipeMapping, Recipe};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulingSnapshot {
    pub orders: Vec<RecurringOrder>,
    pub mappings: Vec<ProductRecipeMapping>,
    pub recipes: Vec<Recipe>,
    pub production_records: Vec<ProductionRecord>,
}
