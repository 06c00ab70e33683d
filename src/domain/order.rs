// ==========================================
// 农场周期订单排产系统 - 周期订单领域模型
// ==========================================
// 职责: 周期订单 + 订单明细
// 红线: 只读快照,引擎不修改订单
// ==========================================

use crate::domain::types::{Frequency, WeekdayMask};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// RecurringOrder - 周期订单
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringOrder {
    pub order_id: String,
    #[serde(default)]
    pub customer_name: Option<String>,

    // ===== 周期规则 =====
    pub frequency: Frequency,
    pub delivery_days: WeekdayMask, // 配送星期
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>, // None 表示长期有效

    pub is_active: bool,

    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl RecurringOrder {
    /// 是否为长期订单（无结束日期）
    pub fn is_open_ended(&self) -> bool {
        self.end_date.is_none()
    }
}

// ==========================================
// OrderItem - 订单明细
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: f64, // 订购数量（连续值,如盎司）
}
