// ==========================================
// 农场周期订单排产系统 - 排产结果领域模型
// ==========================================
// 职责: 播种建议条目 + 软跳过诊断信息
// 红线: 数量一律向上取整,不允许少种
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ==========================================
// ScheduleEntry - 播种建议
// ==========================================
// 不变量: sow_date + lead_time_days == delivery_date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    // ===== 引用 =====
    pub order_id: String,
    pub recipe_id: String,
    pub recipe_name: String,

    // ===== 日期 =====
    pub sow_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub lead_time_days: i64, // delivery_date - sow_date
    pub growth_days: i64,    // 配方生长天数（对齐前）
    pub aligned: bool,       // 是否因播种日限制而提前

    // ===== 数量 =====
    pub demand_quantity: f64, // 未取整需求
    pub quantity: u32,        // 生产单位数（向上取整）
}

impl ScheduleEntry {
    /// 输出排序键: (sow_date, recipe_id),再以 delivery_date / order_id 兜底保证稳定
    pub fn output_order(a: &ScheduleEntry, b: &ScheduleEntry) -> Ordering {
        a.sow_date
            .cmp(&b.sow_date)
            .then_with(|| a.recipe_id.cmp(&b.recipe_id))
            .then_with(|| a.delivery_date.cmp(&b.delivery_date))
            .then_with(|| a.order_id.cmp(&b.order_id))
    }
}

// ==========================================
// SkipRecord - 单条软跳过记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub order_id: String,
    pub reference: String, // 产品ID / 配方ID / 说明
}

impl SkipRecord {
    fn new(order_id: &str, reference: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            reference: reference.to_string(),
        }
    }
}

// ==========================================
// ScheduleDiagnostics - 软跳过诊断旁路
// ==========================================
// 软错误不中断计算,只在此记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDiagnostics {
    pub unmapped_products: Vec<SkipRecord>,
    pub invalid_ratio_products: Vec<SkipRecord>,
    pub missing_recipes: Vec<SkipRecord>,
    pub empty_weekday_orders: Vec<SkipRecord>,
    pub empty_range_orders: Vec<SkipRecord>,
    pub inactive_orders: Vec<SkipRecord>,
    /// 倒排播种日超出日历范围（生长周期异常长）
    #[serde(default)]
    pub out_of_range_sowings: Vec<SkipRecord>,
}

impl ScheduleDiagnostics {
    pub fn record_unmapped_product(&mut self, order_id: &str, product_id: &str) {
        push_unique(&mut self.unmapped_products, SkipRecord::new(order_id, product_id));
    }

    pub fn record_invalid_ratio(&mut self, order_id: &str, product_id: &str) {
        push_unique(
            &mut self.invalid_ratio_products,
            SkipRecord::new(order_id, product_id),
        );
    }

    pub fn record_missing_recipe(&mut self, order_id: &str, recipe_id: &str) {
        push_unique(&mut self.missing_recipes, SkipRecord::new(order_id, recipe_id));
    }

    pub fn record_empty_weekdays(&mut self, order_id: &str) {
        push_unique(
            &mut self.empty_weekday_orders,
            SkipRecord::new(order_id, "delivery_days"),
        );
    }

    pub fn record_empty_range(&mut self, order_id: &str, detail: &str) {
        push_unique(&mut self.empty_range_orders, SkipRecord::new(order_id, detail));
    }

    pub fn record_inactive(&mut self, order_id: &str) {
        push_unique(&mut self.inactive_orders, SkipRecord::new(order_id, "is_active=false"));
    }

    pub fn record_out_of_range_sowing(&mut self, order_id: &str, recipe_id: &str) {
        push_unique(
            &mut self.out_of_range_sowings,
            SkipRecord::new(order_id, recipe_id),
        );
    }

    /// 合并另一份诊断（并行按订单计算后汇总）
    pub fn merge(&mut self, other: ScheduleDiagnostics) {
        for r in other.unmapped_products {
            push_unique(&mut self.unmapped_products, r);
        }
        for r in other.invalid_ratio_products {
            push_unique(&mut self.invalid_ratio_products, r);
        }
        for r in other.missing_recipes {
            push_unique(&mut self.missing_recipes, r);
        }
        for r in other.empty_weekday_orders {
            push_unique(&mut self.empty_weekday_orders, r);
        }
        for r in other.empty_range_orders {
            push_unique(&mut self.empty_range_orders, r);
        }
        for r in other.inactive_orders {
            push_unique(&mut self.inactive_orders, r);
        }
        for r in other.out_of_range_sowings {
            push_unique(&mut self.out_of_range_sowings, r);
        }
    }

    pub fn total(&self) -> usize {
        self.unmapped_products.len()
            + self.invalid_ratio_products.len()
            + self.missing_recipes.len()
            + self.empty_weekday_orders.len()
            + self.empty_range_orders.len()
            + self.inactive_orders.len()
            + self.out_of_range_sowings.len()
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

// 同一订单的同一引用在多个配送日重复出现,只记一次
fn push_unique(list: &mut Vec<SkipRecord>, record: SkipRecord) {
    if !list.contains(&record) {
        list.push(record);
    }
}
