// ==========================================
// 测试数据构造器
// ==========================================
// 职责: 以最少样板构造订单/配方/配比/生产记录
// ==========================================

use chrono::{NaiveDate, Weekday};
use farm_sow_scheduler::domain::types::{DurationUnit, Frequency, ProductionRecordKind};
use farm_sow_scheduler::domain::{
    OrderItem, ProductRecipeMapping, ProductionRecord, Recipe, RecurringOrder, SchedulingSnapshot,
    Step,
};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// 周期订单构造器
pub struct OrderBuilder {
    order: RecurringOrder,
}

impl OrderBuilder {
    pub fn weekly(order_id: &str, days: &[Weekday], start: NaiveDate) -> Self {
        Self {
            order: RecurringOrder {
                order_id: order_id.to_string(),
                customer_name: Some(format!("Customer {}", order_id)),
                frequency: Frequency::Weekly,
                delivery_days: days.iter().copied().collect(),
                start_date: start,
                end_date: None,
                is_active: true,
                items: Vec::new(),
            },
        }
    }

    pub fn bi_weekly(order_id: &str, days: &[Weekday], start: NaiveDate) -> Self {
        let mut builder = Self::weekly(order_id, days, start);
        builder.order.frequency = Frequency::BiWeekly;
        builder
    }

    pub fn until(mut self, end: NaiveDate) -> Self {
        self.order.end_date = Some(end);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.order.is_active = false;
        self
    }

    pub fn item(mut self, product_id: &str, quantity: f64) -> Self {
        self.order.items.push(OrderItem {
            product_id: product_id.to_string(),
            product_name: None,
            quantity,
        });
        self
    }

    pub fn build(self) -> RecurringOrder {
        self.order
    }
}

/// 单步骤配方（天）
pub fn recipe(recipe_id: &str, days: f64) -> Recipe {
    recipe_with_steps(recipe_id, vec![(days, DurationUnit::Days)])
}

pub fn recipe_with_steps(recipe_id: &str, steps: Vec<(f64, DurationUnit)>) -> Recipe {
    Recipe {
        recipe_id: recipe_id.to_string(),
        recipe_name: format!("Recipe {}", recipe_id),
        average_yield: None,
        steps: steps
            .into_iter()
            .enumerate()
            .map(|(i, (duration, duration_unit))| Step {
                sequence_order: i as i32 + 1,
                duration,
                duration_unit,
            })
            .collect(),
    }
}

pub fn with_yield(mut recipe: Recipe, average_yield: f64) -> Recipe {
    recipe.average_yield = Some(average_yield);
    recipe
}

pub fn mapping(product_id: &str, recipe_id: &str, ratio: f64) -> ProductRecipeMapping {
    ProductRecipeMapping {
        product_id: product_id.to_string(),
        recipe_id: recipe_id.to_string(),
        variety_id: None,
        ratio,
    }
}

pub fn record(recipe_id: &str, date: NaiveDate) -> ProductionRecord {
    ProductionRecord {
        recipe_id: recipe_id.to_string(),
        recorded_date: date,
        kind: ProductionRecordKind::TrayCreated,
    }
}

/// 一个订单 + 一个产品 + 一个配方的最小快照
pub fn single_recipe_snapshot(order: RecurringOrder, recipe: Recipe) -> SchedulingSnapshot {
    let mappings = order
        .items
        .iter()
        .map(|item| mapping(&item.product_id, &recipe.recipe_id, 1.0))
        .collect();
    SchedulingSnapshot {
        orders: vec![order],
        mappings,
        recipes: vec![recipe],
        production_records: Vec::new(),
    }
}
