// ==========================================
// 农场周期订单排产系统 - 倒排播种引擎
// ==========================================
// 职责: (配送日, 配方, 需求量) + 生长天数 → 播种建议
// 规则:
// - sow_date = delivery_date - growth_days（纯日历天）
// - quantity = ceil(demand / 单盘产量)
// - 配置了允许播种星期时,只向前（更早）对齐,最多 6 步
// 红线: 不允许少种,不允许把播种日往后推
// ==========================================

use crate::domain::recipe::Recipe;
use crate::domain::schedule::ScheduleEntry;
use crate::domain::types::WeekdayMask;
use crate::engine::calendar::{add_days, days_between};
use chrono::{Datelike, NaiveDate};

/// 播种日对齐的最大回退步数
pub const MAX_ALIGNMENT_STEPS: i64 = 6;

// ==========================================
// BackwardScheduler - 倒排播种引擎
// ==========================================
pub struct BackwardScheduler {
    sow_weekdays: WeekdayMask,
}

impl BackwardScheduler {
    /// 创建引擎
    ///
    /// # 参数
    /// - sow_weekdays: 允许播种的星期,空集表示不对齐
    pub fn new(sow_weekdays: WeekdayMask) -> Self {
        Self { sow_weekdays }
    }

    /// 生成单条播种建议
    ///
    /// # 返回
    /// - None: 需求为零/非法,或日期越界
    pub fn schedule(
        &self,
        order_id: &str,
        delivery_date: NaiveDate,
        recipe: &Recipe,
        demand_quantity: f64,
        growth_days: i64,
    ) -> Option<ScheduleEntry> {
        if !(demand_quantity.is_finite() && demand_quantity > 0.0) {
            return None;
        }

        let unaligned = add_days(delivery_date, -growth_days.max(0))?;
        let (sow_date, aligned) = self.align_sow_date(unaligned);

        Some(ScheduleEntry {
            order_id: order_id.to_string(),
            recipe_id: recipe.recipe_id.clone(),
            recipe_name: recipe.recipe_name.clone(),
            sow_date,
            delivery_date,
            lead_time_days: days_between(sow_date, delivery_date),
            growth_days: growth_days.max(0),
            aligned,
            demand_quantity,
            quantity: Self::production_units(demand_quantity, recipe.effective_yield()),
        })
    }

    /// 播种日对齐
    ///
    /// 只往前退,找到允许的星期即停;6 步内找不到则保持原日期
    ///
    /// # 返回
    /// (对齐后日期, 是否发生了移动)
    pub fn align_sow_date(&self, sow_date: NaiveDate) -> (NaiveDate, bool) {
        if self.sow_weekdays.is_empty() || self.sow_weekdays.contains(sow_date.weekday()) {
            return (sow_date, false);
        }

        for step in 1..=MAX_ALIGNMENT_STEPS {
            let Some(candidate) = add_days(sow_date, -step) else {
                break;
            };
            if self.sow_weekdays.contains(candidate.weekday()) {
                return (candidate, true);
            }
        }

        (sow_date, false)
    }

    /// 需求 → 生产单位数（一律向上取整,产出不低于需求）
    pub fn production_units(demand_quantity: f64, unit_yield: f64) -> u32 {
        let raw = demand_quantity / unit_yield;
        if !(raw.is_finite() && raw > 0.0) {
            return 0;
        }
        raw.ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn recipe(id: &str, average_yield: Option<f64>) -> Recipe {
        Recipe {
            recipe_id: id.to_string(),
            recipe_name: format!("Recipe {}", id),
            average_yield,
            steps: vec![],
        }
    }

    #[test]
    fn test_sow_date_is_delivery_minus_growth() {
        let scheduler = BackwardScheduler::new(WeekdayMask::EMPTY);
        let entry = scheduler
            .schedule("O1", d(2024, 1, 3), &recipe("A", None), 2.5, 10)
            .unwrap();
        assert_eq!(entry.sow_date, d(2023, 12, 24));
        assert_eq!(entry.lead_time_days, 10);
        assert_eq!(entry.quantity, 3);
        assert!(!entry.aligned);
        assert_eq!(add_days(entry.sow_date, entry.lead_time_days), Some(entry.delivery_date));
    }

    #[test]
    fn test_quantity_uses_yield_and_ceiling() {
        let scheduler = BackwardScheduler::new(WeekdayMask::EMPTY);
        let a = scheduler
            .schedule("O1", d(2024, 1, 10), &recipe("A", Some(4.0)), 6.0, 7)
            .unwrap();
        let b = scheduler
            .schedule("O1", d(2024, 1, 10), &recipe("B", Some(4.0)), 3.0, 7)
            .unwrap();
        assert_eq!(a.quantity, 2);
        assert_eq!(b.quantity, 1);
    }

    #[test]
    fn test_production_units_never_under_plants() {
        assert_eq!(BackwardScheduler::production_units(0.01, 1.0), 1);
        assert_eq!(BackwardScheduler::production_units(4.0, 1.0), 4);
        assert_eq!(BackwardScheduler::production_units(4.2, 1.0), 5);
        assert_eq!(BackwardScheduler::production_units(4.9, 1.0), 5);
        // 略高于整数也向上取整
        assert_eq!(BackwardScheduler::production_units(6.0000000005, 1.0), 7);
        for tenths in 1..200 {
            let demand = tenths as f64 / 10.0;
            let units = BackwardScheduler::production_units(demand, 1.0);
            assert!(units as f64 >= demand);
            assert!((units as f64) < demand + 1.0);
        }
    }

    #[test]
    fn test_zero_demand_yields_no_entry() {
        let scheduler = BackwardScheduler::new(WeekdayMask::EMPTY);
        assert!(scheduler.schedule("O1", d(2024, 1, 10), &recipe("A", None), 0.0, 7).is_none());
    }

    #[test]
    fn test_alignment_moves_earlier_only() {
        // 只允许周一播种; 2024-01-05 为周五 → 退到 2024-01-01
        let scheduler = BackwardScheduler::new([Weekday::Mon].into_iter().collect());
        let (date, aligned) = scheduler.align_sow_date(d(2024, 1, 5));
        assert_eq!(date, d(2024, 1, 1));
        assert!(aligned);

        let entry = scheduler
            .schedule("O1", d(2024, 1, 15), &recipe("A", None), 1.0, 10)
            .unwrap();
        assert_eq!(entry.sow_date, d(2024, 1, 1));
        assert_eq!(entry.growth_days, 10);
        assert_eq!(entry.lead_time_days, 14);
        assert!(entry.sow_date <= add_days(entry.delivery_date, -entry.growth_days).unwrap());
    }

    #[test]
    fn test_alignment_keeps_permitted_day() {
        let scheduler = BackwardScheduler::new([Weekday::Mon, Weekday::Thu].into_iter().collect());
        let (date, aligned) = scheduler.align_sow_date(d(2024, 1, 4));
        assert_eq!(date, d(2024, 1, 4));
        assert!(!aligned);
    }

    #[test]
    fn test_alignment_looks_back_six_days_at_most() {
        // 周二只允许; 2024-01-01(周一) 退 6 天到 2023-12-26(周二)
        let scheduler = BackwardScheduler::new([Weekday::Tue].into_iter().collect());
        let (date, aligned) = scheduler.align_sow_date(d(2024, 1, 1));
        assert_eq!(date, d(2023, 12, 26));
        assert!(aligned);
    }
}
