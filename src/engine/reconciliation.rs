// ==========================================
// 农场周期订单排产系统 - 核销过滤器
// ==========================================
// 职责: 剔除已被实际生产记录满足的播种建议
// 输入: 全部订单汇总后的候选建议 + 各配方的生产记录日期
// 输出: 过滤后按 (sow_date, recipe_id) 升序的建议
// 红线: 必须在全量候选上一次性执行,不可按订单分别核销
// ==========================================

use crate::domain::production::ProductionRecord;
use crate::domain::schedule::ScheduleEntry;
use crate::engine::calendar::abs_distance;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

// ==========================================
// RecordedDates - 各配方的生产记录日期集合
// ==========================================
// 育苗盘创建与任务完成两类记录合并,不区分来源
#[derive(Debug, Clone, Default)]
pub struct RecordedDates {
    by_recipe: HashMap<String, BTreeSet<NaiveDate>>,
}

impl RecordedDates {
    pub fn from_records(records: &[ProductionRecord]) -> Self {
        let mut dates = Self::default();
        for record in records {
            dates.insert(&record.recipe_id, record.recorded_date);
        }
        dates
    }

    pub fn insert(&mut self, recipe_id: &str, date: NaiveDate) {
        self.by_recipe
            .entry(recipe_id.to_string())
            .or_default()
            .insert(date);
    }

    /// 与 date 最近的记录日期的绝对天数差
    ///
    /// # 返回
    /// - None: 该配方无任何记录
    pub fn nearest_distance(&self, recipe_id: &str, date: NaiveDate) -> Option<i64> {
        let dates = self.by_recipe.get(recipe_id)?;
        let before = dates.range(..=date).next_back();
        let after = dates.range(date..).next();

        match (before, after) {
            (Some(b), Some(a)) => Some(abs_distance(*b, date).min(abs_distance(*a, date))),
            (Some(b), None) => Some(abs_distance(*b, date)),
            (None, Some(a)) => Some(abs_distance(*a, date)),
            (None, None) => None,
        }
    }
}

/// 核销统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub candidates: usize,
    pub kept: usize,
    pub dropped: usize,
}

// ==========================================
// ReconciliationFilter - 核销过滤器
// ==========================================
pub struct ReconciliationFilter {
    tolerance_days: i64,
}

impl ReconciliationFilter {
    /// 创建过滤器
    ///
    /// # 参数
    /// - tolerance_days: 容差天数（≥ 0）
    pub fn new(tolerance_days: i64) -> Self {
        Self {
            tolerance_days: tolerance_days.max(0),
        }
    }

    /// 候选是否已被生产记录满足
    pub fn is_fulfilled(&self, entry: &ScheduleEntry, recorded: &RecordedDates) -> bool {
        match recorded.nearest_distance(&entry.recipe_id, entry.sow_date) {
            Some(distance) => distance <= self.tolerance_days,
            None => false,
        }
    }

    /// 执行核销并排序
    ///
    /// 幂等: 对输出再次执行结果不变
    pub fn apply(
        &self,
        candidates: Vec<ScheduleEntry>,
        recorded: &RecordedDates,
    ) -> (Vec<ScheduleEntry>, ReconciliationReport) {
        let total = candidates.len();

        let mut kept: Vec<ScheduleEntry> = candidates
            .into_iter()
            .filter(|entry| {
                let fulfilled = self.is_fulfilled(entry, recorded);
                if fulfilled {
                    debug!(
                        order_id = %entry.order_id,
                        recipe_id = %entry.recipe_id,
                        sow_date = %entry.sow_date,
                        "已有生产记录，核销"
                    );
                }
                !fulfilled
            })
            .collect();

        kept.sort_by(ScheduleEntry::output_order);

        let report = ReconciliationReport {
            candidates: total,
            kept: kept.len(),
            dropped: total - kept.len(),
        };
        (kept, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ProductionRecordKind;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry(order: &str, recipe: &str, sow: NaiveDate) -> ScheduleEntry {
        ScheduleEntry {
            order_id: order.to_string(),
            recipe_id: recipe.to_string(),
            recipe_name: recipe.to_string(),
            sow_date: sow,
            delivery_date: sow + chrono::Duration::days(10),
            lead_time_days: 10,
            growth_days: 10,
            aligned: false,
            demand_quantity: 1.0,
            quantity: 1,
        }
    }

    fn record(recipe: &str, date: NaiveDate) -> ProductionRecord {
        ProductionRecord {
            recipe_id: recipe.to_string(),
            recorded_date: date,
            kind: ProductionRecordKind::TrayCreated,
        }
    }

    #[test]
    fn test_nearest_distance_uses_both_neighbours() {
        let recorded = RecordedDates::from_records(&[
            record("X", d(2024, 2, 1)),
            record("X", d(2024, 2, 10)),
        ]);
        assert_eq!(recorded.nearest_distance("X", d(2024, 2, 8)), Some(2));
        assert_eq!(recorded.nearest_distance("X", d(2024, 2, 3)), Some(2));
        assert_eq!(recorded.nearest_distance("X", d(2024, 2, 10)), Some(0));
        assert_eq!(recorded.nearest_distance("X", d(2024, 3, 1)), Some(20));
        assert_eq!(recorded.nearest_distance("Y", d(2024, 2, 1)), None);
    }

    #[test]
    fn test_tolerance_window() {
        let filter = ReconciliationFilter::new(1);
        let recorded = RecordedDates::from_records(&[record("X", d(2024, 2, 5))]);

        let candidates = vec![
            entry("O1", "X", d(2024, 2, 6)),
            entry("O1", "X", d(2024, 2, 8)),
            entry("O1", "X", d(2024, 2, 5)),
            entry("O1", "X", d(2024, 2, 4)),
        ];
        let (kept, report) = filter.apply(candidates, &recorded);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].sow_date, d(2024, 2, 8));
        assert_eq!(report.dropped, 3);
    }

    #[test]
    fn test_default_tolerance_keeps_candidates_two_days_away() {
        let filter = ReconciliationFilter::new(1);
        let recorded = RecordedDates::from_records(&[record("X", d(2024, 2, 5))]);

        // 距离 2 = 容差 + 1,两侧都保留
        assert!(!filter.is_fulfilled(&entry("O1", "X", d(2024, 2, 3)), &recorded));
        assert!(!filter.is_fulfilled(&entry("O1", "X", d(2024, 2, 7)), &recorded));

        let candidates = vec![
            entry("O1", "X", d(2024, 2, 7)),
            entry("O2", "X", d(2024, 2, 3)),
            entry("O3", "X", d(2024, 2, 6)),
        ];
        let (kept, report) = filter.apply(candidates, &recorded);
        let sows: Vec<_> = kept.iter().map(|e| e.sow_date).collect();
        assert_eq!(sows, vec![d(2024, 2, 3), d(2024, 2, 7)]);
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_recipe_without_records_is_kept() {
        let filter = ReconciliationFilter::new(1);
        let recorded = RecordedDates::from_records(&[record("X", d(2024, 2, 5))]);
        let (kept, _) = filter.apply(vec![entry("O1", "Y", d(2024, 2, 5))], &recorded);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_one_record_suppresses_coinciding_candidates_across_orders() {
        let filter = ReconciliationFilter::new(0);
        let recorded = RecordedDates::from_records(&[record("X", d(2024, 2, 5))]);
        let candidates = vec![
            entry("O1", "X", d(2024, 2, 5)),
            entry("O2", "X", d(2024, 2, 5)),
        ];
        let (kept, _) = filter.apply(candidates, &recorded);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_output_sorted_and_idempotent() {
        let filter = ReconciliationFilter::new(1);
        let recorded = RecordedDates::from_records(&[record("B", d(2024, 2, 1))]);
        let candidates = vec![
            entry("O1", "B", d(2024, 2, 9)),
            entry("O1", "A", d(2024, 2, 9)),
            entry("O2", "A", d(2024, 2, 3)),
            entry("O1", "B", d(2024, 2, 2)),
        ];
        let (first, _) = filter.apply(candidates, &recorded);
        let keys: Vec<(NaiveDate, &str)> =
            first.iter().map(|e| (e.sow_date, e.recipe_id.as_str())).collect();
        assert_eq!(
            keys,
            vec![(d(2024, 2, 3), "A"), (d(2024, 2, 9), "A"), (d(2024, 2, 9), "B")]
        );

        let (second, report) = filter.apply(first.clone(), &recorded);
        assert_eq!(second, first);
        assert_eq!(report.dropped, 0);
    }

    #[test]
    fn test_negative_tolerance_clamped_to_zero() {
        let filter = ReconciliationFilter::new(-5);
        let recorded = RecordedDates::from_records(&[record("X", d(2024, 2, 5))]);
        assert!(filter.is_fulfilled(&entry("O1", "X", d(2024, 2, 5)), &recorded));
        assert!(!filter.is_fulfilled(&entry("O1", "X", d(2024, 2, 6)), &recorded));
    }
}
