// ==========================================
// 农场周期订单排产系统 - 展示窗口过滤
// ==========================================
// 职责: 对排产结果按播种日做纯展示过滤（"未来 7 天"、"下个月"）
// 红线: 不改变条目本身,不参与核销
// ==========================================

use crate::domain::schedule::ScheduleEntry;
use crate::engine::calendar::add_days;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleWindow {
    /// [today, today + days]
    NextDays { days: u32 },
    /// [today, today + 1 个月]
    NextMonth,
    /// [from, to]
    Between { from: NaiveDate, to: NaiveDate },
    /// sow_date < today 且仍未核销（已错过的播种）
    Overdue,
}

impl ScheduleWindow {
    /// 窗口的闭区间边界
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            ScheduleWindow::NextDays { days } => {
                (today, add_days(today, days as i64).unwrap_or(NaiveDate::MAX))
            }
            ScheduleWindow::NextMonth => (
                today,
                today
                    .checked_add_months(Months::new(1))
                    .unwrap_or(NaiveDate::MAX),
            ),
            ScheduleWindow::Between { from, to } => (from, to),
            ScheduleWindow::Overdue => {
                (NaiveDate::MIN, add_days(today, -1).unwrap_or(NaiveDate::MIN))
            }
        }
    }

    pub fn contains(&self, entry: &ScheduleEntry, today: NaiveDate) -> bool {
        let (from, to) = self.bounds(today);
        entry.sow_date >= from && entry.sow_date <= to
    }

    /// 过滤,保持原有顺序
    pub fn apply(&self, entries: &[ScheduleEntry], today: NaiveDate) -> Vec<ScheduleEntry> {
        entries
            .iter()
            .filter(|e| self.contains(e, today))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry(sow: NaiveDate) -> ScheduleEntry {
        ScheduleEntry {
            order_id: "O1".to_string(),
            recipe_id: "A".to_string(),
            recipe_name: "A".to_string(),
            sow_date: sow,
            delivery_date: sow,
            lead_time_days: 0,
            growth_days: 0,
            aligned: false,
            demand_quantity: 1.0,
            quantity: 1,
        }
    }

    #[test]
    fn test_next_days_inclusive() {
        let today = d(2024, 1, 10);
        let entries = vec![
            entry(d(2024, 1, 9)),
            entry(d(2024, 1, 10)),
            entry(d(2024, 1, 17)),
            entry(d(2024, 1, 18)),
        ];
        let filtered = ScheduleWindow::NextDays { days: 7 }.apply(&entries, today);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[1].sow_date, d(2024, 1, 17));
    }

    #[test]
    fn test_next_month_handles_month_end() {
        let (from, to) = ScheduleWindow::NextMonth.bounds(d(2024, 1, 31));
        assert_eq!(from, d(2024, 1, 31));
        assert_eq!(to, d(2024, 2, 29));
    }

    #[test]
    fn test_overdue_excludes_today() {
        let today = d(2024, 1, 10);
        let entries = vec![entry(d(2024, 1, 9)), entry(d(2024, 1, 10))];
        let filtered = ScheduleWindow::Overdue.apply(&entries, today);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].sow_date, d(2024, 1, 9));
    }

    #[test]
    fn test_window_serde_shape() {
        let json = serde_json::to_string(&ScheduleWindow::NextDays { days: 7 }).unwrap();
        assert_eq!(json, r#"{"kind":"NEXT_DAYS","days":7}"#);
    }
}
