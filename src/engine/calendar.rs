// ==========================================
// 农场周期订单排产系统 - 日历算术
// ==========================================
// 职责: 纯日历日期加减,无时分秒,无夏令时漂移
// ==========================================

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// date + days（days 可为负）,溢出返回 None
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// to - from 的天数
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// 自 from 起（含当天）第一个落在 weekday 的日期
pub fn next_on_or_after(from: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let offset = (weekday.num_days_from_monday() + 7 - from.weekday().num_days_from_monday()) % 7;
    add_days(from, offset as i64)
}

/// 两日期的绝对天数差
pub fn abs_distance(a: NaiveDate, b: NaiveDate) -> i64 {
    days_between(a, b).abs()
}
