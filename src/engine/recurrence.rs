// ==========================================
// 农场周期订单排产系统 - 周期展开器
// ==========================================
// 职责: 周期订单规则 → 具体配送日期序列
// 输入: 频率 + 配送星期 + [开始日期, 结束边界]
// 输出: 升序、去重、有限的日期序列
// 红线: 结束边界必须在展开前确定,展开过程不允许无界循环
// ==========================================

use crate::domain::order::RecurringOrder;
use crate::domain::types::{Frequency, WeekdayMask};
use crate::engine::calendar::{add_days, next_on_or_after};
use chrono::NaiveDate;

// ==========================================
// RecurrenceExpander - 周期展开器
// ==========================================
pub struct RecurrenceExpander {
    // 无状态引擎,不需要注入依赖
}

impl RecurrenceExpander {
    pub fn new() -> Self {
        Self {}
    }

    /// 确定订单的结束边界
    ///
    /// - 有 end_date: 直接使用
    /// - 长期订单: max(start_date, today) + horizon_days
    ///
    /// # 返回
    /// - None: 日期溢出,边界无法确定（由调用方按致命错误处理）
    pub fn resolve_end_bound(
        &self,
        order: &RecurringOrder,
        today: NaiveDate,
        horizon_days: i64,
    ) -> Option<NaiveDate> {
        match order.end_date {
            Some(end) => Some(end),
            None => add_days(order.start_date.max(today), horizon_days),
        }
    }

    /// 展开配送日期
    ///
    /// 算法:
    /// 1) 周期游标从 start 开始
    /// 2) 每个配置星期取游标当天及之后的第一个匹配日（首周期可命中开始日当天）
    /// 3) 不超过 end 的日期收集
    /// 4) 游标前进 7 天（Weekly）或 14 天（BiWeekly）,超过 end 即停止
    ///
    /// 边界处理:
    /// - 星期集合为空 → 空序列（合法,不是错误）
    /// - end < start → 空序列
    pub fn expand(
        &self,
        frequency: Frequency,
        weekdays: WeekdayMask,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<NaiveDate> {
        if weekdays.is_empty() || end < start {
            return Vec::new();
        }

        let period = frequency.period_days();
        let mut dates = Vec::new();
        let mut cursor = start;

        while cursor <= end {
            for weekday in weekdays.iter() {
                if let Some(date) = next_on_or_after(cursor, weekday) {
                    if date <= end {
                        dates.push(date);
                    }
                }
            }

            cursor = match add_days(cursor, period) {
                Some(next) => next,
                None => break,
            };
        }

        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// 展开并只保留 from 及之后的日期
    pub fn expand_between(
        &self,
        frequency: Frequency,
        weekdays: WeekdayMask,
        start: NaiveDate,
        end: NaiveDate,
        from: NaiveDate,
    ) -> Vec<NaiveDate> {
        let mut dates = self.expand(frequency, weekdays, start, end);
        dates.retain(|d| *d >= from);
        dates
    }

    /// 按订单展开（边界已由调用方解析）
    pub fn expand_order(&self, order: &RecurringOrder, end: NaiveDate) -> Vec<NaiveDate> {
        self.expand(order.frequency, order.delivery_days, order.start_date, end)
    }
}

impl Default for RecurrenceExpander {
    fn default() -> Self {
        Self::new()
    }
}
