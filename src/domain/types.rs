// ==========================================
// 农场周期订单排产系统 - 领域类型定义
// ==========================================
// 职责: 频率、时长单位、生产记录来源、星期集合
// 红线: 领域类型只做表达,别名解析在仓储边界完成
// ==========================================

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 周期频率 (Frequency)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Weekly,   // 每周
    BiWeekly, // 每两周
}

impl Frequency {
    /// 一个周期的天数
    pub fn period_days(&self) -> i64 {
        match self {
            Frequency::Weekly => 7,
            Frequency::BiWeekly => 14,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Weekly => write!(f, "WEEKLY"),
            Frequency::BiWeekly => write!(f, "BI_WEEKLY"),
        }
    }
}

// ==========================================
// 步骤时长单位 (Duration Unit)
// ==========================================
// 未知/缺失单位在仓储层按 Days 处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationUnit {
    #[default]
    Days,
    Hours,
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationUnit::Days => write!(f, "DAYS"),
            DurationUnit::Hours => write!(f, "HOURS"),
        }
    }
}

// ==========================================
// 生产记录来源 (Production Record Kind)
// ==========================================
// 两类记录对核销一视同仁,仅用于展示与排查
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionRecordKind {
    TrayCreated,   // 育苗盘创建
    TaskCompleted, // 任务完成
}

impl fmt::Display for ProductionRecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductionRecordKind::TrayCreated => write!(f, "TRAY_CREATED"),
            ProductionRecordKind::TaskCompleted => write!(f, "TASK_COMPLETED"),
        }
    }
}

// ==========================================
// 星期集合 (Weekday Mask)
// ==========================================
// 位图表示,bit0 = 周一 ... bit6 = 周日
// 序列化为 ["Mon", "Wed", ...]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct WeekdayMask(u8);

impl WeekdayMask {
    pub const EMPTY: WeekdayMask = WeekdayMask(0);

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// 按周一到周日的顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        ALL_WEEKDAYS
            .iter()
            .copied()
            .filter(move |day| self.contains(*day))
    }
}

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl FromIterator<Weekday> for WeekdayMask {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut mask = WeekdayMask::EMPTY;
        for day in iter {
            mask.insert(day);
        }
        mask
    }
}

impl From<Vec<Weekday>> for WeekdayMask {
    fn from(days: Vec<Weekday>) -> Self {
        days.into_iter().collect()
    }
}

impl From<WeekdayMask> for Vec<Weekday> {
    fn from(mask: WeekdayMask) -> Self {
        mask.iter().collect()
    }
}

impl fmt::Display for WeekdayMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|d| d.to_string()).collect();
        write!(f, "[{}]", names.join(","))
    }
}
