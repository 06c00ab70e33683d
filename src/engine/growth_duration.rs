// ==========================================
// 农场周期订单排产系统 - 生长周期解析器
// ==========================================
// 职责: 配方步骤 → 整数生长天数
// 规则:
// - Days 步骤按原值计入
// - Hours 步骤 ≥ 12 小时计 1 天,否则计 0
// - 无步骤的配方使用兜底天数（零提前期不合法）
// 缓存: 单次排产内按 recipe_id 记忆化
// ==========================================

use crate::domain::recipe::{Recipe, Step};
use crate::domain::types::DurationUnit;
use std::collections::HashMap;

/// 小时步骤折算为 1 天的阈值
pub const HALF_DAY_HOURS: f64 = 12.0;

// ==========================================
// GrowthDurationResolver - 生长周期解析器
// ==========================================
pub struct GrowthDurationResolver {
    fallback_days: i64,
    cache: HashMap<String, i64>,
}

impl GrowthDurationResolver {
    /// 创建解析器
    ///
    /// # 参数
    /// - fallback_days: 无步骤配方的兜底天数（已在配置层校验 ≥ 1）
    pub fn new(fallback_days: i64) -> Self {
        Self {
            fallback_days,
            cache: HashMap::new(),
        }
    }

    /// 解析单个配方的生长天数（记忆化）
    pub fn resolve(&mut self, recipe: &Recipe) -> i64 {
        if let Some(days) = self.cache.get(&recipe.recipe_id) {
            return *days;
        }
        let days = Self::compute(&recipe.steps, self.fallback_days);
        self.cache.insert(recipe.recipe_id.clone(), days);
        days
    }

    /// 批量解析,返回 recipe_id → 天数
    pub fn resolve_all(&mut self, recipes: &[Recipe]) -> HashMap<String, i64> {
        recipes
            .iter()
            .map(|r| (r.recipe_id.clone(), self.resolve(r)))
            .collect()
    }

    /// 已缓存的配方数
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// 纯函数: 步骤列表 → 天数
    ///
    /// 天步骤允许小数,合计后向上取整为日历天
    pub fn compute(steps: &[Step], fallback_days: i64) -> i64 {
        if steps.is_empty() {
            return fallback_days;
        }

        let total: f64 = steps.iter().map(Self::step_contribution).sum();
        // 浮点误差容忍: 2.9999999999 按 3 天处理
        (total - 1e-9).ceil().max(0.0) as i64
    }

    fn step_contribution(step: &Step) -> f64 {
        let duration = if step.duration.is_finite() && step.duration > 0.0 {
            step.duration
        } else {
            0.0
        };

        match step.duration_unit {
            DurationUnit::Days => duration,
            DurationUnit::Hours => {
                if duration >= HALF_DAY_HOURS {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}
