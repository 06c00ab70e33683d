// ==========================================
// 农场周期订单排产系统 - 配方领域模型
// ==========================================
// 职责: 配方、生长步骤、产品-配方配比
// ==========================================

use crate::domain::types::DurationUnit;
use serde::{Deserialize, Serialize};

// ==========================================
// Recipe - 配方
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub recipe_id: String,
    pub recipe_name: String,

    /// 每个生产单位（育苗盘）的平均产量
    ///
    /// 为空或非正数时视为 1,即需求本身已按生产单位计
    #[serde(default)]
    pub average_yield: Option<f64>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Recipe {
    /// 有效单盘产量（缺失/非法时为 1.0）
    pub fn effective_yield(&self) -> f64 {
        match self.average_yield {
            Some(y) if y.is_finite() && y > 0.0 => y,
            _ => 1.0,
        }
    }
}

// ==========================================
// Step - 生长步骤
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub sequence_order: i32,
    pub duration: f64,
    #[serde(default)]
    pub duration_unit: DurationUnit,
}

// ==========================================
// ProductRecipeMapping - 产品配比
// ==========================================
// 一个产品可对应 0..N 条配比记录
// 同一配方可经由不同品种出现多次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecipeMapping {
    pub product_id: String,
    pub recipe_id: String,
    #[serde(default)]
    pub variety_id: Option<String>,
    pub ratio: f64,
}
