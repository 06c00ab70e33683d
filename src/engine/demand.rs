// ==========================================
// 农场周期订单排产系统 - 需求分解器
// ==========================================
// 职责: 单次配送的订单明细 → 按配方汇总的需求量
// 规则: recipe_quantity = item.quantity * (ratio / total_ratio)
//       汇总后按 DEMAND_SCALE 定标,消除归一化带来的浮点尾差
// 红线:
// - 无配比的产品静默跳过（产品未配置前本就不可排产）
// - 配比归一化必须守恒: 单个明细分解后的合计等于原数量
// ==========================================

use crate::domain::order::OrderItem;
use crate::domain::recipe::ProductRecipeMapping;
use crate::domain::schedule::ScheduleDiagnostics;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// 需求定标精度（小数点后 6 位）
pub const DEMAND_SCALE: f64 = 1_000_000.0;

/// 将需求量定标到 DEMAND_SCALE 精度
pub fn scale_demand(quantity: f64) -> f64 {
    (quantity * DEMAND_SCALE).round() / DEMAND_SCALE
}

// ==========================================
// MappingIndex - 产品 → 配比索引
// ==========================================
// 每次排产构建一次
#[derive(Debug, Clone, Default)]
pub struct MappingIndex {
    by_product: HashMap<String, Vec<ProductRecipeMapping>>,
}

impl MappingIndex {
    pub fn build(mappings: &[ProductRecipeMapping]) -> Self {
        let mut by_product: HashMap<String, Vec<ProductRecipeMapping>> = HashMap::new();
        for mapping in mappings {
            by_product
                .entry(mapping.product_id.clone())
                .or_default()
                .push(mapping.clone());
        }
        Self { by_product }
    }

    pub fn mappings_for(&self, product_id: &str) -> &[ProductRecipeMapping] {
        self.by_product
            .get(product_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// 单个明细的分解结果
#[derive(Debug, Clone, PartialEq)]
pub enum ItemDecomposition {
    /// 产品无配比
    Unmapped,
    /// 配比合计非正或非有限值
    InvalidRatio,
    /// (recipe_id, 未取整数量),按配比记录顺序
    Split(Vec<(String, f64)>),
}

// ==========================================
// DemandDecomposer - 需求分解器
// ==========================================
pub struct DemandDecomposer {
    // 无状态引擎,不需要注入依赖
}

impl DemandDecomposer {
    pub fn new() -> Self {
        Self {}
    }

    /// 分解单个明细
    pub fn decompose_item(
        &self,
        item: &OrderItem,
        mappings: &[ProductRecipeMapping],
    ) -> ItemDecomposition {
        if mappings.is_empty() {
            return ItemDecomposition::Unmapped;
        }

        let total_ratio: f64 = mappings.iter().map(|m| m.ratio).sum();
        if !total_ratio.is_finite() || total_ratio <= 0.0 {
            return ItemDecomposition::InvalidRatio;
        }

        let parts = mappings
            .iter()
            .map(|m| (m.recipe_id.clone(), item.quantity * (m.ratio / total_ratio)))
            .collect();
        ItemDecomposition::Split(parts)
    }

    /// 分解一次配送的全部明细,按 recipe_id 累加
    ///
    /// 同一配方可能来自:
    /// - 同一产品经由多个品种映射到同一配方
    /// - 同一订单的多个明细指向同一配方
    ///
    /// # 返回
    /// BTreeMap<recipe_id, 定标后未取整需求>（有序,保证输出确定性）
    pub fn decompose(
        &self,
        order_id: &str,
        items: &[OrderItem],
        index: &MappingIndex,
        diagnostics: &mut ScheduleDiagnostics,
    ) -> BTreeMap<String, f64> {
        let mut demand: BTreeMap<String, f64> = BTreeMap::new();

        for item in items {
            if !(item.quantity.is_finite() && item.quantity > 0.0) {
                continue;
            }

            match self.decompose_item(item, index.mappings_for(&item.product_id)) {
                ItemDecomposition::Unmapped => {
                    debug!(order_id, product_id = %item.product_id, "产品无配方配比，跳过");
                    diagnostics.record_unmapped_product(order_id, &item.product_id);
                }
                ItemDecomposition::InvalidRatio => {
                    debug!(order_id, product_id = %item.product_id, "产品配比合计非正，跳过");
                    diagnostics.record_invalid_ratio(order_id, &item.product_id);
                }
                ItemDecomposition::Split(parts) => {
                    for (recipe_id, quantity) in parts {
                        *demand.entry(recipe_id).or_insert(0.0) += quantity;
                    }
                }
            }
        }

        for quantity in demand.values_mut() {
            *quantity = scale_demand(*quantity);
        }
        demand
    }
}

impl Default for DemandDecomposer {
    fn default() -> Self {
        Self::new()
    }
}
