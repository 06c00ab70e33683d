// ==========================================
// 农场周期订单排产系统 - 引擎编排器
// ==========================================
// 用途: 协调五个核心组件的执行顺序
// 流程:
// 1) 周期展开: 订单 → 配送日
// 2) 需求分解: 配送日 → 按配方需求
// 3) 生长周期: 配方 → 天数（预先解析并缓存）
// 4) 倒排播种: 生成候选建议
// 5) 汇总全部订单候选后统一核销,排序输出
// 红线: 纯计算,无副作用,不跨次保留状态
// ==========================================

use crate::config::SchedulerConfig;
use crate::domain::order::RecurringOrder;
use crate::domain::production::ProductionRecord;
use crate::domain::recipe::Recipe;
use crate::domain::schedule::{ScheduleDiagnostics, ScheduleEntry};
use crate::domain::snapshot::SchedulingSnapshot;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::{
    BackwardScheduler, DemandDecomposer, GrowthDurationResolver, MappingIndex,
    RecordedDates, ReconciliationFilter, ReconciliationReport, RecurrenceExpander,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ScheduleOutcome - 排产结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    pub run_id: String,
    pub today: NaiveDate,
    pub entries: Vec<ScheduleEntry>,
    pub diagnostics: ScheduleDiagnostics,
    pub reconciliation: ReconciliationReport,
}

// ==========================================
// PlanningContext - 单次排产的只读索引
// ==========================================
// 各订单共享,可跨线程只读访问
#[derive(Debug, Clone)]
pub struct PlanningContext {
    recipes: HashMap<String, Recipe>,
    durations: HashMap<String, i64>,
    mappings: MappingIndex,
}

impl PlanningContext {
    pub fn build(snapshot: &SchedulingSnapshot, fallback_growth_days: i64) -> Self {
        // 配方编号重复时保留首条,生长周期与配方本体取自同一条
        let mut seen = HashSet::new();
        let unique: Vec<Recipe> = snapshot
            .recipes
            .iter()
            .filter(|r| {
                let first = seen.insert(r.recipe_id.as_str());
                if !first {
                    warn!(recipe_id = %r.recipe_id, "配方编号重复，保留首条记录");
                }
                first
            })
            .cloned()
            .collect();

        let mut resolver = GrowthDurationResolver::new(fallback_growth_days);
        let durations = resolver.resolve_all(&unique);
        let recipes = unique
            .into_iter()
            .map(|r| (r.recipe_id.clone(), r))
            .collect();

        Self {
            recipes,
            durations,
            mappings: MappingIndex::build(&snapshot.mappings),
        }
    }

    pub fn recipe(&self, recipe_id: &str) -> Option<(&Recipe, i64)> {
        let recipe = self.recipes.get(recipe_id)?;
        let days = self.durations.get(recipe_id).copied()?;
        Some((recipe, days))
    }
}

// ==========================================
// FulfillmentScheduler - 引擎编排器
// ==========================================
pub struct FulfillmentScheduler {
    config: SchedulerConfig,
    expander: RecurrenceExpander,
    decomposer: DemandDecomposer,
    backward: BackwardScheduler,
    reconciler: ReconciliationFilter,
}

impl FulfillmentScheduler {
    /// 创建新的编排器实例
    ///
    /// # 返回
    /// - Err(InvalidConfig): 参数未通过校验（含视界无界）
    pub fn new(config: SchedulerConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            expander: RecurrenceExpander::new(),
            decomposer: DemandDecomposer::new(),
            backward: BackwardScheduler::new(config.sow_weekdays),
            reconciler: ReconciliationFilter::new(config.reconciliation_tolerance_days),
            config,
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// 执行完整排产流程（顺序版）
    #[instrument(
        skip(self, snapshot),
        fields(orders = snapshot.orders.len(), run_id = tracing::field::Empty)
    )]
    pub fn plan(
        &self,
        snapshot: &SchedulingSnapshot,
        today: NaiveDate,
    ) -> EngineResult<ScheduleOutcome> {
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());

        let bounds = self.resolve_bounds(&snapshot.orders, today)?;
        let ctx = PlanningContext::build(snapshot, self.config.fallback_growth_days);

        let mut diagnostics = ScheduleDiagnostics::default();
        let mut candidates = Vec::new();
        for (order, end) in snapshot.orders.iter().zip(bounds) {
            candidates.extend(self.plan_order(order, end, &ctx, &mut diagnostics));
        }

        Ok(self.finish(run_id, today, candidates, &snapshot.production_records, diagnostics))
    }

    /// 执行完整排产流程（按订单并行,核销仍为全局一次）
    pub async fn plan_parallel(
        self: Arc<Self>,
        snapshot: Arc<SchedulingSnapshot>,
        today: NaiveDate,
    ) -> EngineResult<ScheduleOutcome> {
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, orders = snapshot.orders.len(), "开始并行排产");

        let bounds = self.resolve_bounds(&snapshot.orders, today)?;
        let ctx = Arc::new(PlanningContext::build(
            &snapshot,
            self.config.fallback_growth_days,
        ));

        let tasks = bounds.into_iter().enumerate().map(|(idx, end)| {
            let scheduler = Arc::clone(&self);
            let snapshot = Arc::clone(&snapshot);
            let ctx = Arc::clone(&ctx);
            tokio::task::spawn_blocking(move || {
                let mut diagnostics = ScheduleDiagnostics::default();
                let entries =
                    scheduler.plan_order(&snapshot.orders[idx], end, &ctx, &mut diagnostics);
                (entries, diagnostics)
            })
        });

        let mut diagnostics = ScheduleDiagnostics::default();
        let mut candidates = Vec::new();
        for joined in futures::future::join_all(tasks).await {
            let (entries, order_diag) = joined.map_err(|e| EngineError::TaskJoin(e.to_string()))?;
            candidates.extend(entries);
            diagnostics.merge(order_diag);
        }

        Ok(self.finish(run_id, today, candidates, &snapshot.production_records, diagnostics))
    }

    /// 在展开前确定每个订单的结束边界
    ///
    /// 边界无法确定属于配置级致命错误,在此统一拦截
    fn resolve_bounds(
        &self,
        orders: &[RecurringOrder],
        today: NaiveDate,
    ) -> EngineResult<Vec<NaiveDate>> {
        orders
            .iter()
            .map(|order| {
                self.expander
                    .resolve_end_bound(order, today, self.config.open_ended_horizon_days)
                    .ok_or_else(|| EngineError::UnboundedRecurrence {
                        order_id: order.order_id.clone(),
                    })
            })
            .collect()
    }

    /// 单个订单: 展开 → 分解 → 倒排
    ///
    /// 软错误只写入 diagnostics,不影响其他订单
    pub fn plan_order(
        &self,
        order: &RecurringOrder,
        end: NaiveDate,
        ctx: &PlanningContext,
        diagnostics: &mut ScheduleDiagnostics,
    ) -> Vec<ScheduleEntry> {
        if !order.is_active {
            diagnostics.record_inactive(&order.order_id);
            return Vec::new();
        }

        if order.delivery_days.is_empty() {
            debug!(order_id = %order.order_id, "订单未配置配送星期");
            diagnostics.record_empty_weekdays(&order.order_id);
            return Vec::new();
        }

        if end < order.start_date {
            diagnostics.record_empty_range(
                &order.order_id,
                &format!("end_date={} < start_date={}", end, order.start_date),
            );
            return Vec::new();
        }

        let deliveries = self.expander.expand_order(order, end);
        if deliveries.is_empty() {
            return Vec::new();
        }

        // 明细在整个订单周期内不变,每个配送日的分解结果相同
        let demand =
            self.decomposer
                .decompose(&order.order_id, &order.items, &ctx.mappings, diagnostics);

        let mut lines = Vec::with_capacity(demand.len());
        for (recipe_id, quantity) in demand {
            // 定标后归零的极小需求不产生建议
            if quantity <= 0.0 {
                continue;
            }
            match ctx.recipe(&recipe_id) {
                Some((recipe, growth_days)) => lines.push((recipe, growth_days, quantity)),
                None => {
                    warn!(
                        order_id = %order.order_id,
                        recipe_id = %recipe_id,
                        "配比引用的配方不存在，跳过"
                    );
                    diagnostics.record_missing_recipe(&order.order_id, &recipe_id);
                }
            }
        }

        let mut entries = Vec::with_capacity(deliveries.len() * lines.len());
        for delivery_date in deliveries {
            for (recipe, growth_days, quantity) in &lines {
                match self.backward.schedule(
                    &order.order_id,
                    delivery_date,
                    recipe,
                    *quantity,
                    *growth_days,
                ) {
                    Some(entry) => entries.push(entry),
                    None => {
                        warn!(
                            order_id = %order.order_id,
                            recipe_id = %recipe.recipe_id,
                            delivery_date = %delivery_date,
                            growth_days = *growth_days,
                            "播种日超出日历范围，跳过"
                        );
                        diagnostics
                            .record_out_of_range_sowing(&order.order_id, &recipe.recipe_id);
                    }
                }
            }
        }

        debug!(
            order_id = %order.order_id,
            candidates = entries.len(),
            "订单候选生成完成"
        );
        entries
    }

    /// 全局核销（对外公开,调用方可对已有结果重复执行）
    pub fn reconcile(
        &self,
        candidates: Vec<ScheduleEntry>,
        records: &[ProductionRecord],
    ) -> (Vec<ScheduleEntry>, ReconciliationReport) {
        let recorded = RecordedDates::from_records(records);
        self.reconciler.apply(candidates, &recorded)
    }

    fn finish(
        &self,
        run_id: String,
        today: NaiveDate,
        candidates: Vec<ScheduleEntry>,
        records: &[ProductionRecord],
        diagnostics: ScheduleDiagnostics,
    ) -> ScheduleOutcome {
        let (entries, reconciliation) = self.reconcile(candidates, records);

        info!(
            run_id = %run_id,
            candidates = reconciliation.candidates,
            kept = reconciliation.kept,
            dropped = reconciliation.dropped,
            soft_skips = diagnostics.total(),
            "排产完成"
        );

        ScheduleOutcome {
            run_id,
            today,
            entries,
            diagnostics,
            reconciliation,
        }
    }
}
