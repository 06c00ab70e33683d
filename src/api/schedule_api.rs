// ==========================================
// 农场周期订单排产系统 - 排产查询 API
// ==========================================
// 职责: 加载参数与快照 → 执行引擎 → 可选展示窗口过滤
// 红线: 只读,不回写任何生产记录
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{SchedulerConfig, SchedulerConfigReader};
use crate::domain::schedule::{ScheduleDiagnostics, ScheduleEntry};
use crate::engine::{FulfillmentScheduler, ReconciliationReport, ScheduleWindow};
use crate::repository::SchedulingDataSource;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

// ==========================================
// ScheduleReport - 对外返回的排产报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub run_id: String,
    pub today: NaiveDate,
    /// 本次使用的排产参数
    pub config: SchedulerConfig,
    /// 展示窗口（None 表示全部）
    pub window: Option<ScheduleWindow>,
    /// 窗口过滤前的待办总数
    pub total_entries: usize,
    pub entries: Vec<ScheduleEntry>,
    pub diagnostics: ScheduleDiagnostics,
    pub reconciliation: ReconciliationReport,
}

// ==========================================
// ScheduleApi - 排产查询 API
// ==========================================
pub struct ScheduleApi {
    config_reader: Arc<dyn SchedulerConfigReader>,
    data_source: Arc<dyn SchedulingDataSource>,
    parallel: bool,
}

impl ScheduleApi {
    /// 创建新的ScheduleApi实例
    pub fn new(
        config_reader: Arc<dyn SchedulerConfigReader>,
        data_source: Arc<dyn SchedulingDataSource>,
    ) -> Self {
        Self {
            config_reader,
            data_source,
            parallel: false,
        }
    }

    /// 按订单并行计算
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 查询播种待办
    ///
    /// # 参数
    /// - today: 计算基准日（不读系统时钟）
    /// - window: 展示窗口,按播种日过滤
    ///
    /// # 返回
    /// - Ok(ScheduleReport): 排产报告
    /// - Err(ApiError): 参数非法、数据源不可用或引擎致命错误
    #[instrument(skip(self), fields(parallel = self.parallel))]
    pub async fn get_schedule(
        &self,
        today: NaiveDate,
        window: Option<ScheduleWindow>,
    ) -> ApiResult<ScheduleReport> {
        if let Some(ScheduleWindow::Between { from, to }) = window {
            if from > to {
                return Err(ApiError::InvalidInput(format!(
                    "窗口起始日晚于结束日: from={}, to={}",
                    from, to
                )));
            }
        }

        let config = SchedulerConfig::load(self.config_reader.as_ref()).await?;
        let snapshot = self.data_source.load_snapshot()?;
        let scheduler = FulfillmentScheduler::new(config)?;
        let config = scheduler.config().clone();

        let outcome = if self.parallel {
            Arc::new(scheduler)
                .plan_parallel(Arc::new(snapshot), today)
                .await?
        } else {
            scheduler.plan(&snapshot, today)?
        };

        let total_entries = outcome.entries.len();
        let entries = match window {
            Some(w) => w.apply(&outcome.entries, today),
            None => outcome.entries,
        };
        debug!(
            run_id = %outcome.run_id,
            total = total_entries,
            shown = entries.len(),
            "窗口过滤完成"
        );

        Ok(ScheduleReport {
            run_id: outcome.run_id,
            today,
            config,
            window,
            total_entries,
            entries,
            diagnostics: outcome.diagnostics,
            reconciliation: outcome.reconciliation,
        })
    }
}
