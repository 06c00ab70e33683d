// ==========================================
// 农场周期订单排产系统 - 排产快照仓储
// ==========================================
// 职责: 从外部录入系统的表中读取一次排产所需的全部数据
// 红线:
// - Repository 不含排产逻辑
// - 松散字段在此规范化为领域类型,无法解析的行跳过并告警,不中断加载
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::order::{OrderItem, RecurringOrder};
use crate::domain::production::ProductionRecord;
use crate::domain::recipe::{ProductRecipeMapping, Recipe, Step};
use crate::domain::snapshot::SchedulingSnapshot;
use crate::domain::types::ProductionRecordKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::normalize::{
    parse_date, parse_duration_unit, parse_frequency, parse_weekday_list, value_as_f64,
    value_as_flag, value_as_i32, value_as_non_empty_text,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// ==========================================
// SchedulingDataSource - 排产数据源接口
// ==========================================
// 实现者: SqliteSnapshotRepository;调用方已取好的 SchedulingSnapshot 本身
pub trait SchedulingDataSource: Send + Sync {
    /// 读取一份不可变快照
    fn load_snapshot(&self) -> RepositoryResult<SchedulingSnapshot>;
}

impl SchedulingDataSource for SchedulingSnapshot {
    fn load_snapshot(&self) -> RepositoryResult<SchedulingSnapshot> {
        Ok(self.clone())
    }
}

// ==========================================
// SqliteSnapshotRepository - SQLite 快照仓储
// ==========================================
pub struct SqliteSnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSnapshotRepository {
    /// 创建新的快照仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取配方及其步骤
    ///
    /// 步骤行不合法时整个配方跳过（缺步骤会算短生长期,导致播种过晚）;
    /// 产量不合法按缺失处理（有效产量回落为 1）
    pub fn load_recipes(&self) -> RepositoryResult<Vec<Recipe>> {
        let conn = self.get_conn()?;

        let mut steps_by_recipe: HashMap<String, Vec<Step>> = HashMap::new();
        let mut broken: HashSet<String> = HashSet::new();
        {
            let mut stmt = conn.prepare(
                r#"
                SELECT recipe_id, sequence_order, duration, duration_unit
                FROM recipe_step
                ORDER BY recipe_id, sequence_order, step_id
                "#,
            )?;
            let rows = stmt.query_map([], |row| RawRow::read("recipe_step", row, 4))?;
            for row in rows {
                let raw = row?;
                let recipe_id = match raw.text(0, "recipe_id") {
                    Ok(id) => id,
                    Err(e) => {
                        warn!(error = %e, "配方步骤缺少配方编号，跳过");
                        continue;
                    }
                };
                match raw.to_step() {
                    Ok(step) => steps_by_recipe.entry(recipe_id).or_default().push(step),
                    Err(e) => {
                        warn!(recipe_id = %recipe_id, error = %e, "配方步骤数据不合法");
                        broken.insert(recipe_id);
                    }
                }
            }
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT recipe_id, recipe_name, average_yield
            FROM recipe
            ORDER BY recipe_id
            "#,
        )?;
        let rows = stmt.query_map([], |row| RawRow::read("recipe", row, 3))?;

        let mut recipes = Vec::new();
        for row in rows {
            let raw = row?;
            let recipe_id = match raw.text(0, "recipe_id") {
                Ok(id) => id,
                Err(e) => {
                    warn!(error = %e, "配方缺少编号，跳过");
                    continue;
                }
            };
            if broken.contains(&recipe_id) {
                warn!(recipe_id = %recipe_id, "配方含不合法步骤，整个配方跳过");
                continue;
            }
            let average_yield = raw.opt_real(2, "average_yield").unwrap_or_else(|e| {
                warn!(recipe_id = %recipe_id, error = %e, "平均产量无法解析，按缺失处理");
                None
            });
            let steps = steps_by_recipe.remove(&recipe_id).unwrap_or_default();
            recipes.push(Recipe {
                recipe_name: raw.opt_text(1).unwrap_or_else(|| recipe_id.clone()),
                recipe_id,
                average_yield,
                steps,
            });
        }
        Ok(recipes)
    }

    /// 读取产品配比（不合法或非正配比在边界剔除）
    pub fn load_mappings(&self) -> RepositoryResult<Vec<ProductRecipeMapping>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT product_id, recipe_id, variety_id, ratio
            FROM product_recipe_mapping
            ORDER BY product_id, mapping_id
            "#,
        )?;
        let rows = stmt.query_map([], |row| RawRow::read("product_recipe_mapping", row, 4))?;

        let mut mappings = Vec::new();
        for row in rows {
            let raw = row?;
            let mapping = match raw.to_mapping() {
                Ok(mapping) => mapping,
                Err(e) => {
                    warn!(error = %e, "产品配比数据不合法，跳过");
                    continue;
                }
            };
            if mapping.ratio <= 0.0 {
                warn!(
                    product_id = %mapping.product_id,
                    recipe_id = %mapping.recipe_id,
                    ratio = mapping.ratio,
                    "配比非正，忽略该配比记录"
                );
                continue;
            }
            mappings.push(mapping);
        }
        Ok(mappings)
    }

    /// 读取周期订单及明细
    ///
    /// 明细行不合法只跳过该明细,订单行不合法跳过整单
    pub fn load_orders(&self) -> RepositoryResult<Vec<RecurringOrder>> {
        let conn = self.get_conn()?;

        let mut items_by_order: HashMap<String, Vec<OrderItem>> = HashMap::new();
        {
            let mut stmt = conn.prepare(
                r#"
                SELECT order_id, product_id, product_name, quantity
                FROM recurring_order_item
                ORDER BY order_id, sort_order, item_id
                "#,
            )?;
            let rows = stmt.query_map([], |row| RawRow::read("recurring_order_item", row, 4))?;
            for row in rows {
                let raw = row?;
                match raw.to_order_item() {
                    Ok((order_id, item)) => items_by_order.entry(order_id).or_default().push(item),
                    Err(e) => warn!(error = %e, "订单明细数据不合法，跳过该明细"),
                }
            }
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT order_id, customer_name, frequency, delivery_days,
                   start_date, end_date, is_active
            FROM recurring_order
            ORDER BY order_id
            "#,
        )?;
        let rows = stmt.query_map([], |row| RawRow::read("recurring_order", row, 7))?;

        let mut orders = Vec::new();
        for row in rows {
            let raw = row?;
            match raw.to_order(&mut items_by_order) {
                Ok(order) => orders.push(order),
                Err(e) => warn!(error = %e, "周期订单数据不合法，跳过"),
            }
        }
        Ok(orders)
    }

    /// 读取生产记录（育苗盘创建日志 + 任务完成日志合并）
    pub fn load_production_records(&self) -> RepositoryResult<Vec<ProductionRecord>> {
        let conn = self.get_conn()?;
        let mut records = Vec::new();

        let sources = [
            (
                "tray",
                "SELECT recipe_id, sow_date FROM tray",
                ProductionRecordKind::TrayCreated,
            ),
            (
                "task_completion",
                "SELECT recipe_id, completed_date FROM task_completion",
                ProductionRecordKind::TaskCompleted,
            ),
        ];

        for (table, sql, kind) in sources {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map([], |row| RawRow::read(table, row, 2))?;
            for row in rows {
                let raw = row?;
                match raw.to_production_record(kind) {
                    Ok(record) => records.push(record),
                    Err(e) => warn!(kind = %kind, error = %e, "生产记录无法解析，跳过"),
                }
            }
        }
        Ok(records)
    }
}

impl SchedulingDataSource for SqliteSnapshotRepository {
    fn load_snapshot(&self) -> RepositoryResult<SchedulingSnapshot> {
        let snapshot = SchedulingSnapshot {
            orders: self.load_orders()?,
            mappings: self.load_mappings()?,
            recipes: self.load_recipes()?,
            production_records: self.load_production_records()?,
        };

        info!(
            orders = snapshot.orders.len(),
            mappings = snapshot.mappings.len(),
            recipes = snapshot.recipes.len(),
            production_records = snapshot.production_records.len(),
            "排产快照加载完成"
        );
        Ok(snapshot)
    }
}

// ==========================================
// RawRow - 未规范化的表行
// ==========================================
// 各列按 rusqlite::types::Value 原样读取,单行的类型错误只影响该行
struct RawRow {
    table: &'static str,
    values: Vec<Value>,
}

impl RawRow {
    fn read(table: &'static str, row: &Row<'_>, columns: usize) -> rusqlite::Result<Self> {
        let values = (0..columns)
            .map(|idx| row.get::<_, Value>(idx))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Self { table, values })
    }

    fn value(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// 行标识（首列）,用于告警定位
    fn key(&self) -> String {
        self.opt_text(0).unwrap_or_else(|| "?".to_string())
    }

    fn invalid(&self, idx: usize, field: &str) -> RepositoryError {
        RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!(
                "table={}, key={}, value={:?}",
                self.table,
                self.key(),
                self.value(idx)
            ),
        }
    }

    fn opt_text(&self, idx: usize) -> Option<String> {
        self.value(idx).and_then(value_as_non_empty_text)
    }

    fn text(&self, idx: usize, field: &str) -> RepositoryResult<String> {
        self.opt_text(idx).ok_or_else(|| self.invalid(idx, field))
    }

    fn real(&self, idx: usize, field: &str) -> RepositoryResult<f64> {
        self.value(idx)
            .and_then(value_as_f64)
            .ok_or_else(|| self.invalid(idx, field))
    }

    /// NULL 视为缺失;有值但无法解析为错误
    fn opt_real(&self, idx: usize, field: &str) -> RepositoryResult<Option<f64>> {
        match self.value(idx) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value_as_f64(value)
                .map(Some)
                .ok_or_else(|| self.invalid(idx, field)),
        }
    }

    fn int(&self, idx: usize, field: &str) -> RepositoryResult<i32> {
        self.value(idx)
            .and_then(value_as_i32)
            .ok_or_else(|| self.invalid(idx, field))
    }

    fn date(&self, idx: usize, field: &str) -> RepositoryResult<NaiveDate> {
        self.opt_text(idx)
            .and_then(|raw| parse_date(&raw))
            .ok_or_else(|| self.invalid(idx, field))
    }

    fn to_step(&self) -> RepositoryResult<Step> {
        Ok(Step {
            sequence_order: self.int(1, "sequence_order")?,
            duration: self.real(2, "duration")?,
            duration_unit: parse_duration_unit(self.opt_text(3).as_deref()),
        })
    }

    fn to_mapping(&self) -> RepositoryResult<ProductRecipeMapping> {
        Ok(ProductRecipeMapping {
            product_id: self.text(0, "product_id")?,
            recipe_id: self.text(1, "recipe_id")?,
            variety_id: self.opt_text(2),
            ratio: self.real(3, "ratio")?,
        })
    }

    fn to_order_item(&self) -> RepositoryResult<(String, OrderItem)> {
        let order_id = self.text(0, "order_id")?;
        let item = OrderItem {
            product_id: self.text(1, "product_id")?,
            product_name: self.opt_text(2),
            quantity: self.real(3, "quantity")?,
        };
        Ok((order_id, item))
    }

    fn to_production_record(&self, kind: ProductionRecordKind) -> RepositoryResult<ProductionRecord> {
        Ok(ProductionRecord {
            recipe_id: self.text(0, "recipe_id")?,
            recorded_date: self.date(1, "recorded_date")?,
            kind,
        })
    }

    fn to_order(
        &self,
        items_by_order: &mut HashMap<String, Vec<OrderItem>>,
    ) -> RepositoryResult<RecurringOrder> {
        let order_id = self.text(0, "order_id")?;
        let items = items_by_order.remove(&order_id).unwrap_or_default();

        let frequency = self
            .opt_text(2)
            .and_then(|raw| parse_frequency(&raw))
            .ok_or_else(|| self.invalid(2, "frequency"))?;
        let start_date = self.date(4, "start_date")?;

        // 空值视同无结束日期;非空但无法解析则整单跳过,避免误当成长期订单
        let end_date = match self.opt_text(5) {
            None => None,
            Some(_) => Some(self.date(5, "end_date")?),
        };

        let raw_days = self.opt_text(3).unwrap_or_else(|| "[]".to_string());
        let (delivery_days, rejected) = parse_weekday_list(&raw_days);
        if !rejected.is_empty() {
            warn!(
                order_id = %order_id,
                rejected = ?rejected,
                "配送星期含无法识别的值，已忽略"
            );
        }

        Ok(RecurringOrder {
            order_id,
            customer_name: self.opt_text(1),
            frequency,
            delivery_days,
            start_date,
            end_date,
            is_active: self.value(6).map(value_as_flag).unwrap_or(false),
            items,
        })
    }
}
