// ==========================================
// 农场周期订单排产系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout,减少与外部录入系统并发写入时的偶发 busy 错误
// - 提供排产快照所需表结构（本地运行/测试用）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 创建排产快照相关表（幂等）
///
/// 说明：
/// - 正式环境中这些表由外部录入系统维护,这里只保证本地库/测试库可用
/// - delivery_days 存 JSON 数组或逗号分隔串,由仓储层规范化
/// - tray 为育苗盘创建日志,task_completion 为任务完成日志,二者合并为生产记录
pub fn init_snapshot_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS recipe (
            recipe_id TEXT PRIMARY KEY,
            recipe_name TEXT NOT NULL,
            average_yield REAL
        );

        CREATE TABLE IF NOT EXISTS recipe_step (
            step_id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id TEXT NOT NULL REFERENCES recipe(recipe_id) ON DELETE CASCADE,
            sequence_order INTEGER NOT NULL DEFAULT 0,
            duration REAL NOT NULL DEFAULT 0,
            duration_unit TEXT
        );

        CREATE TABLE IF NOT EXISTS product_recipe_mapping (
            mapping_id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id TEXT NOT NULL,
            recipe_id TEXT NOT NULL,
            variety_id TEXT,
            ratio REAL NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS recurring_order (
            order_id TEXT PRIMARY KEY,
            customer_name TEXT,
            frequency TEXT NOT NULL,
            delivery_days TEXT NOT NULL DEFAULT '[]',
            start_date TEXT NOT NULL,
            end_date TEXT,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS recurring_order_item (
            item_id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id TEXT NOT NULL REFERENCES recurring_order(order_id) ON DELETE CASCADE,
            product_id TEXT NOT NULL,
            product_name TEXT,
            quantity REAL NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS tray (
            tray_id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL,
            sow_date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS task_completion (
            task_id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL,
            completed_date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_mapping_product ON product_recipe_mapping(product_id);
        CREATE INDEX IF NOT EXISTS idx_item_order ON recurring_order_item(order_id);
        CREATE INDEX IF NOT EXISTS idx_tray_recipe ON tray(recipe_id);
        CREATE INDEX IF NOT EXISTS idx_task_recipe ON task_completion(recipe_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}
