// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库初始化与种子数据写入
// ==========================================

#![allow(dead_code)]

use farm_sow_scheduler::db::{init_snapshot_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("temp path is not valid UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_snapshot_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试连接（与生产代码同一套 PRAGMA）
pub fn open_test_connection(db_path: &str) -> rusqlite::Result<Connection> {
    open_sqlite_connection(db_path)
}

pub fn insert_recipe(
    conn: &Connection,
    recipe_id: &str,
    recipe_name: &str,
    average_yield: Option<f64>,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO recipe (recipe_id, recipe_name, average_yield) VALUES (?1, ?2, ?3)",
        params![recipe_id, recipe_name, average_yield],
    )?;
    Ok(())
}

pub fn insert_step(
    conn: &Connection,
    recipe_id: &str,
    sequence_order: i32,
    duration: f64,
    duration_unit: Option<&str>,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO recipe_step (recipe_id, sequence_order, duration, duration_unit)
         VALUES (?1, ?2, ?3, ?4)",
        params![recipe_id, sequence_order, duration, duration_unit],
    )?;
    Ok(())
}

pub fn insert_mapping(
    conn: &Connection,
    product_id: &str,
    recipe_id: &str,
    ratio: f64,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO product_recipe_mapping (product_id, recipe_id, ratio) VALUES (?1, ?2, ?3)",
        params![product_id, recipe_id, ratio],
    )?;
    Ok(())
}

pub fn insert_order(
    conn: &Connection,
    order_id: &str,
    frequency: &str,
    delivery_days: &str,
    start_date: &str,
    end_date: Option<&str>,
    is_active: i64,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO recurring_order
            (order_id, customer_name, frequency, delivery_days, start_date, end_date, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            order_id,
            format!("Customer {}", order_id),
            frequency,
            delivery_days,
            start_date,
            end_date,
            is_active
        ],
    )?;
    Ok(())
}

pub fn insert_order_item(
    conn: &Connection,
    order_id: &str,
    product_id: &str,
    quantity: f64,
    sort_order: i32,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO recurring_order_item (order_id, product_id, quantity, sort_order)
         VALUES (?1, ?2, ?3, ?4)",
        params![order_id, product_id, quantity, sort_order],
    )?;
    Ok(())
}

pub fn insert_tray(
    conn: &Connection,
    tray_id: &str,
    recipe_id: &str,
    sow_date: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO tray (tray_id, recipe_id, sow_date) VALUES (?1, ?2, ?3)",
        params![tray_id, recipe_id, sow_date],
    )?;
    Ok(())
}

pub fn insert_task_completion(
    conn: &Connection,
    task_id: &str,
    recipe_id: &str,
    completed_date: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO task_completion (task_id, recipe_id, completed_date) VALUES (?1, ?2, ?3)",
        params![task_id, recipe_id, completed_date],
    )?;
    Ok(())
}

pub fn insert_config(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
         ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
        params![key, value],
    )?;
    Ok(())
}

/// 种子: 周三配送的沙拉订单
///
/// - 订单 O-SALAD: 每周三,2024-01-01 ~ 2024-01-31,产品 MIX ×9
/// - MIX → PEA(2) + RAD(1)
/// - PEA: 10 天,产量 4;RAD: 3 天 + 14 小时,产量 4
pub fn seed_salad_order(conn: &Connection) -> rusqlite::Result<()> {
    insert_recipe(conn, "PEA", "Pea Shoots", Some(4.0))?;
    insert_step(conn, "PEA", 1, 10.0, Some("days"))?;
    insert_recipe(conn, "RAD", "Radish", Some(4.0))?;
    insert_step(conn, "RAD", 1, 3.0, Some("days"))?;
    insert_step(conn, "RAD", 2, 14.0, Some("hours"))?;

    insert_mapping(conn, "MIX", "PEA", 2.0)?;
    insert_mapping(conn, "MIX", "RAD", 1.0)?;

    insert_order(
        conn,
        "O-SALAD",
        "weekly",
        r#"["Wednesday"]"#,
        "2024-01-01",
        Some("2024-01-31"),
        1,
    )?;
    insert_order_item(conn, "O-SALAD", "MIX", 9.0, 1)?;
    Ok(())
}
