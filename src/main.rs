// ==========================================
// 农场周期订单排产系统 - 命令行入口
// ==========================================
// 用法:
//   farm-sow-scheduler [--db PATH] [--today YYYY-MM-DD]
//                      [--days N | --next-month | --overdue] [--parallel]
// 输出: 排产报告 JSON（stdout）,日志走 stderr
// ==========================================

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use farm_sow_scheduler::app::{get_default_db_path, AppState};
use farm_sow_scheduler::engine::ScheduleWindow;
use farm_sow_scheduler::{logging, APP_NAME, VERSION};

#[derive(Debug, Default)]
struct CliArgs {
    db_path: Option<String>,
    today: Option<NaiveDate>,
    window: Option<ScheduleWindow>,
    parallel: bool,
    help: bool,
}

fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" => {
                parsed.db_path = Some(iter.next().context("--db 需要一个路径参数")?);
            }
            "--today" => {
                let raw = iter.next().context("--today 需要 YYYY-MM-DD 日期")?;
                let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .with_context(|| format!("无法解析日期: {}", raw))?;
                parsed.today = Some(date);
            }
            "--days" => {
                let raw = iter.next().context("--days 需要一个天数")?;
                let days: u32 = raw
                    .parse()
                    .with_context(|| format!("无法解析天数: {}", raw))?;
                parsed.window = Some(ScheduleWindow::NextDays { days });
            }
            "--next-month" => parsed.window = Some(ScheduleWindow::NextMonth),
            "--overdue" => parsed.window = Some(ScheduleWindow::Overdue),
            "--parallel" => parsed.parallel = true,
            "-h" | "--help" => parsed.help = true,
            other => bail!("未知参数: {}", other),
        }
    }

    Ok(parsed)
}

fn print_usage() {
    println!("{} v{}", APP_NAME, VERSION);
    println!();
    println!("用法: farm-sow-scheduler [选项]");
    println!("  --db PATH          数据库路径（默认: 用户数据目录）");
    println!("  --today YYYY-MM-DD 计算基准日（默认: 本地当天）");
    println!("  --days N           只显示未来 N 天的播种");
    println!("  --next-month       只显示未来一个月的播种");
    println!("  --overdue          只显示已错过的播种");
    println!("  --parallel         按订单并行计算");
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let db_path = args.db_path.unwrap_or_else(get_default_db_path);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    tracing::info!(version = VERSION, db_path = %db_path, today = %today, "{}", APP_NAME);

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;
    let report = state
        .schedule_api()
        .with_parallel(args.parallel)
        .get_schedule(today, args.window)
        .await
        .context("排产计算失败")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
