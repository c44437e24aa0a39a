use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use perf_attribution::analytics::{run_analysis, AnalysisOutput, AnalysisRequest};
use perf_attribution::config::{self, ApplicationConfig, LogConfig};
use perf_attribution::context::AnalysisContext;
use perf_attribution::domain_types::DateRange;
use perf_attribution::report::{self, table, ReportWriter, Table};
use perf_attribution::utils::parse_optional_date;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "perf-report", about = "組合績效與交易歸因報表")]
struct Cli {
    #[command(flatten)]
    window: WindowArgs,

    #[command(subcommand)]
    command: Commands,
}

/// 覆蓋配置中 analysis 區段的參數
#[derive(Args)]
struct WindowArgs {
    /// 區間起始日 (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_cli_date)]
    start: Option<NaiveDate>,

    /// 區間結束日 (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_cli_date)]
    end: Option<NaiveDate>,

    /// 年化無風險利率，小數形式，例如 0.02
    #[arg(long, global = true)]
    risk_free_rate: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// 輸出全部表格
    Summary,
    /// 風險收益指標
    Metrics,
    /// 正收益機率
    Probability,
    /// 累計淨值序列
    Cumulative,
    /// 個股損益
    Positions,
    /// 板塊損益與資金
    Sectors,
    /// 匯出全部表格為 CSV 並寫出 report.json
    Export {
        /// 輸出目錄，預設使用配置中的 export.directory
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    // 解析命令行參數
    let cli = Cli::parse();

    // 初始化配置
    let app_config = config::init_config().context("載入配置失敗")?;

    // 初始化日誌系統
    init_logging(&app_config.log)?;

    let request = build_request(app_config, &cli.window)?;

    let ctx = AnalysisContext::load(&app_config.data).context("載入輸入資料失敗")?;
    let output = run_analysis(&ctx, request);
    let precision = app_config.export.precision;

    match cli.command {
        Commands::Summary => print_tables(&report::all_tables(&output, precision)),
        Commands::Metrics => print_tables(&[
            table::performance_table(&output.performance, precision),
            table::excess_table(&output.performance, precision),
        ]),
        Commands::Probability => print_tables(&[table::probability_table(&output.probabilities, precision)]),
        Commands::Cumulative => print_tables(&[table::cumulative_table(&output.cumulative)]),
        Commands::Positions => print_tables(&[table::instrument_table(&output.attribution, precision)]),
        Commands::Sectors => print_tables(&[
            table::sector_table(&output.attribution),
            table::sector_ranking_table(&output.attribution),
            table::capital_table(&output.attribution, precision),
            table::buy_capital_table(&output.attribution),
        ]),
        Commands::Export { output: directory } => {
            let directory = directory.unwrap_or_else(|| app_config.export.directory.clone());
            export(&output, &directory, precision)?;
        }
    }

    Ok(())
}

fn parse_cli_date(value: &str) -> Result<NaiveDate, String> {
    parse_optional_date(Some(value))?.ok_or_else(|| format!("無效日期: {}", value))
}

/// 以命令行參數覆蓋配置，組成分析請求
fn build_request(app_config: &ApplicationConfig, window: &WindowArgs) -> Result<AnalysisRequest> {
    let start = window.start.or(app_config.analysis.start_date);
    let end = window.end.or(app_config.analysis.end_date);
    let risk_free_rate = window.risk_free_rate.unwrap_or(app_config.analysis.risk_free_rate);

    if !risk_free_rate.is_finite() {
        bail!("無風險利率必須為有限數值: {}", risk_free_rate);
    }
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            bail!("起始日 {} 晚於結束日 {}", start, end);
        }
    }

    let request = AnalysisRequest::new(DateRange::new(start, end), risk_free_rate);
    info!(range = %request.range, risk_free_rate, "分析請求");
    Ok(request)
}

fn print_tables(tables: &[Table]) {
    for table in tables {
        println!("{}", table);
    }
}

fn export(output: &AnalysisOutput, directory: &str, precision: u32) -> Result<()> {
    let writer = ReportWriter::new(directory);
    let written = writer
        .export_all(&report::all_tables(output, precision), output)
        .with_context(|| format!("匯出報表到 {} 失敗", directory))?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

// 初始化日誌系統
fn init_logging(log_config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log_config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match log_config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };
    result.map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    info!("日誌系統初始化完成");
    Ok(())
}
