#![allow(dead_code)]

use chrono::NaiveDate;
use perf_attribution::config::DataConfig;
use perf_attribution::domain_types::{InstrumentMeta, InstrumentTable, PricePoint, TradeSide, Transaction};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const LOG_CSV: &str = "\
date,code,value_position,pred_ret
2024-01-02,000001,600,0.01
2024-01-02,600519,400,0.02
2024-01-03,000001,1100,0.01
2024-01-04,000001,1050,-0.01
2024-01-05,000001,1200,0.03
";

pub const BENCHMARK_CSV: &str = "\
trade_date,price_zz800,price_zz800_adj
2024-01-01,3900,4000
2024-01-02,4900,5000
2024-01-03,5400,5500
2024-01-04,4900,5000
2024-01-05,5150,5250
";

pub const TRANSACTIONS_CSV: &str = "\
date,code,Side,Buy,Sell,PNL,value_position
2024-01-02,000001,Sell,0,300,20,0
2024-01-02,000001,Buy,600,0,0,600
2024-01-02,600519,Buy,400,0,0,400
2024-01-03,000001,Hold,0,0,0,1100
2024-01-04,600519,Sell,0,450,50.5,0
2024-01-05,000001,Sell,0,700,100.5,0
2024-01-05,300750,Buy,100,0,0,100
";

pub const INSTRUMENTS_CSV: &str = "\
code,sector,name
000001,Banks,平安銀行
600519,Beverages,貴州茅台
";

/// 寫在臨時目錄中的一組輸入檔
pub struct Dataset {
    pub dir: TempDir,
    pub config: DataConfig,
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("寫入測試檔案失敗");
    path.to_string_lossy().into_owned()
}

pub fn write_dataset_with(log: &str, benchmark: &str, transactions: &str, instruments: &str) -> Dataset {
    let dir = TempDir::new().expect("建立臨時目錄失敗");
    let config = DataConfig {
        log_path: write(dir.path(), "log.csv", log),
        transactions_path: write(dir.path(), "transactions.csv", transactions),
        benchmark_path: write(dir.path(), "benchmark.csv", benchmark),
        instruments_path: write(dir.path(), "instruments.csv", instruments),
        benchmark_column: "price_zz800_adj".to_string(),
        benchmark_base: 10_000.0,
        date_format: "%Y-%m-%d".to_string(),
    };
    Dataset { dir, config }
}

pub fn write_dataset() -> Dataset {
    write_dataset_with(LOG_CSV, BENCHMARK_CSV, TRANSACTIONS_CSV, INSTRUMENTS_CSV)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 由數值序列建立連續日期的淨值點
pub fn price_points(portfolio: &[f64], benchmark: &[f64]) -> Vec<PricePoint> {
    let start = date(2024, 1, 1);
    portfolio
        .iter()
        .zip(benchmark)
        .enumerate()
        .map(|(i, (p, b))| PricePoint::new(start + chrono::Duration::days(i as i64), *p, *b))
        .collect()
}

pub fn trade(d: NaiveDate, code: &str, side: TradeSide, pnl: f64) -> Transaction {
    let (buy, sell) = match side {
        TradeSide::Buy => (100.0, 0.0),
        TradeSide::Sell => (0.0, 100.0),
        TradeSide::Hold => (0.0, 0.0),
    };
    Transaction::new(d, code, side)
        .with_amounts(buy, sell)
        .with_pnl(pnl)
        .with_position_value(buy)
}

pub fn instrument_table() -> InstrumentTable {
    vec![
        InstrumentMeta::new("000001", "Banks", "平安銀行"),
        InstrumentMeta::new("600036", "Banks", "招商銀行"),
        InstrumentMeta::new("600519", "Beverages", "貴州茅台"),
        InstrumentMeta::new("300750", "Batteries", "寧德時代"),
    ]
    .into_iter()
    .collect()
}
