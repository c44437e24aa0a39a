//! 分析上下文
//!
//! 載入並驗證四張輸入表，得到一個不可變的上下文。所有分析計算都以
//! `&AnalysisContext` 為輸入，彼此之間沒有共享的可變狀態；需要重新載入時
//! 直接重建上下文。

use crate::config::DataConfig;
use crate::data_ingestion::processor::csv_io::{
    BenchmarkRecord, CsvError, CsvParser, CsvReader, PositionRecord,
};
use crate::data_ingestion::validator::{self, DataValidationError};
use crate::domain_types::{InstrumentMeta, InstrumentTable, PricePoint, Transaction};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 上下文建立錯誤
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("讀取 {table} 失敗: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: CsvError,
    },

    #[error(transparent)]
    Validation(#[from] DataValidationError),
}

impl ContextError {
    fn csv(table: &'static str) -> impl FnOnce(CsvError) -> Self {
        move |source| ContextError::Csv { table, source }
    }
}

pub type ContextResult<T> = Result<T, ContextError>;

/// 不可變的分析上下文
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    price_points: Vec<PricePoint>,
    transactions: Vec<Transaction>,
    instruments: InstrumentTable,
}

impl AnalysisContext {
    /// 依配置從 CSV 檔案載入並驗證
    pub fn load(config: &DataConfig) -> ContextResult<Self> {
        let reader = CsvReader::default();
        let fmt = config.date_format.as_str();

        let positions = read_table(&reader, &config.log_path, "log", |df| {
            CsvParser::parse_positions(df, fmt)
        })?;
        let benchmark = read_table(&reader, &config.benchmark_path, "benchmark", |df| {
            CsvParser::parse_benchmark(df, &config.benchmark_column, fmt)
        })?;
        let transactions = read_table(&reader, &config.transactions_path, "transactions", |df| {
            CsvParser::parse_transactions(df, fmt)
        })?;
        let instruments = read_table(&reader, &config.instruments_path, "instruments", |df| {
            CsvParser::parse_instruments(df)
        })?;

        Self::from_records(positions, benchmark, transactions, instruments, config.benchmark_base)
    }

    /// 由已解析的紀錄建立上下文
    ///
    /// 組合市值為同日所有持倉市值之和；與基準指數按日期內連接後，
    /// 把基準在第一個共同日期重新定基為 `benchmark_base`。
    pub fn from_records(
        positions: Vec<PositionRecord>,
        benchmark: Vec<BenchmarkRecord>,
        transactions: Vec<Transaction>,
        instruments: Vec<InstrumentMeta>,
        benchmark_base: f64,
    ) -> ContextResult<Self> {
        validator::validate_benchmark(&benchmark)?;

        let price_points = build_price_points(&positions, &benchmark, benchmark_base)?;
        validator::validate_price_points(&price_points)?;

        let instruments: InstrumentTable = instruments.into_iter().collect();

        info!(
            price_points = price_points.len(),
            transactions = transactions.len(),
            instruments = instruments.len(),
            "分析上下文建立完成"
        );

        Ok(Self {
            price_points,
            transactions,
            instruments,
        })
    }

    /// 直接由領域資料建立（不做日期連接，僅驗證淨值序列）
    pub fn from_parts(
        price_points: Vec<PricePoint>,
        transactions: Vec<Transaction>,
        instruments: InstrumentTable,
    ) -> ContextResult<Self> {
        validator::validate_price_points(&price_points)?;

        Ok(Self {
            price_points,
            transactions,
            instruments,
        })
    }

    pub fn price_points(&self) -> &[PricePoint] {
        &self.price_points
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn instruments(&self) -> &InstrumentTable {
        &self.instruments
    }

    /// 淨值序列涵蓋的日期範圍
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.price_points.first(), self.price_points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

fn read_table<T, F>(reader: &CsvReader, path: &str, table: &'static str, parse: F) -> ContextResult<T>
where
    F: FnOnce(&polars::prelude::DataFrame) -> Result<T, CsvError>,
{
    debug!(table, path, "讀取輸入表");
    let df = reader
        .read_file(Path::new(path))
        .map_err(ContextError::csv(table))?;
    parse(&df).map_err(ContextError::csv(table))
}

/// 合併持倉日誌與基準指數，得到每日淨值序列
fn build_price_points(
    positions: &[PositionRecord],
    benchmark: &[BenchmarkRecord],
    benchmark_base: f64,
) -> ContextResult<Vec<PricePoint>> {
    let mut portfolio: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in positions {
        *portfolio.entry(record.date).or_insert(0.0) += record.value_position;
    }

    let prices: HashMap<NaiveDate, f64> = benchmark.iter().map(|r| (r.date, r.price)).collect();

    let joined: Vec<(NaiveDate, f64, f64)> = portfolio
        .into_iter()
        .filter_map(|(date, value)| prices.get(&date).map(|price| (date, value, *price)))
        .collect();

    if joined.is_empty() {
        warn!("持倉日誌與基準指數沒有共同日期");
        return Ok(Vec::new());
    }

    let first_price = joined[0].2;
    if first_price <= 0.0 {
        return Err(DataValidationError::RangeError {
            table: "benchmark".to_string(),
            field: "price".to_string(),
            row: 0,
            value: first_price,
            message: "重新定基的起始價格必須為正數".to_string(),
        }
        .into());
    }

    let dropped = benchmark.len().saturating_sub(joined.len());
    if dropped > 0 {
        debug!(dropped, "基準指數中沒有對應持倉的日期已略過");
    }

    Ok(joined
        .into_iter()
        .map(|(date, value, price)| PricePoint::new(date, value, price / first_price * benchmark_base))
        .collect())
}
