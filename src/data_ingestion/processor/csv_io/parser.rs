//! CSV 資料解析器
//!
//! 把讀入的 DataFrame（所有欄位皆為字串）轉為型別化的領域紀錄。

use super::error::{CsvError, CsvResult};
use crate::domain_types::types::{INSTRUMENT_COLUMNS, LOG_COLUMNS, TRANSACTION_COLUMNS};
use crate::domain_types::{ColumnName, InstrumentMeta, TradeSide, Transaction};
use crate::utils::parse_date;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 持倉日誌中的一行：某日某標的的持倉市值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub date: NaiveDate,
    pub code: String,
    pub value_position: f64,
}

/// 基準指數的一行價格
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub date: NaiveDate,
    pub price: f64,
}

/// CSV 解析器
pub struct CsvParser;

impl CsvParser {
    /// 確保必要的欄位存在
    pub fn require_columns(df: &DataFrame, required: &[&str]) -> CsvResult<()> {
        for name in required {
            if df.column(name).is_err() {
                return Err(CsvError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }

    /// 解析持倉日誌（預測欄位等其他欄位忽略）
    pub fn parse_positions(df: &DataFrame, date_format: &str) -> CsvResult<Vec<PositionRecord>> {
        Self::require_columns(df, &LOG_COLUMNS)?;

        let dates = Self::date_column(df, ColumnName::DATE, date_format)?;
        let codes = Self::text_column(df, ColumnName::CODE)?;
        let values = Self::amount_column(df, ColumnName::VALUE_POSITION)?;

        Ok(dates
            .into_iter()
            .zip(codes)
            .zip(values)
            .map(|((date, code), value_position)| PositionRecord {
                date,
                code,
                value_position,
            })
            .collect())
    }

    /// 解析成交紀錄
    pub fn parse_transactions(df: &DataFrame, date_format: &str) -> CsvResult<Vec<Transaction>> {
        Self::require_columns(df, &TRANSACTION_COLUMNS)?;

        let dates = Self::date_column(df, ColumnName::DATE, date_format)?;
        let codes = Self::text_column(df, ColumnName::CODE)?;
        let sides = Self::side_column(df, ColumnName::SIDE)?;
        let buys = Self::amount_column(df, ColumnName::BUY)?;
        let sells = Self::amount_column(df, ColumnName::SELL)?;
        let pnls = Self::amount_column(df, ColumnName::PNL)?;
        let positions = Self::amount_column(df, ColumnName::VALUE_POSITION)?;

        let mut transactions = Vec::with_capacity(dates.len());
        for (row, date) in dates.into_iter().enumerate() {
            transactions.push(
                Transaction::new(date, codes[row].clone(), sides[row])
                    .with_amounts(buys[row], sells[row])
                    .with_pnl(pnls[row])
                    .with_position_value(positions[row]),
            );
        }

        Ok(transactions)
    }

    /// 解析基準指數價格
    ///
    /// 第一欄為日期索引（欄位名稱不限），價格欄位由參數指定。
    /// 價格為空值的行不輸出，該日期視同沒有基準價格。
    pub fn parse_benchmark(
        df: &DataFrame,
        price_column: &str,
        date_format: &str,
    ) -> CsvResult<Vec<BenchmarkRecord>> {
        Self::require_columns(df, &[price_column])?;

        let index = df
            .get_columns()
            .first()
            .ok_or_else(|| CsvError::MissingColumn("日期索引".to_string()))?;
        let index_name = index.name().to_string();
        let dates = Self::parse_dates(&index_name, Self::text_values(index)?, date_format)?;

        let prices = Self::text_column(df, price_column)?
            .into_iter()
            .enumerate()
            .map(|(row, raw)| {
                if Self::is_missing(&raw) {
                    Ok(None)
                } else {
                    Self::parse_required_number(price_column, row, &raw).map(Some)
                }
            })
            .collect::<CsvResult<Vec<Option<f64>>>>()?;

        let records: Vec<BenchmarkRecord> = dates
            .into_iter()
            .zip(prices)
            .filter_map(|(date, price)| price.map(|price| BenchmarkRecord { date, price }))
            .collect();

        let skipped = df.height() - records.len();
        if skipped > 0 {
            warn!(column = price_column, skipped, "基準價格缺值，相應日期已略過");
        }

        Ok(records)
    }

    /// 解析成分股資料
    pub fn parse_instruments(df: &DataFrame) -> CsvResult<Vec<InstrumentMeta>> {
        Self::require_columns(df, &INSTRUMENT_COLUMNS)?;

        let codes = Self::text_column(df, ColumnName::CODE)?;
        let sectors = Self::text_column(df, ColumnName::SECTOR)?;
        let names = Self::text_column(df, ColumnName::NAME)?;

        Ok(codes
            .into_iter()
            .zip(sectors)
            .zip(names)
            .map(|((code, sector), name)| InstrumentMeta { code, sector, name })
            .collect())
    }

    /// 讀取字串欄位，空值轉為空字串
    fn text_column(df: &DataFrame, name: &str) -> CsvResult<Vec<String>> {
        let column = df
            .column(name)
            .map_err(|_| CsvError::MissingColumn(name.to_string()))?;
        Self::text_values(column)
    }

    fn text_values(column: &Column) -> CsvResult<Vec<String>> {
        let casted = column.cast(&DataType::String)?;
        let values = casted.str()?;
        Ok(values
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()).unwrap_or_default())
            .collect())
    }

    fn date_column(df: &DataFrame, name: &str, date_format: &str) -> CsvResult<Vec<NaiveDate>> {
        let raw = Self::text_column(df, name)?;
        Self::parse_dates(name, raw, date_format)
    }

    fn parse_dates(name: &str, raw: Vec<String>, date_format: &str) -> CsvResult<Vec<NaiveDate>> {
        raw.into_iter()
            .enumerate()
            .map(|(row, value)| {
                parse_date(&value, date_format).ok_or(CsvError::DateParseError {
                    column: name.to_string(),
                    row,
                    value,
                })
            })
            .collect()
    }

    fn side_column(df: &DataFrame, name: &str) -> CsvResult<Vec<TradeSide>> {
        Self::text_column(df, name)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value.parse::<TradeSide>().map_err(|reason| CsvError::InvalidFormat {
                    column: name.to_string(),
                    row,
                    value,
                    reason,
                })
            })
            .collect()
    }

    /// 讀取金額欄位
    ///
    /// 空值與 NaN 視為 0，與分組加總時跳過缺值的語意一致。
    fn amount_column(df: &DataFrame, name: &str) -> CsvResult<Vec<f64>> {
        Self::text_column(df, name)?
            .into_iter()
            .enumerate()
            .map(|(row, raw)| {
                if Self::is_missing(&raw) {
                    Ok(0.0)
                } else {
                    Self::parse_required_number(name, row, &raw)
                }
            })
            .collect()
    }

    fn parse_required_number(column: &str, row: usize, raw: &str) -> CsvResult<f64> {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CsvError::InvalidFormat {
                column: column.to_string(),
                row,
                value: raw.to_string(),
                reason: "不是有效的數值".to_string(),
            })
    }

    fn is_missing(raw: &str) -> bool {
        raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("null")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_ingestion::processor::csv_io::CsvReader;
    use assert_matches::assert_matches;

    fn read(data: &str) -> DataFrame {
        CsvReader::default().read_bytes(data.as_bytes()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_positions_ignores_prediction_columns() {
        let df = read(
            "date,code,value_position,pred_1d\n\
2024-01-02,000001,1500.5,0.12\n\
2024-01-02,600519,,0.30",
        );

        let rows = CsvParser::parse_positions(&df, "%Y-%m-%d").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "000001");
        assert_eq!(rows[0].value_position, 1500.5);
        assert_eq!(rows[1].value_position, 0.0);
    }

    #[test]
    fn test_parse_transactions() {
        let df = read(
            "date,code,Side,Buy,Sell,PNL,value_position\n\
2024-01-02 00:00:00,000001,Buy,100,0,0,1000\n\
2024-01-03 00:00:00,000001,Sell,0,100,25.5,0\n\
2024-01-04 00:00:00,000001,Hold,,,,0",
        );

        let rows = CsvParser::parse_transactions(&df, "%Y-%m-%d").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, date(2024, 1, 2));
        assert_eq!(rows[0].side, TradeSide::Buy);
        assert_eq!(rows[1].pnl, 25.5);
        assert_eq!(rows[2].side, TradeSide::Hold);
        assert_eq!(rows[2].buy, 0.0);
    }

    #[test]
    fn test_parse_transactions_unknown_side() {
        let df = read("date,code,Side,Buy,Sell,PNL,value_position\n2024-01-02,000001,Short,1,0,0,1");
        assert_matches!(
            CsvParser::parse_transactions(&df, "%Y-%m-%d"),
            Err(CsvError::InvalidFormat { row: 0, .. })
        );
    }

    #[test]
    fn test_parse_benchmark_uses_first_column_as_index() {
        let df = read(",price_zz800_adj\n2024-01-02,5000.0\n2024-01-03,5050.0");

        let rows = CsvParser::parse_benchmark(&df, "price_zz800_adj", "%Y-%m-%d").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].date, date(2024, 1, 3));
        assert_eq!(rows[1].price, 5050.0);
    }

    #[test]
    fn test_parse_benchmark_skips_blank_price() {
        let df = read("Date,price_zz800,price_zz800_adj\n2024-01-02,4900,5000\n2024-01-03,4950,\n2024-01-04,5000,5100\n");

        let rows = CsvParser::parse_benchmark(&df, "price_zz800_adj", "%Y-%m-%d").unwrap();
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 2), date(2024, 1, 4)]);
    }

    #[test]
    fn test_parse_benchmark_rejects_malformed_price() {
        let df = read("Date,price_zz800_adj\n2024-01-02,abc\n");
        assert_matches!(
            CsvParser::parse_benchmark(&df, "price_zz800_adj", "%Y-%m-%d"),
            Err(CsvError::InvalidFormat { row: 0, .. })
        );
    }

    #[test]
    fn test_missing_column() {
        let df = read("code,sector\n000001,金融");
        assert_matches!(
            CsvParser::parse_instruments(&df),
            Err(CsvError::MissingColumn(column)) if column == "name"
        );
    }

    #[test]
    fn test_bad_date() {
        let df = read("date,code,value_position\nyesterday,000001,1");
        assert_matches!(
            CsvParser::parse_positions(&df, "%Y-%m-%d"),
            Err(CsvError::DateParseError { row: 0, .. })
        );
    }
}
