//! 資料驗證器模組
//!
//! 在建立分析上下文之前檢查輸入資料，確保計算不會建立在壞數據上。
//!
//! # 主要功能
//!
//! - **時間序列驗證**：基準指數日期不可重複，淨值序列日期嚴格遞增
//! - **數值範圍驗證**：基準價格與淨值不可為負
//!
//! 成交紀錄的金額不做符號檢查，原樣進入歸因計算。

pub mod error;

pub use error::{DataValidationError, ValidationResult};

use crate::data_ingestion::processor::csv_io::BenchmarkRecord;
use crate::domain_types::PricePoint;
use std::collections::HashSet;
use tracing::debug;

/// 驗證基準指數價格：日期唯一、價格非負
pub fn validate_benchmark(records: &[BenchmarkRecord]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        if !seen.insert(record.date) {
            return Err(DataValidationError::DuplicateDate {
                table: "benchmark".to_string(),
                date: record.date,
            });
        }
        if record.price < 0.0 {
            return Err(DataValidationError::negative("benchmark", "price", row, record.price));
        }
    }

    debug!(rows = records.len(), "基準指數驗證通過");
    Ok(())
}

/// 驗證淨值序列：日期嚴格遞增、數值非負
pub fn validate_price_points(points: &[PricePoint]) -> ValidationResult<()> {
    for (row, point) in points.iter().enumerate() {
        if row > 0 && point.date <= points[row - 1].date {
            return Err(DataValidationError::NotAscending {
                table: "price_points".to_string(),
                row,
                date: point.date,
            });
        }
        if point.portfolio_value < 0.0 {
            return Err(DataValidationError::negative(
                "price_points",
                "portfolio_value",
                row,
                point.portfolio_value,
            ));
        }
        if point.benchmark_value < 0.0 {
            return Err(DataValidationError::negative(
                "price_points",
                "benchmark_value",
                row,
                point.benchmark_value,
            ));
        }
    }

    debug!(rows = points.len(), "淨值序列驗證通過");
    Ok(())
}
