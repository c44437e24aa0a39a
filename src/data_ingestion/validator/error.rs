use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DataValidationError {
    #[error("數據值範圍錯誤: {table}.{field} 第 {row} 行 = {value}, {message}")]
    RangeError {
        table: String,
        field: String,
        row: usize,
        value: f64,
        message: String,
    },

    #[error("數據重複: {table} 的日期 {date} 出現多次")]
    DuplicateDate { table: String, date: NaiveDate },

    #[error("時間序列錯誤: {table} 第 {row} 行日期 {date} 未嚴格遞增")]
    NotAscending {
        table: String,
        row: usize,
        date: NaiveDate,
    },
}

impl DataValidationError {
    pub fn negative(table: &str, field: &str, row: usize, value: f64) -> Self {
        Self::RangeError {
            table: table.to_string(),
            field: field.to_string(),
            row,
            value,
            message: "不可為負數".to_string(),
        }
    }
}

pub type ValidationResult<T> = Result<T, DataValidationError>;
