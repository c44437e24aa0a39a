//! 報表輸出模組
//!
//! 把計算結果轉成文字表格、CSV 與 JSON。

pub mod export;
pub mod table;

pub use export::{ReportError, ReportResult, ReportWriter, JSON_REPORT_FILE};
pub use table::{all_tables, format_metric, format_number, Table};
