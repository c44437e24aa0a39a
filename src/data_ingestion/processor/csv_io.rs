//! CSV 檔案讀取與處理模組

pub mod error;
pub mod parser;
pub mod reader;

pub use error::{CsvError, CsvResult};
pub use parser::{BenchmarkRecord, CsvParser, PositionRecord};
pub use reader::{CsvReader, CsvReaderConfig};
