pub mod processor;
pub mod validator;

pub use processor::csv_io::{BenchmarkRecord, CsvError, CsvParser, CsvReader, PositionRecord};
pub use validator::DataValidationError;
