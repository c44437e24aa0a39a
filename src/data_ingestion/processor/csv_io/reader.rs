//! CSV 檔案讀取器

use super::error::{CsvError, CsvResult};
use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// CSV 讀取器配置
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    /// 是否有標題行
    pub has_header: bool,
    /// 分隔符
    pub separator: u8,
    /// 推斷模式類型的行數；`Some(0)` 表示所有欄位一律讀為字串
    pub infer_schema_length: Option<usize>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            separator: b',',
            // 證券代碼如 000001 不可被推斷為整數，統一讀為字串後再解析
            infer_schema_length: Some(0),
        }
    }
}

/// CSV 檔案讀取器
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    config: CsvReaderConfig,
}

impl CsvReader {
    fn read_options(&self) -> CsvReadOptions {
        CsvReadOptions::default()
            .with_has_header(self.config.has_header)
            .with_parse_options(CsvParseOptions::default().with_separator(self.config.separator))
            .with_infer_schema_length(self.config.infer_schema_length)
    }

    /// 從檔案路徑讀取 CSV
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> CsvResult<DataFrame> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| {
            CsvError::IoError(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
        })?;
        self.read_bytes(&data)
    }

    /// 從字節數組讀取 CSV
    pub fn read_bytes(&self, data: &[u8]) -> CsvResult<DataFrame> {
        let cursor = Cursor::new(data);
        let df = self.read_options().into_reader_with_file_handle(cursor).finish()?;

        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_reader_config_default() {
        let config = CsvReaderConfig::default();
        assert!(config.has_header);
        assert_eq!(config.separator, b',');
        assert_eq!(config.infer_schema_length, Some(0));
    }

    #[test]
    fn test_read_bytes_keeps_codes_as_text() {
        let csv_data = "date,code,value_position\n\
2024-01-02,000001,1500.5\n\
2024-01-02,600519,2300.0\n\
2024-01-03,000001,1490.0";

        let df = CsvReader::default().read_bytes(csv_data.as_bytes()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);

        let codes = df.column("code").unwrap().str().unwrap();
        assert_eq!(codes.get(0), Some("000001"));
    }

    #[test]
    fn test_read_missing_file() {
        let result = CsvReader::default().read_file("/definitely/not/here.csv");
        assert!(matches!(result, Err(CsvError::IoError(_))));
    }
}
