use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::validation::{ValidationError, ValidationUtils, Validator};

/// 應用程序配置結構
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub log: LogConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.log.validate()?;
        self.data.validate()?;
        self.analysis.validate()?;
        self.export.validate()?;

        Ok(())
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase(),
            &["trace", "debug", "info", "warn", "error"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
            "log.level",
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(
            &self.format.to_lowercase(),
            &["pretty", "json"].iter().map(|s| s.to_string()).collect::<Vec<String>>(),
            "log.format",
        )?;

        Ok(())
    }
}

/// 輸入資料來源配置
///
/// 四張輸入表：持倉日誌、成交紀錄、基準指數價格、成分股資料。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub log_path: String,
    pub transactions_path: String,
    pub benchmark_path: String,
    pub instruments_path: String,
    /// 基準價格欄位名稱
    #[serde(default = "default_benchmark_column")]
    pub benchmark_column: String,
    /// 基準指數重新定基後的起始值
    #[serde(default = "default_benchmark_base")]
    pub benchmark_base: f64,
    /// 日期欄位格式（chrono 語法）
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_benchmark_column() -> String {
    "price_zz800_adj".to_string()
}

fn default_benchmark_base() -> f64 {
    10_000.0
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Validator for DataConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.log_path, "data.log_path")?;
        ValidationUtils::not_empty(&self.transactions_path, "data.transactions_path")?;
        ValidationUtils::not_empty(&self.benchmark_path, "data.benchmark_path")?;
        ValidationUtils::not_empty(&self.instruments_path, "data.instruments_path")?;
        ValidationUtils::not_empty(&self.benchmark_column, "data.benchmark_column")?;
        ValidationUtils::not_empty(&self.date_format, "data.date_format")?;

        if !(self.benchmark_base.is_finite() && self.benchmark_base > 0.0) {
            return Err(ValidationError::InvalidValue(format!(
                "data.benchmark_base 必須為正數，目前為 {}",
                self.benchmark_base
            )));
        }

        Ok(())
    }
}

/// 分析參數配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// 年化無風險利率（小數，例如 0.02）
    pub risk_free_rate: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.02,
            start_date: None,
            end_date: None,
        }
    }
}

impl Validator for AnalysisConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::in_range(self.risk_free_rate, -1.0, 1.0, "analysis.risk_free_rate")?;

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ValidationError::InvalidValue(format!(
                    "analysis.start_date {} 晚於 analysis.end_date {}",
                    start, end
                )));
            }
        }

        Ok(())
    }
}

/// 報表匯出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub directory: String,
    /// 指標與勝率表格的顯示小數位數
    pub precision: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: "reports".to_string(),
            precision: 2,
        }
    }
}

impl Validator for ExportConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.directory, "export.directory")?;
        ValidationUtils::in_range(self.precision, 0, 10, "export.precision")?;

        Ok(())
    }
}
