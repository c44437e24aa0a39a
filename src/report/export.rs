//! 報表匯出
//!
//! 每張表寫成一個 CSV 檔，另外把完整計算結果寫成 `report.json`。

use super::table::Table;
use crate::analytics::AnalysisOutput;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// JSON 匯出檔名
pub const JSON_REPORT_FILE: &str = "report.json";

/// 匯出錯誤
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO 錯誤 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV 寫入錯誤: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 序列化錯誤: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// 報表寫入器
#[derive(Debug, Clone)]
pub struct ReportWriter {
    directory: PathBuf,
}

impl ReportWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn ensure_directory(&self) -> ReportResult<()> {
        fs::create_dir_all(&self.directory).map_err(|source| ReportError::Io {
            path: self.directory.clone(),
            source,
        })
    }

    /// 寫出單張表，回傳檔案路徑
    pub fn write_table(&self, table: &Table) -> ReportResult<PathBuf> {
        self.ensure_directory()?;
        let path = self.directory.join(format!("{}.csv", table.name));

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), rows = table.rows.len(), "表格已匯出");
        Ok(path)
    }

    /// 寫出完整計算結果（未經顯示取整）
    pub fn write_json(&self, output: &AnalysisOutput) -> ReportResult<PathBuf> {
        self.ensure_directory()?;
        let path = self.directory.join(JSON_REPORT_FILE);
        let file = File::create(&path).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), output)?;
        Ok(path)
    }

    /// 匯出全部表格與 JSON
    pub fn export_all(&self, tables: &[Table], output: &AnalysisOutput) -> ReportResult<Vec<PathBuf>> {
        let mut written = tables
            .iter()
            .map(|table| self.write_table(table))
            .collect::<ReportResult<Vec<_>>>()?;
        written.push(self.write_json(output)?);

        info!(
            directory = %self.directory.display(),
            files = written.len(),
            "報表匯出完成"
        );
        Ok(written)
    }
}
