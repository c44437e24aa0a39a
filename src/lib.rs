// 模組定義
pub mod analytics;
pub mod config;
pub mod context;
pub mod data_ingestion;
pub mod domain_types;
pub mod report;
pub mod utils;
