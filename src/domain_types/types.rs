//! 輸入表格的欄位名稱

/// 欄位名稱常量
///
/// 與上游匯出的 CSV 保持一致，大小寫敏感。
pub struct ColumnName;

impl ColumnName {
    // 共用
    pub const DATE: &'static str = "date";
    pub const CODE: &'static str = "code";
    pub const VALUE_POSITION: &'static str = "value_position";

    // 成交紀錄
    pub const SIDE: &'static str = "Side";
    pub const BUY: &'static str = "Buy";
    pub const SELL: &'static str = "Sell";
    pub const PNL: &'static str = "PNL";

    // 成分股資料
    pub const SECTOR: &'static str = "sector";
    pub const NAME: &'static str = "name";
}

/// 持倉日誌必要欄位
pub const LOG_COLUMNS: [&str; 3] = [ColumnName::DATE, ColumnName::CODE, ColumnName::VALUE_POSITION];

/// 成交紀錄必要欄位
pub const TRANSACTION_COLUMNS: [&str; 7] = [
    ColumnName::DATE,
    ColumnName::CODE,
    ColumnName::SIDE,
    ColumnName::BUY,
    ColumnName::SELL,
    ColumnName::PNL,
    ColumnName::VALUE_POSITION,
];

/// 成分股資料必要欄位
pub const INSTRUMENT_COLUMNS: [&str; 3] = [ColumnName::CODE, ColumnName::SECTOR, ColumnName::NAME];
