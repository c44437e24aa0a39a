use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 成分股靜態資料
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstrumentMeta {
    pub code: String,
    pub sector: String,
    pub name: String,
}

impl InstrumentMeta {
    pub fn new(code: impl Into<String>, sector: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            sector: sector.into(),
            name: name.into(),
        }
    }
}

/// 以代碼為鍵的成分股查詢表
///
/// 重複代碼以第一筆為準，與左連接時取首個匹配一致。
#[derive(Debug, Clone, Default)]
pub struct InstrumentTable {
    by_code: HashMap<String, InstrumentMeta>,
}

impl InstrumentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, meta: InstrumentMeta) {
        self.by_code.entry(meta.code.clone()).or_insert(meta);
    }

    pub fn get(&self, code: &str) -> Option<&InstrumentMeta> {
        self.by_code.get(code)
    }

    pub fn sector_of(&self, code: &str) -> Option<&str> {
        self.get(code).map(|m| m.sector.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl FromIterator<InstrumentMeta> for InstrumentTable {
    fn from_iter<I: IntoIterator<Item = InstrumentMeta>>(iter: I) -> Self {
        let mut table = Self::new();
        for meta in iter {
            table.insert(meta);
        }
        table
    }
}
