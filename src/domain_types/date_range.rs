use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 閉區間日期範圍，任一端為 `None` 表示不設限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// 不設限的範圍
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    /// 篩選出日期落在範圍內的元素，保持原有順序
    pub fn filter<'a, T, F>(&self, items: &'a [T], date_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> NaiveDate,
    {
        items.iter().filter(|item| self.contains(date_of(*item))).collect()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_bound = |d: Option<NaiveDate>| d.map_or_else(|| "..".to_string(), |d| d.to_string());
        write!(f, "[{}, {}]", fmt_bound(self.start), fmt_bound(self.end))
    }
}
