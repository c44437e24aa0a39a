use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 每日淨值數據點：組合市值與基準指數（已重新定基）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub portfolio_value: f64,
    pub benchmark_value: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, portfolio_value: f64, benchmark_value: f64) -> Self {
        Self {
            date,
            portfolio_value,
            benchmark_value,
        }
    }
}

/// 從價格數據點中抽取數值序列的輔助特徵
pub trait ValueSeries {
    fn dates(&self) -> Vec<NaiveDate>;
    fn portfolio_values(&self) -> Vec<f64>;
    fn benchmark_values(&self) -> Vec<f64>;
}

impl ValueSeries for [PricePoint] {
    fn dates(&self) -> Vec<NaiveDate> {
        self.iter().map(|p| p.date).collect()
    }

    fn portfolio_values(&self) -> Vec<f64> {
        self.iter().map(|p| p.portfolio_value).collect()
    }

    fn benchmark_values(&self) -> Vec<f64> {
        self.iter().map(|p| p.benchmark_value).collect()
    }
}

/// 計算相鄰觀測值之間的簡單收益率
///
/// 結果長度為 N-1；第一期沒有前值，不包含在內。
/// 前值為零時結果為非有限值，由下游統一處理為未定義。
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}
