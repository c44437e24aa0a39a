//! 淨值序列標準化
//!
//! 截取日期區間，把組合與基準各自除以區間內第一個值，得到從 1.0 起算的
//! 累計淨值，並計算兩者之差作為超額累計收益。

use crate::domain_types::{pct_change, DateRange, PricePoint, ValueSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 單日累計淨值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub portfolio: f64,
    pub benchmark: f64,
    /// 組合累計淨值減基準累計淨值（算術差，非比值）
    pub excess: f64,
}

/// 標準化後的三條累計序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    points: Vec<CumulativePoint>,
    /// 重新定基所用的 (組合, 基準) 起始值
    bases: Option<(f64, f64)>,
}

impl NormalizedSeries {
    fn empty() -> Self {
        Self {
            points: Vec::new(),
            bases: None,
        }
    }

    pub fn points(&self) -> &[CumulativePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 至少兩個觀測值才有期間收益率
    pub fn has_period_returns(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn bases(&self) -> Option<(f64, f64)> {
        self.bases
    }

    /// 乘回起始值，還原組合的原始數值
    pub fn restore_portfolio(&self) -> Vec<f64> {
        let base = self.bases.map_or(0.0, |(p, _)| p);
        self.points.iter().map(|p| p.portfolio * base).collect()
    }

    /// 乘回起始值，還原基準的原始數值
    pub fn restore_benchmark(&self) -> Vec<f64> {
        let base = self.bases.map_or(0.0, |(_, b)| b);
        self.points.iter().map(|p| p.benchmark * base).collect()
    }
}

/// 期間收益率，按期末日期對齊
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodReturns {
    pub dates: Vec<NaiveDate>,
    pub portfolio: Vec<f64>,
    pub benchmark: Vec<f64>,
}

impl PeriodReturns {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// 每期超額收益率
    pub fn excess(&self) -> Vec<f64> {
        self.portfolio
            .iter()
            .zip(&self.benchmark)
            .map(|(p, b)| p - b)
            .collect()
    }
}

/// 截取日期區間內的數據點
pub fn select_range(points: &[PricePoint], range: DateRange) -> Vec<PricePoint> {
    range.filter(points, |p| p.date).into_iter().copied().collect()
}

/// 計算組合與基準的期間收益率
///
/// 少於兩個觀測值時結果為空。
pub fn period_returns(points: &[PricePoint]) -> PeriodReturns {
    if points.len() < 2 {
        return PeriodReturns::default();
    }

    PeriodReturns {
        dates: points[1..].iter().map(|p| p.date).collect(),
        portfolio: pct_change(&points.portfolio_values()),
        benchmark: pct_change(&points.benchmark_values()),
    }
}

/// 截取區間並重新定基為累計淨值
pub fn normalize(points: &[PricePoint], range: DateRange) -> NormalizedSeries {
    let selected = select_range(points, range);
    let Some(first) = selected.first() else {
        return NormalizedSeries::empty();
    };

    let (p0, b0) = (first.portfolio_value, first.benchmark_value);
    if p0 == 0.0 || b0 == 0.0 {
        warn!(date = %first.date, portfolio = p0, benchmark = b0, "起始值為零，無法重新定基");
        return NormalizedSeries::empty();
    }

    let points = selected
        .iter()
        .map(|p| {
            let portfolio = p.portfolio_value / p0;
            let benchmark = p.benchmark_value / b0;
            CumulativePoint {
                date: p.date,
                portfolio,
                benchmark,
                excess: portfolio - benchmark,
            }
        })
        .collect();

    NormalizedSeries {
        points,
        bases: Some((p0, b0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn series() -> Vec<PricePoint> {
        vec![
            PricePoint::new(date(2), 100.0, 10_000.0),
            PricePoint::new(date(3), 110.0, 10_500.0),
            PricePoint::new(date(4), 99.0, 9_800.0),
            PricePoint::new(date(5), 120.0, 10_000.0),
        ]
    }

    #[test]
    fn test_normalize_starts_at_one() {
        let normalized = normalize(&series(), DateRange::between(date(3), date(5)));
        assert_eq!(normalized.len(), 3);

        let first = normalized.points()[0];
        assert_eq!(first.date, date(3));
        assert_eq!(first.portfolio, 1.0);
        assert_eq!(first.benchmark, 1.0);
        assert_eq!(first.excess, 0.0);

        let last = normalized.points()[2];
        assert!((last.portfolio - 120.0 / 110.0).abs() < 1e-12);
        assert!((last.benchmark - 10_000.0 / 10_500.0).abs() < 1e-12);
        assert!((last.excess - (last.portfolio - last.benchmark)).abs() < 1e-15);
    }

    #[test]
    fn test_restore_round_trip() {
        let data = series();
        let normalized = normalize(&data, DateRange::unbounded());
        let restored = normalized.restore_portfolio();
        for (orig, back) in data.iter().zip(restored) {
            assert!((orig.portfolio_value - back).abs() < 1e-9);
        }
        let restored = normalized.restore_benchmark();
        for (orig, back) in data.iter().zip(restored) {
            assert!((orig.benchmark_value - back).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_point_has_no_returns() {
        let normalized = normalize(&series(), DateRange::between(date(4), date(4)));
        assert_eq!(normalized.len(), 1);
        assert!(!normalized.has_period_returns());
        assert!(period_returns(&select_range(&series(), DateRange::between(date(4), date(4)))).is_empty());
    }

    #[test]
    fn test_empty_range() {
        let normalized = normalize(&series(), DateRange::between(date(20), date(25)));
        assert!(normalized.is_empty());
        assert_eq!(normalized.bases(), None);
    }

    #[test]
    fn test_zero_base_is_not_rebased() {
        let data = vec![PricePoint::new(date(2), 0.0, 1.0), PricePoint::new(date(3), 5.0, 1.0)];
        assert!(normalize(&data, DateRange::unbounded()).is_empty());
    }

    #[test]
    fn test_period_returns_alignment() {
        let returns = period_returns(&series());
        assert_eq!(returns.len(), 3);
        assert_eq!(returns.dates[0], date(3));
        assert!((returns.portfolio[0] - 0.1).abs() < 1e-12);
        assert!((returns.benchmark[0] - 0.05).abs() < 1e-12);
        assert!((returns.excess()[0] - 0.05).abs() < 1e-12);
    }
}
