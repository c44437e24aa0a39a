//! 累計收益勝率
//!
//! 把日收益率按日 / 週 / 月 / 年分桶複利，統計正收益區間的比例。

use super::normalizer::{period_returns, PeriodReturns};
use super::MetricValue;
use crate::domain_types::{Frequency, PricePoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// 單一區間的複利收益
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketReturn {
    /// 區間起始日
    pub start: NaiveDate,
    pub portfolio: f64,
    pub benchmark: f64,
}

impl BucketReturn {
    /// 區間超額收益：組合複利收益減基準複利收益
    pub fn excess(&self) -> f64 {
        self.portfolio - self.benchmark
    }
}

/// 一個頻率的勝率統計
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityRow {
    pub frequency: Frequency,
    pub portfolio: MetricValue,
    pub benchmark: MetricValue,
    pub excess: MetricValue,
    /// 參與統計的區間數（含零收益區間）
    pub buckets: usize,
}

/// 各頻率勝率，按 Daily / Weekly / Monthly / Yearly 排列
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProbabilityReport {
    pub rows: Vec<ProbabilityRow>,
}

impl ProbabilityReport {
    pub fn get(&self, frequency: Frequency) -> Option<&ProbabilityRow> {
        self.rows.iter().find(|row| row.frequency == frequency)
    }
}

/// 按頻率把期間收益率分桶複利
///
/// 只有包含至少一個收益率的區間才會出現在結果中。
pub fn bucket_returns(returns: &PeriodReturns, frequency: Frequency) -> Vec<BucketReturn> {
    let mut buckets: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for ((date, rp), rb) in returns.dates.iter().zip(&returns.portfolio).zip(&returns.benchmark) {
        let growth = buckets.entry(frequency.bucket_start(*date)).or_insert((1.0, 1.0));
        growth.0 *= 1.0 + rp;
        growth.1 *= 1.0 + rb;
    }

    buckets
        .into_iter()
        .map(|(start, (p, b))| BucketReturn {
            start,
            portfolio: p - 1.0,
            benchmark: b - 1.0,
        })
        .collect()
}

/// 正收益機率：count(>0) / count(≠0)
///
/// 零收益與 NaN 區間不計入分母；分母為零時未定義。
pub fn positive_probability<I>(values: I) -> MetricValue
where
    I: IntoIterator<Item = f64>,
{
    let (positive, nonzero) = values
        .into_iter()
        .filter(|v| !v.is_nan() && *v != 0.0)
        .fold((0usize, 0usize), |(pos, total), v| (pos + usize::from(v > 0.0), total + 1));

    if nonzero == 0 {
        None
    } else {
        Some(positive as f64 / nonzero as f64)
    }
}

/// 由期間收益率計算各頻率勝率
pub fn probability_from_returns(returns: &PeriodReturns) -> ProbabilityReport {
    let rows = Frequency::all()
        .into_iter()
        .map(|frequency| {
            let buckets = bucket_returns(returns, frequency);
            let row = ProbabilityRow {
                frequency,
                portfolio: positive_probability(buckets.iter().map(|b| b.portfolio)),
                benchmark: positive_probability(buckets.iter().map(|b| b.benchmark)),
                excess: positive_probability(buckets.iter().map(BucketReturn::excess)),
                buckets: buckets.len(),
            };
            debug!(frequency = %frequency, buckets = row.buckets, "勝率計算完成");
            row
        })
        .collect();

    ProbabilityReport { rows }
}

/// 計算組合、基準與超額的正收益機率
pub fn calculate_probabilities(points: &[PricePoint]) -> ProbabilityReport {
    probability_from_returns(&period_returns(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn points(rows: &[(NaiveDate, f64, f64)]) -> Vec<PricePoint> {
        rows.iter().map(|(d, p, b)| PricePoint::new(*d, *p, *b)).collect()
    }

    #[rstest]
    #[case::mixed(vec![0.1, -0.2, 0.0, 0.3], Some(2.0 / 3.0))]
    #[case::all_zero(vec![0.0, 0.0], None)]
    #[case::empty(vec![], None)]
    #[case::nan_ignored(vec![f64::NAN, 0.5], Some(1.0))]
    fn test_positive_probability(#[case] values: Vec<f64>, #[case] expected: MetricValue) {
        assert_eq!(positive_probability(values), expected);
    }

    #[test]
    fn test_weekly_compounding() {
        // 1/1 是週一；1/8 開始下一週
        let data = points(&[
            (date(1, 1), 100.0, 100.0),
            (date(1, 2), 110.0, 100.0),
            (date(1, 3), 99.0, 101.0),
            (date(1, 8), 108.9, 101.0),
        ]);
        let returns = period_returns(&data);
        let weekly = bucket_returns(&returns, Frequency::Weekly);

        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].start, date(1, 1));
        assert!((weekly[0].portfolio - (-0.01)).abs() < 1e-12);
        assert!((weekly[0].benchmark - 0.01).abs() < 1e-12);
        assert!((weekly[1].portfolio - 0.1).abs() < 1e-12);
        assert_eq!(weekly[1].benchmark, 0.0);
    }

    #[test]
    fn test_report_rows() {
        let data = points(&[
            (date(1, 30), 100.0, 100.0),
            (date(1, 31), 101.0, 100.0),
            (date(2, 1), 100.0, 100.0),
            (date(2, 2), 100.0, 102.0),
        ]);
        let report = calculate_probabilities(&data);

        let freqs: Vec<Frequency> = report.rows.iter().map(|r| r.frequency).collect();
        assert_eq!(freqs, Frequency::all());

        let daily = report.get(Frequency::Daily).unwrap();
        assert_eq!(daily.buckets, 3);
        assert_eq!(daily.portfolio, Some(0.5));
        assert_eq!(daily.benchmark, Some(1.0));
        assert_eq!(daily.excess, Some(1.0 / 3.0));

        let yearly = report.get(Frequency::Yearly).unwrap();
        assert_eq!(yearly.buckets, 1);
        assert_eq!(yearly.benchmark, Some(1.0));
        assert_eq!(yearly.excess, Some(0.0));

        let monthly = report.get(Frequency::Monthly).unwrap();
        assert_eq!(monthly.buckets, 2);
        assert_eq!(monthly.portfolio, Some(0.5));
    }

    #[test]
    fn test_single_point_all_undefined() {
        let report = calculate_probabilities(&points(&[(date(1, 2), 1.0, 1.0)]));
        assert_eq!(report.rows.len(), 4);
        assert!(report
            .rows
            .iter()
            .all(|r| r.portfolio.is_none() && r.benchmark.is_none() && r.excess.is_none()));
    }
}
