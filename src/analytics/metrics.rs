//! 風險收益指標
//!
//! 年化收益、波動率、夏普比率、最大回撤、Beta、Alpha 與資訊比率。
//! 任何分母為零或樣本不足的指標以 `None` 表示未定義，不會回傳 NaN。

use super::normalizer::{period_returns, PeriodReturns};
use super::MetricValue;
use crate::domain_types::PricePoint;
use crate::utils::finite;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

/// 每年交易日數
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// 回撤計算所用財富指數的起始值
const WEALTH_INDEX_SEED: f64 = 1000.0;

/// 組合指標
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioIndicators {
    pub annualized_return: MetricValue,
    pub volatility: MetricValue,
    pub sharpe_ratio: MetricValue,
    pub max_drawdown: MetricValue,
    pub beta: MetricValue,
    pub alpha: MetricValue,
}

impl PortfolioIndicators {
    pub fn entries(&self) -> Vec<(&'static str, MetricValue)> {
        vec![
            ("Annualized Return", self.annualized_return),
            ("Volatility", self.volatility),
            ("Sharpe Ratio", self.sharpe_ratio),
            ("Max Drawdown", self.max_drawdown),
            ("Beta", self.beta),
            ("Alpha", self.alpha),
        ]
    }
}

/// 基準指標
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BenchmarkIndicators {
    pub annualized_return: MetricValue,
    pub volatility: MetricValue,
    pub sharpe_ratio: MetricValue,
    pub max_drawdown: MetricValue,
}

impl BenchmarkIndicators {
    pub fn entries(&self) -> Vec<(&'static str, MetricValue)> {
        vec![
            ("Annualized Return", self.annualized_return),
            ("Volatility", self.volatility),
            ("Sharpe Ratio", self.sharpe_ratio),
            ("Max Drawdown", self.max_drawdown),
        ]
    }
}

/// 超額表現指標
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExcessIndicators {
    pub excess_return: MetricValue,
    pub excess_volatility: MetricValue,
    pub information_ratio: MetricValue,
}

impl ExcessIndicators {
    pub fn entries(&self) -> Vec<(&'static str, MetricValue)> {
        vec![
            ("Excess Return", self.excess_return),
            ("Excess Volatility", self.excess_volatility),
            ("Information Ratio", self.information_ratio),
        ]
    }
}

/// 一次請求（日期區間 + 無風險利率）的完整指標
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub portfolio: PortfolioIndicators,
    pub benchmark: BenchmarkIndicators,
    pub excess: ExcessIndicators,
}

/// 年化收益率：(1 + 平均日收益)^252 - 1
///
/// 以算術平均近似複利，保留此近似以維持與既有報表一致。
pub fn annualized_return(returns: &[f64]) -> MetricValue {
    if returns.is_empty() {
        return None;
    }
    finite((1.0 + returns.mean()).powf(TRADING_DAYS_PER_YEAR) - 1.0)
}

/// 年化波動率：樣本標準差（ddof=1）× sqrt(252)
pub fn annualized_volatility(returns: &[f64]) -> MetricValue {
    if returns.len() < 2 {
        return None;
    }
    finite(returns.std_dev() * TRADING_DAYS_PER_YEAR.sqrt())
}

/// 超額收益除以波動率；波動率為零或未定義時結果未定義
pub fn risk_adjusted(excess_return: MetricValue, volatility: MetricValue) -> MetricValue {
    match (excess_return, volatility) {
        (Some(ret), Some(vol)) if vol != 0.0 => finite(ret / vol),
        _ => None,
    }
}

/// 夏普比率
pub fn sharpe_ratio(annualized: MetricValue, volatility: MetricValue, risk_free_rate: f64) -> MetricValue {
    risk_adjusted(annualized.map(|r| r - risk_free_rate), volatility)
}

/// 最大回撤
///
/// 以 1000 為起點按期複利得到財富指數，取相對歷史高點的最大跌幅。
/// 高點從第一個複利後的值開始累計，起點本身不作為高點。
pub fn max_drawdown(returns: &[f64]) -> MetricValue {
    let mut wealth = WEALTH_INDEX_SEED;
    let mut peak = f64::NEG_INFINITY;
    let mut worst: Option<f64> = None;

    for r in returns {
        wealth *= 1.0 + r;
        peak = peak.max(wealth);
        let drawdown = (wealth - peak) / peak;
        if drawdown.is_finite() {
            worst = Some(worst.map_or(drawdown, |w| w.min(drawdown)));
        }
    }

    worst
}

/// Beta：樣本協方差 / 基準樣本方差
pub fn beta(portfolio_returns: &[f64], benchmark_returns: &[f64]) -> MetricValue {
    if portfolio_returns.len() < 2 || portfolio_returns.len() != benchmark_returns.len() {
        return None;
    }

    let variance = benchmark_returns.variance();
    if variance == 0.0 || !variance.is_finite() {
        return None;
    }

    let covariance = portfolio_returns.covariance(benchmark_returns);
    finite(covariance / variance)
}

/// Alpha：組合年化收益減去 CAPM 預期收益
pub fn alpha(
    portfolio_annualized: MetricValue,
    benchmark_annualized: MetricValue,
    beta: MetricValue,
    risk_free_rate: f64,
) -> MetricValue {
    match (portfolio_annualized, benchmark_annualized, beta) {
        (Some(rp), Some(rb), Some(b)) => finite(rp - (risk_free_rate + b * (rb - risk_free_rate))),
        _ => None,
    }
}

/// 由期間收益率計算完整指標
pub fn performance_from_returns(returns: &PeriodReturns, risk_free_rate: f64) -> PerformanceReport {
    if returns.is_empty() {
        debug!("樣本不足，所有指標未定義");
        return PerformanceReport::default();
    }

    let ann_p = annualized_return(&returns.portfolio);
    let ann_b = annualized_return(&returns.benchmark);
    let vol_p = annualized_volatility(&returns.portfolio);
    let vol_b = annualized_volatility(&returns.benchmark);

    let beta = beta(&returns.portfolio, &returns.benchmark);
    let alpha = alpha(ann_p, ann_b, beta, risk_free_rate);

    let excess_return = match (ann_p, ann_b) {
        (Some(p), Some(b)) => finite(p - b),
        _ => None,
    };
    let excess_volatility = annualized_volatility(&returns.excess());

    let report = PerformanceReport {
        portfolio: PortfolioIndicators {
            annualized_return: ann_p,
            volatility: vol_p,
            sharpe_ratio: sharpe_ratio(ann_p, vol_p, risk_free_rate),
            max_drawdown: max_drawdown(&returns.portfolio),
            beta,
            alpha,
        },
        benchmark: BenchmarkIndicators {
            annualized_return: ann_b,
            volatility: vol_b,
            sharpe_ratio: sharpe_ratio(ann_b, vol_b, risk_free_rate),
            max_drawdown: max_drawdown(&returns.benchmark),
        },
        excess: ExcessIndicators {
            excess_return,
            excess_volatility,
            information_ratio: risk_adjusted(excess_return, excess_volatility),
        },
    };

    debug!(
        periods = returns.len(),
        risk_free_rate,
        sharpe = ?report.portfolio.sharpe_ratio,
        beta = ?report.portfolio.beta,
        "指標計算完成"
    );

    report
}

/// 計算組合與基準的風險收益指標
///
/// `points` 應已按日期區間截取；少於兩個觀測值時所有指標未定義。
pub fn calculate_performance(points: &[PricePoint], risk_free_rate: f64) -> PerformanceReport {
    performance_from_returns(&period_returns(points), risk_free_rate)
}
