//! 績效與歸因計算
//!
//! 四個互相獨立的純函數組件：淨值標準化、風險收益指標、勝率統計、交易歸因。
//! 每次請求（日期區間 + 無風險利率）都以不可變的 `AnalysisContext` 為輸入，
//! 由呼叫端組合結果。

pub mod attribution;
pub mod metrics;
pub mod normalizer;
pub mod probability;

pub use attribution::{
    attribute, effective_transactions, AttributionReport, InstrumentPnl, PnlTotal, SectorPnl,
    SectorSideCapital,
};
pub use metrics::{calculate_performance, PerformanceReport};
pub use normalizer::{normalize, period_returns, select_range, CumulativePoint, NormalizedSeries, PeriodReturns};
pub use probability::{calculate_probabilities, ProbabilityReport, ProbabilityRow};

use crate::context::AnalysisContext;
use crate::domain_types::DateRange;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 指標值；`None` 表示未定義（分母為零或樣本不足）
pub type MetricValue = Option<f64>;

/// 一次分析請求
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub range: DateRange,
    pub risk_free_rate: f64,
}

impl AnalysisRequest {
    pub fn new(range: DateRange, risk_free_rate: f64) -> Self {
        Self { range, risk_free_rate }
    }
}

/// 一次請求的全部結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub request: AnalysisRequest,
    pub performance: PerformanceReport,
    pub probabilities: ProbabilityReport,
    pub cumulative: NormalizedSeries,
    pub attribution: AttributionReport,
}

/// 對上下文執行全部四個計算
pub fn run_analysis(ctx: &AnalysisContext, request: AnalysisRequest) -> AnalysisOutput {
    let selected = select_range(ctx.price_points(), request.range);

    let performance = calculate_performance(&selected, request.risk_free_rate);
    let probabilities = calculate_probabilities(&selected);
    let cumulative = normalize(ctx.price_points(), request.range);
    let attribution = attribution::attribute_context(ctx, request.range);

    info!(
        range = %request.range,
        risk_free_rate = request.risk_free_rate,
        observations = selected.len(),
        instruments = attribution.instruments.len(),
        "分析完成"
    );

    AnalysisOutput {
        request,
        performance,
        probabilities,
        cumulative,
        attribution,
    }
}
