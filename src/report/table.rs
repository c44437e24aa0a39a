//! 表格化輸出
//!
//! 把計算結果轉成字串表格，在這一層按顯示精度取整；計算結果本身保持原值。

use crate::analytics::{
    AnalysisOutput, AttributionReport, MetricValue, NormalizedSeries, PerformanceReport, ProbabilityReport,
};
use crate::analytics::attribution::TOTAL_LABEL;
use crate::utils::round_to;
use std::fmt;

/// 未定義值的顯示字元
pub const UNDEFINED_CELL: &str = "-";

/// 一張輸出表
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// 匯出檔名（不含副檔名）
    pub name: &'static str,
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: &'static str, title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name,
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        widths
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();
        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
                .collect::<Vec<_>>()
                .join("  ")
        };

        writeln!(f, "== {} ==", self.title)?;
        writeln!(f, "{}", line(&self.headers).trim_end())?;
        let total: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 2;
        writeln!(f, "{}", "-".repeat(total))?;
        if self.rows.is_empty() {
            writeln!(f, "(無資料)")?;
        }
        for row in &self.rows {
            writeln!(f, "{}", line(row).trim_end())?;
        }
        Ok(())
    }
}

/// 格式化數值，取整到 `precision` 位小數
pub fn format_number(value: f64, precision: u32) -> String {
    format!("{:.*}", precision as usize, round_to(value, precision))
}

/// 格式化指標值，未定義時顯示 `-`
pub fn format_metric(value: MetricValue, precision: u32) -> String {
    value.map_or_else(|| UNDEFINED_CELL.to_string(), |v| format_number(v, precision))
}

/// 組合與基準指標表
pub fn performance_table(report: &PerformanceReport, precision: u32) -> Table {
    let portfolio = report.portfolio.entries();
    let benchmark = report.benchmark.entries();

    let mut headers = vec![""];
    headers.extend(portfolio.iter().map(|(name, _)| *name));
    let mut table = Table::new("performance", "組合與基準指標", &headers);

    let mut row = vec!["Portfolio".to_string()];
    row.extend(portfolio.iter().map(|(_, v)| format_metric(*v, precision)));
    table.push_row(row);

    // 基準沒有 Beta / Alpha
    let mut row = vec!["Benchmark".to_string()];
    row.extend(portfolio.iter().map(|(name, _)| {
        let value = benchmark.iter().find(|(n, _)| n == name).and_then(|(_, v)| *v);
        format_metric(value, precision)
    }));
    table.push_row(row);

    table
}

/// 超額表現表
pub fn excess_table(report: &PerformanceReport, precision: u32) -> Table {
    let entries = report.excess.entries();
    let mut headers = vec![""];
    headers.extend(entries.iter().map(|(name, _)| *name));
    let mut table = Table::new("excess", "超額表現", &headers);

    let mut row = vec!["Excess".to_string()];
    row.extend(entries.iter().map(|(_, v)| format_metric(*v, precision)));
    table.push_row(row);
    table
}

/// 勝率表
pub fn probability_table(report: &ProbabilityReport, precision: u32) -> Table {
    let mut table = Table::new(
        "probability",
        "正收益機率",
        &[
            "Frequency",
            "Portfolio Positive Return Probability",
            "Benchmark Positive Return Probability",
            "Excess Positive Return Probability",
        ],
    );
    for row in &report.rows {
        table.push_row(vec![
            row.frequency.tag().to_string(),
            format_metric(row.portfolio, precision),
            format_metric(row.benchmark, precision),
            format_metric(row.excess, precision),
        ]);
    }
    table
}

/// 累計淨值表
///
/// 累計淨值按固定四位小數輸出，保留走勢細節。
pub fn cumulative_table(series: &NormalizedSeries) -> Table {
    let mut table = Table::new(
        "cumulative",
        "累計淨值",
        &["Date", "Portfolio", "Benchmark", "Excess"],
    );
    for point in series.points() {
        table.push_row(vec![
            point.date.to_string(),
            format_number(point.portfolio, 4),
            format_number(point.benchmark, 4),
            format_number(point.excess, 4),
        ]);
    }
    table
}

/// 個股損益表
pub fn instrument_table(report: &AttributionReport, precision: u32) -> Table {
    let mut table = Table::new(
        "positions",
        "個股損益",
        &["Rank", "Code", "PNL", "Sector", "Name", "Buy", "Sell"],
    );
    for row in &report.instruments {
        table.push_row(vec![
            row.rank.to_string(),
            row.code.clone(),
            format_number(row.pnl, 0),
            row.sector.clone().unwrap_or_default(),
            row.name.clone().unwrap_or_default(),
            format_number(row.total_buy, precision),
            format_number(row.total_sell, precision),
        ]);
    }
    table
}

/// 板塊損益表，末行為合計
pub fn sector_table(report: &AttributionReport) -> Table {
    let mut table = Table::new("sectors", "板塊損益", &["Sector", "PNL", "PNL%"]);
    if report.is_empty() {
        return table;
    }
    for row in &report.sectors {
        table.push_row(vec![
            row.label().to_string(),
            format_number(row.pnl, 0),
            format_metric(row.share, 2),
        ]);
    }
    table.push_row(vec![
        TOTAL_LABEL.to_string(),
        format_number(report.total.pnl, 0),
        format_metric(report.total.share, 2),
    ]);
    table
}

/// 板塊損益排行，由高到低
pub fn sector_ranking_table(report: &AttributionReport) -> Table {
    let mut table = Table::new("sector_ranking", "板塊盈虧排行", &["Sector", "PNL"]);
    for row in report.sectors_by_pnl() {
        table.push_row(vec![row.label().to_string(), format_number(row.pnl, 0)]);
    }
    table
}

/// 板塊 × 方向資金表
pub fn capital_table(report: &AttributionReport, precision: u32) -> Table {
    let mut table = Table::new(
        "capital",
        "板塊資金",
        &["Sector", "Action", "Count", "Capital", "CapPerAction", "Cap%"],
    );
    for row in &report.capital {
        table.push_row(vec![
            row.label().to_string(),
            row.side.to_string(),
            format_number(row.count(), precision),
            format_number(row.capital, precision),
            format_metric(row.capital_per_action, precision),
            format_metric(row.capital_share, 1),
        ]);
    }
    table
}

/// 買入資金佔比
pub fn buy_capital_table(report: &AttributionReport) -> Table {
    let mut table = Table::new("buy_capital", "買入資金佔比", &["Sector", "Cap%"]);
    for row in report.buy_capital_shares() {
        table.push_row(vec![row.label().to_string(), format_metric(row.capital_share, 1)]);
    }
    table
}

/// 全部表格，按輸出順序排列
pub fn all_tables(output: &AnalysisOutput, precision: u32) -> Vec<Table> {
    vec![
        performance_table(&output.performance, precision),
        excess_table(&output.performance, precision),
        probability_table(&output.probabilities, precision),
        cumulative_table(&output.cumulative),
        instrument_table(&output.attribution, precision),
        sector_table(&output.attribution),
        sector_ranking_table(&output.attribution),
        capital_table(&output.attribution, precision),
        buy_capital_table(&output.attribution),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::attribution::{SectorPnl, SectorSideCapital};
    use crate::analytics::metrics::PortfolioIndicators;
    use crate::analytics::InstrumentPnl;
    use crate::analytics::PnlTotal;
    use crate::domain_types::TradeSide;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0.123_456), 2, "0.12")]
    #[case(Some(2.5), 0, "2")]
    #[case(Some(1234.5678), 1, "1234.6")]
    #[case(None, 2, "-")]
    fn test_format_metric(#[case] value: MetricValue, #[case] precision: u32, #[case] expected: &str) {
        assert_eq!(format_metric(value, precision), expected);
    }

    #[test]
    fn test_performance_table_layout() {
        let report = PerformanceReport {
            portfolio: PortfolioIndicators {
                annualized_return: Some(0.1234),
                beta: Some(1.5),
                ..Default::default()
            },
            ..Default::default()
        };
        let table = performance_table(&report, 2);
        assert_eq!(table.headers.len(), 7);
        assert_eq!(table.rows[0][1], "0.12");
        assert_eq!(table.rows[0][5], "1.50");
        // 基準行的 Beta 欄未定義
        assert_eq!(table.rows[1][5], UNDEFINED_CELL);
    }

    fn attribution() -> AttributionReport {
        AttributionReport {
            instruments: vec![InstrumentPnl {
                rank: 1,
                code: "000001".into(),
                pnl: 120.0,
                sector: None,
                name: None,
                total_buy: 10.0,
                total_sell: 20.0,
            }],
            sectors: vec![SectorPnl {
                sector: None,
                pnl: 120.0,
                share: Some(100.0),
            }],
            total: PnlTotal {
                pnl: 120.0,
                share: Some(100.0),
            },
            capital: vec![SectorSideCapital {
                sector: Some("Banks".into()),
                side: TradeSide::Buy,
                buy_total: 10.0,
                sell_total: 0.0,
                trades: 1,
                capital: 50.0,
                capital_per_action: Some(5.0),
                capital_share: Some(100.0),
            }],
        }
    }

    #[test]
    fn test_sector_table_has_total_row() {
        let table = sector_table(&attribution());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["Total", "120", "100.00"]);
    }

    #[test]
    fn test_capital_table_count_column() {
        let table = capital_table(&attribution(), 2);
        assert_eq!(table.rows[0], vec!["Banks", "Buy", "10.00", "50.00", "5.00", "100.0"]);
        assert_eq!(buy_capital_table(&attribution()).rows.len(), 1);
    }

    #[test]
    fn test_display_empty_table() {
        let table = sector_table(&AttributionReport::default());
        let text = table.to_string();
        assert!(text.contains("板塊損益"));
        assert!(text.contains("(無資料)"));
    }
}
