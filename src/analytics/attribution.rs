//! 交易歸因
//!
//! 把成交紀錄篩選成有效交易，按個股彙總已實現損益，再按板塊與買賣方向
//! 彙總損益與資金佔用。
//!
//! 處理步驟：
//! 1. 去除 Hold 與區間外的紀錄
//! 2. 邊界修剪：最早日期的賣出、最晚日期的買入不計入
//! 3. 按代碼彙總損益、買入額、賣出額，按損益排名
//! 4. 連接個股資料，損益取整後按板塊彙總並加入合計行
//! 5. 按 (板塊, 方向) 彙總資金

use super::MetricValue;
use crate::context::AnalysisContext;
use crate::domain_types::{DateRange, InstrumentTable, TradeSide, Transaction};
use crate::utils::{finite, round_to};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// 未匹配到個股資料的板塊顯示名稱
pub const UNKNOWN_SECTOR: &str = "未分類";

/// 合計行顯示名稱
pub const TOTAL_LABEL: &str = "Total";

/// 個股損益
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentPnl {
    /// 按損益由高到低的名次，從 1 開始
    pub rank: usize,
    pub code: String,
    /// 已實現損益，取整到元
    pub pnl: f64,
    pub sector: Option<String>,
    pub name: Option<String>,
    pub total_buy: f64,
    pub total_sell: f64,
}

/// 板塊損益
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorPnl {
    /// `None` 為未匹配個股資料的板塊
    pub sector: Option<String>,
    pub pnl: f64,
    /// 佔合計的百分比，保留兩位小數
    pub share: MetricValue,
}

impl SectorPnl {
    pub fn label(&self) -> &str {
        self.sector.as_deref().unwrap_or(UNKNOWN_SECTOR)
    }
}

/// 合計行
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PnlTotal {
    pub pnl: f64,
    pub share: MetricValue,
}

/// 板塊 × 方向資金彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSideCapital {
    pub sector: Option<String>,
    pub side: TradeSide,
    pub buy_total: f64,
    pub sell_total: f64,
    /// 實際紀錄筆數
    pub trades: usize,
    /// 持倉市值總和
    pub capital: f64,
    pub capital_per_action: MetricValue,
    /// 佔全部資金的百分比，保留一位小數
    pub capital_share: MetricValue,
}

impl SectorSideCapital {
    pub fn label(&self) -> &str {
        self.sector.as_deref().unwrap_or(UNKNOWN_SECTOR)
    }

    /// 報表中的 Count 欄：買入額加賣出額
    ///
    /// 沿用既有報表的欄位定義，數值並非交易次數；筆數見 `trades`。
    pub fn count(&self) -> f64 {
        self.buy_total + self.sell_total
    }
}

/// 歸因結果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributionReport {
    pub instruments: Vec<InstrumentPnl>,
    /// 按板塊名稱排列，未分類在最後
    pub sectors: Vec<SectorPnl>,
    pub total: PnlTotal,
    pub capital: Vec<SectorSideCapital>,
}

impl AttributionReport {
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// 按損益由高到低排列的板塊
    pub fn sectors_by_pnl(&self) -> Vec<&SectorPnl> {
        let mut sectors: Vec<&SectorPnl> = self.sectors.iter().collect();
        sectors.sort_by(|a, b| b.pnl.total_cmp(&a.pnl));
        sectors
    }

    /// 買入方向各板塊的資金佔比
    pub fn buy_capital_shares(&self) -> Vec<&SectorSideCapital> {
        self.capital
            .iter()
            .filter(|row| row.side == TradeSide::Buy)
            .collect()
    }
}

/// 篩選有效交易
///
/// 去除 Hold 與區間外紀錄後，先刪除最早日期的賣出，再在剩餘紀錄中
/// 刪除最晚日期的買入。
pub fn effective_transactions<'a>(transactions: &'a [Transaction], range: DateRange) -> Vec<&'a Transaction> {
    let mut rows: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.side != TradeSide::Hold && range.contains(tx.date))
        .collect();

    let before = rows.len();

    if let Some(first) = rows.iter().map(|tx| tx.date).min() {
        rows.retain(|tx| !(tx.date == first && tx.side == TradeSide::Sell));
    }
    if let Some(last) = rows.iter().map(|tx| tx.date).max() {
        rows.retain(|tx| !(tx.date == last && tx.side == TradeSide::Buy));
    }

    debug!(
        filtered = before,
        trimmed = before - rows.len(),
        range = %range,
        "有效交易篩選完成"
    );

    rows
}

#[derive(Default)]
struct CodeTotals {
    pnl: f64,
    buy: f64,
    sell: f64,
}

/// 按代碼彙總並排名
fn instrument_rows(transactions: &[&Transaction], instruments: &InstrumentTable) -> Vec<InstrumentPnl> {
    let mut totals: BTreeMap<&str, CodeTotals> = BTreeMap::new();
    for tx in transactions {
        let entry = totals.entry(tx.code.as_str()).or_default();
        entry.pnl += tx.pnl;
        entry.buy += tx.buy;
        entry.sell += tx.sell;
    }

    let mut ranked: Vec<(&str, CodeTotals)> = totals.into_iter().collect();
    ranked.sort_by(|(code_a, a), (code_b, b)| match b.pnl.total_cmp(&a.pnl) {
        Ordering::Equal => code_a.cmp(code_b),
        other => other,
    });

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (code, t))| {
            let meta = instruments.get(code);
            InstrumentPnl {
                rank: i + 1,
                code: code.to_string(),
                pnl: round_to(t.pnl, 0),
                sector: meta.map(|m| m.sector.clone()),
                name: meta.map(|m| m.name.clone()),
                total_buy: t.buy,
                total_sell: t.sell,
            }
        })
        .collect()
}

fn share_of(value: f64, total: f64, decimals: u32) -> MetricValue {
    if total == 0.0 {
        return None;
    }
    finite(value / total * 100.0).map(|v| round_to(v, decimals))
}

/// 已知板塊按名稱排列，未分類排最後
fn sector_order(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 按板塊彙總取整後的損益
fn sector_rows(instruments: &[InstrumentPnl]) -> (Vec<SectorPnl>, PnlTotal) {
    let mut totals: BTreeMap<Option<String>, f64> = BTreeMap::new();
    for row in instruments {
        *totals.entry(row.sector.clone()).or_insert(0.0) += row.pnl;
    }

    let total_pnl: f64 = totals.values().sum();

    let mut sectors: Vec<SectorPnl> = totals
        .into_iter()
        .map(|(sector, pnl)| SectorPnl {
            sector,
            pnl,
            share: share_of(pnl, total_pnl, 2),
        })
        .collect();
    sectors.sort_by(|a, b| sector_order(&a.sector, &b.sector));

    let total = PnlTotal {
        pnl: total_pnl,
        share: share_of(total_pnl, total_pnl, 2),
    };

    (sectors, total)
}

#[derive(Default)]
struct SideTotals {
    buy: f64,
    sell: f64,
    capital: f64,
    trades: usize,
}

/// 按 (板塊, 方向) 彙總資金
fn capital_rows(transactions: &[&Transaction], instruments: &InstrumentTable) -> Vec<SectorSideCapital> {
    let mut totals: BTreeMap<(Option<String>, TradeSide), SideTotals> = BTreeMap::new();
    for tx in transactions {
        let sector = instruments.sector_of(&tx.code).map(str::to_string);
        let entry = totals.entry((sector, tx.side)).or_default();
        entry.buy += tx.buy;
        entry.sell += tx.sell;
        entry.capital += tx.position_value;
        entry.trades += 1;
    }

    let all_capital: f64 = totals.values().map(|t| t.capital).sum();

    let mut rows: Vec<SectorSideCapital> = totals
        .into_iter()
        .map(|((sector, side), t)| {
            let count = t.buy + t.sell;
            SectorSideCapital {
                sector,
                side,
                buy_total: t.buy,
                sell_total: t.sell,
                trades: t.trades,
                capital: t.capital,
                capital_per_action: if count == 0.0 { None } else { finite(t.capital / count) },
                capital_share: share_of(t.capital, all_capital, 1),
            }
        })
        .collect();
    rows.sort_by(|a, b| sector_order(&a.sector, &b.sector).then(a.side.cmp(&b.side)));

    rows
}

/// 計算區間內的交易歸因
pub fn attribute(transactions: &[Transaction], instruments: &InstrumentTable, range: DateRange) -> AttributionReport {
    let effective = effective_transactions(transactions, range);
    if effective.is_empty() {
        debug!(range = %range, "區間內沒有有效交易");
        return AttributionReport::default();
    }

    let instrument_pnl = instrument_rows(&effective, instruments);
    let unmatched = instrument_pnl.iter().filter(|r| r.sector.is_none()).count();
    if unmatched > 0 {
        debug!(unmatched, "部分代碼沒有個股資料，歸入未分類板塊");
    }

    let (sectors, total) = sector_rows(&instrument_pnl);
    let capital = capital_rows(&effective, instruments);

    debug!(
        transactions = effective.len(),
        instruments = instrument_pnl.len(),
        sectors = sectors.len(),
        total_pnl = total.pnl,
        "交易歸因完成"
    );

    AttributionReport {
        instruments: instrument_pnl,
        sectors,
        total,
        capital,
    }
}

/// 以分析上下文計算交易歸因
pub fn attribute_context(ctx: &AnalysisContext, range: DateRange) -> AttributionReport {
    attribute(ctx.transactions(), ctx.instruments(), range)
}
