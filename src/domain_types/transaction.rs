use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 成交方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,  // 買入
    Sell, // 賣出
    Hold, // 持有，不計入歸因
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "Buy",
            TradeSide::Sell => "Sell",
            TradeSide::Hold => "Hold",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            "hold" => Ok(TradeSide::Hold),
            other => Err(format!("未知的成交方向: {}", other)),
        }
    }
}

/// 單筆交易紀錄
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub code: String,
    pub side: TradeSide,
    /// 買入數額
    pub buy: f64,
    /// 賣出數額
    pub sell: f64,
    /// 已實現損益
    pub pnl: f64,
    /// 持倉市值
    pub position_value: f64,
}

impl Transaction {
    pub fn new(date: NaiveDate, code: impl Into<String>, side: TradeSide) -> Self {
        Self {
            date,
            code: code.into(),
            side,
            buy: 0.0,
            sell: 0.0,
            pnl: 0.0,
            position_value: 0.0,
        }
    }

    pub fn with_amounts(mut self, buy: f64, sell: f64) -> Self {
        self.buy = buy;
        self.sell = sell;
        self
    }

    pub fn with_pnl(mut self, pnl: f64) -> Self {
        self.pnl = pnl;
        self
    }

    pub fn with_position_value(mut self, position_value: f64) -> Self {
        self.position_value = position_value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_side_parse() {
        assert_eq!("Buy".parse::<TradeSide>(), Ok(TradeSide::Buy));
        assert_eq!(" sell ".parse::<TradeSide>(), Ok(TradeSide::Sell));
        assert_eq!("HOLD".parse::<TradeSide>(), Ok(TradeSide::Hold));
        assert!("Short".parse::<TradeSide>().is_err());
    }

    #[test]
    fn test_transaction_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let tx = Transaction::new(date, "600519", TradeSide::Sell)
            .with_amounts(0.0, 200.0)
            .with_pnl(35.5)
            .with_position_value(1_800.0);

        assert_eq!(tx.code, "600519");
        assert_eq!(tx.side, TradeSide::Sell);
        assert_eq!(tx.sell, 200.0);
        assert_eq!(tx.pnl, 35.5);
        assert_eq!(tx.position_value, 1_800.0);
    }
}
