// utils/numeric.rs - 數值輔助函數

/// 把非有限值（NaN、±inf）轉為未定義
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// 四捨六入五成雙，取到指定小數位
///
/// 與上游報表使用的銀行家捨入一致：`round_to(2.5, 0) == 2.0`。
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite() {
        assert_eq!(finite(1.5), Some(1.5));
        assert_eq!(finite(f64::NAN), None);
        assert_eq!(finite(f64::INFINITY), None);
        assert_eq!(finite(f64::NEG_INFINITY), None);
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(1234.4, 0), 1234.0);
    }

    #[test]
    fn test_round_decimals() {
        assert!((round_to(33.333_333, 2) - 33.33).abs() < 1e-12);
        assert!((round_to(12.345_678, 1) - 12.3).abs() < 1e-12);
    }
}
