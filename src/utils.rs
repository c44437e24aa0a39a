// utils.rs - 公共工具模組
//
// 提供日期解析與數值取整等通用工具函數。

pub mod numeric;
pub mod time_utils;

// 重新導出常用工具函數，使其可以通過 utils::function_name 直接訪問
pub use numeric::{finite, round_to};
pub use time_utils::{parse_date, parse_optional_date};
