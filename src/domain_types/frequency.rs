//! 頻率定義模組 - 從 config/frequencies.toml 編譯時生成
//!
//! 勝率統計把日收益率按日曆區間分桶，這裡定義所有分桶頻率。
//! 枚舉本身由 build.rs 生成，分桶規則在下方手寫實現。

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// 包含由 build.rs 生成的頻率宏定義
include!(concat!(env!("OUT_DIR"), "/frequencies_generated.rs"));

/// 生成頻率枚舉的內部宏
macro_rules! generate_frequency_enum {
    ($(($variant:ident, $tag:literal, $display:literal, $label:literal)),*) => {
        /// 重採樣頻率
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Frequency {
            $(
                $variant,
            )*
        }

        impl Frequency {
            /// 頻率代碼（D / W / M / Y）
            pub fn tag(&self) -> &'static str {
                match self {
                    $(
                        Frequency::$variant => $tag,
                    )*
                }
            }

            /// 獲取顯示名稱
            pub fn display_name(&self) -> &'static str {
                match self {
                    $(
                        Frequency::$variant => $display,
                    )*
                }
            }

            /// 中文簡稱
            pub fn label(&self) -> &'static str {
                match self {
                    $(
                        Frequency::$variant => $label,
                    )*
                }
            }

            /// 獲取所有頻率列表，順序與配置檔一致
            pub fn all() -> Vec<Frequency> {
                vec![
                    $(
                        Frequency::$variant,
                    )*
                ]
            }

            /// 由頻率代碼或顯示名稱解析
            pub fn from_tag(tag: &str) -> Option<Frequency> {
                $(
                    if tag.eq_ignore_ascii_case($tag) || tag.eq_ignore_ascii_case($display) {
                        return Some(Frequency::$variant);
                    }
                )*
                None
            }
        }
    };
}

frequencies!(generate_frequency_enum);

impl Frequency {
    /// 計算日期所屬區間的起始日
    ///
    /// 週以 ISO 週（週一至週日）為界，月與年以日曆邊界為界。
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => date,
            Frequency::Weekly => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Frequency::Monthly => date.with_day(1).unwrap_or(date),
            Frequency::Yearly => date.with_ordinal(1).unwrap_or(date),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
