pub mod data_point;
pub mod date_range;
pub mod frequency;
pub mod instrument;
pub mod transaction;
pub mod types;

pub use data_point::{pct_change, PricePoint, ValueSeries};
pub use date_range::DateRange;
pub use frequency::Frequency;
pub use instrument::{InstrumentMeta, InstrumentTable};
pub use transaction::{TradeSide, Transaction};
pub use types::ColumnName;
