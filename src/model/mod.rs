pub mod instrument;
pub mod quote;
pub mod row;

pub use instrument::{DERIVATIVES_SEGMENT, EQUITY_ASSET, Instrument, InstrumentType};
pub use quote::{DepthLevel, Quote};
pub use row::{ExpiryCell, StockRow};
