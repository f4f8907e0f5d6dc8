use chrono::NaiveDate;
use serde::Deserialize;

/// The derivatives segment in scope (NSE futures & options).
pub const DERIVATIVES_SEGMENT: &str = "NSE_FO";

/// The underlying asset class in scope.
pub const EQUITY_ASSET: &str = "EQUITY";

/// Instrument kind, deserialized from the exchange short codes.
/// Anything outside futures/calls/puts/equity is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum InstrumentType {
    Future,
    Call,
    Put,
    Equity,
    #[default]
    Other,
}

impl From<String> for InstrumentType {
    fn from(code: String) -> Self {
        match code.as_str() {
            "FUT" => InstrumentType::Future,
            "CE" => InstrumentType::Call,
            "PE" => InstrumentType::Put,
            "EQ" => InstrumentType::Equity,
            _ => InstrumentType::Other,
        }
    }
}

/// One row of the exchange's instrument master. The catalog is heterogeneous
/// (equities, indices, currency derivatives, ...), so every field defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Instrument {
    #[serde(default)]
    pub instrument_key: String,

    /// Key of the underlying equity; equals `instrument_key` for the
    /// underlying itself.
    #[serde(default)]
    pub asset_key: String,

    /// Underlying company name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub segment: String,

    #[serde(default)]
    pub instrument_type: InstrumentType,

    #[serde(default)]
    pub asset_type: String,

    /// Contract multiplier (shares per lot).
    #[serde(default)]
    pub lot_size: i64,

    /// Expiry as millisecond epoch; absent for non-derivatives.
    #[serde(default)]
    pub expiry: Option<i64>,

    /// Meaningful for options only.
    #[serde(default)]
    pub strike_price: f64,
}

impl Instrument {
    /// True for rows in the derivatives segment with an equity underlying.
    pub fn in_scope(&self) -> bool {
        self.segment == DERIVATIVES_SEGMENT && self.asset_type == EQUITY_ASSET
    }

    /// Expiry as a calendar date (UTC), if the row carries one.
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        let ms = self.expiry?;
        chrono::DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
    }
}
