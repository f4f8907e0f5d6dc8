use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::Instrument;

/// Per-expiry results for one stock. `option_price` is the best bid of the
/// selected nearest-OTM call; `None` means no call was selected or no buyer
/// existed (serialized as 0).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpiryCell {
    pub option_price: Option<f64>,
    pub roi: f64,
    pub annualized_roi: f64,
}

/// Working record for one underlying, created at universe selection, enriched
/// across the two quote rounds, finalized by the yield calculator.
#[derive(Debug, Clone)]
pub struct StockRow {
    pub name: String,
    pub lot_size: i64,
    pub asset_key: String,

    pub stock_last_price: f64,
    pub stock_ask: f64,

    pub effective_price: f64,
    pub min_investment: f64,

    /// One entry per processed expiry; skipped expiries have no entry.
    pub columns: BTreeMap<NaiveDate, ExpiryCell>,
}

impl StockRow {
    pub fn from_instrument(inst: &Instrument) -> Self {
        Self {
            name: inst.name.clone(),
            lot_size: inst.lot_size,
            asset_key: inst.asset_key.clone(),
            stock_last_price: 0.0,
            stock_ask: 0.0,
            effective_price: 0.0,
            min_investment: 0.0,
            columns: BTreeMap::new(),
        }
    }

    /// Buy-side reference price: best ask if a seller exists, else the last
    /// trade. Zero means the stock is un-actionable this run.
    pub fn reference_price(&self) -> f64 {
        if self.stock_ask > 0.0 {
            self.stock_ask
        } else {
            self.stock_last_price
        }
    }
}
