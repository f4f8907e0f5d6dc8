use std::collections::HashMap;

use crate::model::{Quote, StockRow};

/// Annotate each stock with its live last-trade and best-ask prices.
/// A stock whose quote is missing or carries no ask keeps both at 0, which
/// excludes it from OTM matching but keeps its row in the final table.
pub fn resolve_reference_prices(rows: &mut [StockRow], quotes: &HashMap<String, Quote>) {
    for row in rows.iter_mut() {
        if let Some(q) = quotes.get(&row.asset_key) {
            row.stock_last_price = q.last_price;
            row.stock_ask = q.best_ask_price().unwrap_or(0.0);
        }
    }
}

/// Sell-side strict option pricing: the best bid or nothing. Never falls back
/// to the last trade — an absent bid means no buyer exists at any price, and
/// the figure being measured is what the call sells for right now.
pub fn resolve_option_prices(
    selected: &HashMap<String, String>,
    quotes: &HashMap<String, Quote>,
) -> HashMap<String, f64> {
    let mut prices = HashMap::new();
    for (asset_key, instrument_key) in selected {
        if let Some(q) = quotes.get(instrument_key) {
            if let Some(bid) = q.best_bid_price() {
                prices.insert(asset_key.clone(), bid);
            }
        }
    }
    prices
}
