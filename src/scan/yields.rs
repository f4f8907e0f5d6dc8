use chrono::NaiveDate;

use crate::model::StockRow;

use super::ScanError;

/// Round to two decimal places (the precision of the output contract).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Finalize every row: effective price, minimum investment, and per-expiry
/// simple and annualized ROI. Pure function of its inputs.
///
/// Rows with negative lot size or effective price are data-quality faults:
/// they are returned separately for logging and excluded from the table
/// rather than propagated as garbage.
pub fn finalize(rows: Vec<StockRow>, today: NaiveDate) -> (Vec<StockRow>, Vec<ScanError>) {
    let mut kept = Vec::with_capacity(rows.len());
    let mut faults = Vec::new();

    for mut row in rows {
        row.effective_price = if row.stock_ask > 0.0 {
            row.stock_ask
        } else {
            row.stock_last_price
        };

        if row.lot_size < 0 || row.effective_price < 0.0 {
            faults.push(ScanError::InvalidInstrumentData {
                name: row.name.clone(),
                reason: format!(
                    "lot_size={}, effective_price={}",
                    row.lot_size, row.effective_price
                ),
            });
            continue;
        }

        row.min_investment = row.lot_size as f64 * row.effective_price;

        let effective_price = row.effective_price;
        for (expiry, cell) in row.columns.iter_mut() {
            let option_price = cell.option_price.unwrap_or(0.0);
            cell.roi = if effective_price > 0.0 {
                round2(option_price / effective_price * 100.0)
            } else {
                0.0
            };

            let days_to_expiry = (*expiry - today).num_days();
            // A passed expiry yields 0, never a sign-flipped or infinite value.
            cell.annualized_roi = if days_to_expiry > 0 {
                round2(cell.roi * 365.0 / days_to_expiry as f64)
            } else {
                0.0
            };
        }

        kept.push(row);
    }

    (kept, faults)
}
