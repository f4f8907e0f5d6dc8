use std::cmp::Ordering;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value, json};

use crate::model::StockRow;

/// Assemble the snapshot document: rows sorted by minimum investment
/// ascending (stable, so ties keep universe order), one price column per
/// processed expiry in chronological order, then the ROI and annualized-ROI
/// columns. Internal "no price" sentinels collapse to 0 here and only here.
pub fn assemble(rows: &[StockRow], expiries: &[NaiveDate], last_fetched: &str) -> Value {
    let mut sorted: Vec<&StockRow> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        a.min_investment
            .partial_cmp(&b.min_investment)
            .unwrap_or(Ordering::Equal)
    });

    let data: Vec<Value> = sorted
        .into_iter()
        .map(|row| row_object(row, expiries))
        .collect();

    json!({
        "last_fetched": last_fetched,
        "data": data,
    })
}

fn row_object(row: &StockRow, expiries: &[NaiveDate]) -> Value {
    let mut obj = Map::new();
    obj.insert("name".into(), json!(row.name));
    obj.insert("lot_size".into(), json!(row.lot_size));
    obj.insert("min_investment".into(), json!(row.min_investment));
    obj.insert("stock_ltp".into(), json!(row.stock_last_price));
    obj.insert("stock_ask".into(), json!(row.stock_ask));

    for expiry in expiries {
        let cell = row.columns.get(expiry).cloned().unwrap_or_default();
        let date = expiry.format("%Y-%m-%d").to_string();
        obj.insert(date, json!(cell.option_price.unwrap_or(0.0)));
    }
    for expiry in expiries {
        let cell = row.columns.get(expiry).cloned().unwrap_or_default();
        let date = expiry.format("%Y-%m-%d").to_string();
        obj.insert(format!("ROI_{date}"), json!(cell.roi));
    }
    for expiry in expiries {
        let cell = row.columns.get(expiry).cloned().unwrap_or_default();
        let date = expiry.format("%Y-%m-%d").to_string();
        obj.insert(format!("ANN_ROI_{date}"), json!(cell.annualized_roi));
    }

    Value::Object(obj)
}

/// Write the snapshot to disk, pretty-printed for the presentation layer.
pub fn write_snapshot(path: &Path, snapshot: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(snapshot).context("serializing snapshot")?;
    std::fs::write(path, text).with_context(|| format!("writing snapshot {}", path.display()))?;
    Ok(())
}
