use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::{Instrument, InstrumentType, StockRow};

/// In-scope calls indexed by `(expiry, asset_key)`, built once per run so the
/// per-stock lookup is O(bucket) instead of a full catalog scan.
pub struct CallIndex<'a> {
    buckets: HashMap<(NaiveDate, &'a str), Vec<&'a Instrument>>,
}

impl<'a> CallIndex<'a> {
    pub fn build(catalog: &'a [Instrument]) -> Self {
        let mut buckets: HashMap<(NaiveDate, &str), Vec<&Instrument>> = HashMap::new();
        for inst in catalog {
            if !inst.in_scope() || inst.instrument_type != InstrumentType::Call {
                continue;
            }
            let Some(expiry) = inst.expiry_date() else {
                continue;
            };
            buckets
                .entry((expiry, inst.asset_key.as_str()))
                .or_default()
                .push(inst);
        }
        Self { buckets }
    }

    /// Nearest-OTM call: the minimum strike strictly above the reference
    /// price. Ties keep the first instrument in catalog order, so selection
    /// is deterministic within a run.
    pub fn nearest_otm(
        &self,
        expiry: NaiveDate,
        asset_key: &str,
        reference_price: f64,
    ) -> Option<&'a Instrument> {
        let bucket = self.buckets.get(&(expiry, asset_key))?;
        let mut best: Option<&Instrument> = None;
        for inst in bucket {
            if inst.strike_price <= reference_price {
                continue;
            }
            match best {
                Some(b) if b.strike_price <= inst.strike_price => {}
                _ => best = Some(inst),
            }
        }
        best
    }
}

/// Select the nearest-OTM call per stock for one expiry. Stocks with no
/// reference price, or whose price exceeds every listed strike, contribute
/// no entry — expected, not an error.
pub fn match_expiry(
    index: &CallIndex,
    expiry: NaiveDate,
    rows: &[StockRow],
) -> HashMap<String, String> {
    let mut selected = HashMap::new();
    for row in rows {
        let reference_price = row.reference_price();
        if reference_price <= 0.0 {
            continue;
        }
        if let Some(inst) = index.nearest_otm(expiry, &row.asset_key, reference_price) {
            selected.insert(row.asset_key.clone(), inst.instrument_key.clone());
        }
    }
    selected
}
