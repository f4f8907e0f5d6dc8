use std::collections::HashSet;

use anyhow::bail;
use chrono::NaiveDate;

use crate::model::{Instrument, InstrumentType, StockRow};

use super::ScanError;

/// Which instrument kind drives underlying selection.
///
/// `Futures` builds the universe from FUT rows (the authoritative variant of
/// the upstream scanner); `Calls` derives it from CE rows' underlying keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniversePolicy {
    Futures,
    Calls,
}

impl UniversePolicy {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "futures" => Ok(UniversePolicy::Futures),
            "calls" => Ok(UniversePolicy::Calls),
            other => bail!("Invalid universe policy '{other}'. Use 'futures' or 'calls'."),
        }
    }

    fn representative_type(self) -> InstrumentType {
        match self {
            UniversePolicy::Futures => InstrumentType::Future,
            UniversePolicy::Calls => InstrumentType::Call,
        }
    }
}

/// The eligible underlyings plus every expiry their calls trade on.
pub struct Universe {
    /// One row per unique `name`, in catalog order.
    pub rows: Vec<StockRow>,
    /// Distinct expiry dates of in-scope call instruments, chronological.
    pub expiries: Vec<NaiveDate>,
}

/// Filter the catalog down to eligible underlyings and enumerate expiries.
/// De-duplicates by `name`, keeping the first occurrence.
pub fn select(catalog: &[Instrument], policy: UniversePolicy) -> Result<Universe, ScanError> {
    let rep_type = policy.representative_type();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut rows = Vec::new();
    for inst in catalog {
        if !inst.in_scope() || inst.instrument_type != rep_type {
            continue;
        }
        if !seen.insert(inst.name.as_str()) {
            continue;
        }
        rows.push(StockRow::from_instrument(inst));
    }

    if rows.is_empty() {
        return Err(ScanError::EmptyUniverse);
    }

    let mut expiries: Vec<NaiveDate> = catalog
        .iter()
        .filter(|i| i.in_scope() && i.instrument_type == InstrumentType::Call)
        .filter_map(|i| i.expiry_date())
        .collect();
    expiries.sort();
    expiries.dedup();

    Ok(Universe { rows, expiries })
}
