#![allow(dead_code)]

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use covercall::model::{DepthLevel, Instrument, InstrumentType, Quote};
use covercall::quotes::QuoteSource;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Millisecond epoch for midnight UTC of the given date, the form expiries
/// take in the instrument master.
pub fn expiry_ms(s: &str) -> i64 {
    date(s).and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
}

pub fn future(name: &str, asset_key: &str, lot_size: i64, expiry: &str) -> Instrument {
    Instrument {
        instrument_key: format!("{asset_key}|FUT|{expiry}"),
        asset_key: asset_key.to_string(),
        name: name.to_string(),
        segment: "NSE_FO".to_string(),
        instrument_type: InstrumentType::Future,
        asset_type: "EQUITY".to_string(),
        lot_size,
        expiry: Some(expiry_ms(expiry)),
        strike_price: 0.0,
    }
}

pub fn call(
    name: &str,
    asset_key: &str,
    lot_size: i64,
    expiry: &str,
    strike: f64,
    instrument_key: &str,
) -> Instrument {
    Instrument {
        instrument_key: instrument_key.to_string(),
        asset_key: asset_key.to_string(),
        name: name.to_string(),
        segment: "NSE_FO".to_string(),
        instrument_type: InstrumentType::Call,
        asset_type: "EQUITY".to_string(),
        lot_size,
        expiry: Some(expiry_ms(expiry)),
        strike_price: strike,
    }
}

pub fn put(name: &str, asset_key: &str, expiry: &str, strike: f64) -> Instrument {
    Instrument {
        instrument_type: InstrumentType::Put,
        strike_price: strike,
        ..call(name, asset_key, 1, expiry, strike, "unpriced-put")
    }
}

pub fn quote(token: &str, last: f64, bid: Option<f64>, ask: Option<f64>) -> Quote {
    Quote {
        instrument_token: token.to_string(),
        last_price: last,
        best_bid: bid.map(|price| DepthLevel { price, quantity: 100 }),
        best_ask: ask.map(|price| DepthLevel { price, quantity: 100 }),
    }
}

/// Mock quote source: serves canned quotes, optionally failing any batch
/// that contains a marked key (to simulate per-expiry transport failures).
pub struct MockQuotes {
    quotes: HashMap<String, Quote>,
    fail_on: Vec<String>,
}

impl MockQuotes {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            quotes: quotes
                .into_iter()
                .map(|q| (q.instrument_token.clone(), q))
                .collect(),
            fail_on: Vec::new(),
        }
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.fail_on.push(key.to_string());
        self
    }
}

#[async_trait]
impl QuoteSource for MockQuotes {
    async fn fetch_quotes(&self, keys: &[String]) -> Result<HashMap<String, Quote>> {
        if keys.iter().any(|k| self.fail_on.contains(k)) {
            anyhow::bail!("simulated transport failure");
        }
        Ok(keys
            .iter()
            .filter_map(|k| self.quotes.get(k))
            .map(|q| (q.instrument_token.clone(), q.clone()))
            .collect())
    }
}
