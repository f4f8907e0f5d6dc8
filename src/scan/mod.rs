pub mod matching;
pub mod pricing;
pub mod report;
pub mod universe;
pub mod yields;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::model::{ExpiryCell, Instrument, StockRow};
use crate::quotes::{QuoteSource, UpstoxQuotes};
use crate::{catalog, quotes};

use matching::CallIndex;
use universe::{Universe, UniversePolicy};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no eligible underlyings in catalog")]
    EmptyUniverse,

    #[error("quote fetch failed: {0}")]
    QuoteFetch(String),

    #[error("invalid instrument data for `{name}`: {reason}")]
    InvalidInstrumentData { name: String, reason: String },
}

/// Configuration for the `scan` subcommand.
pub struct ScanConfig {
    pub catalog: PathBuf,
    pub token_file: PathBuf,
    pub output: PathBuf,
    pub universe: String,
}

/// Finalized rows plus the expiries that actually produced columns.
#[derive(Debug)]
pub struct ScanOutcome {
    pub rows: Vec<StockRow>,
    pub expiries: Vec<NaiveDate>,
}

/// The core pass: universe → reference prices → per-expiry match/fetch/price
/// → yields. Failures scoped to one expiry are logged and skipped; only an
/// empty universe or a failed underlying batch aborts the run.
pub async fn scan<S: QuoteSource + Sync>(
    source: &S,
    catalog: &[Instrument],
    policy: UniversePolicy,
    today: NaiveDate,
) -> Result<ScanOutcome, ScanError> {
    let Universe { mut rows, expiries } = universe::select(catalog, policy)?;
    println!(
        "Universe: {} stocks, {} expiries",
        rows.len(),
        expiries.len()
    );

    // Round one: underlying quotes, one batch for the whole universe.
    let stock_keys: Vec<String> = rows.iter().map(|r| r.asset_key.clone()).collect();
    println!("Fetching quotes for {} stocks...", stock_keys.len());
    let stock_quotes = source
        .fetch_quotes(&stock_keys)
        .await
        .map_err(|e| ScanError::QuoteFetch(format!("{e:#}")))?;
    if stock_quotes.is_empty() {
        return Err(ScanError::QuoteFetch(
            "no quotes returned for any underlying".to_string(),
        ));
    }
    pricing::resolve_reference_prices(&mut rows, &stock_quotes);

    // Round two: one batch per expiry, each producing an independent column
    // slice merged single-threaded afterwards.
    let index = CallIndex::build(catalog);
    let mut processed: Vec<NaiveDate> = Vec::new();

    for (i, &expiry) in expiries.iter().enumerate() {
        println!("[{}/{}] Expiry {} ...", i + 1, expiries.len(), expiry);

        let selected = matching::match_expiry(&index, expiry, &rows);
        if selected.is_empty() {
            println!("  no qualifying calls, skipping");
            continue;
        }

        let option_keys: Vec<String> = selected.values().cloned().collect();
        match source.fetch_quotes(&option_keys).await {
            Ok(option_quotes) if option_quotes.is_empty() => {
                println!("  WARN  empty quote batch, skipping expiry");
            }
            Ok(option_quotes) => {
                let prices = pricing::resolve_option_prices(&selected, &option_quotes);
                merge_column(&mut rows, expiry, &prices);
                processed.push(expiry);
                println!(
                    "  OK  {} calls selected, {} with a live bid",
                    selected.len(),
                    prices.len()
                );
            }
            Err(e) => {
                println!("  WARN  quote fetch failed: {e:#}. Skipping expiry.");
            }
        }
    }

    let (rows, faults) = yields::finalize(rows, today);
    for fault in &faults {
        eprintln!("WARN  excluding row: {fault}");
    }

    Ok(ScanOutcome {
        rows,
        expiries: processed,
    })
}

/// Join one expiry's price slice into the row set. Every row gets a cell, so
/// a processed expiry always has a full column; stocks without a priced
/// option carry the "no data" sentinel.
fn merge_column(rows: &mut [StockRow], expiry: NaiveDate, prices: &HashMap<String, f64>) {
    for row in rows.iter_mut() {
        row.columns.insert(
            expiry,
            ExpiryCell {
                option_price: prices.get(&row.asset_key).copied(),
                roi: 0.0,
                annualized_roi: 0.0,
            },
        );
    }
}

/// CLI entry point for the `scan` subcommand.
pub fn run(config: &ScanConfig) -> anyhow::Result<()> {
    let policy = UniversePolicy::parse(&config.universe)?;
    let catalog = catalog::load(&config.catalog)?;
    println!("Loaded {} instruments from {}", catalog.len(), config.catalog.display());
    let token = quotes::load_token(&config.token_file)?;

    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    let outcome = rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("covercall/0.1")
            .build()
            .context("creating HTTP client")?;
        let source = UpstoxQuotes::new(client, token);

        let today = Local::now().date_naive();
        scan(&source, &catalog, policy, today)
            .await
            .map_err(anyhow::Error::from)
    })?;

    let last_fetched = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let snapshot = report::assemble(&outcome.rows, &outcome.expiries, &last_fetched);
    report::write_snapshot(&config.output, &snapshot)?;

    println!(
        "\nSnapshot written to {} ({} rows, {} expiry columns, last fetched {})",
        config.output.display(),
        outcome.rows.len(),
        outcome.expiries.len(),
        last_fetched
    );
    Ok(())
}
