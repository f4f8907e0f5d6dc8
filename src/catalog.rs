use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

use crate::model::Instrument;
use crate::quotes::retry;

/// The exchange's complete instrument master, served as a gzipped JSON body.
const INSTRUMENTS_URL: &str =
    "https://assets.upstox.com/market-quote/instruments/exchange/complete.json.gz";

/// Load the instrument catalog from a local JSON file.
pub fn load(path: &Path) -> Result<Vec<Instrument>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog: Vec<Instrument> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    Ok(catalog)
}

/// CLI entry point for the `fetch-instruments` subcommand: download the
/// instrument master, decompress, and persist it for later scans.
pub fn run_fetch(output: &Path) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .user_agent("covercall/0.1")
            .build()
            .context("creating HTTP client")?;

        println!("Downloading instrument master from {INSTRUMENTS_URL} ...");
        let bytes = retry(3, || {
            let client = client.clone();
            async move {
                let b = client
                    .get(INSTRUMENTS_URL)
                    .send()
                    .await?
                    .error_for_status()?
                    .bytes()
                    .await?;
                Ok(b)
            }
        })
        .await
        .context("downloading instrument master")?;

        // The payload is a .json.gz asset, not transport-encoded gzip.
        let mut text = String::new();
        GzDecoder::new(&bytes[..])
            .read_to_string(&mut text)
            .context("decompressing instrument master")?;

        let catalog: Vec<Instrument> =
            serde_json::from_str(&text).context("parsing instrument master")?;

        if let Some(dir) = output.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating output directory {}", dir.display()))?;
            }
        }
        std::fs::write(output, &text)
            .with_context(|| format!("writing catalog {}", output.display()))?;

        println!("Saved {} instruments to {}", catalog.len(), output.display());
        Ok(())
    })
}
