//! The loaded, read-only snapshot every query runs against.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::fetch::{HttpClient, fetch_source};
use crate::ingest::{LongRecord, ingest_source};
use crate::tiers::TierConfig;

/// Tier configuration plus every long record from the sources that loaded.
///
/// Built once by [`Dataset::load`]; a reload builds a new one from scratch.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub tiers: TierConfig,
    pub records: Vec<LongRecord>,
}

/// A source that could not be fetched or parsed.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedSource {
    pub source: String,
    pub reason: String,
}

/// Outcome of the startup load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub skipped: Vec<SkippedSource>,
    pub records: usize,
}

impl Dataset {
    pub fn new(tiers: TierConfig, records: Vec<LongRecord>) -> Self {
        Self { tiers, records }
    }

    /// Loads the tier document, then each score source in order.
    ///
    /// # Errors
    ///
    /// Fails only when the tier document cannot be fetched or parsed. A score
    /// source that fails is logged, listed in the report, and skipped.
    #[tracing::instrument(skip_all, fields(tiers = %tiers_source, sources = sources.len()))]
    pub async fn load<C: HttpClient>(
        client: &C,
        tiers_source: &str,
        sources: &[String],
    ) -> Result<(Self, LoadReport)> {
        let tiers_bytes = fetch_source(client, tiers_source)
            .await
            .with_context(|| format!("could not load tier configuration '{tiers_source}'"))?;
        let tiers = TierConfig::from_json(&tiers_bytes)
            .with_context(|| format!("could not parse tier configuration '{tiers_source}'"))?;
        info!(keys = tiers.len(), "Tier configuration loaded");

        let mut records = Vec::new();
        let mut report = LoadReport::default();

        for source in sources {
            match load_source(client, source).await {
                Ok(batch) => {
                    info!(source = %source, records = batch.len(), "Source processed");
                    records.extend(batch);
                    report.loaded.push(source.clone());
                }
                Err(e) => {
                    warn!(source = %source, error = %format!("{e:#}"), "Source skipped");
                    report.skipped.push(SkippedSource {
                        source: source.clone(),
                        reason: format!("{e:#}"),
                    });
                }
            }
        }

        report.records = records.len();
        info!(
            records = report.records,
            loaded = report.loaded.len(),
            skipped = report.skipped.len(),
            "Load finished"
        );

        Ok((Self::new(tiers, records), report))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<LongRecord>> {
    let bytes = fetch_source(client, source).await?;
    ingest_source(&bytes).with_context(|| format!("could not parse '{source}'"))
}
