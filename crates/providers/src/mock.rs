//! In-memory mock providers for tests.
//!
//! Controllable implementations of the provider traits: canned responses,
//! failure injection, optional delays, and request counting. No network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use patrimonio_types::{Address, AnalysisReport, AnalysisRequest, MonthlyRecord};

use crate::analysis::DocumentAnalyzer;
use crate::error::{ProviderError, Result};
use crate::reference::{AddressSource, CompanyInfo, CompanySource, IndexSource};

/// Mock analyzer with a canned report, failure mode, and optional delay.
pub struct MockAnalyzer {
    report: Mutex<AnalysisReport>,
    fail: AtomicBool,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl MockAnalyzer {
    /// An analyzer that returns the given report.
    #[must_use]
    pub fn returning(report: AnalysisReport) -> Self {
        Self {
            report: Mutex::new(report),
            fail: AtomicBool::new(false),
            delay: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// An analyzer that fails every call.
    #[must_use]
    pub fn failing() -> Self {
        let mock = Self::returning(AnalysisReport::fallback());
        mock.fail.store(true, Ordering::SeqCst);
        mock
    }

    /// Delays every call by `delay` before responding.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentAnalyzer for MockAnalyzer {
    async fn analyze(&self, _request: &AnalysisRequest) -> Result<AnalysisReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable { message: "mock analyzer failure".into() });
        }

        Ok(self.report.lock().clone())
    }
}

/// Mock address source with per-code entries and transient failure injection.
pub struct MockAddressSource {
    entries: Mutex<HashMap<String, Address>>,
    fail_remaining: AtomicUsize,
    calls: AtomicUsize,
}

impl MockAddressSource {
    /// An empty source; unknown codes fail with a non-retryable error.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fail_remaining: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Registers an address for a postal code.
    pub fn insert(&self, postal_code: &str, address: Address) {
        self.entries.lock().insert(postal_code.to_string(), address);
    }

    /// Makes the next `count` calls fail with a retryable error.
    pub fn fail_next(&self, count: usize) {
        self.fail_remaining.store(count, Ordering::SeqCst);
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> bool {
        self.fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MockAddressSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AddressSource for MockAddressSource {
    async fn lookup(&self, postal_code: &str) -> Result<Address> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.take_failure() {
            return Err(ProviderError::Unavailable { message: "mock outage".into() });
        }

        self.entries.lock().get(postal_code).cloned().ok_or_else(|| {
            ProviderError::MalformedResponse { message: format!("unknown code {postal_code}") }
        })
    }
}

/// Mock company source with per-id entries and transient failure injection.
pub struct MockCompanySource {
    entries: Mutex<HashMap<String, CompanyInfo>>,
    fail_remaining: AtomicUsize,
    calls: AtomicUsize,
}

impl MockCompanySource {
    /// An empty source; unknown ids fail with a non-retryable error.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fail_remaining: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Registers registry data for a tax id.
    pub fn insert(&self, tax_id: &str, info: CompanyInfo) {
        self.entries.lock().insert(tax_id.to_string(), info);
    }

    /// Makes the next `count` calls fail with a retryable error.
    pub fn fail_next(&self, count: usize) {
        self.fail_remaining.store(count, Ordering::SeqCst);
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> bool {
        self.fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MockCompanySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompanySource for MockCompanySource {
    async fn lookup(&self, tax_id: &str) -> Result<CompanyInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.take_failure() {
            return Err(ProviderError::Unavailable { message: "mock outage".into() });
        }

        self.entries.lock().get(tax_id).cloned().ok_or_else(|| {
            ProviderError::MalformedResponse { message: format!("unknown tax id {tax_id}") }
        })
    }
}

/// Mock index source with canned records and a failure switch.
pub struct MockIndexSource {
    records: Mutex<Vec<MonthlyRecord>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockIndexSource {
    /// An empty source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source serving one series with the given (month, value) pairs.
    #[must_use]
    pub fn with_series(name: &str, months: &[(&str, f64)]) -> Self {
        let records = months
            .iter()
            .map(|(date, value)| {
                let mut record = MonthlyRecord::empty(*date);
                record.indices.insert(name.to_string(), *value);
                record
            })
            .collect();

        let mock = Self::new();
        *mock.records.lock() = records;
        mock
    }

    /// Switches every call to failure.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockIndexSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexSource for MockIndexSource {
    async fn fetch(&self, _series: &str, months: usize) -> Result<Vec<MonthlyRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable { message: "mock outage".into() });
        }

        let records = self.records.lock();
        Ok(records.iter().take(months).cloned().collect())
    }
}
