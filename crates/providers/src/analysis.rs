//! Document analysis seam.
//!
//! [`DocumentAnalyzer`] is the contract an analysis backend implements;
//! [`ResilientAnalyzer`] is the wrapper the application calls. The wrapper
//! never fails: missing configuration, provider errors, and timeouts all
//! degrade to [`AnalysisReport::fallback`], so the flow that requested the
//! analysis (a document upload, a property draft) always continues.

use async_trait::async_trait;
use patrimonio_types::config::AnalysisConfig;
use patrimonio_types::{AnalysisReport, AnalysisRequest};
use tracing::warn;

use crate::error::Result;

/// An external document analysis backend.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Analyzes the request and returns a structured report.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`](crate::ProviderError) on timeout, quota,
    /// transport, or malformed-response failures.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport>;
}

/// Timeout-bounded, fallback-substituting wrapper around an analyzer.
pub struct ResilientAnalyzer<A> {
    inner: A,
    config: AnalysisConfig,
}

impl<A: DocumentAnalyzer> ResilientAnalyzer<A> {
    /// Wraps an analyzer with the configured timeout and fallback policy.
    #[must_use]
    pub fn new(inner: A, config: AnalysisConfig) -> Self {
        Self { inner, config }
    }

    /// Analyzes the request, substituting the fallback report on any
    /// failure.
    ///
    /// Without an API key the backend is never called and the fallback is
    /// returned directly.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        if self.config.api_key.is_none() {
            warn!("analysis requested without an API key; returning fallback report");
            return AnalysisReport::fallback();
        }

        match tokio::time::timeout(self.config.timeout(), self.inner.analyze(request)).await {
            Ok(Ok(report)) => report,
            Ok(Err(err)) => {
                warn!(error = %err, "document analysis failed; returning fallback report");
                AnalysisReport::fallback()
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.config.timeout_secs,
                    "document analysis timed out; returning fallback report"
                );
                AnalysisReport::fallback()
            }
        }
    }

    /// The wrapped analyzer.
    #[must_use]
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::time::Duration;

    use patrimonio_types::{AnalysisContext, RiskLevel};

    use super::*;
    use crate::mock::MockAnalyzer;

    fn configured() -> AnalysisConfig {
        AnalysisConfig::builder().api_key("test-key").timeout_secs(1).build()
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::from_text(AnalysisContext::General, "contrato de locação")
    }

    #[tokio::test]
    async fn test_successful_analysis_passes_through() {
        let mut report = AnalysisReport::fallback();
        report.category = "Contrato".to_string();
        report.risk_level = RiskLevel::High;

        let analyzer = ResilientAnalyzer::new(MockAnalyzer::returning(report.clone()), configured());
        let result = analyzer.analyze(&request()).await;

        assert_eq!(result, report);
        assert_eq!(analyzer.inner().calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_substitutes_fallback() {
        let analyzer = ResilientAnalyzer::new(MockAnalyzer::failing(), configured());
        let result = analyzer.analyze(&request()).await;

        assert_eq!(result, AnalysisReport::fallback());
        assert_eq!(result.category, "Uncategorized");
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[tokio::test]
    async fn test_timeout_substitutes_fallback() {
        let mock = MockAnalyzer::returning(AnalysisReport::fallback());
        mock.set_delay(Duration::from_secs(5));

        let analyzer = ResilientAnalyzer::new(mock, configured());
        let started = std::time::Instant::now();
        let result = analyzer.analyze(&request()).await;

        assert_eq!(result, AnalysisReport::fallback());
        assert!(started.elapsed() < Duration::from_secs(3), "must not wait out the delay");
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_backend() {
        let config = AnalysisConfig::builder().timeout_secs(1).build();
        let analyzer = ResilientAnalyzer::new(MockAnalyzer::failing(), config);

        let result = analyzer.analyze(&request()).await;
        assert_eq!(result, AnalysisReport::fallback());
        assert_eq!(analyzer.inner().calls(), 0, "backend must not be called");
    }
}
