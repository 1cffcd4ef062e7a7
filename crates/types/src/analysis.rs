//! Document analysis request and report types.
//!
//! Analysis is delegated to an external provider; these types define the
//! contract. A provider failure must never abort the flow that requested
//! the analysis; callers substitute [`AnalysisReport::fallback`] instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What the caller intends to do with the analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisContext {
    /// Plain document classification and summarization.
    General,
    /// Extract a property draft from the document in addition to the summary.
    PropertyCreation,
    /// Extract an owner draft from the document in addition to the summary.
    OwnerCreation,
}

/// Risk classification assigned by analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No concerning clauses found, or analysis unavailable.
    #[default]
    Low,
    /// Clauses that deserve review.
    Medium,
    /// Clauses with likely financial or legal exposure.
    High,
}

impl RiskLevel {
    /// Returns the level as a static string label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Input to a document analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Intended use of the result.
    pub context: AnalysisContext,
    /// Raw document text, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Names of uploaded files to analyze.
    #[serde(default)]
    pub file_names: Vec<String>,
}

impl AnalysisRequest {
    /// Builds a text-only request.
    #[must_use]
    pub fn from_text(context: AnalysisContext, text: impl Into<String>) -> Self {
        Self { context, text: Some(text.into()), file_names: Vec::new() }
    }
}

/// Property fields extracted from a document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyDraft {
    /// Suggested display name.
    pub name: String,
    /// Street and number, if found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// City, if found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Postal code, digits only, if found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Appraised or transaction value, if found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appraised_value: Option<f64>,
}

/// Owner fields extracted from a document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OwnerDraft {
    /// Suggested display name.
    pub name: String,
    /// Company tax id, digits only, if found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    /// Contact email, if found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Structured result of a document analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Document category (e.g. "Contrato de Locação").
    pub category: String,
    /// Short prose summary.
    pub summary: String,
    /// Risk classification.
    pub risk_level: RiskLevel,
    /// Dates the analysis flagged as significant.
    #[serde(default)]
    pub key_dates: Vec<String>,
    /// Monetary amounts found in the document.
    #[serde(default)]
    pub monetary_values: Vec<String>,
    /// Free-form field → value pairs extracted from the document.
    #[serde(default)]
    pub structured_data: BTreeMap<String, String>,
    /// Property draft, when requested via [`AnalysisContext::PropertyCreation`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_property: Option<PropertyDraft>,
    /// Owner draft, when requested via [`AnalysisContext::OwnerCreation`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_owner: Option<OwnerDraft>,
}

impl AnalysisReport {
    /// The safe default substituted when the provider fails or times out.
    ///
    /// Uncategorized, low risk, nothing extracted. Callers continue their
    /// flow with this instead of propagating the provider error.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            category: "Uncategorized".to_string(),
            summary: String::new(),
            risk_level: RiskLevel::Low,
            key_dates: Vec::new(),
            monetary_values: Vec::new(),
            structured_data: BTreeMap::new(),
            extracted_property: None,
            extracted_owner: None,
        }
    }
}
