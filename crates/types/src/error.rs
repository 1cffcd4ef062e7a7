//! Shared error aggregation for the registry core.
//!
//! Each module defines its own focused error type; [`CoreError`] gathers the
//! ones that cross crate boundaries so callers can hold a single error when
//! they do not care which layer failed.

use snafu::Snafu;

use crate::codec::CodecError;
use crate::config::ConfigError;
use crate::types::ParseIdError;
use crate::validation::ValidationError;

/// Unified result type for core operations.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

/// Aggregated error for operations that can fail across layers.
#[derive(Debug, Snafu)]
pub enum CoreError {
    /// Serialization or deserialization failed.
    #[snafu(display("Codec error: {source}"), context(false))]
    Codec {
        /// The codec error.
        source: CodecError,
    },

    /// A domain field failed validation.
    #[snafu(display("Validation error: {source}"), context(false))]
    Validation {
        /// The validation error.
        source: ValidationError,
    },

    /// Configuration is invalid.
    #[snafu(display("Config error: {source}"), context(false))]
    Config {
        /// The config error.
        source: ConfigError,
    },

    /// An identifier string could not be parsed.
    #[snafu(display("Identifier error: {source}"), context(false))]
    Id {
        /// The parse error.
        source: ParseIdError,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::types::EntityId;
    use crate::validation::validate_postal_code;

    #[test]
    fn test_validation_error_converts() {
        fn inner() -> Result<String> {
            let code = validate_postal_code("bad")?;
            Ok(code)
        }
        let err = inner().unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn test_parse_error_converts() {
        fn inner() -> Result<EntityId> {
            let id: EntityId = "nope".parse()?;
            Ok(id)
        }
        let err = inner().unwrap_err();
        assert!(matches!(err, CoreError::Id { .. }));
        assert!(err.to_string().contains("Identifier error"));
    }
}
