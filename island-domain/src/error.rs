//! Error module for the island domain layer.

use island_core::CoreError;
use thiserror::Error;

use crate::pipeline::{DeliveryError, TranslationError};
use crate::rules::RuleError;
use crate::theming::ThemeStoreError;

/// A general Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// The primary error type for the domain layer.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    ThemeStore(#[from] ThemeStoreError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_transparently() {
        let err: DomainError = ThemeStoreError::InvalidThemeId("../x".to_string()).into();
        assert_eq!(err.to_string(), "Theme id '../x' is not filesystem safe");

        let err: DomainError = DeliveryError::Unavailable("offline".to_string()).into();
        assert!(matches!(err, DomainError::Delivery(_)));
    }
}
