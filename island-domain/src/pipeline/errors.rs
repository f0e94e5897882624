use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Failed to encode island parameters: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Translator rejected event: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Island delivery unavailable: {0}")]
    Unavailable(String),

    #[error("Island output '{output_id}' rejected: {reason}")]
    Rejected { output_id: String, reason: String },
}
