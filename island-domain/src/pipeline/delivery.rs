use async_trait::async_trait;

use crate::session::OutputId;

use super::errors::DeliveryError;
use super::payload::IslandPayload;

/// Outbound port to whatever displays islands. Implementations must tolerate
/// repeated emits for the same output id.
#[async_trait]
pub trait IslandDelivery: Send + Sync {
    async fn emit(&self, key: &str, output_id: OutputId, payload: IslandPayload) -> Result<(), DeliveryError>;

    async fn cancel(&self, key: &str, output_id: OutputId) -> Result<(), DeliveryError>;
}
