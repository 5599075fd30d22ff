use crate::api::CallError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Ingestion configuration is incomplete, nothing can be sent.
    #[error("`{0}` is not set")]
    ConfigMissing(&'static str),

    #[error("VRM credentials are not set")]
    UpstreamAuthMissing,

    #[error("VRM call failed")]
    UpstreamCallFailed(#[source] CallError),

    #[error("ingestion call failed")]
    IngestionCallFailed(#[source] CallError),

    #[error("failed to serialize the envelope")]
    Serialize(#[from] serde_json::Error),
}
