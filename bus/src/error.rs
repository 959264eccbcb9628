use thiserror::Error;

#[derive(Error, Debug)]
pub enum BusError {
    #[error("failed to parse external bus message: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize outgoing message: {0}")]
    Serialize(#[source] serde_json::Error),
}
