use thiserror::Error;

/// Error kinds shared by every crate in the collector. These are the named
/// failure modes a station can produce; each is confined to the station
/// that raised it and never aborts a run.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("missing or naive source timestamp")]
    MissingTimestamp,

    #[error("source timestamp is in the future")]
    FutureTimestamp,

    #[error("source timestamp is stale (older than the configured max reading age)")]
    StaleTimestamp,

    #[error("no usable data returned by source")]
    NoData,

    #[error("http request failed: {0}")]
    HttpFailure(String),

    #[error("no reader registered for connection type '{0}'")]
    UnknownConnectionType(String),

    #[error("timezone '{0}' is not in the allow-list")]
    InvalidTimezone(String),
}

pub type CollectorResult<T> = Result<T, CollectorError>;
