use crate::types::AssetId;

/// A request to the node failed. Aborts whatever run issued it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Network or transport failure, no response was read.
    #[error("request failed: {0}")]
    Request(String),

    /// Non-success HTTP status. `message` is the NIS error message when the
    /// body carried one, the raw body otherwise.
    #[error("node answered {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not what the endpoint promises.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Divisibility of an asset could not be resolved. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetLookupError {
    #[error("definition lookup for {asset} failed: {source}")]
    Remote {
        asset: AssetId,
        #[source]
        source: RemoteError,
    },

    #[error("namespace does not define {0}")]
    NotFound(AssetId),

    #[error("{asset} declares divisibility {divisibility}, above the maximum of 6")]
    Invalid { asset: AssetId, divisibility: u32 },
}
