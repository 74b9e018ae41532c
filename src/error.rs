// Error taxonomy for the AFK store and duration formatter

use thiserror::Error;

/// Errors surfaced to command handlers
///
/// "Not AFK" on a lookup is not an error: `get` returns `None` and `check`
/// returns `AfkStatus::NotAfk`. `NotAfk` only comes out of `clear`.
#[derive(Debug, Error)]
pub enum AfkError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("malformed timestamp {input:?}: {source}")]
    MalformedTimestamp {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("user is not AFK")]
    NotAfk,
}

impl AfkError {
    pub fn malformed(input: &str, source: chrono::ParseError) -> Self {
        Self::MalformedTimestamp {
            input: input.to_string(),
            source,
        }
    }
}

pub type Result<T, E = AfkError> = std::result::Result<T, E>;
