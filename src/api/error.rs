use reqwest::StatusCode;
use thiserror::Error;

/// Failure of one backend call. The message is deliberately generic; the
/// underlying cause is available through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch live matches")]
    LiveMatches {
        sport: String,
        #[source]
        cause: FetchFailure,
    },
    #[error("Failed to fetch prediction")]
    Prediction {
        match_id: String,
        #[source]
        cause: FetchFailure,
    },
    #[error("Failed to check backend health")]
    Health {
        #[source]
        cause: FetchFailure,
    },
}

impl FetchError {
    pub fn cause(&self) -> &FetchFailure {
        match self {
            FetchError::LiveMatches { cause, .. }
            | FetchError::Prediction { cause, .. }
            | FetchError::Health { cause } => cause,
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("sport identifier must not be empty")]
    EmptySport,
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("backend returned {status}{}", detail_suffix(.detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("malformed response body: {0}")]
    Body(#[source] reqwest::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}
