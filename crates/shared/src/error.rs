use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body shape every backend endpoint uses for non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Client-side view of a failed backend interaction.
///
/// `Rejected` carries the backend's `detail` text verbatim; that text is what
/// operators see. Transport-level failures collapse into `Connect` with a
/// generic message because there is nothing meaningful to show from the
/// underlying error.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    #[error("failed to connect to server")]
    Connect(String),
    #[error("invalid response from server: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            detail: detail.into(),
        }
    }

    /// Fallback used when a non-2xx response carries no parseable `detail`.
    pub fn rejected_without_detail(status: u16) -> Self {
        Self::Rejected {
            status,
            detail: format!("request failed with status {status}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_backend_detail_verbatim() {
        let err = ApiError::rejected(409, "Trip 4 is already Delivered");
        assert_eq!(err.to_string(), "Trip 4 is already Delivered");
    }

    #[test]
    fn connect_displays_generic_text() {
        let err = ApiError::Connect("connection refused".into());
        assert_eq!(err.to_string(), "failed to connect to server");
    }

    #[test]
    fn missing_detail_falls_back_to_status_text() {
        let err = ApiError::rejected_without_detail(502);
        assert_eq!(err.to_string(), "request failed with status 502");
    }
}
