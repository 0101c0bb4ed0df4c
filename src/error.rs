use thiserror::Error;

/// The request never produced a response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("network error: {0}")]
    Network(String),
}

/// A fixture document could not be produced.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture not found: {0}")]
    NotFound(String),
    #[error("failed to read fixture {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("fixture {name} is not valid JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("fixture {name} has no string field `{field}`")]
    MissingField { name: String, field: String },
    #[error("no sample for {0}")]
    NoSample(String),
}

/// What an operation call returns to its caller once retries are spent.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Non-success status. `message` comes from the body's `error` field
    /// when there is one.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_message_only() {
        let err = ApiError::Status {
            status: 422,
            message: "text is required".to_string(),
        };
        assert_eq!(err.to_string(), "text is required");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn transport_error_is_transparent() {
        let err = ApiError::from(TransportError::Network("connection refused".to_string()));
        assert_eq!(err.to_string(), "network error: connection refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn fixture_errors_name_the_fixture() {
        let err = FixtureError::NotFound("grammar_results.json".to_string());
        assert!(err.to_string().contains("grammar_results.json"));
    }
}
