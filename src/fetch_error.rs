#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Upstream returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Request(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = FetchError::Status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Upstream returned status 404 Not Found");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_malformed_payload_message() {
        let err = FetchError::MalformedPayload("expected value at line 1 column 1".to_string());
        assert!(err.to_string().starts_with("Malformed payload"));
    }
}
