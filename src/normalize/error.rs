use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// The payload is well-formed JSON but its embedded status is not the
    /// success sentinel, or the status is missing altogether.
    #[error(
        "Invalid response from API (code {}): {}",
        .code.map_or_else(|| "missing".to_string(), |c| c.to_string()),
        .message.as_deref().filter(|m| !m.is_empty()).unwrap_or("no error message")
    )]
    InvalidResponse {
        code: Option<i64>,
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("Could not parse {field} from {value}")]
    Unparseable { field: &'static str, value: String },
    #[error("Coordinates ({latitude}, {longitude}) are outside the allowed bounds")]
    OutOfBounds { latitude: f64, longitude: f64 },
}
