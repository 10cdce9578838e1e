use thiserror::Error;

/// All errors produced while executing record operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The service answered with a non-zero status code.
    #[error("LarkBase API Error: {msg}")]
    Remote { code: i64, msg: String },

    /// A parameter the operation needs was absent or empty.
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    /// A parameter was present but could not be used.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The HTTP layer failed (connection, timeout, body decoding).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx HTTP status.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON encoding or decoding failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// True for failures detected locally before any request was sent.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Error::MissingParameter(_) | Error::InvalidParameter { .. }
        )
    }
}

/// An error attributed to the input item whose processing raised it.
#[derive(Debug, Error)]
#[error("{error} [item {item_index}]")]
pub struct NodeOperationError {
    pub item_index: usize,
    #[source]
    pub error: Error,
}

impl NodeOperationError {
    pub fn new(item_index: usize, error: Error) -> Self {
        Self { item_index, error }
    }

    /// The message surfaced to the host, without the item suffix.
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_remote_error_embeds_service_message() {
        let err = Error::Remote {
            code: 1254045,
            msg: "field not found".to_string(),
        };
        assert_eq!(err.to_string(), "LarkBase API Error: field not found");
        assert!(!err.is_parameter_error());
    }

    #[test]
    fn test_missing_parameter_is_parameter_error() {
        let err = Error::MissingParameter("recordId");
        assert!(err.is_parameter_error());
        assert_eq!(err.to_string(), "missing required parameter `recordId`");
    }

    #[test]
    fn test_node_operation_error_attribution() {
        let err = NodeOperationError::new(
            2,
            Error::Remote {
                code: 1,
                msg: "boom".to_string(),
            },
        );
        assert_eq!(err.item_index, 2);
        assert_eq!(err.message(), "LarkBase API Error: boom");
        assert_eq!(err.to_string(), "LarkBase API Error: boom [item 2]");
        assert!(err.source().is_some());
    }
}
