use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Fetch => "Fetch",
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("{operation} failed: network error: {message}")]
    Network { operation: Operation, message: String },
    #[error("{operation} failed: could not decode response: {message}")]
    Decode { operation: Operation, message: String },
    #[error("{operation} failed: {status} {reason}{}", body_suffix(.body))]
    Validation {
        operation: Operation,
        status: u16,
        reason: String,
        body: String,
    },
    #[error("{operation} failed: {status} {reason}{}", body_suffix(.body))]
    Server {
        operation: Operation,
        status: u16,
        reason: String,
        body: String,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid draft: {0}")]
    InvalidDraft(String),
}

impl CatalogError {
    /// Classifies a non-success status: 4xx means the server rejected our input,
    /// anything else is the server's problem.
    pub fn from_status(operation: Operation, status: u16, reason: &str, body: String) -> Self {
        let reason = reason.to_string();
        if (400..500).contains(&status) {
            CatalogError::Validation {
                operation,
                status,
                reason,
                body,
            }
        } else {
            CatalogError::Server {
                operation,
                status,
                reason,
                body,
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Validation { status, .. } | CatalogError::Server { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!("\n{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification_splits_client_and_server_errors() {
        let err = CatalogError::from_status(Operation::Create, 400, "Bad Request", String::new());
        assert!(matches!(err, CatalogError::Validation { status: 400, .. }));

        let err = CatalogError::from_status(Operation::Create, 503, "Service Unavailable", String::new());
        assert!(matches!(err, CatalogError::Server { status: 503, .. }));

        let err = CatalogError::from_status(Operation::Delete, 302, "Found", String::new());
        assert!(matches!(err, CatalogError::Server { status: 302, .. }));
    }

    #[test]
    fn message_combines_status_and_body() {
        let err = CatalogError::from_status(
            Operation::Update,
            400,
            "Bad Request",
            r#"{"message":["price must be a positive number"]}"#.to_string(),
        );
        assert_eq!(
            err.to_string(),
            "Update failed: 400 Bad Request\n{\"message\":[\"price must be a positive number\"]}"
        );

        let err = CatalogError::from_status(Operation::Delete, 500, "Internal Server Error", String::new());
        assert_eq!(err.to_string(), "Delete failed: 500 Internal Server Error");
    }
}
