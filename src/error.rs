use thiserror::Error;

/// Errors raised while registering routes or dispatching a request.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No registered route for `method` matches the normalized `uri`.
    ///
    /// Not fatal: the caller decides which transport-level response to send
    /// (usually 404).
    #[error("no route matched {method} {uri}")]
    NoRouteMatched {
        /// Normalized (uppercased) request method
        method: String,
        /// Normalized request path, query string removed
        uri: String,
    },

    /// A path pattern could not be compiled.
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern, router prefix applied
        pattern: String,
        /// What is wrong with it
        reason: String,
    },

    /// A route was registered with something that is not an HTTP method token.
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// A handler failed. The handler's error is passed through as-is.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl RouterError {
    /// `true` for [`RouterError::NoRouteMatched`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouterError::NoRouteMatched { .. })
    }

    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}
