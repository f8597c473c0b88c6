use thiserror::Error;

/* User facing errors. The Display impl is the message shown to the end user as is,
   so the configured strings must come through untouched. */
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// the password was found in the breach corpus
    #[error("{0}")]
    PasswordBreached(String),

    /// the lookup failed and the policy is fail-closed
    #[error("{0}")]
    ValidationUnavailable(String),
}

impl ValidationError {
    pub fn message(&self) -> &str {
        match self {
            Self::PasswordBreached(msg) | Self::ValidationUnavailable(msg) => msg,
        }
    }

    /// Stable identifier, for callers that map errors to form fields or translations.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PasswordBreached(_) => "password_breached",
            Self::ValidationUnavailable(_) => "validation_unavailable",
        }
    }
}

// Everything that can go wrong between sending the range query and having its body in hand.
// Descriptions never include the URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("range query timed out: {0}")]
    Timeout(String),
    #[error("could not reach the range service: {0}")]
    Connect(String),
    #[error("could not read the range response: {0}")]
    Body(String),
    #[error("range query failed: {0}")]
    Other(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("url template {0:?} has no {{password}} placeholder")]
    MissingPlaceholder(String),
    #[error("timeout must be a finite, non negative number of seconds, got {0}")]
    InvalidTimeout(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_configured_message() {
        let e = ValidationError::PasswordBreached("nope".into());
        assert_eq!(e.to_string(), "nope");
        assert_eq!(e.message(), "nope");
        assert_eq!(e.code(), "password_breached");

        let e = ValidationError::ValidationUnavailable("try later".into());
        assert_eq!(e.to_string(), "try later");
        assert_eq!(e.code(), "validation_unavailable");
    }

    #[test]
    fn missing_placeholder_message() {
        let e = ConfigError::MissingPlaceholder("https://x/range/".into());
        assert_eq!(e.to_string(), "url template \"https://x/range/\" has no {password} placeholder");
    }
}
