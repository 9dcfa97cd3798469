//! Outbound credentials kept out of logs and debug output.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// Bearer token presented to the registry and the IdM core.
pub struct ApiToken(SecretBox<str>);

impl ApiToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Only call this when building the outbound request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for ApiToken {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken([REDACTED])")
    }
}

impl From<String> for ApiToken {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_not_in_debug() {
        let token = ApiToken::new("eyJhbGciOi-secret");

        let debug = format!("{:?}", token);

        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_clone_keeps_value() {
        let token = ApiToken::new("abc123");

        assert_eq!(token.clone().expose(), "abc123");
    }
}
