use std::fmt;
use std::str::FromStr;

/// Default proxy origin.
pub const DEFAULT_PROXY_URL: &str = "https://proxy.soluntech.com/";

/// Deployment environment of the calling application.
///
/// Only [`Environment::Development`] emits diagnostic events.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
        }
    }
}

/// Configures the proxy origin, environment and transport timeout.
///
/// Retry behavior is fixed and not part of the options.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Proxy origin that request paths are appended to.
    pub proxy_url: String,
    /// Controls whether diagnostics are emitted.
    pub environment: Environment,
    /// Per-request transport timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_owned(),
            environment: Environment::Production,
            timeout_ms: 10_000,
        }
    }
}
