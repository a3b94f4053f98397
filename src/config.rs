//! Connection settings for a light.

use std::time::Duration;

/// Settings supplied when connecting to a light.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use wiz_pulse::LightConfig;
///
/// let config = LightConfig::default()
///     .with_timeout(Duration::from_millis(250))
///     .with_label("desk");
/// assert_eq!(config.timeout(), Duration::from_millis(250));
/// assert_eq!(config.label(), Some("desk"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightConfig {
    /// Upper bound for one send/receive exchange.
    pub timeout: Duration,
    /// Name included in log lines to tell lights apart.
    pub label: Option<String>,
}

impl LightConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        LightConfig {
            timeout: Self::DEFAULT_TIMEOUT,
            label: None,
        }
    }
}
