//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub injector: InjectorConfig,

    #[serde(default)]
    pub notify: NotifyConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Browser host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// DevTools HTTP endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// URL prefixes scripts may not run on.
    #[serde(default = "default_restricted_schemes")]
    pub restricted_schemes: Vec<String>,

    /// Phrase identifying a permission rejection in host error messages.
    #[serde(default = "default_permission_phrase")]
    pub permission_phrase: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            restricted_schemes: default_restricted_schemes(),
            permission_phrase: default_permission_phrase(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl BrowserConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_endpoint() -> String {
    "http://localhost:9222".to_string()
}

fn default_restricted_schemes() -> Vec<String> {
    vec!["about:".to_string(), "chrome:".to_string()]
}

fn default_permission_phrase() -> String {
    "Cannot access a chrome:// URL".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// The restyled site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Substring a tab URL must contain for the styling action.
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Image that replaces the site logo.
    #[serde(default = "default_logo_url")]
    pub logo_url: String,

    /// Alt text of the replacement logo; also marks it as installed.
    #[serde(default = "default_logo_alt")]
    pub logo_alt: String,

    /// Text written into every question title.
    #[serde(default = "default_title_text")]
    pub title_text: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            logo_url: default_logo_url(),
            logo_alt: default_logo_alt(),
            title_text: default_title_text(),
        }
    }
}

fn default_domain() -> String {
    "zhihu.com".to_string()
}

fn default_logo_url() -> String {
    "https://mdn.alipayobjects.com/huamei_0prmtq/afts/img/A*IyX5TqQXOMQAAAAAAAAAAAAADvuFAQ/original"
        .to_string()
}

fn default_logo_alt() -> String {
    "阿里语雀".to_string()
}

fn default_title_text() -> String {
    "成功项目文档".to_string()
}

/// Timing of the in-page routine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectorConfig {
    /// Quiet period before a mutation burst triggers a style pass.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How long the copy button shows a feedback label.
    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u64,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            feedback_ms: default_feedback_ms(),
        }
    }
}

impl InjectorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_feedback_ms() -> u64 {
    1200
}

/// Where notifications go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyChannel {
    /// Log through tracing (always available).
    Log,
    /// Native desktop notification.
    #[default]
    Desktop,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub channel: NotifyChannel,

    #[serde(default = "default_icon_url")]
    pub icon_url: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            channel: NotifyChannel::default(),
            icon_url: default_icon_url(),
        }
    }
}

fn default_icon_url() -> String {
    "icon-34.png".to_string()
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files.
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "~/.restyle/logs".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
