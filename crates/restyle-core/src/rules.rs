//! Eligibility rules applied before dispatch.

use restyle_config::Config;
use restyle_protocols::{HostError, TabInfo};
use serde::{Deserialize, Serialize};

/// Which tabs a dispatch may target and how host rejections are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRules {
    /// Substring the tab URL must contain for the site routine.
    pub domain: String,
    /// URL prefixes on which script injection is expected to fail.
    pub restricted_schemes: Vec<String>,
    /// Host message marking a permission rejection.
    pub permission_phrase: String,
}

impl DispatchRules {
    pub fn from_config(config: &Config) -> Self {
        Self {
            domain: config.site.domain.clone(),
            restricted_schemes: config.browser.restricted_schemes.clone(),
            permission_phrase: config.browser.permission_phrase.clone(),
        }
    }

    /// Whether the site routine may run on `tab`.
    pub fn on_site(&self, tab: &TabInfo) -> bool {
        tab.url.contains(&self.domain)
    }

    pub fn is_restricted(&self, tab: &TabInfo) -> bool {
        tab.has_scheme(&self.restricted_schemes)
    }

    pub fn is_permission_error(&self, error: &HostError) -> bool {
        error.mentions(&self.permission_phrase)
    }
}

impl Default for DispatchRules {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
