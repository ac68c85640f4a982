//! Browser host capabilities.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{DomError, HostError};

/// A browser tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    /// Opaque tab handle.
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
}

impl TabInfo {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: String::new(),
        }
    }

    /// Whether the URL starts with any of `schemes` (e.g. `"about:"`).
    pub fn has_scheme(&self, schemes: &[String]) -> bool {
        schemes.iter().any(|s| self.url.starts_with(s.as_str()))
    }
}

/// A routine delivered into a page.
///
/// `activate` returns once the routine is installed; a routine that keeps
/// reacting to the page runs on its own task afterwards.
#[async_trait]
pub trait PageRoutine: Send + Sync {
    fn name(&self) -> &str;

    async fn activate(&self, document: Arc<dyn Document>) -> Result<(), DomError>;
}

/// What to execute inside a tab.
#[derive(Clone)]
pub enum Injection {
    /// A script file evaluated in the page.
    File(PathBuf),
    /// A routine driven against the page document.
    Routine(Arc<dyn PageRoutine>),
}

impl fmt::Debug for Injection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Injection::File(path) => f.debug_tuple("File").field(path).finish(),
            Injection::Routine(routine) => f.debug_tuple("Routine").field(&routine.name()).finish(),
        }
    }
}

/// Resolves the focused tab of the current window.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TabHost: Send + Sync {
    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError>;
}

/// Executes an [`Injection`] inside a tab.
///
/// Rejections are reported as [`HostError::ExecutionFailed`] carrying the
/// host's message.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ScriptHost: Send + Sync {
    async fn execute(&self, tab: &TabInfo, injection: Injection) -> Result<(), HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedRoutine;

    #[async_trait]
    impl PageRoutine for NamedRoutine {
        fn name(&self) -> &str {
            "named"
        }

        async fn activate(&self, _document: Arc<dyn Document>) -> Result<(), DomError> {
            Ok(())
        }
    }

    #[test]
    fn test_has_scheme() {
        let schemes = vec!["about:".to_string(), "chrome:".to_string()];
        assert!(TabInfo::new("1", "chrome://settings").has_scheme(&schemes));
        assert!(TabInfo::new("1", "about:blank").has_scheme(&schemes));
        assert!(!TabInfo::new("1", "https://www.zhihu.com/").has_scheme(&schemes));
    }

    #[test]
    fn test_injection_debug() {
        let file = Injection::File(PathBuf::from("/tmp/a.js"));
        assert!(format!("{:?}", file).contains("a.js"));

        let routine = Injection::Routine(Arc::new(NamedRoutine));
        assert_eq!(format!("{:?}", routine), "Routine(\"named\")");
    }

    #[tokio::test]
    async fn test_mock_tab_host() {
        let mut host = MockTabHost::new();
        host.expect_active_tab()
            .returning(|| Ok(Some(TabInfo::new("7", "https://www.zhihu.com/question/1"))));

        let tab = host.active_tab().await.unwrap().unwrap();
        assert_eq!(tab.id, "7");
    }
}
