//! Dispatcher: active tab, eligibility, execution, notifications.

use std::path::PathBuf;
use std::sync::Arc;

use restyle_protocols::{
    HostError, Injection, Notification, Notifier, PageRoutine, ScriptHost, TabHost, TabInfo,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::DispatchError;
use crate::notices::{self, INJECT_ERROR_ID, SITE_ERROR_ID};
use crate::rules::DispatchRules;

/// Which branch a dispatch took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The host executed the injection.
    Injected,
    /// The tab is not eligible; nothing was executed.
    Ineligible,
    /// The host refused with the permission message.
    Rejected,
    /// The host failed for another reason.
    Failed,
    /// No tab to target.
    NoActiveTab,
}

/// Delivers scripts and routines to the active tab.
pub struct Dispatcher {
    tabs: Arc<dyn TabHost>,
    scripts: Arc<dyn ScriptHost>,
    notifier: Arc<dyn Notifier>,
    rules: DispatchRules,
    icon_url: Option<String>,
}

impl Dispatcher {
    pub fn new(
        tabs: Arc<dyn TabHost>,
        scripts: Arc<dyn ScriptHost>,
        notifier: Arc<dyn Notifier>,
        rules: DispatchRules,
    ) -> Self {
        Self {
            tabs,
            scripts,
            notifier,
            rules,
            icon_url: None,
        }
    }

    /// Icon attached to every notification.
    pub fn with_icon(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }

    /// The focused tab. Raises `inject-error` when there is none.
    pub async fn resolve_active_tab(&self) -> Result<Option<TabInfo>, DispatchError> {
        let tab = self
            .tabs
            .active_tab()
            .await
            .map_err(DispatchError::TabQuery)?;
        if tab.is_none() {
            info!("No active tab");
            self.notify(INJECT_ERROR_ID, notices::inject_error(self.icon())).await;
        }
        Ok(tab)
    }

    /// Evaluate a script file in the active tab.
    ///
    /// Restricted schemes raise `inject-error` up front but execution is
    /// still attempted; the host has the final say.
    pub async fn inject_content_script(
        &self,
        file: impl Into<PathBuf>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(tab) = self.resolve_active_tab().await? else {
            return Ok(DispatchOutcome::NoActiveTab);
        };

        if self.rules.is_restricted(&tab) {
            debug!(url = %tab.url, "Restricted scheme");
            self.notify(INJECT_ERROR_ID, notices::inject_error(self.icon())).await;
        }

        let file = file.into();
        info!(tab = %tab.id, file = %file.display(), "Injecting content script");
        match self.scripts.execute(&tab, Injection::File(file)).await {
            Ok(()) => Ok(DispatchOutcome::Injected),
            Err(e) => Ok(self
                .on_failure(e, INJECT_ERROR_ID, notices::inject_error(self.icon()))
                .await),
        }
    }

    /// Run `routine` in the active tab if it is on the target site.
    pub async fn restyle_active_tab(
        &self,
        routine: Arc<dyn PageRoutine>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(tab) = self.resolve_active_tab().await? else {
            return Ok(DispatchOutcome::NoActiveTab);
        };

        if !self.rules.on_site(&tab) {
            info!(url = %tab.url, "Active tab is not on {}", self.rules.domain);
            self.notify(SITE_ERROR_ID, notices::not_on_site(self.icon())).await;
            return Ok(DispatchOutcome::Ineligible);
        }

        info!(tab = %tab.id, routine = routine.name(), "Dispatching routine");
        match self.scripts.execute(&tab, Injection::Routine(routine)).await {
            Ok(()) => Ok(DispatchOutcome::Injected),
            Err(e) => Ok(self
                .on_failure(e, SITE_ERROR_ID, notices::cannot_run_here(self.icon()))
                .await),
        }
    }

    async fn on_failure(
        &self,
        error: HostError,
        id: &str,
        notification: Notification,
    ) -> DispatchOutcome {
        if self.rules.is_permission_error(&error) {
            info!("Host refused injection: {}", error);
            self.notify(id, notification).await;
            DispatchOutcome::Rejected
        } else {
            warn!("Injection failed: {}", error);
            DispatchOutcome::Failed
        }
    }

    async fn notify(&self, id: &str, notification: Notification) {
        if let Err(e) = self.notifier.notify(id, &notification).await {
            warn!("Failed to raise notification {}: {}", id, e);
        }
    }

    fn icon(&self) -> Option<&str> {
        self.icon_url.as_deref()
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
