//! Browser host over CDP.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use restyle_config::BrowserConfig;
use restyle_protocols::{HostError, Injection, ScriptHost, TabHost, TabInfo};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::cdp::{CdpClient, CdpError, PageInfo};
use crate::document::CdpDocument;

/// Resolves tabs and runs injections in a Chromium browser reached over
/// the DevTools protocol.
pub struct CdpHost {
    client: Arc<CdpClient>,
    restricted_schemes: Vec<String>,
    permission_phrase: String,
    /// One entry per attached page document; `true` once it unloaded.
    attached: Mutex<Vec<watch::Receiver<bool>>>,
}

impl CdpHost {
    pub async fn connect(config: &BrowserConfig) -> Result<Self, CdpError> {
        let client = CdpClient::connect(&config.endpoint, config.request_timeout()).await?;
        info!(browser = client.browser(), "Connected to {}", config.endpoint);
        Ok(Self {
            client: Arc::new(client),
            restricted_schemes: config.restricted_schemes.clone(),
            permission_phrase: config.permission_phrase.clone(),
            attached: Mutex::new(Vec::new()),
        })
    }

    /// Page tabs, most recently focused first.
    pub async fn tabs(&self) -> Result<Vec<TabInfo>, CdpError> {
        Ok(self
            .client
            .list_pages()
            .await?
            .into_iter()
            .filter(PageInfo::is_page)
            .map(TabInfo::from)
            .collect())
    }

    /// Number of attached documents that have not unloaded yet.
    pub fn live_documents(&self) -> usize {
        let mut attached = self.attached.lock();
        prune(&mut attached);
        attached.len()
    }

    fn track(&self, closed: watch::Receiver<bool>) {
        let mut attached = self.attached.lock();
        prune(&mut attached);
        attached.push(closed);
    }

    /// Wait until every attached document has unloaded.
    pub async fn wait_detached(&self) {
        let receivers: Vec<_> = {
            let mut attached = self.attached.lock();
            prune(&mut attached);
            attached.clone()
        };
        for mut rx in receivers {
            // An error means the document is gone, which is as good as closed.
            let _ = rx.wait_for(|closed| *closed).await;
        }
        prune(&mut self.attached.lock());
    }
}

/// Forget documents that unloaded or whose sender is gone.
fn prune(attached: &mut Vec<watch::Receiver<bool>>) {
    attached.retain(|rx| !*rx.borrow() && rx.has_changed().is_ok());
}

/// Refuse tabs the browser does not let scripts into, with the browser's
/// own message.
fn check_scheme(tab: &TabInfo, restricted: &[String], phrase: &str) -> Result<(), HostError> {
    if tab.has_scheme(restricted) {
        return Err(HostError::ExecutionFailed(phrase.to_string()));
    }
    Ok(())
}

#[async_trait]
impl TabHost for CdpHost {
    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError> {
        let tabs = self
            .tabs()
            .await
            .map_err(|e| HostError::TabQuery(e.to_string()))?;
        Ok(tabs.into_iter().next())
    }
}

#[async_trait]
impl ScriptHost for CdpHost {
    async fn execute(&self, tab: &TabInfo, injection: Injection) -> Result<(), HostError> {
        check_scheme(tab, &self.restricted_schemes, &self.permission_phrase)?;

        match injection {
            Injection::File(path) => {
                let script = tokio::fs::read_to_string(&path).await?;
                let session = self.client.attach_page(&tab.id).await?;
                let result = session.evaluate(&script).await;
                if let Err(e) = self.client.detach_page(&session).await {
                    debug!("Detach after script failed: {}", e);
                }
                result?;
                info!(tab = %tab.id, file = %path.display(), "Script evaluated");
            }
            Injection::Routine(routine) => {
                let session = self.client.attach_page(&tab.id).await?;
                let document = CdpDocument::attach(self.client.clone(), session).await?;
                self.track(document.closed());
                routine
                    .activate(Arc::new(document))
                    .await
                    .map_err(|e| HostError::ExecutionFailed(e.to_string()))?;
                info!(tab = %tab.id, routine = routine.name(), "Routine activated");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_drops_unloaded_documents() {
        let (open_tx, open_rx) = watch::channel(false);
        let (closed_tx, closed_rx) = watch::channel(false);
        let (gone_tx, gone_rx) = watch::channel(false);
        closed_tx.send_replace(true);
        drop(gone_tx);

        let mut attached = vec![open_rx, closed_rx, gone_rx];
        prune(&mut attached);
        assert_eq!(attached.len(), 1);
        assert!(!*attached[0].borrow());

        open_tx.send_replace(true);
        prune(&mut attached);
        assert!(attached.is_empty());
    }

    #[test]
    fn test_restricted_schemes_are_refused() {
        let config = BrowserConfig::default();
        let tab = TabInfo::new("1", "chrome://newtab/");
        let err = check_scheme(&tab, &config.restricted_schemes, &config.permission_phrase)
            .unwrap_err();
        assert!(err.mentions("Cannot access a chrome:// URL"));

        let tab = TabInfo::new("2", "https://www.zhihu.com/");
        assert!(check_scheme(&tab, &config.restricted_schemes, &config.permission_phrase).is_ok());
    }
}
