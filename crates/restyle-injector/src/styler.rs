//! The site-styling routine and its per-page run loop.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use restyle_config::{InjectorConfig, SiteConfig};
use restyle_protocols::{
    ClickAction, Clipboard, Document, DomError, NodeId, PageEvent, PageRoutine, Subscription,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::copy::{self, BUTTON_ID};
use crate::debounce::Debouncer;
use crate::pass::StylePass;
use crate::stylesheet::install_stylesheet;

/// Element the observer watches, falling back to `<body>`.
pub const OBSERVED_ROOT_ID: &str = "root";

/// Counters shared between a [`SiteStyler`] and its run loops.
#[derive(Debug, Default)]
pub struct StylerStats {
    passes: AtomicU64,
    copies: AtomicU64,
    activations: AtomicU64,
}

impl StylerStats {
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::SeqCst)
    }

    pub fn copies(&self) -> u64 {
        self.copies.load(Ordering::SeqCst)
    }

    pub fn activations(&self) -> u64 {
        self.activations.load(Ordering::SeqCst)
    }
}

/// Documents that have a running loop, keyed by address.
#[derive(Debug, Default)]
struct LivePages(Mutex<HashSet<usize>>);

impl LivePages {
    fn contains(&self, key: usize) -> bool {
        self.0.lock().contains(&key)
    }

    fn enter(self: &Arc<Self>, key: usize) -> LiveGuard {
        self.0.lock().insert(key);
        LiveGuard {
            pages: self.clone(),
            key,
        }
    }
}

/// Marks a document live until the loop holding it is dropped,
/// including when its task is aborted.
struct LiveGuard {
    pages: Arc<LivePages>,
    key: usize,
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.pages.0.lock().remove(&self.key);
    }
}

fn page_key(document: &Arc<dyn Document>) -> usize {
    Arc::as_ptr(document).cast::<()>() as usize
}

/// Restyles a page and keeps it restyled as content loads.
///
/// Activation installs the stylesheet, applies one pass, starts
/// observing the page and adds the copy button. When this styler already
/// runs a loop on the page, only the pass runs. A copy button left by an
/// activation that is no longer running is adopted: the page is observed
/// again and the existing button rebound.
pub struct SiteStyler {
    pass: StylePass,
    debounce: Duration,
    feedback: Duration,
    clipboard: Arc<dyn Clipboard>,
    stats: Arc<StylerStats>,
    live: Arc<LivePages>,
}

impl SiteStyler {
    pub fn new(site: SiteConfig, timing: &InjectorConfig, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            pass: StylePass::new(site),
            debounce: timing.debounce(),
            feedback: timing.feedback(),
            clipboard,
            stats: Arc::new(StylerStats::default()),
            live: Arc::new(LivePages::default()),
        }
    }

    pub fn stats(&self) -> Arc<StylerStats> {
        self.stats.clone()
    }

    /// Whether a loop started by this styler is still running on
    /// `document`.
    pub fn is_watching(&self, document: &Arc<dyn Document>) -> bool {
        self.live.contains(page_key(document))
    }

    /// Activate on `document`. Returns the run loop handle when a new
    /// observation was started.
    pub async fn start(
        &self,
        document: Arc<dyn Document>,
    ) -> Result<Option<JoinHandle<()>>, DomError> {
        let doc = document.as_ref();
        self.stats.activations.fetch_add(1, Ordering::SeqCst);

        if self.is_watching(&document) {
            debug!("Page already active, reapplying style pass");
            self.pass.apply(doc).await?;
            self.stats.passes.fetch_add(1, Ordering::SeqCst);
            return Ok(None);
        }

        install_stylesheet(doc).await?;
        self.pass.apply(doc).await?;
        self.stats.passes.fetch_add(1, Ordering::SeqCst);

        let root = match doc.element_by_id(OBSERVED_ROOT_ID).await? {
            Some(root) => root,
            None => match doc.body().await? {
                Some(body) => body,
                None => doc.document_element().await?,
            },
        };
        let subscription = doc.observe(root).await?;
        let button = match doc.element_by_id(BUTTON_ID).await? {
            Some(button) => {
                debug!(%button, "Adopting copy button from an earlier activation");
                doc.bind_click(button, ClickAction::CopyAnswers).await?;
                Some(button)
            }
            None => copy::install_copy_button(doc).await?,
        };

        info!(%root, "Site styler active");
        let live = self.live.enter(page_key(&document));
        let run = RunLoop {
            document,
            pass: self.pass.clone(),
            clipboard: self.clipboard.clone(),
            debouncer: Debouncer::new(self.debounce),
            feedback: self.feedback,
            subscription,
            button,
            stats: self.stats.clone(),
            _live: live,
        };
        Ok(Some(tokio::spawn(run.run())))
    }
}

#[async_trait]
impl PageRoutine for SiteStyler {
    fn name(&self) -> &str {
        "site-styler"
    }

    async fn activate(&self, document: Arc<dyn Document>) -> Result<(), DomError> {
        self.start(document).await.map(|_| ())
    }
}

struct RunLoop {
    document: Arc<dyn Document>,
    pass: StylePass,
    clipboard: Arc<dyn Clipboard>,
    debouncer: Debouncer,
    feedback: Duration,
    subscription: Subscription,
    /// The copy button this loop owns clicks for, when the page has one.
    button: Option<NodeId>,
    stats: Arc<StylerStats>,
    _live: LiveGuard,
}

impl RunLoop {
    async fn run(mut self) {
        loop {
            tokio::select! {
                event = self.subscription.events.recv() => match event {
                    Some(PageEvent::Mutated) => self.debouncer.schedule(),
                    Some(PageEvent::Clicked(action)) => self.on_click(action).await,
                    Some(PageEvent::Unloaded) | None => break,
                },
                () = self.debouncer.wait() => self.run_pass().await,
            }
        }

        self.debouncer.cancel();
        if let Err(e) = self.document.disconnect(self.subscription.id).await {
            debug!("Disconnect after unload failed: {}", e);
        }
        info!("Site styler stopped");
    }

    async fn run_pass(&self) {
        match self.pass.apply(self.document.as_ref()).await {
            Ok(_) => {
                self.stats.passes.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => warn!("Style pass failed: {}", e),
        }
    }

    async fn on_click(&self, action: ClickAction) {
        let Some(button) = self.button else {
            return;
        };
        let result = match action {
            ClickAction::CopyAnswers => self.copy(button).await,
            ClickAction::ClosePanel => copy::close_panel(self.document.as_ref())
                .await
                .map(|_| ()),
        };
        if let Err(e) = result {
            warn!("{} failed: {}", action.as_str(), e);
        }
    }

    async fn copy(&self, button: NodeId) -> Result<(), DomError> {
        let outcome = copy::copy_answers(self.document.as_ref(), self.clipboard.as_ref()).await?;
        self.stats.copies.fetch_add(1, Ordering::SeqCst);
        debug!(?outcome, "Copy action handled");
        copy::flash_label(self.document.clone(), button, outcome.label(), self.feedback).await
    }
}

#[cfg(test)]
#[path = "styler_tests.rs"]
mod tests;
