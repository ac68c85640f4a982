//! Offline preview: restyle a saved HTML page.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use restyle_config::Config;
use restyle_desktop::SystemClipboard;
use restyle_dom::MemoryDocument;
use restyle_injector::SiteStyler;

pub(crate) async fn preview(
    config: &Config,
    html: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let source = tokio::fs::read_to_string(html)
        .await
        .with_context(|| format!("Cannot read {}", html.display()))?;

    let document = Arc::new(MemoryDocument::from_html(&source));
    let styler = SiteStyler::new(
        config.site.clone(),
        &config.injector,
        Arc::new(SystemClipboard::new()),
    );
    let run = styler.start(document.clone()).await?;

    // A saved page never changes again; stop observing right away.
    document.unload();
    if let Some(run) = run {
        run.await.context("Style loop panicked")?;
    }
    debug!(passes = styler.stats().passes(), "Preview styled");

    let styled = document.to_html();
    match output {
        Some(path) => {
            tokio::fs::write(path, styled)
                .await
                .with_context(|| format!("Cannot write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", styled),
    }
    Ok(())
}
