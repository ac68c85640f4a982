//! Commands that talk to the browser.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use restyle_browser::CdpHost;
use restyle_config::Config;
use restyle_core::{DispatchOutcome, DispatchRules, Dispatcher};
use restyle_desktop::{SystemClipboard, notifier_for};
use restyle_injector::SiteStyler;

async fn connect(config: &Config) -> anyhow::Result<Arc<CdpHost>> {
    let host = CdpHost::connect(&config.browser)
        .await
        .with_context(|| format!("Cannot reach the browser at {}", config.browser.endpoint))?;
    Ok(Arc::new(host))
}

fn dispatcher(config: &Config, host: Arc<CdpHost>) -> Dispatcher {
    let dispatcher = Dispatcher::new(
        host.clone(),
        host,
        notifier_for(config.notify.channel),
        DispatchRules::from_config(config),
    );
    if config.notify.icon_url.is_empty() {
        dispatcher
    } else {
        dispatcher.with_icon(config.notify.icon_url.clone())
    }
}

fn report(outcome: DispatchOutcome) {
    match outcome {
        DispatchOutcome::Injected => println!("Injected."),
        DispatchOutcome::Ineligible => println!("Active tab is not on the target site."),
        DispatchOutcome::Rejected => println!("The browser refused to run scripts in this tab."),
        DispatchOutcome::Failed => println!("Injection failed; see the log for details."),
        DispatchOutcome::NoActiveTab => println!("No active tab."),
    }
}

/// Restyle the active tab, then keep the routine alive until the page
/// unloads or Ctrl-C.
pub(crate) async fn run(config: &Config) -> anyhow::Result<()> {
    let host = connect(config).await?;
    let styler = Arc::new(SiteStyler::new(
        config.site.clone(),
        &config.injector,
        Arc::new(SystemClipboard::new()),
    ));
    let stats = styler.stats();

    let outcome = dispatcher(config, host.clone())
        .restyle_active_tab(styler)
        .await?;
    report(outcome);
    if outcome != DispatchOutcome::Injected {
        return Ok(());
    }
    if host.live_documents() == 0 {
        println!("The page unloaded before it could be watched.");
        return Ok(());
    }

    println!("Watching the page. Press Ctrl-C to stop.");
    tokio::select! {
        _ = host.wait_detached() => info!("Page unloaded"),
        res = tokio::signal::ctrl_c() => {
            res.context("Cannot listen for Ctrl-C")?;
            info!("Interrupted");
        }
    }
    info!(
        passes = stats.passes(),
        copies = stats.copies(),
        "Site styler stopped"
    );
    Ok(())
}

/// Evaluate a script file in the active tab.
pub(crate) async fn inject(config: &Config, file: PathBuf) -> anyhow::Result<()> {
    let file = std::fs::canonicalize(&file)
        .with_context(|| format!("Script not found: {}", file.display()))?;
    let host = connect(config).await?;
    let outcome = dispatcher(config, host).inject_content_script(file).await?;
    report(outcome);
    Ok(())
}

/// Print the open page tabs.
pub(crate) async fn tabs(config: &Config) -> anyhow::Result<()> {
    let host = connect(config).await?;
    let tabs = host.tabs().await?;
    if tabs.is_empty() {
        println!("No open tabs.");
        return Ok(());
    }

    let rules = DispatchRules::from_config(config);
    println!("{:<34} {:<5} {}", "ID", "SITE", "URL");
    println!("{}", "-".repeat(80));
    for tab in &tabs {
        let site = if rules.on_site(tab) { "yes" } else { "" };
        println!("{:<34} {:<5} {}", tab.id, site, tab.url);
        if !tab.title.is_empty() {
            println!("{:<34} {:<5} {}", "", "", tab.title);
        }
    }
    Ok(())
}
