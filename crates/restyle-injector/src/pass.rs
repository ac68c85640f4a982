//! The idempotent style-application pass.

use restyle_config::SiteConfig;
use restyle_protocols::{Document, DomError, NodeId};
use tracing::debug;

use crate::logo::{find_logo, replace_logo};

/// Root-level custom property forced to black.
pub const TEXT_COLOR_VAR: &str = "--GBL01A";
pub const TEXT_COLOR: &str = "#000000";

/// Question title elements whose text is overwritten.
pub const TITLE_SELECTOR: &str = ".QuestionHeader-title";

/// Sidebars and sub-panels removed outright.
pub const REMOVED_SELECTORS: &[&str] = &[
    ".Post-Row-Content-right",
    ".Question-sideColumn, .Question-sideColumn--sticky",
    ".Post-Sub, .Post-NormalSub",
];

/// Main content areas stretched to full width.
pub const WIDENED_SELECTORS: &[&str] = &[
    ".Post-Row-Content-left-article",
    ".Question-mainColumn",
    ".ListShortcut",
];

/// What one pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub color_set: bool,
    pub logo_replaced: bool,
    pub titles_rewritten: usize,
    pub removed: usize,
    pub widened: usize,
}

impl PassReport {
    /// Whether the pass left the document untouched.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Applies the site's visual overrides. Running it on an already styled
/// document changes nothing.
#[derive(Debug, Clone)]
pub struct StylePass {
    site: SiteConfig,
}

impl StylePass {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub async fn apply(&self, doc: &dyn Document) -> Result<PassReport, DomError> {
        let mut report = PassReport::default();

        let html = doc.document_element().await?;
        if doc.style_property(html, TEXT_COLOR_VAR).await? != TEXT_COLOR {
            doc.set_style_property(html, TEXT_COLOR_VAR, TEXT_COLOR).await?;
            report.color_set = true;
        }

        if let Some(logo) = find_logo(doc).await? {
            report.logo_replaced = replace_logo(doc, logo, &self.site).await?;
        }

        for title in doc.query_all(TITLE_SELECTOR).await? {
            if doc.text(title).await? != self.site.title_text {
                doc.set_text(title, &self.site.title_text).await?;
                report.titles_rewritten += 1;
            }
        }

        for selector in REMOVED_SELECTORS {
            for node in doc.query_all(selector).await? {
                doc.remove(node).await?;
                report.removed += 1;
            }
        }

        for selector in WIDENED_SELECTORS {
            for node in doc.query_all(selector).await? {
                if doc.style_property(node, "width").await? != "100%" {
                    widen(doc, node).await?;
                    report.widened += 1;
                }
            }
        }

        debug!(?report, "Style pass applied");
        Ok(report)
    }
}

async fn widen(doc: &dyn Document, node: NodeId) -> Result<(), DomError> {
    doc.set_style_property(node, "width", "100%").await?;
    doc.set_style_property(node, "max-width", "100%").await?;
    doc.set_style_property(node, "margin", "0").await?;
    doc.set_style_property(node, "padding", "0").await
}

#[cfg(test)]
#[path = "pass_tests.rs"]
mod tests;
