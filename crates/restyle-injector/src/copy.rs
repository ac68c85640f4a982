//! Copy-answers action: floating button, extraction, clipboard and the
//! preview panel.

use std::sync::Arc;
use std::time::Duration;

use restyle_protocols::{ClickAction, Clipboard, Document, DomError, NodeId};
use tracing::{debug, warn};

pub const BUTTON_ID: &str = "zhihu-copy-answer-btn";
pub const PANEL_ID: &str = "zhihu-answer-sidebar";
pub const ANSWER_SELECTOR: &str = ".AnswerItem";

pub const LABEL_IDLE: &str = "复制答案";
pub const LABEL_COPIED: &str = "已复制!";
pub const LABEL_EMPTY: &str = "无答案可复制";
pub const LABEL_FAILED: &str = "复制失败";
pub const LABEL_CLOSE: &str = "关闭";

const BUTTON_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("bottom", "40px"),
    ("right", "40px"),
    ("z-index", "99999"),
    ("background", "#1772F6"),
    ("color", "#fff"),
    ("border", "none"),
    ("border-radius", "8px"),
    ("padding", "12px 24px"),
    ("font-size", "16px"),
    ("box-shadow", "0 2px 8px rgba(0,0,0,0.15)"),
    ("cursor", "pointer"),
    // Raised to 1 on hover by the global stylesheet.
    ("opacity", "0.92"),
    ("transition", "opacity 0.2s"),
];

const PANEL_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "80px"),
    ("right", "0"),
    ("width", "400px"),
    ("max-height", "80vh"),
    ("overflow-y", "auto"),
    ("background", "#fff"),
    ("box-shadow", "-2px 0 12px rgba(0,0,0,0.12)"),
    ("z-index", "99999"),
    ("padding", "24px 16px 16px 16px"),
    ("border-radius", "8px 0 0 8px"),
    ("font-size", "15px"),
    ("color", "#222"),
    ("display", "flex"),
    ("flex-direction", "column"),
    ("gap", "16px"),
];

const CLOSE_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "8px"),
    ("right", "16px"),
    ("background", "#eee"),
    ("border", "none"),
    ("border-radius", "4px"),
    ("padding", "4px 10px"),
    ("cursor", "pointer"),
];

const BLOCK_STYLE: &[(&str, &str)] = &[
    ("background", "#f6f8fa"),
    ("border-radius", "6px"),
    ("padding", "12px 10px"),
    ("margin-bottom", "4px"),
    ("white-space", "pre-wrap"),
];

/// Answers collected from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Trimmed text of each answer, in document order. Blank answers
    /// are kept so panel numbering follows the page.
    pub items: Vec<String>,
    /// Clipboard payload: answers separated by a blank line.
    pub buffer: String,
}

impl Extraction {
    /// True when there is nothing worth copying, even if the page has
    /// answer containers.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Result of one copy action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { items: usize },
    CopyFailed { items: usize },
    Empty,
}

impl CopyOutcome {
    /// Label flashed on the button.
    pub fn label(&self) -> &'static str {
        match self {
            CopyOutcome::Copied { .. } => LABEL_COPIED,
            CopyOutcome::CopyFailed { .. } => LABEL_FAILED,
            CopyOutcome::Empty => LABEL_EMPTY,
        }
    }
}

async fn apply_style(
    doc: &dyn Document,
    node: NodeId,
    style: &[(&str, &str)],
) -> Result<(), DomError> {
    for (name, value) in style {
        doc.set_style_property(node, name, value).await?;
    }
    Ok(())
}

/// Add the floating copy button to `<body>` unless it already exists.
/// Returns the new button, or `None` when one was already present.
pub async fn install_copy_button(doc: &dyn Document) -> Result<Option<NodeId>, DomError> {
    if doc.element_by_id(BUTTON_ID).await?.is_some() {
        return Ok(None);
    }
    let Some(body) = doc.body().await? else {
        return Ok(None);
    };

    let button = doc.create_element("button").await?;
    doc.set_attribute(button, "id", BUTTON_ID).await?;
    doc.set_text(button, LABEL_IDLE).await?;
    apply_style(doc, button, BUTTON_STYLE).await?;
    doc.bind_click(button, ClickAction::CopyAnswers).await?;
    doc.append_child(body, button).await?;
    debug!(%button, "Copy button installed");
    Ok(Some(button))
}

/// Collect answer texts in document order.
pub async fn extract(doc: &dyn Document) -> Result<Extraction, DomError> {
    let mut items = Vec::new();
    let mut buffer = String::new();
    for node in doc.query_all(ANSWER_SELECTOR).await? {
        let text = doc.text(node).await?;
        items.push(text.trim().to_string());
        buffer.push_str(&text);
        buffer.push_str("\n\n");
    }
    Ok(Extraction {
        items,
        buffer: buffer.trim().to_string(),
    })
}

/// Show `items` in the side panel, creating it on first use and
/// replacing earlier content otherwise.
pub async fn render_panel(doc: &dyn Document, items: &[String]) -> Result<NodeId, DomError> {
    let panel = match doc.element_by_id(PANEL_ID).await? {
        Some(panel) => {
            // First child is the close control.
            for child in doc.children(panel).await?.into_iter().skip(1) {
                doc.remove(child).await?;
            }
            panel
        }
        None => create_panel(doc).await?,
    };

    for (i, text) in items.iter().enumerate() {
        let block = doc.create_element("div").await?;
        apply_style(doc, block, BLOCK_STYLE).await?;
        doc.set_text(block, &format!("【第{}条】\n{}", i + 1, text)).await?;
        doc.append_child(panel, block).await?;
    }
    Ok(panel)
}

async fn create_panel(doc: &dyn Document) -> Result<NodeId, DomError> {
    let panel = doc.create_element("div").await?;
    doc.set_attribute(panel, "id", PANEL_ID).await?;
    apply_style(doc, panel, PANEL_STYLE).await?;

    let close = doc.create_element("button").await?;
    doc.set_text(close, LABEL_CLOSE).await?;
    apply_style(doc, close, CLOSE_STYLE).await?;
    doc.bind_click(close, ClickAction::ClosePanel).await?;
    doc.append_child(panel, close).await?;

    let parent = match doc.body().await? {
        Some(body) => body,
        None => doc.document_element().await?,
    };
    doc.append_child(parent, panel).await?;
    Ok(panel)
}

/// Remove the side panel if it is shown.
pub async fn close_panel(doc: &dyn Document) -> Result<bool, DomError> {
    match doc.element_by_id(PANEL_ID).await? {
        Some(panel) => {
            doc.remove(panel).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Extract the answers, write them to the clipboard and show them in
/// the panel. The panel is filled even when the clipboard write fails.
pub async fn copy_answers(
    doc: &dyn Document,
    clipboard: &dyn Clipboard,
) -> Result<CopyOutcome, DomError> {
    let extraction = extract(doc).await?;
    if extraction.is_empty() {
        return Ok(CopyOutcome::Empty);
    }

    let items = extraction.items.len();
    let outcome = match clipboard.write_text(&extraction.buffer).await {
        Ok(()) => CopyOutcome::Copied { items },
        Err(e) => {
            warn!("Clipboard write failed: {}", e);
            CopyOutcome::CopyFailed { items }
        }
    };

    render_panel(doc, &extraction.items).await?;
    Ok(outcome)
}

/// Show `label` on the button, then restore the idle label after
/// `duration`.
pub async fn flash_label(
    doc: Arc<dyn Document>,
    button: NodeId,
    label: &'static str,
    duration: Duration,
) -> Result<(), DomError> {
    doc.set_text(button, label).await?;
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        if let Err(e) = doc.set_text(button, LABEL_IDLE).await {
            debug!("Could not restore button label: {}", e);
        }
    });
    Ok(())
}

#[cfg(test)]
#[path = "copy_tests.rs"]
mod tests;
