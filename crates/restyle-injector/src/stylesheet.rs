//! One-time global stylesheet.

use restyle_protocols::{Document, DomError};
use tracing::debug;

/// Reserved id of the injected `<style>` element.
pub const STYLE_ID: &str = "zhihu-style-extension-style";

/// Layout widening, media hiding, sidebar hiding and the copy button
/// hover state.
pub const GLOBAL_CSS: &str = r#"
.ContentItem, .AnswerItem, .List-item, .Card, .Question-main, .Question-mainColumn, .ContentItem-meta, .RichContent, .RichContent-inner {
  width: 100% !important;
  max-width: 100% !important;
}
.Question-mainColumn {
  margin-right: 0 !important;
}
.List-item {
  padding: 0 !important;
}
.ContentItem img,
.AnswerItem img,
.ContentItem video,
.AnswerItem video,
.RichContent img,
.RichContent video,
.RichContent-inner img,
.RichContent-inner video,
.VideoAnswerPlayer,
.VideoCard,
.ZVideoItem,
.ZVideoLinkCard,
.VideoAnswerPlayer-video,
.VideoAnswerPlayer-poster {
  display: none !important;
}
.Post-Row-Content-right {
  display: none !important;
}
.Post-Row-Content-left-article {
  width: 100% !important;
  max-width: 100% !important;
  margin: 0 !important;
  padding: 0 !important;
}
.Post-Row-Content-left-article img,
.Post-Row-Content-left-article video,
.Post-Row-Content-left-article .VideoAnswerPlayer,
.Post-Row-Content-left-article .VideoCard,
.Post-Row-Content-left-article .ZVideoItem,
.Post-Row-Content-left-article .ZVideoLinkCard,
.Post-Row-Content-left-article .VideoAnswerPlayer-video,
.Post-Row-Content-left-article .VideoAnswerPlayer-poster {
  display: none !important;
}
.Post-Sub,
.Post-NormalSub {
  display: none !important;
}
#zhihu-copy-answer-btn:hover {
  opacity: 1 !important;
}
"#;

/// Insert the global stylesheet unless an element with [`STYLE_ID`]
/// already exists. Returns whether it was inserted.
pub async fn install_stylesheet(doc: &dyn Document) -> Result<bool, DomError> {
    if doc.element_by_id(STYLE_ID).await?.is_some() {
        return Ok(false);
    }

    let target = match doc.head().await? {
        Some(head) => head,
        None => match doc.body().await? {
            Some(body) => body,
            None => doc.document_element().await?,
        },
    };

    let style = doc.create_element("style").await?;
    doc.set_attribute(style, "id", STYLE_ID).await?;
    doc.set_text(style, GLOBAL_CSS).await?;
    doc.append_child(target, style).await?;
    debug!("Global stylesheet installed");
    Ok(true)
}
