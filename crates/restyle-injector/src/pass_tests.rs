use restyle_dom::MemoryDocument;

use super::*;

const QUESTION_PAGE: &str = r#"<html><head></head><body>
<div id="root">
  <header class="AppHeader"><a href="/"><svg class="css-1hlrcxk" viewBox="0 0 64 30"></svg></a></header>
  <h1 class="QuestionHeader-title">How do I learn Rust?</h1>
  <div class="Question-main">
    <div class="Question-mainColumn" style="width: 694px;">
      <div class="AnswerItem">first answer</div>
    </div>
    <div class="Question-sideColumn Question-sideColumn--sticky">related</div>
  </div>
  <div class="ListShortcut"></div>
</div>
</body></html>"#;

#[tokio::test]
async fn test_first_pass_applies_every_override() {
    let doc = MemoryDocument::from_html(QUESTION_PAGE);
    let pass = StylePass::new(SiteConfig::default());

    let report = pass.apply(&doc).await.unwrap();
    assert!(report.color_set);
    assert!(report.logo_replaced);
    assert_eq!(report.titles_rewritten, 1);
    assert_eq!(report.removed, 1);
    assert_eq!(report.widened, 2);

    let html = doc.document_element().await.unwrap();
    assert_eq!(doc.style_property(html, TEXT_COLOR_VAR).await.unwrap(), TEXT_COLOR);

    let title = doc.select(TITLE_SELECTOR).unwrap()[0];
    assert_eq!(doc.text_of(title), pass.site().title_text);
    assert!(doc.select(".Question-sideColumn").unwrap().is_empty());

    let column = doc.select(".Question-mainColumn").unwrap()[0];
    assert_eq!(doc.style_property(column, "width").await.unwrap(), "100%");
    assert_eq!(doc.style_property(column, "max-width").await.unwrap(), "100%");
    assert_eq!(doc.style_property(column, "margin").await.unwrap(), "0");
    assert_eq!(doc.style_property(column, "padding").await.unwrap(), "0");
}

#[tokio::test]
async fn test_second_pass_changes_nothing() {
    let doc = MemoryDocument::from_html(QUESTION_PAGE);
    let pass = StylePass::new(SiteConfig::default());

    pass.apply(&doc).await.unwrap();
    let styled = doc.to_html();

    let report = pass.apply(&doc).await.unwrap();
    assert!(report.is_noop(), "{report:?}");
    assert_eq!(doc.to_html(), styled);
    assert_eq!(doc.select(r#"img[alt="阿里语雀"]"#).unwrap().len(), 1);
}

#[tokio::test]
async fn test_pass_on_foreign_page() {
    let doc = MemoryDocument::from_html("<html><body><p>hello</p></body></html>");
    let pass = StylePass::new(SiteConfig::default());

    let report = pass.apply(&doc).await.unwrap();
    assert!(report.color_set);
    assert!(!report.logo_replaced);
    assert_eq!(report.titles_rewritten + report.removed + report.widened, 0);
}

#[tokio::test]
async fn test_late_content_is_styled() {
    let doc = MemoryDocument::from_html(QUESTION_PAGE);
    let pass = StylePass::new(SiteConfig::default());
    pass.apply(&doc).await.unwrap();

    let root = doc.select("#root").unwrap()[0];
    doc.insert_html(
        root,
        r#"<div class="Post-Sub">ad</div><h1 class="QuestionHeader-title">another</h1>"#,
    )
    .unwrap();

    let report = pass.apply(&doc).await.unwrap();
    assert_eq!(report.removed, 1);
    assert_eq!(report.titles_rewritten, 1);
    assert!(!report.color_set);
    assert!(!report.logo_replaced);
}
