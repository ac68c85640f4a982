use restyle_dom::MemoryDocument;
use restyle_protocols::MockClipboard;

use super::*;
use crate::copy::{LABEL_COPIED, LABEL_IDLE, PANEL_ID};
use crate::stylesheet::STYLE_ID;

const PAGE: &str = r#"<html><head></head><body>
<div id="root">
  <header><svg viewBox="0 0 84 32"></svg></header>
  <h1 class="QuestionHeader-title">title</h1>
  <div class="Question-mainColumn">
    <div class="AnswerItem">A</div>
    <div class="AnswerItem">B</div>
  </div>
</div>
</body></html>"#;

fn styler(clipboard: MockClipboard) -> SiteStyler {
    SiteStyler::new(
        SiteConfig::default(),
        &InjectorConfig::default(),
        Arc::new(clipboard),
    )
}

fn quiet_clipboard() -> MockClipboard {
    let mut clipboard = MockClipboard::new();
    clipboard.expect_write_text().never();
    clipboard
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_activation_installs_everything() {
    let doc = Arc::new(MemoryDocument::from_html(PAGE));
    let styler = styler(quiet_clipboard());

    let handle = styler.start(doc.clone()).await.unwrap();
    assert!(handle.is_some());
    assert_eq!(doc.select(&format!("#{}", STYLE_ID)).unwrap().len(), 1);
    assert_eq!(doc.select(&format!("#{}", BUTTON_ID)).unwrap().len(), 1);
    assert_eq!(doc.select("header img").unwrap().len(), 1);
    assert_eq!(doc.observer_count(), 1);
    assert_eq!(styler.stats().passes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_mutation_burst_runs_one_pass() {
    let doc = Arc::new(MemoryDocument::from_html(PAGE));
    let styler = styler(quiet_clipboard());
    let stats = styler.stats();
    styler.start(doc.clone()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(stats.passes(), 1);

    let root = doc.select("#root").unwrap()[0];
    for _ in 0..5 {
        doc.insert_html(root, "<p>more</p>").unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    // Last insertion was 50ms ago; the pass is due 200ms after it.
    tokio::time::sleep(Duration::from_millis(149)).await;
    assert_eq!(stats.passes(), 1);
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(stats.passes(), 2);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(stats.passes(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_late_content_is_restyled() {
    let doc = Arc::new(MemoryDocument::from_html(PAGE));
    let styler = styler(quiet_clipboard());
    styler.start(doc.clone()).await.unwrap();

    let root = doc.select("#root").unwrap()[0];
    doc.insert_html(root, r#"<div class="Question-sideColumn">side</div>"#)
        .unwrap();
    assert_eq!(doc.select(".Question-sideColumn").unwrap().len(), 1);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(doc.select(".Question-sideColumn").unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reentry_only_reapplies_pass() {
    let doc = Arc::new(MemoryDocument::from_html(PAGE));
    let styler = styler(quiet_clipboard());
    styler.start(doc.clone()).await.unwrap();

    let again = styler.start(doc.clone()).await.unwrap();
    assert!(again.is_none());
    assert_eq!(styler.stats().passes(), 2);
    assert_eq!(styler.stats().activations(), 2);
    assert_eq!(doc.observer_count(), 1);
    assert_eq!(doc.select(&format!("#{}", BUTTON_ID)).unwrap().len(), 1);
    assert_eq!(doc.select(&format!("#{}", STYLE_ID)).unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_orphaned_button_is_adopted() {
    let doc = Arc::new(MemoryDocument::from_html(PAGE));
    let first = styler(quiet_clipboard());
    let gone = first.start(doc.clone()).await.unwrap().unwrap();
    gone.abort();
    assert!(gone.await.unwrap_err().is_cancelled());
    assert_eq!(doc.observer_count(), 0);
    let page: Arc<dyn Document> = doc.clone();
    assert!(!first.is_watching(&page));

    let mut clipboard = MockClipboard::new();
    clipboard
        .expect_write_text()
        .withf(|text| text.to_string() == "A\n\nB")
        .times(1)
        .returning(|_| Ok(()));
    let second = styler(clipboard);
    let handle = second.start(doc.clone()).await.unwrap();
    assert!(handle.is_some());
    assert!(second.is_watching(&page));
    assert_eq!(doc.observer_count(), 1);
    assert_eq!(doc.select(&format!("#{}", BUTTON_ID)).unwrap().len(), 1);
    assert_eq!(doc.select(&format!("#{}", STYLE_ID)).unwrap().len(), 1);

    let root = doc.select("#root").unwrap()[0];
    doc.insert_html(root, r#"<div class="Question-sideColumn">side</div>"#)
        .unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(doc.select(".Question-sideColumn").unwrap().is_empty());
    assert!(second.stats().passes() > 1);

    let button = doc.select(&format!("#{}", BUTTON_ID)).unwrap()[0];
    assert_eq!(doc.click(button), Some(ClickAction::CopyAnswers));
    settle().await;
    assert_eq!(second.stats().copies(), 1);
    assert_eq!(first.stats().copies(), 0);
    assert_eq!(doc.text_of(button), LABEL_COPIED);
}

#[tokio::test(start_paused = true)]
async fn test_same_styler_restarts_after_unload() {
    let doc = Arc::new(MemoryDocument::from_html(PAGE));
    let styler = styler(quiet_clipboard());
    let handle = styler.start(doc.clone()).await.unwrap().unwrap();
    doc.unload();
    handle.await.unwrap();

    let again = styler.start(doc.clone()).await.unwrap();
    assert!(again.is_some());
    assert_eq!(doc.observer_count(), 1);
    assert_eq!(doc.select(&format!("#{}", BUTTON_ID)).unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_copy_click_fills_clipboard_and_panel() {
    let doc = Arc::new(MemoryDocument::from_html(PAGE));
    let mut clipboard = MockClipboard::new();
    clipboard
        .expect_write_text()
        .withf(|text| text.to_string() == "A\n\nB")
        .times(1)
        .returning(|_| Ok(()));
    let styler = styler(clipboard);
    styler.start(doc.clone()).await.unwrap();

    let button = doc.select(&format!("#{}", BUTTON_ID)).unwrap()[0];
    assert_eq!(doc.click(button), Some(ClickAction::CopyAnswers));
    settle().await;

    assert_eq!(styler.stats().copies(), 1);
    assert_eq!(doc.text_of(button), LABEL_COPIED);
    let blocks = doc.select(&format!("#{} > div", PANEL_ID)).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(doc.text_of(blocks[1]), "【第2条】\nB");

    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert_eq!(doc.text_of(button), LABEL_IDLE);

    let close = doc.select(&format!("#{} > button", PANEL_ID)).unwrap()[0];
    assert_eq!(doc.click(close), Some(ClickAction::ClosePanel));
    settle().await;
    assert!(doc.select(&format!("#{}", PANEL_ID)).unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unload_stops_observation() {
    let doc = Arc::new(MemoryDocument::from_html(PAGE));
    let styler = styler(quiet_clipboard());
    let handle = styler.start(doc.clone()).await.unwrap().unwrap();

    doc.unload();
    handle.await.unwrap();
    assert_eq!(doc.observer_count(), 0);

    let root = doc.select("#root").unwrap()[0];
    doc.insert_html(root, r#"<h1 class="QuestionHeader-title">late</h1>"#)
        .unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(styler.stats().passes(), 1);
    assert_eq!(doc.text_of(doc.select(".QuestionHeader-title").unwrap()[1]), "late");
}

#[tokio::test(start_paused = true)]
async fn test_observes_body_without_root() {
    let doc = Arc::new(MemoryDocument::from_html(
        r#"<html><body><div class="Post-Sub">x</div></body></html>"#,
    ));
    let styler = styler(quiet_clipboard());
    styler.start(doc.clone()).await.unwrap();
    assert!(doc.select(".Post-Sub").unwrap().is_empty());

    let body = doc.select("body").unwrap()[0];
    doc.insert_html(body, r#"<div class="Post-Sub">y</div>"#).unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(doc.select(".Post-Sub").unwrap().is_empty());
}

#[tokio::test]
async fn test_routine_name() {
    let styler = styler(quiet_clipboard());
    assert_eq!(PageRoutine::name(&styler), "site-styler");
}
