use async_trait::async_trait;
use restyle_protocols::{Document, DomError, MockNotifier, MockScriptHost, MockTabHost};

use super::*;

const DENIED: &str = "Cannot access a chrome:// URL";

struct NoopRoutine;

#[async_trait]
impl PageRoutine for NoopRoutine {
    fn name(&self) -> &str {
        "noop"
    }

    async fn activate(&self, _document: Arc<dyn Document>) -> Result<(), DomError> {
        Ok(())
    }
}

fn tab_at(url: &'static str) -> MockTabHost {
    let mut tabs = MockTabHost::new();
    tabs.expect_active_tab()
        .returning(move || Ok(Some(TabInfo::new("7", url))));
    tabs
}

fn silent_notifier() -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier.expect_notify().never();
    notifier
}

fn expect_notice(id: &'static str, message: &'static str) -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(move |got, n| got.to_string() == id && n.message == message)
        .times(1)
        .returning(|_, _| Ok(()));
    notifier
}

fn dispatcher(tabs: MockTabHost, scripts: MockScriptHost, notifier: MockNotifier) -> Dispatcher {
    Dispatcher::new(
        Arc::new(tabs),
        Arc::new(scripts),
        Arc::new(notifier),
        DispatchRules::default(),
    )
}

#[tokio::test]
async fn test_off_site_tab_is_never_executed() {
    let mut scripts = MockScriptHost::new();
    scripts.expect_execute().never();
    let d = dispatcher(
        tab_at("https://example.com/"),
        scripts,
        expect_notice(SITE_ERROR_ID, "请在知乎页面使用此功能！"),
    );

    let outcome = d.restyle_active_tab(Arc::new(NoopRoutine)).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Ineligible);
}

#[tokio::test]
async fn test_on_site_routine_executes() {
    let mut scripts = MockScriptHost::new();
    scripts
        .expect_execute()
        .withf(|tab, injection| {
            tab.id == "7" && matches!(injection, Injection::Routine(r) if r.name() == "noop")
        })
        .times(1)
        .returning(|_, _| Ok(()));
    let d = dispatcher(
        tab_at("https://www.zhihu.com/question/1"),
        scripts,
        silent_notifier(),
    );

    let outcome = d.restyle_active_tab(Arc::new(NoopRoutine)).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Injected);
}

#[tokio::test]
async fn test_permission_rejection_notifies() {
    let mut scripts = MockScriptHost::new();
    scripts
        .expect_execute()
        .returning(|_, _| Err(HostError::ExecutionFailed(DENIED.to_string())));
    let d = dispatcher(
        tab_at("https://www.zhihu.com/"),
        scripts,
        expect_notice(SITE_ERROR_ID, "无法在此页面执行此操作！"),
    );

    let outcome = d.restyle_active_tab(Arc::new(NoopRoutine)).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Rejected);
}

#[tokio::test]
async fn test_other_failure_is_swallowed() {
    let mut scripts = MockScriptHost::new();
    scripts
        .expect_execute()
        .returning(|_, _| Err(HostError::ExecutionFailed("target crashed".to_string())));
    let d = dispatcher(tab_at("https://www.zhihu.com/"), scripts, silent_notifier());

    let outcome = d.restyle_active_tab(Arc::new(NoopRoutine)).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Failed);
}

#[tokio::test]
async fn test_no_active_tab() {
    let mut tabs = MockTabHost::new();
    tabs.expect_active_tab().returning(|| Ok(None));
    let mut scripts = MockScriptHost::new();
    scripts.expect_execute().never();
    let d = dispatcher(
        tabs,
        scripts,
        expect_notice(INJECT_ERROR_ID, "You cannot inject script here!"),
    );

    let outcome = d.restyle_active_tab(Arc::new(NoopRoutine)).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::NoActiveTab);
}

#[tokio::test]
async fn test_tab_query_failure_propagates() {
    let mut tabs = MockTabHost::new();
    tabs.expect_active_tab()
        .returning(|| Err(HostError::Unavailable("connection refused".to_string())));
    let d = dispatcher(tabs, MockScriptHost::new(), silent_notifier());

    let err = d.inject_content_script("content.js").await.unwrap_err();
    assert!(matches!(err, DispatchError::TabQuery(_)));
}

#[tokio::test]
async fn test_restricted_scheme_warns_then_executes() {
    let mut scripts = MockScriptHost::new();
    scripts
        .expect_execute()
        .withf(|_, injection| matches!(injection, Injection::File(p) if p.ends_with("content.js")))
        .times(1)
        .returning(|_, _| Err(HostError::ExecutionFailed(DENIED.to_string())));
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(|id, _| id.to_string() == INJECT_ERROR_ID)
        .times(2)
        .returning(|_, _| Ok(()));
    let d = dispatcher(tab_at("chrome://extensions"), scripts, notifier);

    let outcome = d.inject_content_script("content.js").await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Rejected);
}

#[tokio::test]
async fn test_inject_on_regular_page() {
    let mut scripts = MockScriptHost::new();
    scripts.expect_execute().times(1).returning(|_, _| Ok(()));
    let d = dispatcher(tab_at("https://example.com/"), scripts, silent_notifier());

    let outcome = d.inject_content_script("content.js").await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Injected);
}

#[tokio::test]
async fn test_notification_failure_is_not_propagated() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .returning(|_, _| Err(HostError::Notification("no daemon".to_string())));
    let mut scripts = MockScriptHost::new();
    scripts.expect_execute().never();
    let d = dispatcher(tab_at("about:blank"), scripts, notifier);

    let outcome = d.restyle_active_tab(Arc::new(NoopRoutine)).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Ineligible);
}

#[tokio::test]
async fn test_icon_is_attached() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(|_, n| n.icon_url.as_deref() == Some("icon-34.png"))
        .times(1)
        .returning(|_, _| Ok(()));
    let d = dispatcher(
        tab_at("https://example.com/"),
        MockScriptHost::new(),
        notifier,
    )
    .with_icon("icon-34.png");

    d.restyle_active_tab(Arc::new(NoopRoutine)).await.unwrap();
}
