use serde_json::json;

use super::*;

fn event(value: Value) -> CdpResponse {
    serde_json::from_value(value).unwrap()
}

fn binding(payload: &str) -> CdpResponse {
    event(json!({
        "method": "Runtime.bindingCalled",
        "params": {"name": BINDING, "payload": payload, "executionContextId": 1},
        "sessionId": "S"
    }))
}

#[test]
fn test_mutation_event() {
    let e = binding(r#"{"kind":"mutated","subscription":3}"#);
    assert_eq!(classify(&e), Some(SessionEvent::Mutated(SubscriptionId(3))));
}

#[test]
fn test_click_event() {
    let e = binding(r#"{"kind":"clicked","action":"copy_answers"}"#);
    assert_eq!(classify(&e), Some(SessionEvent::Clicked(ClickAction::CopyAnswers)));
    let e = binding(r#"{"kind":"clicked","action":"close_panel"}"#);
    assert_eq!(classify(&e), Some(SessionEvent::Clicked(ClickAction::ClosePanel)));
}

#[test]
fn test_foreign_binding_and_garbage_ignored() {
    let e = event(json!({
        "method": "Runtime.bindingCalled",
        "params": {"name": "somethingElse", "payload": r#"{"kind":"mutated","subscription":1}"#}
    }));
    assert_eq!(classify(&e), None);
    assert_eq!(classify(&binding("not json")), None);
    assert_eq!(classify(&binding(r#"{"kind":"clicked","action":"explode"}"#)), None);
}

#[test]
fn test_main_frame_navigation_unloads() {
    let main = event(json!({
        "method": "Page.frameNavigated",
        "params": {"frame": {"id": "F", "url": "https://www.zhihu.com/"}}
    }));
    assert_eq!(classify(&main), Some(SessionEvent::Unloaded));

    let child = event(json!({
        "method": "Page.frameNavigated",
        "params": {"frame": {"id": "C", "parentId": "F", "url": "about:blank"}}
    }));
    assert_eq!(classify(&child), None);
}

#[test]
fn test_inspector_detached_unloads() {
    let e = event(json!({"method": "Inspector.detached", "params": {"reason": "target_closed"}}));
    assert_eq!(classify(&e), Some(SessionEvent::Unloaded));
    let e = event(json!({"method": "Runtime.consoleAPICalled", "params": {}}));
    assert_eq!(classify(&e), None);
}

#[test]
fn test_op_reply_ok() {
    let reply: OpReply = serde_json::from_value(json!({"ok": [1, 2]})).unwrap();
    assert_eq!(reply.into_result().unwrap(), json!([1, 2]));

    let reply: OpReply = serde_json::from_value(json!({"ok": null})).unwrap();
    assert_eq!(reply.into_result().unwrap(), Value::Null);
}

#[test]
fn test_op_reply_errors() {
    let reply: OpReply =
        serde_json::from_value(json!({"err": "not_found", "detail": "unknown node 9", "node": 9}))
            .unwrap();
    assert!(matches!(reply.into_result(), Err(DomError::NodeNotFound(NodeId(9)))));

    let reply: OpReply = serde_json::from_value(json!({"err": "selector", "detail": "bad"})).unwrap();
    assert!(matches!(reply.into_result(), Err(DomError::InvalidSelector(_))));

    let reply: OpReply =
        serde_json::from_value(json!({"err": "detached", "detail": "x", "node": 4})).unwrap();
    assert!(matches!(reply.into_result(), Err(DomError::Detached(NodeId(4)))));

    let reply: OpReply = serde_json::from_value(json!({"err": "backend", "detail": "boom"})).unwrap();
    assert!(matches!(reply.into_result(), Err(DomError::Backend(d)) if d == "boom"));
}

#[test]
fn test_page_api_embedded() {
    assert!(PAGE_API.contains(BINDING));
    assert!(PAGE_API.contains("MutationObserver"));
}

#[test]
fn test_page_api_forgets_detached_nodes() {
    let forget = PAGE_API.find("const forget").unwrap();
    let remove = PAGE_API.find("remove: (n)").unwrap();
    assert!(forget < remove);
    assert!(PAGE_API.contains("nodes.delete(n)"));
    assert_eq!(PAGE_API.matches("forget(").count(), 2);
}
