//! Wire types for the slice of CDP the host uses.

use restyle_protocols::TabInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound command.
#[derive(Debug, Serialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Inbound message: a reply when `id` is set, an event otherwise.
#[derive(Debug, Deserialize)]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
    pub params: Option<Value>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

impl CdpResponse {
    /// Decode the params of an event named `method`.
    pub fn event<T: serde::de::DeserializeOwned>(&self, method: &str) -> Option<T> {
        if self.method.as_deref() != Some(method) {
            return None;
        }
        serde_json::from_value(self.params.clone().unwrap_or(Value::Null)).ok()
    }
}

/// `error` member of a failed reply.
#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
    pub data: Option<String>,
}

/// Entry of `/json/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: String,
    #[serde(default)]
    pub title: String,
    pub url: String,
}

impl PageInfo {
    pub fn is_page(&self) -> bool {
        self.page_type == "page"
    }
}

impl From<PageInfo> for TabInfo {
    fn from(page: PageInfo) -> Self {
        TabInfo {
            id: page.id,
            url: page.url,
            title: page.title,
        }
    }
}

/// `/json/version`. Chromium spells these keys in PascalCase.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// `Runtime.RemoteObject`, as far as handles are concerned.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    #[serde(rename = "type")]
    pub object_type: String,
    pub subtype: Option<String>,
    pub object_id: Option<String>,
}

/// `Runtime.bindingCalled` params.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingCalled {
    pub name: String,
    pub payload: String,
    pub execution_context_id: Option<i64>,
}

/// `Page.Frame`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub id: String,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub url: String,
}

impl Frame {
    pub fn is_main(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// `Page.frameNavigated` params.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameNavigated {
    pub frame: Frame,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
