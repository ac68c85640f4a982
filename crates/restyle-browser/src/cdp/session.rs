//! Flattened CDP session on one page target.

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::debug;

use super::client::Channel;
use super::error::CdpError;
use super::protocol::{CdpResponse, RemoteObject};

/// Commands scoped to one page, plus that page's event stream.
pub struct PageSession {
    target_id: String,
    session_id: String,
    channel: Channel,
    events: Mutex<Option<mpsc::UnboundedReceiver<CdpResponse>>>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        channel: Channel,
        events: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            channel,
            events: Mutex::new(Some(events)),
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The session's events. Only the first caller gets the stream.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<CdpResponse>> {
        self.events.lock().take()
    }

    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.channel
            .call(method, params, Some(&self.session_id))
            .await
    }

    /// Page events (navigation) and Runtime (bindings, evaluation).
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        for domain in ["Page.enable", "Runtime.enable"] {
            self.call(domain, None).await?;
        }
        debug!(session = %self.session_id, "Page and Runtime enabled");
        Ok(())
    }

    /// Evaluate `expression` and return its JSON value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .runtime(
                "Runtime.evaluate",
                json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                }),
            )
            .await?;
        Ok(result["value"].clone())
    }

    /// Evaluate `expression` and keep the result in the page as a handle.
    pub async fn evaluate_handle(&self, expression: &str) -> Result<RemoteObject, CdpError> {
        let result = self
            .runtime(
                "Runtime.evaluate",
                json!({"expression": expression, "returnByValue": false}),
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Call `function` with `this` bound to the remote object and
    /// `args` passed by value.
    pub async fn call_function_on(
        &self,
        object_id: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, CdpError> {
        let arguments: Vec<Value> = args.into_iter().map(|value| json!({"value": value})).collect();
        let result = self
            .runtime(
                "Runtime.callFunctionOn",
                json!({
                    "objectId": object_id,
                    "functionDeclaration": function,
                    "arguments": arguments,
                    "returnByValue": true,
                    "awaitPromise": true,
                }),
            )
            .await?;
        Ok(result["value"].clone())
    }

    /// Expose `window[name](payload)`; calls come back as
    /// `Runtime.bindingCalled`.
    pub async fn add_binding(&self, name: &str) -> Result<(), CdpError> {
        self.call("Runtime.addBinding", Some(json!({"name": name})))
            .await
            .map(|_| ())
    }

    /// Run a Runtime command and unwrap its `result` remote object.
    async fn runtime(&self, method: &str, params: Value) -> Result<Value, CdpError> {
        let mut reply = self.call(method, Some(params)).await?;
        thrown(&reply)?;
        Ok(reply.get_mut("result").map(Value::take).unwrap_or_default())
    }
}

/// Turn `exceptionDetails` into an error, preferring the exception's own
/// description (`TypeError: ...`) over the generic `Uncaught`.
fn thrown(reply: &Value) -> Result<(), CdpError> {
    let Some(details) = reply.get("exceptionDetails") else {
        return Ok(());
    };
    let text = details["exception"]["description"]
        .as_str()
        .or_else(|| details["text"].as_str())
        .unwrap_or("Uncaught exception");
    Err(CdpError::JavaScript(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thrown_prefers_description() {
        let reply = json!({
            "result": {"type": "object"},
            "exceptionDetails": {
                "text": "Uncaught",
                "exception": {"type": "object", "description": "TypeError: x is not a function"}
            }
        });
        match thrown(&reply) {
            Err(CdpError::JavaScript(text)) => assert_eq!(text, "TypeError: x is not a function"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_thrown_falls_back_to_text() {
        let reply = json!({"exceptionDetails": {"text": "Uncaught SyntaxError"}});
        assert!(matches!(thrown(&reply), Err(CdpError::JavaScript(t)) if t == "Uncaught SyntaxError"));
    }

    #[test]
    fn test_no_exception() {
        assert!(thrown(&json!({"result": {"type": "undefined"}})).is_ok());
    }
}
