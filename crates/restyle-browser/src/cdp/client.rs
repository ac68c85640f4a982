//! CDP WebSocket client.
//!
//! One socket carries every command and event. Commands get an id and
//! wait on a oneshot; the reader task hands replies back by id and fans
//! events out to the page session they belong to.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};
use url::Url;

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpRequest, CdpResponse, PageInfo};
use super::session::PageSession;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Reply = Result<Value, CdpError>;

/// Routes inbound messages to whoever is waiting for them.
#[derive(Default)]
pub(crate) struct Router {
    replies: Mutex<HashMap<u64, oneshot::Sender<Reply>>>,
    sessions: Mutex<HashMap<String, mpsc::UnboundedSender<CdpResponse>>>,
}

impl Router {
    fn expect_reply(&self, id: u64) -> oneshot::Receiver<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().insert(id, tx);
        rx
    }

    fn forget_reply(&self, id: u64) {
        self.replies.lock().remove(&id);
    }

    fn open_session(&self, session_id: &str) -> mpsc::UnboundedReceiver<CdpResponse> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.sessions.lock().insert(session_id.to_string(), tx);
        rx
    }

    /// Ends the session's event stream.
    fn close_session(&self, session_id: &str) {
        self.sessions.lock().remove(session_id);
    }

    pub(crate) fn route(&self, msg: CdpResponse) {
        if let Some(id) = msg.id {
            let Some(tx) = self.replies.lock().remove(&id) else {
                trace!("Reply {} has no waiter", id);
                return;
            };
            let reply = match msg.error {
                Some(error) => Err(CdpError::Protocol {
                    code: error.code,
                    message: error.message,
                }),
                None => Ok(msg.result.unwrap_or(Value::Null)),
            };
            let _ = tx.send(reply);
            return;
        }

        match msg.method.as_deref() {
            Some("Target.detachedFromTarget") => {
                let detached = msg
                    .params
                    .as_ref()
                    .and_then(|p| p["sessionId"].as_str());
                if let Some(session_id) = detached {
                    debug!("Session {} detached", session_id);
                    self.close_session(session_id);
                }
            }
            Some(_) => {
                let Some(session_id) = msg.session_id.as_deref() else {
                    return;
                };
                let tx = self.sessions.lock().get(session_id).cloned();
                if let Some(tx) = tx {
                    let _ = tx.send(msg);
                }
            }
            None => {}
        }
    }

    /// Drop every waiter: pending commands fail and event streams end.
    pub(crate) fn shutdown(&self) {
        self.replies.lock().clear();
        self.sessions.lock().clear();
    }
}

/// Command path shared by the client and its page sessions.
#[derive(Clone)]
pub(crate) struct Channel {
    sink: Arc<tokio::sync::Mutex<SplitSink<Socket, Message>>>,
    router: Arc<Router>,
    next_id: Arc<AtomicU64>,
    timeout: Duration,
}

impl Channel {
    /// Send `method` and wait for its reply.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Reply {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let frame = serde_json::to_string(&CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(str::to_string),
        })?;
        trace!("-> {}", frame);

        let reply = self.router.expect_reply(id);
        let sent = self.sink.lock().await.send(Message::Text(frame.into())).await;
        if let Err(e) = sent {
            self.router.forget_reply(id);
            return Err(e.into());
        }

        match tokio::time::timeout(self.timeout, reply).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.router.forget_reply(id);
                Err(CdpError::Timeout(method.to_string()))
            }
        }
    }
}

async fn read_socket(mut source: SplitStream<Socket>, router: Arc<Router>) {
    while let Some(frame) = source.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("CDP socket error: {}", e);
                break;
            }
        };
        trace!("<- {}", text);
        match serde_json::from_str::<CdpResponse>(&text) {
            Ok(msg) => router.route(msg),
            Err(e) => warn!("Unparseable CDP message: {}", e),
        }
    }
    debug!("CDP socket closed");
    router.shutdown();
}

/// Connection to a running Chromium.
pub struct CdpClient {
    http_base: String,
    browser: String,
    channel: Channel,
    reader: JoinHandle<()>,
}

impl CdpClient {
    /// Connect through the HTTP debugging endpoint, e.g.
    /// `http://127.0.0.1:9222`. Each command waits at most `timeout`.
    pub async fn connect(endpoint: &str, timeout: Duration) -> Result<Self, CdpError> {
        let http_base = Url::parse(endpoint)?
            .as_str()
            .trim_end_matches('/')
            .to_string();

        let unreachable =
            |e: reqwest::Error| CdpError::Unreachable(format!("{}: {}", endpoint, e));
        let version: BrowserVersion = reqwest::get(format!("{}/json/version", http_base))
            .await
            .map_err(unreachable)?
            .json()
            .await
            .map_err(unreachable)?;

        let (socket, _) = tokio_tungstenite::connect_async(&version.web_socket_debugger_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(e.to_string()))?;
        let (sink, source) = socket.split();

        let router = Arc::new(Router::default());
        let reader = tokio::spawn(read_socket(source, router.clone()));
        let channel = Channel {
            sink: Arc::new(tokio::sync::Mutex::new(sink)),
            router,
            next_id: Arc::new(AtomicU64::new(1)),
            timeout,
        };

        debug!(browser = %version.browser, "Connected to {}", http_base);
        Ok(Self {
            http_base,
            browser: version.browser,
            channel,
            reader,
        })
    }

    /// Browser product string, e.g. `Chrome/126.0.0.0`.
    pub fn browser(&self) -> &str {
        &self.browser
    }

    /// Browser-level command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.channel.call(method, params, None).await
    }

    /// Targets from `/json/list`, most recently focused first.
    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CdpError> {
        let pages = reqwest::get(format!("{}/json/list", self.http_base))
            .await?
            .json()
            .await?;
        Ok(pages)
    }

    /// Open a flattened session on `target_id` with the Page and Runtime
    /// domains enabled.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let attached = self
            .call(
                "Target.attachToTarget",
                Some(json!({"targetId": target_id, "flatten": true})),
            )
            .await?;
        let session_id = attached["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("attachToTarget without sessionId".into()))?
            .to_string();

        let events = self.channel.router.open_session(&session_id);
        let session = PageSession::new(
            target_id.to_string(),
            session_id,
            self.channel.clone(),
            events,
        );
        session.enable_domains().await?;
        Ok(session)
    }

    pub async fn detach_page(&self, session: &PageSession) -> Result<(), CdpError> {
        self.channel.router.close_session(session.session_id());
        self.call(
            "Target.detachFromTarget",
            Some(json!({"sessionId": session.session_id()})),
        )
        .await
        .map(|_| ())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
