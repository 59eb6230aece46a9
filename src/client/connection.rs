//! Feed connection
//!
//! `Connection` owns the declared subscriptions and the lifecycle callbacks
//! for one feed URL. `connect` spawns the task that dials the feed, re-sends
//! every declared subscription as soon as the socket opens and demultiplexes
//! pushed frames into `Envelope`s for the message handlers.
//!
//! Handlers run on the connection task. They must not call back into the
//! registration methods (`on_*`) of the same connection.
//!
//! Malformed frames are logged and dropped; they never end the session.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tracing::{debug, error, info, warn};
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::client::state::{ConnectionState, ReconnectPolicy};
use crate::model::Topic;
use crate::transport::message::{ClientMessage, Envelope, decode_frame};
use crate::transport::websocket::{SessionEnd, run_session};
use crate::utils::DashboardError;

type MessageHandler = Box<dyn Fn(&Envelope) + Send + Sync>;
type LifecycleHandler = Box<dyn Fn() + Send + Sync>;
type ErrorHandler = Box<dyn Fn(&DashboardError) + Send + Sync>;

#[derive(Default)]
struct Handlers {
    message: Vec<MessageHandler>,
    open: Vec<LifecycleHandler>,
    close: Vec<LifecycleHandler>,
    error: Vec<ErrorHandler>,
}

struct Inner {
    url: String,
    policy: ReconnectPolicy,
    state: Mutex<ConnectionState>,
    subscriptions: Mutex<Vec<Topic>>,
    outbound: Mutex<Option<mpsc::UnboundedSender<WsMessage>>>,
    handlers: Mutex<Handlers>,
    shutdown: watch::Sender<bool>,
}

/// Cheaply cloneable handle to a feed connection.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // a panicking handler must not wedge the connection
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Connection {
    pub fn new(url: impl Into<String>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                url: url.into(),
                policy: ReconnectPolicy::None,
                state: Mutex::new(ConnectionState::Closed),
                subscriptions: Mutex::new(Vec::new()),
                outbound: Mutex::new(None),
                handlers: Mutex::new(Handlers::default()),
                shutdown,
            }),
        }
    }

    /// Sets the reconnect policy. Only valid before the handle is cloned.
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.policy = policy,
            None => warn!("reconnect policy ignored on a shared connection"),
        }
        self
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    pub fn state(&self) -> ConnectionState {
        *lock(&self.inner.state)
    }

    /// Topics declared so far, in declaration order.
    pub fn subscriptions(&self) -> Vec<Topic> {
        lock(&self.inner.subscriptions).clone()
    }

    pub fn on_message(&self, handler: impl Fn(&Envelope) + Send + Sync + 'static) {
        lock(&self.inner.handlers).message.push(Box::new(handler));
    }

    pub fn on_open(&self, handler: impl Fn() + Send + Sync + 'static) {
        lock(&self.inner.handlers).open.push(Box::new(handler));
    }

    pub fn on_close(&self, handler: impl Fn() + Send + Sync + 'static) {
        lock(&self.inner.handlers).close.push(Box::new(handler));
    }

    pub fn on_error(&self, handler: impl Fn(&DashboardError) + Send + Sync + 'static) {
        lock(&self.inner.handlers).error.push(Box::new(handler));
    }

    /// Declares interest in `topic`. The declaration is sent right away when
    /// the socket is open and again every time it (re)opens.
    pub fn subscribe(&self, topic: impl Into<Topic>) {
        let topic = topic.into();
        // sent under the subscription lock so a session opening meanwhile
        // either replays the topic or sees it sent here, never both
        let mut subscriptions = lock(&self.inner.subscriptions);
        if subscriptions.contains(&topic) {
            return;
        }
        subscriptions.push(topic.clone());
        self.send(ClientMessage::Subscribe(topic));
    }

    pub fn unsubscribe(&self, topic: impl Into<Topic>) {
        let topic = topic.into();
        let mut subscriptions = lock(&self.inner.subscriptions);
        let before = subscriptions.len();
        subscriptions.retain(|t| t != &topic);
        if subscriptions.len() != before {
            self.send(ClientMessage::Unsubscribe(topic));
        }
    }

    /// Starts the connection task.
    pub fn connect(&self) -> JoinHandle<()> {
        self.inner.shutdown.send_replace(false);
        let connection = self.clone();
        tokio::spawn(async move { connection.run().await })
    }

    /// Closes the socket and stops any further reconnection.
    pub fn close(&self) {
        if let Some(tx) = lock(&self.inner.outbound).take() {
            let _ = tx.send(WsMessage::Close(None));
        }
        self.inner.shutdown.send_replace(true);
    }

    fn send(&self, msg: ClientMessage) {
        if let Some(tx) = lock(&self.inner.outbound).as_ref() {
            match msg.to_json() {
                Ok(json) => {
                    if tx.send(WsMessage::text(json)).is_err() {
                        debug!("socket gone, {msg:?} deferred to next open");
                    }
                }
                Err(e) => error!("failed to encode {msg:?}: {e}"),
            }
        }
    }

    fn set_state(&self, state: ConnectionState) {
        *lock(&self.inner.state) = state;
    }

    fn shutdown_requested(&self) -> bool {
        *self.inner.shutdown.borrow()
    }

    async fn run(&self) {
        let mut attempt: u32 = 0;

        loop {
            self.set_state(ConnectionState::Connecting);
            info!("connecting to {}", self.inner.url);

            match connect_async(self.inner.url.as_str()).await {
                Ok((ws_stream, _response)) => {
                    attempt = 0;
                    let session_id = Uuid::new_v4();
                    let end = self.session(ws_stream, session_id).await;
                    match end {
                        SessionEnd::Failed(e) => {
                            error!("feed session {session_id} failed: {e}");
                            self.emit_error(&e);
                        }
                        SessionEnd::PeerClosed => info!("feed session {session_id} closed by peer"),
                        SessionEnd::Shutdown => info!("feed session {session_id} closed"),
                    }
                }
                Err(e) => {
                    let e = DashboardError::Connection(e.to_string());
                    error!("could not connect to {}: {e}", self.inner.url);
                    self.emit_error(&e);
                }
            }

            lock(&self.inner.outbound).take();
            self.set_state(ConnectionState::Closed);
            self.emit_close();

            if self.shutdown_requested() {
                break;
            }

            let Some(delay) = self.inner.policy.delay(attempt) else {
                break;
            };
            attempt = attempt.saturating_add(1);
            info!("reconnecting in {delay:?} (attempt {attempt})");

            let mut shutdown = self.inner.shutdown.subscribe();
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.wait_for(|stop| *stop) => break,
            }
        }
    }

    async fn session(
        &self,
        ws_stream: crate::transport::websocket::FeedStream,
        session_id: Uuid,
    ) -> SessionEnd {
        let (tx, rx) = mpsc::unbounded_channel::<WsMessage>();

        {
            // replay and publish the queue under the subscription lock; see `subscribe`
            let subscriptions = lock(&self.inner.subscriptions);
            for topic in subscriptions.iter() {
                match ClientMessage::Subscribe(topic.clone()).to_json() {
                    Ok(json) => {
                        let _ = tx.send(WsMessage::text(json));
                    }
                    Err(e) => error!("failed to encode subscription to {topic}: {e}"),
                }
            }
            *lock(&self.inner.outbound) = Some(tx);
        }

        self.set_state(ConnectionState::Open);
        info!("feed session {session_id} open at {}", self.inner.url);
        self.emit_open();

        let shutdown = self.inner.shutdown.subscribe();
        run_session(ws_stream, rx, shutdown, |text| self.dispatch(text)).await
    }

    fn dispatch(&self, text: &str) {
        let declared = self.subscriptions();
        match decode_frame(text, &declared) {
            Ok(envelope) => {
                debug!("update for {}", envelope.topic);
                for handler in lock(&self.inner.handlers).message.iter() {
                    handler(&envelope);
                }
            }
            Err(e) => debug!(
                "dropping frame: {e} | {}",
                text.chars().take(100).collect::<String>()
            ),
        }
    }

    fn emit_open(&self) {
        for handler in lock(&self.inner.handlers).open.iter() {
            handler();
        }
    }

    fn emit_close(&self) {
        for handler in lock(&self.inner.handlers).close.iter() {
            handler();
        }
    }

    fn emit_error(&self, e: &DashboardError) {
        for handler in lock(&self.inner.handlers).error.iter() {
            handler(e);
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("url", &self.inner.url)
            .field("state", &self.state())
            .finish()
    }
}
