// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Connection actor for the PubSub client.
//!
//! The actor runs in a dedicated Tokio task and exclusively owns the transport,
//! the topic registry, the pending request tracker, the heartbeat timers, and the
//! listener registries. Commands from [`super::client::PubSubClient`] handles and
//! transport/timer events are serialized onto this one task, so no state is ever
//! mutated concurrently and command ordering is preserved: a disconnect issued
//! behind an in-flight listen rejects that listen's pending request rather than
//! leaving it dangling.

use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

use futures_util::{SinkExt, StreamExt};
use tokio::{
    net::TcpStream,
    sync::{mpsc, oneshot},
    time::{Instant, sleep_until, timeout},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite, tungstenite::Message,
};

use super::{
    dispatch::{EventSubscription, ListenerRegistry, TopicSubscription},
    error::{PubSubError, PubSubResult},
    heartbeat::Heartbeat,
    messages::{ClientFrame, PubSubEvent, ServerFrame, TopicData, parse_server_frame},
    registry::TopicRegistry,
    requests::{PendingRequest, RequestKind, RequestTracker},
};
use crate::config::PubSubConfig;

/// The underlying WebSocket transport type.
pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    /// No transport is active.
    Disconnected = 0,
    /// A connection attempt is in progress.
    Connecting = 1,
    /// The transport is established and the heartbeat is running.
    Connected = 2,
}

impl ConnectionState {
    /// Returns the state encoded as a `u8` for atomic storage.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decodes a state previously encoded with [`Self::as_u8`].
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Connected,
            _ => Self::Disconnected,
        }
    }
}

/// Commands sent from client handles to the connection actor.
pub(crate) enum Command {
    /// Establish the connection if it is not already up.
    Connect {
        reply: oneshot::Sender<PubSubResult<()>>,
    },
    /// Tear the connection down.
    Disconnect { reply: oneshot::Sender<()> },
    /// Register topics and issue a LISTEN request.
    Listen {
        topics: Vec<String>,
        reply: oneshot::Sender<PubSubResult<()>>,
    },
    /// Issue an UNLISTEN request; topics are deregistered on success.
    Unlisten {
        topics: Vec<String>,
        reply: oneshot::Sender<PubSubResult<()>>,
    },
    /// Snapshot the registered topics.
    Topics {
        reply: oneshot::Sender<Vec<String>>,
    },
    /// Register a lifecycle/message event listener.
    SubscribeEvents {
        reply: oneshot::Sender<EventSubscription>,
    },
    /// Register a topic-scoped listener.
    SubscribeTopic {
        topic: String,
        reply: oneshot::Sender<TopicSubscription>,
    },
}

/// Owns one logical PubSub connection and drives its state machine.
pub(crate) struct ConnectionActor {
    config: PubSubConfig,
    state: Arc<AtomicU8>,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    registry: TopicRegistry,
    requests: RequestTracker,
    listeners: ListenerRegistry,
    ws: Option<WsStream>,
    heartbeat: Option<Heartbeat>,
    retry_at: Option<Instant>,
}

impl ConnectionActor {
    /// Creates an actor in the `Disconnected` state.
    pub fn new(
        config: PubSubConfig,
        state: Arc<AtomicU8>,
        cmd_rx: mpsc::UnboundedReceiver<Command>,
    ) -> Self {
        let request_timeout = config.request_timeout;
        Self {
            config,
            state,
            cmd_rx,
            registry: TopicRegistry::new(),
            requests: RequestTracker::new(request_timeout),
            listeners: ListenerRegistry::new(),
            ws: None,
            heartbeat: None,
            retry_at: None,
        }
    }

    /// Runs the actor until every client handle has been dropped.
    pub async fn run(mut self) {
        loop {
            let ack_deadline = self.heartbeat.as_ref().and_then(Heartbeat::deadline);
            let request_deadline = self.requests.next_deadline();
            let retry_at = self.retry_at;

            tokio::select! {
                maybe_cmd = self.cmd_rx.recv() => {
                    match maybe_cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => break,
                    }
                }
                incoming = next_frame(&mut self.ws) => {
                    self.handle_transport(incoming);
                }
                () = next_probe(&mut self.heartbeat) => {
                    self.send_probe().await;
                }
                () = sleep_opt(ack_deadline) => {
                    tracing::warn!("Heartbeat acknowledgment overdue, connection presumed dead");
                    self.begin_reconnect();
                }
                () = sleep_opt(request_deadline) => {
                    self.expire_requests();
                }
                () = sleep_opt(retry_at) => {
                    self.retry_at = None;
                    if self.establish().await.is_err() {
                        self.retry_at = Some(Instant::now() + self.config.reconnect_delay);
                    }
                }
            }
        }

        tracing::debug!("All client handles dropped, stopping connection task");
        self.teardown();
    }

    /// Processes a command from a client handle.
    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Connect { reply } => {
                if self.ws.is_some() {
                    let _ = reply.send(Ok(()));
                    return;
                }
                // A manual connect supersedes any scheduled automatic attempt.
                self.retry_at = None;
                let result = self.establish().await;
                let _ = reply.send(result);
            }
            Command::Disconnect { reply } => {
                self.retry_at = None;
                self.teardown();
                let _ = reply.send(());
            }
            Command::Listen { topics, reply } => {
                let added = self.registry.add(topics.iter().cloned());
                if self.ws.is_some() {
                    self.issue(RequestKind::Listen { added }, topics, Some(reply))
                        .await;
                } else {
                    // Offline: the topics stay registered and ride along with the
                    // resubscription issued on the next successful connect.
                    let _ = reply.send(Ok(()));
                }
            }
            Command::Unlisten { topics, reply } => {
                if self.ws.is_some() {
                    self.issue(
                        RequestKind::Unlisten {
                            topics: topics.clone(),
                        },
                        topics,
                        Some(reply),
                    )
                    .await;
                } else {
                    let _ = reply.send(Err(PubSubError::NotConnected));
                }
            }
            Command::Topics { reply } => {
                let _ = reply.send(self.registry.topics());
            }
            Command::SubscribeEvents { reply } => {
                let _ = reply.send(self.listeners.add_event_listener());
            }
            Command::SubscribeTopic { topic, reply } => {
                let _ = reply.send(self.listeners.add_topic_listener(topic));
            }
        }
    }

    /// Attempts to establish the transport and bring the connection up.
    ///
    /// On success the heartbeat is started and one bulk LISTEN covering the whole
    /// registry is issued fire-and-forget before `Connected` is emitted.
    async fn establish(&mut self) -> PubSubResult<()> {
        self.set_state(ConnectionState::Connecting);
        self.listeners.emit(PubSubEvent::Connecting);
        tracing::info!("Connecting to {}", self.config.url);

        match self.open_transport().await {
            Ok(ws) => {
                self.ws = Some(ws);
                self.heartbeat = Some(Heartbeat::new(
                    self.config.heartbeat_interval,
                    self.config.heartbeat_timeout,
                ));
                self.resubscribe().await;
                self.set_state(ConnectionState::Connected);
                self.listeners.emit(PubSubEvent::Connected);
                tracing::info!("Connected to {}", self.config.url);
                Ok(())
            }
            Err(e) => {
                self.set_state(ConnectionState::Disconnected);
                tracing::warn!(error = %e, "Connection attempt failed");
                self.listeners.emit(PubSubEvent::Error(e.clone()));
                Err(e)
            }
        }
    }

    /// Opens the WebSocket transport, bounded by the configured connect timeout.
    async fn open_transport(&self) -> PubSubResult<WsStream> {
        match timeout(
            self.config.connect_timeout,
            connect_async(self.config.url.as_str()),
        )
        .await
        {
            Ok(Ok((ws, _response))) => Ok(ws),
            Ok(Err(e)) => Err(PubSubError::Transport(e.to_string())),
            Err(_) => Err(PubSubError::Transport(format!(
                "connection attempt timed out after {:?}",
                self.config.connect_timeout
            ))),
        }
    }

    /// Re-issues one LISTEN covering the entire registry.
    ///
    /// Fire-and-forget: a failure is surfaced as an `Error` event but never rolls
    /// back the registry, which remains the source of truth for intent.
    async fn resubscribe(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        let topics = self.registry.topics();
        tracing::debug!("Resubscribing {} topics", topics.len());
        self.issue(RequestKind::Resubscribe, topics, None).await;
    }

    /// Sends a control request and records it as pending.
    async fn issue(
        &mut self,
        kind: RequestKind,
        topics: Vec<String>,
        reply: Option<oneshot::Sender<PubSubResult<()>>>,
    ) {
        let is_unlisten = matches!(kind, RequestKind::Unlisten { .. });
        let nonce = self.requests.insert(kind, reply);
        let data = TopicData {
            topics,
            auth_token: self.config.auth_token.clone(),
        };
        let frame = if is_unlisten {
            ClientFrame::Unlisten {
                nonce: nonce.clone(),
                data,
            }
        } else {
            ClientFrame::Listen {
                nonce: nonce.clone(),
                data,
            }
        };

        if let Err(e) = self.send_frame(&frame).await {
            if let Some(entry) = self.requests.remove(&nonce) {
                self.complete_request(entry, Err(e));
            }
        }
    }

    /// Serializes and transmits a frame on the active transport.
    async fn send_frame(&mut self, frame: &ClientFrame) -> PubSubResult<()> {
        let payload = serde_json::to_string(frame)?;
        let Some(ws) = self.ws.as_mut() else {
            return Err(PubSubError::NotConnected);
        };
        tracing::trace!("Sending frame: {payload}");
        ws.send(Message::Text(payload.into()))
            .await
            .map_err(|e| PubSubError::Send(e.to_string()))
    }

    /// Sends a keep-alive probe and arms the acknowledgment deadline.
    async fn send_probe(&mut self) {
        match self.send_frame(&ClientFrame::Ping).await {
            Ok(()) => {
                if let Some(heartbeat) = self.heartbeat.as_mut() {
                    heartbeat.arm();
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Keep-alive probe failed");
                self.listeners.emit(PubSubEvent::Error(e));
                self.begin_reconnect();
            }
        }
    }

    /// Handles a transport event: a frame, an error, or the end of the stream.
    fn handle_transport(&mut self, incoming: Option<Result<Message, tungstenite::Error>>) {
        match incoming {
            Some(Ok(Message::Text(text))) => self.dispatch_frame(text.as_str()),
            Some(Ok(Message::Close(frame))) => {
                tracing::info!("Transport closed by remote: {frame:?}");
                self.begin_reconnect();
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Transport error");
                self.listeners
                    .emit(PubSubEvent::Error(PubSubError::Transport(e.to_string())));
                self.begin_reconnect();
            }
            None => {
                tracing::info!("Transport stream ended");
                self.begin_reconnect();
            }
        }
    }

    /// Decodes one inbound text frame and routes it.
    ///
    /// Undecodable frames surface as non-fatal `Error` events; the connection is
    /// never torn down over them.
    fn dispatch_frame(&mut self, text: &str) {
        let frame = match parse_server_frame(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding undecodable frame");
                self.listeners.emit(PubSubEvent::Error(e));
                return;
            }
        };

        match frame {
            ServerFrame::Pong => {
                if let Some(heartbeat) = self.heartbeat.as_mut() {
                    heartbeat.ack();
                }
            }
            ServerFrame::Reconnect => {
                tracing::info!("Reconnect requested by remote");
                self.begin_reconnect();
            }
            ServerFrame::Response { nonce, error } => {
                let Some(nonce) = nonce else {
                    tracing::debug!("Response frame without nonce, ignoring");
                    return;
                };
                let Some(entry) = self.requests.remove(&nonce) else {
                    tracing::debug!(%nonce, "Response for unknown or stale nonce, ignoring");
                    return;
                };
                let result = if error.is_empty() {
                    Ok(())
                } else {
                    Err(PubSubError::Remote(error))
                };
                self.complete_request(entry, result);
            }
            ServerFrame::Message { data } => {
                let registered = self.registry.contains(&data.topic);
                self.listeners.emit(PubSubEvent::Message(data.clone()));
                // Topic routing is advisory: unregistered topics still produce the
                // generic event above but are not delivered to topic listeners.
                if registered {
                    self.listeners.emit_topic(&data);
                }
            }
        }
    }

    /// Resolves a pending request exactly once, applying its registry effect.
    fn complete_request(&mut self, entry: PendingRequest, result: PubSubResult<()>) {
        match (&entry.kind, &result) {
            (RequestKind::Listen { added }, Err(_)) => self.registry.remove(added),
            (RequestKind::Unlisten { topics }, Ok(())) => self.registry.remove(topics),
            (RequestKind::Resubscribe, Err(e)) => {
                tracing::warn!(error = %e, "Resubscription failed");
                self.listeners.emit(PubSubEvent::Error(e.clone()));
            }
            _ => {}
        }

        if let Some(reply) = entry.reply {
            let _ = reply.send(result);
        }
    }

    /// Fails every pending request whose deadline has passed.
    fn expire_requests(&mut self) {
        for entry in self.requests.expire_due(Instant::now()) {
            tracing::debug!("Control request timed out");
            self.complete_request(entry, Err(PubSubError::Timeout));
        }
    }

    /// Tears the connection down and schedules an automatic re-establishment
    /// after the flat reconnect delay.
    fn begin_reconnect(&mut self) {
        self.teardown();
        self.listeners.emit(PubSubEvent::Reconnecting);
        tracing::info!("Reconnecting in {:?}", self.config.reconnect_delay);
        self.retry_at = Some(Instant::now() + self.config.reconnect_delay);
    }

    /// Drops the transport, cancels both heartbeat timers, and rejects every
    /// pending request with a cleared error. Safe to call with nothing active;
    /// the `Disconnected` notification is emitted regardless.
    fn teardown(&mut self) {
        self.heartbeat = None;
        self.ws = None;

        for entry in self.requests.clear() {
            self.complete_request(entry, Err(PubSubError::Cleared));
        }

        self.set_state(ConnectionState::Disconnected);
        self.listeners.emit(PubSubEvent::Disconnected);
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state.as_u8(), Ordering::Relaxed);
    }
}

/// Resolves with the next transport event, or never when no transport is active.
async fn next_frame(
    ws: &mut Option<WsStream>,
) -> Option<Result<Message, tungstenite::Error>> {
    match ws {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

/// Resolves when the next keep-alive probe is due, or never when idle.
async fn next_probe(heartbeat: &mut Option<Heartbeat>) {
    match heartbeat {
        Some(heartbeat) => heartbeat.tick().await,
        None => std::future::pending().await,
    }
}

/// Resolves at `deadline`, or never when no deadline is armed.
async fn sleep_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
