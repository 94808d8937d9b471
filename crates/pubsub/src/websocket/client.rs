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

//! WebSocket client for the PubSub edge service.
//!
//! The [`PubSubClient`] is a cheap-to-clone handle over a dedicated connection
//! task which owns all mutable state. Public methods translate to commands on an
//! unbounded channel and suspend the caller on a oneshot reply, so concurrent
//! calls are serialized in submission order without any locking.

use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

use tokio::sync::{mpsc, oneshot};

use super::{
    dispatch::{EventSubscription, TopicSubscription},
    error::{PubSubError, PubSubResult},
    handler::{Command, ConnectionActor, ConnectionState},
};
use crate::config::PubSubConfig;

/// Client for the PubSub edge WebSocket API.
#[derive(Clone, Debug)]
pub struct PubSubClient {
    config: PubSubConfig,
    cmd_tx: mpsc::UnboundedSender<Command>,
    state: Arc<AtomicU8>,
}

impl PubSubClient {
    /// Creates a new [`PubSubClient`] and spawns its connection task.
    ///
    /// No I/O happens until [`Self::connect`] is called. Must be called from
    /// within a Tokio runtime.
    #[must_use]
    pub fn new(config: PubSubConfig) -> Self {
        let state = Arc::new(AtomicU8::new(ConnectionState::Disconnected.as_u8()));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let actor = ConnectionActor::new(config.clone(), state.clone(), cmd_rx);
        tokio::spawn(actor.run());

        Self {
            config,
            cmd_tx,
            state,
        }
    }

    /// Returns the configured endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Returns the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Relaxed))
    }

    /// Returns whether the client is actively connected.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Establishes the connection.
    ///
    /// Idempotent: calling this while connecting or connected is a no-op. The
    /// returned future completes once the transport is up and resubscription of
    /// all registered topics has been issued (fire-and-forget).
    ///
    /// # Errors
    ///
    /// Returns a transport error if the attempt fails; the client remains
    /// disconnected and no automatic retry is scheduled.
    pub async fn connect(&self) -> PubSubResult<()> {
        self.command(|reply| Command::Connect { reply }).await?
    }

    /// Tears the connection down.
    ///
    /// Idempotent: with no active transport this only emits the `Disconnected`
    /// notification. Every outstanding request is rejected with
    /// [`PubSubError::Cleared`] and all timers are cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`PubSubError::Closed`] if the connection task has stopped.
    pub async fn disconnect(&self) -> PubSubResult<()> {
        self.command(|reply| Command::Disconnect { reply }).await
    }

    /// Subscribes to the given topics.
    ///
    /// The registry is updated optimistically before the LISTEN request is sent;
    /// on any failure (remote error, timeout, send failure, or disconnect) the
    /// topics added by this call are rolled back. While disconnected the call
    /// succeeds immediately and the topics are picked up by resubscription on
    /// the next connect.
    ///
    /// # Errors
    ///
    /// Returns the remote error message, [`PubSubError::Timeout`], or
    /// [`PubSubError::Cleared`] when the request does not complete.
    pub async fn listen<I, S>(&self, topics: I) -> PubSubResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let topics: Vec<String> = topics.into_iter().map(Into::into).collect();
        self.command(|reply| Command::Listen { topics, reply })
            .await?
    }

    /// Unsubscribes from the given topics.
    ///
    /// Topics are removed from the registry only once the remote confirms.
    ///
    /// # Errors
    ///
    /// Returns [`PubSubError::NotConnected`] while disconnected, or the failure
    /// of the UNLISTEN request.
    pub async fn unlisten<I, S>(&self, topics: I) -> PubSubResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let topics: Vec<String> = topics.into_iter().map(Into::into).collect();
        self.command(|reply| Command::Unlisten { topics, reply })
            .await?
    }

    /// Returns a snapshot of the registered topics.
    ///
    /// # Errors
    ///
    /// Returns [`PubSubError::Closed`] if the connection task has stopped.
    pub async fn topics(&self) -> PubSubResult<Vec<String>> {
        self.command(|reply| Command::Topics { reply }).await
    }

    /// Subscribes to lifecycle notifications and generic message events.
    ///
    /// # Errors
    ///
    /// Returns [`PubSubError::Closed`] if the connection task has stopped.
    pub async fn events(&self) -> PubSubResult<EventSubscription> {
        self.command(|reply| Command::SubscribeEvents { reply })
            .await
    }

    /// Subscribes to payloads for a single topic.
    ///
    /// Delivery additionally requires the topic to be in the registry; payloads
    /// for unregistered topics only surface as generic message events.
    ///
    /// # Errors
    ///
    /// Returns [`PubSubError::Closed`] if the connection task has stopped.
    pub async fn topic_events<S: Into<String>>(
        &self,
        topic: S,
    ) -> PubSubResult<TopicSubscription> {
        let topic = topic.into();
        self.command(|reply| Command::SubscribeTopic { topic, reply })
            .await
    }

    /// Sends a command to the connection task and awaits its reply.
    async fn command<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> PubSubResult<T> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .map_err(|_| PubSubError::Closed)?;
        rx.await.map_err(|_| PubSubError::Closed)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_client_is_disconnected() {
        let client = PubSubClient::new(PubSubConfig::default());

        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert!(!client.is_active());
        assert_eq!(client.url(), crate::common::consts::PUBSUB_WS_URL);
    }

    #[tokio::test]
    async fn test_listen_while_disconnected_registers_topics() {
        let client = PubSubClient::new(PubSubConfig::default());

        client.listen(["whispers.1"]).await.unwrap();
        client.listen(["whispers.1"]).await.unwrap();

        assert_eq!(client.topics().await.unwrap(), vec!["whispers.1"]);
    }

    #[tokio::test]
    async fn test_unlisten_while_disconnected_fails() {
        let client = PubSubClient::new(PubSubConfig::default());
        client.listen(["whispers.1"]).await.unwrap();

        let result = client.unlisten(["whispers.1"]).await;

        assert!(matches!(result, Err(PubSubError::NotConnected)));
        assert_eq!(client.topics().await.unwrap(), vec!["whispers.1"]);
    }
}
