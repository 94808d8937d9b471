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

//! Listener registries routing events to client subscriptions.
//!
//! Two explicit registries are kept: one for lifecycle and generic message events,
//! and one keyed by topic name for topic-scoped delivery. Subscriptions are handles
//! over unbounded channels; dropping a handle cancels it and the registry prunes
//! the dead sender on the next delivery.

use ahash::AHashMap;
use futures_util::Stream;
use tokio::sync::mpsc;

use super::messages::{PubSubEvent, TopicMessage};

/// Routes lifecycle events and topic payloads to registered listeners.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    event_listeners: Vec<mpsc::UnboundedSender<PubSubEvent>>,
    topic_listeners: AHashMap<String, Vec<mpsc::UnboundedSender<TopicMessage>>>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for lifecycle and generic message events.
    pub fn add_event_listener(&mut self) -> EventSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.event_listeners.push(tx);
        EventSubscription { rx }
    }

    /// Registers a listener scoped to a single topic.
    pub fn add_topic_listener(&mut self, topic: String) -> TopicSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.topic_listeners.entry(topic.clone()).or_default().push(tx);
        TopicSubscription { topic, rx }
    }

    /// Delivers an event to every live event listener, pruning cancelled ones.
    pub fn emit(&mut self, event: PubSubEvent) {
        self.event_listeners
            .retain(|listener| listener.send(event.clone()).is_ok());
    }

    /// Delivers a payload to the listeners of its topic, pruning cancelled ones.
    pub fn emit_topic(&mut self, message: &TopicMessage) {
        if let Some(listeners) = self.topic_listeners.get_mut(&message.topic) {
            listeners.retain(|listener| listener.send(message.clone()).is_ok());
            if listeners.is_empty() {
                self.topic_listeners.remove(&message.topic);
            }
        }
    }
}

/// Cancellable stream of lifecycle and generic message events.
///
/// Dropping the subscription cancels it.
#[derive(Debug)]
pub struct EventSubscription {
    rx: mpsc::UnboundedReceiver<PubSubEvent>,
}

impl EventSubscription {
    /// Receives the next event; returns `None` once the client has shut down.
    pub async fn recv(&mut self) -> Option<PubSubEvent> {
        self.rx.recv().await
    }

    /// Converts the subscription into a [`Stream`] of events.
    pub fn into_stream(self) -> impl Stream<Item = PubSubEvent> + Send + 'static {
        let mut rx = self.rx;
        async_stream::stream! {
            while let Some(event) = rx.recv().await {
                yield event;
            }
        }
    }
}

/// Cancellable stream of payloads for a single registered topic.
///
/// Dropping the subscription cancels it.
#[derive(Debug)]
pub struct TopicSubscription {
    topic: String,
    rx: mpsc::UnboundedReceiver<TopicMessage>,
}

impl TopicSubscription {
    /// Returns the topic this subscription is scoped to.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Receives the next payload; returns `None` once the client has shut down.
    pub async fn recv(&mut self) -> Option<TopicMessage> {
        self.rx.recv().await
    }

    /// Converts the subscription into a [`Stream`] of payloads.
    pub fn into_stream(self) -> impl Stream<Item = TopicMessage> + Send + 'static {
        let mut rx = self.rx;
        async_stream::stream! {
            while let Some(message) = rx.recv().await {
                yield message;
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
