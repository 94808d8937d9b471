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

//! Client for the [Twitch PubSub](https://dev.twitch.tv/docs/pubsub/) edge service.
//!
//! The crate maintains a single long-lived WebSocket connection to the PubSub
//! edge, manages topic subscriptions with correlated LISTEN/UNLISTEN control
//! requests, enforces liveness with a PING/PONG heartbeat, and recovers
//! transparently from network failures by reconnecting after a flat delay and
//! resubscribing every registered topic.
//!
//! Payloads are opaque to this client: consumers subscribe to topics and receive
//! the raw JSON bodies, along with lifecycle notifications (`Connecting`,
//! `Connected`, `Disconnected`, `Reconnecting`, `Error`).
//!
//! # Example
//!
//! ```no_run
//! use twitch_pubsub::{PubSubClient, PubSubConfig, PubSubEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubSubClient::new(PubSubConfig::new(Some("oauth-token".to_string())));
//!     let mut events = client.events().await?;
//!
//!     client.connect().await?;
//!     client.listen(["channel-points.44322889"]).await?;
//!
//!     while let Some(event) = events.recv().await {
//!         if let PubSubEvent::Message(msg) = event {
//!             println!("{}: {}", msg.topic, msg.message);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod common;
pub mod config;
pub mod websocket;

pub use config::PubSubConfig;
pub use websocket::{
    ConnectionState, EventSubscription, PubSubClient, PubSubError, PubSubEvent, PubSubResult,
    TopicMessage, TopicSubscription,
};
