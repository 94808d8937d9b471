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
//! This module provides a two-layer architecture:
//! - Outer client: clonable handle translating calls into serialized commands.
//! - Inner connection actor: dedicated Tokio task owning the transport, topic
//!   registry, pending request tracker, heartbeat timers, and listener registries.
//!
//! Features:
//! - LISTEN/UNLISTEN subscription management with nonce-correlated responses
//! - Keep-alive PING/PONG with a dead-connection deadline
//! - Automatic flat-delay reconnection with full resubscription
//! - Lifecycle and per-topic event subscriptions

pub mod client;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod heartbeat;
pub mod messages;
pub mod registry;
pub mod requests;

pub use client::PubSubClient;
pub use dispatch::{EventSubscription, TopicSubscription};
pub use error::{PubSubError, PubSubResult};
pub use handler::ConnectionState;
pub use messages::{PubSubEvent, TopicMessage};
