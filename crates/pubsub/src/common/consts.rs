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

//! Core constants shared across the PubSub client components.

/// Production PubSub edge WebSocket endpoint.
pub const PUBSUB_WS_URL: &str = "wss://pubsub-edge.twitch.tv";

/// Seconds between keep-alive probes on an active connection.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 120;

/// Seconds to wait for a probe acknowledgment before the connection is considered dead.
pub const HEARTBEAT_TIMEOUT_SECS: u64 = 10;

/// Seconds before an unanswered control request is failed.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Seconds to wait before re-establishing a lost connection.
pub const RECONNECT_DELAY_SECS: u64 = 5;

/// Seconds allowed for a single connection attempt.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Length of request correlation nonces.
pub const NONCE_LENGTH: usize = 18;
