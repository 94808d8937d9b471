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

//! PubSub WebSocket client error types.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Error types for the PubSub WebSocket client.
#[derive(Debug, Clone, Error)]
pub enum PubSubError {
    /// Client is not connected.
    #[error("Not connected")]
    NotConnected,
    /// Transport-level error (connect failure, abrupt close).
    #[error("Transport error: {0}")]
    Transport(String),
    /// Failed to send a frame over the WebSocket.
    #[error("Send error: {0}")]
    Send(String),
    /// Inbound frame was not valid JSON.
    #[error("JSON error: {0}")]
    Json(String),
    /// Inbound frame carried an unknown or malformed message type.
    #[error("Protocol error: {0}")]
    Protocol(String),
    /// The remote reported a failure in a RESPONSE frame.
    #[error("Request failed: {0}")]
    Remote(String),
    /// No response arrived before the request deadline.
    #[error("Request timeout")]
    Timeout,
    /// The request was discarded because the connection was cleared.
    #[error("Connection cleared")]
    Cleared,
    /// The client handle outlived its connection task.
    #[error("Client closed")]
    Closed,
}

impl From<tungstenite::Error> for PubSubError {
    fn from(error: tungstenite::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for PubSubError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

/// Result type alias for PubSub WebSocket operations.
pub type PubSubResult<T> = Result<T, PubSubError>;
