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

//! Configuration structures for the PubSub client.

use std::time::Duration;

use crate::common::consts::{
    CONNECT_TIMEOUT_SECS, HEARTBEAT_INTERVAL_SECS, HEARTBEAT_TIMEOUT_SECS, PUBSUB_WS_URL,
    RECONNECT_DELAY_SECS, REQUEST_TIMEOUT_SECS,
};

/// Configuration for the PubSub WebSocket client.
///
/// Defaults mirror the timing constants in [`crate::common::consts`]; all intervals
/// may be overridden for testing or non-standard deployments.
#[derive(Clone, Debug)]
pub struct PubSubConfig {
    /// The WebSocket endpoint URL.
    pub url: String,
    /// Optional OAuth token attached to LISTEN/UNLISTEN request payloads.
    pub auth_token: Option<String>,
    /// Interval between keep-alive probes.
    pub heartbeat_interval: Duration,
    /// Deadline for a probe acknowledgment before the connection is declared dead.
    pub heartbeat_timeout: Duration,
    /// Deadline for a control request response.
    pub request_timeout: Duration,
    /// Flat delay before an automatic reconnect attempt.
    pub reconnect_delay: Duration,
    /// Bound on a single connection attempt.
    pub connect_timeout: Duration,
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self {
            url: PUBSUB_WS_URL.to_string(),
            auth_token: None,
            heartbeat_interval: Duration::from_secs(HEARTBEAT_INTERVAL_SECS),
            heartbeat_timeout: Duration::from_secs(HEARTBEAT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            reconnect_delay: Duration::from_secs(RECONNECT_DELAY_SECS),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }
}

impl PubSubConfig {
    /// Creates a configuration with default timings and the given auth token.
    #[must_use]
    pub fn new(auth_token: Option<String>) -> Self {
        Self {
            auth_token,
            ..Default::default()
        }
    }

    /// Overrides the endpoint URL.
    #[must_use]
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = url.into();
        self
    }

    /// Overrides the keep-alive probe interval.
    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Overrides the probe acknowledgment deadline.
    #[must_use]
    pub fn with_heartbeat_timeout(mut self, timeout: Duration) -> Self {
        self.heartbeat_timeout = timeout;
        self
    }

    /// Overrides the control request deadline.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Overrides the flat reconnect delay.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Overrides the connection attempt bound.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
