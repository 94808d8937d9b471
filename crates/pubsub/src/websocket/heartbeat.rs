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

//! Keep-alive probe timers, scoped to the lifetime of one connection.

use std::time::Duration;

use tokio::time::{Instant, Interval, interval};

/// Paired probe cadence and acknowledgment deadline for one connection.
///
/// The first probe fires immediately after the connection is established; each
/// sent probe arms the acknowledgment deadline, and the matching PONG disarms it.
/// Dropping the struct cancels both timers.
#[derive(Debug)]
pub struct Heartbeat {
    probe_interval: Interval,
    timeout: Duration,
    deadline: Option<Instant>,
}

impl Heartbeat {
    /// Creates heartbeat timers with the given probe period and acknowledgment timeout.
    #[must_use]
    pub fn new(period: Duration, timeout: Duration) -> Self {
        Self {
            probe_interval: interval(period),
            timeout,
            deadline: None,
        }
    }

    /// Completes when the next probe is due.
    pub async fn tick(&mut self) {
        self.probe_interval.tick().await;
    }

    /// Arms the acknowledgment deadline after a probe has been sent.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.timeout);
    }

    /// Clears the acknowledgment deadline.
    pub fn ack(&mut self) {
        self.deadline = None;
    }

    /// Returns the pending acknowledgment deadline, if armed.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
