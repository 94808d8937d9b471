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

//! Pending control request tracker.
//!
//! Each outgoing LISTEN/UNLISTEN carries a fresh random nonce; the tracker maps
//! that nonce to the caller's reply channel and a response deadline. Every entry
//! resolves exactly once: on the matching RESPONSE, on deadline expiry, or when
//! the connection is cleared.

use std::time::Duration;

use ahash::AHashMap;
use rand::{Rng, distr::Alphanumeric};
use tokio::{sync::oneshot, time::Instant};

use super::error::PubSubResult;
use crate::common::consts::NONCE_LENGTH;

/// Generates a random alphanumeric correlation nonce.
#[must_use]
pub fn generate_nonce(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// What a pending request does to the topic registry when it resolves.
#[derive(Debug, Clone)]
pub enum RequestKind {
    /// LISTEN issued by a caller; `added` topics are rolled back on failure.
    Listen {
        /// Topics this call newly registered.
        added: Vec<String>,
    },
    /// UNLISTEN issued by a caller; `topics` are removed on success.
    Unlisten {
        /// Topics to deregister once the remote confirms.
        topics: Vec<String>,
    },
    /// Bulk LISTEN re-issued after reconnection; fire-and-forget.
    Resubscribe,
}

/// A control request awaiting its RESPONSE frame.
#[derive(Debug)]
pub struct PendingRequest {
    /// Registry effect applied on resolution.
    pub kind: RequestKind,
    /// Caller reply channel; absent for fire-and-forget requests.
    pub reply: Option<oneshot::Sender<PubSubResult<()>>>,
    /// Response deadline.
    pub deadline: Instant,
}

/// Correlates in-flight control requests with their eventual responses.
#[derive(Debug)]
pub struct RequestTracker {
    pending: AHashMap<String, PendingRequest>,
    timeout: Duration,
}

impl RequestTracker {
    /// Creates a tracker enforcing the given per-request timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: AHashMap::new(),
            timeout,
        }
    }

    /// Records a new pending request and returns its correlation nonce.
    pub fn insert(
        &mut self,
        kind: RequestKind,
        reply: Option<oneshot::Sender<PubSubResult<()>>>,
    ) -> String {
        let nonce = generate_nonce(NONCE_LENGTH);
        let deadline = Instant::now() + self.timeout;
        self.pending.insert(
            nonce.clone(),
            PendingRequest {
                kind,
                reply,
                deadline,
            },
        );
        nonce
    }

    /// Removes and returns the entry for `nonce`, or `None` for unknown/stale nonces.
    pub fn remove(&mut self, nonce: &str) -> Option<PendingRequest> {
        self.pending.remove(nonce)
    }

    /// Returns the earliest response deadline among pending requests.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|entry| entry.deadline).min()
    }

    /// Removes and returns every entry whose deadline has passed.
    pub fn expire_due(&mut self, now: Instant) -> Vec<PendingRequest> {
        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .map(|(nonce, _)| nonce.clone())
            .collect();

        due.into_iter()
            .filter_map(|nonce| self.pending.remove(&nonce))
            .collect()
    }

    /// Removes and returns every pending entry.
    pub fn clear(&mut self) -> Vec<PendingRequest> {
        self.pending.drain().map(|(_, entry)| entry).collect()
    }

    /// Returns the number of pending requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns whether no requests are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_nonce_shape() {
        let nonce = generate_nonce(NONCE_LENGTH);
        assert_eq!(nonce.len(), NONCE_LENGTH);
        assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(nonce, generate_nonce(NONCE_LENGTH));
    }

    #[rstest]
    fn test_resolution_is_exactly_once() {
        let mut tracker = RequestTracker::new(Duration::from_secs(30));
        let nonce = tracker.insert(RequestKind::Resubscribe, None);

        assert!(tracker.remove(&nonce).is_some());
        assert!(tracker.remove(&nonce).is_none());
        assert!(tracker.is_empty());
    }

    #[rstest]
    fn test_unknown_nonce_is_ignored() {
        let mut tracker = RequestTracker::new(Duration::from_secs(30));
        tracker.insert(RequestKind::Resubscribe, None);

        assert!(tracker.remove("no-such-nonce").is_none());
        assert_eq!(tracker.len(), 1);
    }

    #[rstest]
    fn test_expire_due_removes_only_overdue_entries() {
        let mut tracker = RequestTracker::new(Duration::from_secs(30));
        let expired_nonce = tracker.insert(
            RequestKind::Listen {
                added: vec!["a".to_string()],
            },
            None,
        );
        let live_nonce = tracker.insert(RequestKind::Resubscribe, None);

        let far_future = Instant::now() + Duration::from_secs(60);
        if let Some(entry) = tracker.pending.get_mut(&live_nonce) {
            entry.deadline = far_future;
        }

        let expired = tracker.expire_due(Instant::now() + Duration::from_secs(31));
        assert_eq!(expired.len(), 1);
        assert!(matches!(expired[0].kind, RequestKind::Listen { .. }));
        assert!(tracker.remove(&expired_nonce).is_none());
        assert!(tracker.remove(&live_nonce).is_some());
    }

    #[rstest]
    fn test_next_deadline_is_earliest() {
        let mut tracker = RequestTracker::new(Duration::from_secs(30));
        assert!(tracker.next_deadline().is_none());

        let first = tracker.insert(RequestKind::Resubscribe, None);
        let first_deadline = tracker.pending.get(&first).unwrap().deadline;
        let second = tracker.insert(RequestKind::Resubscribe, None);
        if let Some(entry) = tracker.pending.get_mut(&second) {
            entry.deadline = first_deadline + Duration::from_secs(5);
        }

        assert_eq!(tracker.next_deadline(), Some(first_deadline));
    }

    #[rstest]
    fn test_clear_drains_everything() {
        let mut tracker = RequestTracker::new(Duration::from_secs(30));
        tracker.insert(RequestKind::Resubscribe, None);
        tracker.insert(
            RequestKind::Unlisten {
                topics: vec!["a".to_string()],
            },
            None,
        );

        let cleared = tracker.clear();
        assert_eq!(cleared.len(), 2);
        assert!(tracker.is_empty());
        assert!(tracker.next_deadline().is_none());
    }
}
