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

//! Topic subscription registry.
//!
//! The registry holds the *intended* subscription set: it is updated optimistically
//! by `listen`, rolled back when the request fails, and replayed wholesale after
//! every successful (re)connection, independent of what the remote currently
//! believes.

use ahash::AHashSet;

/// Returns the union of two topic sets.
#[must_use]
pub fn union(a: &AHashSet<String>, b: &AHashSet<String>) -> AHashSet<String> {
    a.union(b).cloned().collect()
}

/// Returns the elements of `a` that are not present in `b`.
#[must_use]
pub fn difference(a: &AHashSet<String>, b: &AHashSet<String>) -> AHashSet<String> {
    a.difference(b).cloned().collect()
}

/// The set of topics the client currently intends to be subscribed to.
#[derive(Debug, Default)]
pub struct TopicRegistry {
    topics: AHashSet<String>,
}

impl TopicRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds topics to the registry, returning those that were not already present.
    ///
    /// The returned subset is what a failed `listen` must roll back to restore the
    /// registry to its pre-call state.
    pub fn add<I>(&mut self, topics: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let requested: AHashSet<String> = topics.into_iter().collect();
        let added: Vec<String> = difference(&requested, &self.topics).into_iter().collect();
        self.topics = union(&self.topics, &requested);
        added
    }

    /// Removes topics from the registry; absent topics are ignored.
    pub fn remove(&mut self, topics: &[String]) {
        let removed: AHashSet<String> = topics.iter().cloned().collect();
        self.topics = difference(&self.topics, &removed);
    }

    /// Returns whether the topic is registered.
    #[must_use]
    pub fn contains(&self, topic: &str) -> bool {
        self.topics.contains(topic)
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Returns the number of registered topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Returns a snapshot of the registered topics in arbitrary order.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.topics.iter().cloned().collect()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn set(topics: &[&str]) -> AHashSet<String> {
        topics.iter().map(ToString::to_string).collect()
    }

    #[rstest]
    fn test_union_and_difference() {
        let a = set(&["a", "b"]);
        let b = set(&["b", "c"]);

        assert_eq!(union(&a, &b), set(&["a", "b", "c"]));
        assert_eq!(difference(&a, &b), set(&["a"]));
        assert_eq!(difference(&b, &a), set(&["c"]));
    }

    #[rstest]
    fn test_add_is_idempotent() {
        let mut registry = TopicRegistry::new();

        let added = registry.add(vec!["a".to_string()]);
        assert_eq!(added, vec!["a".to_string()]);

        let added = registry.add(vec!["a".to_string()]);
        assert!(added.is_empty());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("a"));
    }

    #[rstest]
    fn test_add_reports_only_new_topics() {
        let mut registry = TopicRegistry::new();
        registry.add(vec!["a".to_string()]);

        let mut added = registry.add(vec!["a".to_string(), "b".to_string()]);
        added.sort();
        assert_eq!(added, vec!["b".to_string()]);
        assert_eq!(registry.len(), 2);
    }

    #[rstest]
    fn test_remove_is_set_difference() {
        let mut registry = TopicRegistry::new();
        registry.add(vec!["a".to_string(), "b".to_string()]);

        registry.remove(&["a".to_string(), "missing".to_string()]);

        assert_eq!(registry.topics(), vec!["b".to_string()]);
    }

    #[rstest]
    fn test_rollback_restores_pre_call_state() {
        let mut registry = TopicRegistry::new();
        registry.add(vec!["kept".to_string()]);

        let added = registry.add(vec!["kept".to_string(), "new".to_string()]);
        registry.remove(&added);

        assert_eq!(registry.topics(), vec!["kept".to_string()]);
    }
}
