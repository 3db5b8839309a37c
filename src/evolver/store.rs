/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Keyed prototype store shared by the three Evolver banks.
//!
//! # Invariants
//!
//! - Fill-only honesty: once a prototype position is known, no later
//!   reinforcement changes it. Only unknown positions are filled.
//! - Weight update: `weight = weight * decay + similarity(candidate, proto)`.
//! - A bounded bank never exceeds its capacity; the least recently reinforced
//!   prototype (lowest logical tick) is evicted first.

use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::trit::TriVector;

// ─── Proto ──────────────────────────────────────────────────────────────────

/// A learned pattern and its reinforcement history.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proto {
    /// Learned value. Known positions are frozen.
    pub proto: TriVector,
    /// EMA-decayed agreement weight.
    pub weight: f32,
    /// Number of observations.
    pub count: u32,
    /// Logical tick of the last reinforcement.
    pub last_seen: u64,
}

impl Proto {
    /// First observation of a pattern.
    pub fn new(proto: TriVector, tick: u64) -> Self {
        Self { proto, weight: 1.0, count: 1, last_seen: tick }
    }

    /// Fold one more observation into this prototype.
    pub fn reinforce(&mut self, candidate: TriVector, decay: f32, tick: u64) {
        self.weight = self.weight * decay + candidate.similarity(&self.proto) as f32;
        self.count = self.count.saturating_add(1);
        self.last_seen = tick;
        self.proto.fill_unknowns_from(&candidate);
    }
}

// ─── Bank ───────────────────────────────────────────────────────────────────

/// Context-keyed prototype map with optional LRU bound.
#[derive(Clone, Debug)]
pub struct Bank<K> {
    entries: HashMap<K, Proto>,
    capacity: Option<usize>,
}

impl<K> Bank<K>
where
    K: Hash + Eq + Ord + Clone + fmt::Display,
{
    /// Empty bank. `None` grows without bound.
    pub fn new(capacity: Option<usize>) -> Self {
        Self { entries: HashMap::new(), capacity }
    }

    /// Maximum number of prototypes, if bounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Store or reinforce the prototype under `key`. Returns `true` if it was new.
    pub fn reinforce(&mut self, key: K, candidate: TriVector, decay: f32, tick: u64) -> bool {
        if let Some(p) = self.entries.get_mut(&key) {
            p.reinforce(candidate, decay, tick);
            return false;
        }
        if let Some(cap) = self.capacity {
            while self.entries.len() >= cap.max(1) {
                if !self.evict_oldest() {
                    break;
                }
            }
        }
        trace!(%key, proto = %candidate, tick, "new prototype");
        self.entries.insert(key, Proto::new(candidate, tick));
        true
    }

    /// Prototype stored under `key`.
    pub fn get(&self, key: &K) -> Option<&Proto> {
        self.entries.get(key)
    }

    /// `true` if `key` has a prototype.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored prototypes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Proto)> {
        self.entries.iter()
    }

    /// Up to `k` entries ranked by weight, then count, then key.
    pub fn top(&self, k: usize) -> Vec<(K, Proto)> {
        let mut items: Vec<(&K, &Proto)> = self.entries.iter().collect();
        items.sort_by(|(ka, a), (kb, b)| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| b.count.cmp(&a.count))
                .then_with(|| ka.cmp(kb))
        });
        items
            .into_iter()
            .take(k)
            .map(|(key, p)| (key.clone(), *p))
            .collect()
    }

    /// Evict the entry with the oldest `last_seen` tick. Ties go to the smallest key.
    fn evict_oldest(&mut self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by(|(ka, a), (kb, b)| a.last_seen.cmp(&b.last_seen).then_with(|| ka.cmp(kb)))
            .map(|(k, _)| k.clone());
        match oldest {
            Some(key) => {
                debug!(%key, "evicting least recently reinforced prototype");
                self.entries.remove(&key);
                true
            }
            None => false,
        }
    }
}

impl<K> Default for Bank<K>
where
    K: Hash + Eq + Ord + Clone + fmt::Display,
{
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tv;

    fn key(n: u32) -> String {
        format!("k{}", n)
    }

    #[test]
    fn test_new_key_starts_at_unit_weight() {
        let mut bank: Bank<String> = Bank::default();
        assert!(bank.reinforce(key(0), tv!(1, _, 0), 0.9, 1));
        let p = bank.get(&key(0)).unwrap();
        assert_eq!(p.weight, 1.0);
        assert_eq!(p.count, 1);
        assert_eq!(p.last_seen, 1);
        assert_eq!(p.proto, tv!(1, _, 0));
    }

    #[test]
    fn test_reinforce_updates_weight_and_fills_only_unknowns() {
        let mut bank: Bank<String> = Bank::default();
        bank.reinforce(key(0), tv!(1, _, 0), 0.5, 1);
        assert!(!bank.reinforce(key(0), tv!(0, 1, 0), 0.5, 2));
        let p = bank.get(&key(0)).unwrap();
        // similarity([0,1,0], [1,·,0]) = 1 (position 2 only)
        assert!((p.weight - 1.5).abs() < 1e-6, "weight={}", p.weight);
        assert_eq!(p.count, 2);
        assert_eq!(p.last_seen, 2);
        assert_eq!(p.proto, tv!(1, 1, 0));
    }

    #[test]
    fn test_top_orders_by_weight_then_count_then_key() {
        let mut bank: Bank<String> = Bank::default();
        bank.reinforce(key(2), tv!(1, 1, 1), 1.0, 1);
        bank.reinforce(key(1), tv!(1, 1, 1), 1.0, 2);
        bank.reinforce(key(3), tv!(1, 1, 1), 1.0, 3);
        bank.reinforce(key(3), tv!(1, 1, 1), 1.0, 4);
        let top = bank.top(5);
        let keys: Vec<&str> = top.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["k3", "k1", "k2"]);
        assert_eq!(bank.top(1).len(), 1);
        assert!(Bank::<String>::default().top(3).is_empty());
    }

    #[test]
    fn test_bounded_bank_evicts_least_recent() {
        let mut bank: Bank<String> = Bank::new(Some(2));
        bank.reinforce(key(0), tv!(0, 0, 0), 0.9, 1);
        bank.reinforce(key(1), tv!(0, 0, 1), 0.9, 2);
        // Touch k0 so k1 becomes the oldest.
        bank.reinforce(key(0), tv!(0, 0, 0), 0.9, 3);
        bank.reinforce(key(2), tv!(0, 1, 0), 0.9, 4);
        assert_eq!(bank.len(), 2);
        assert!(bank.contains_key(&key(0)));
        assert!(!bank.contains_key(&key(1)));
        assert!(bank.contains_key(&key(2)));
    }
}
