//! Bounded per-sender session store
//!
//! An LRU map with a per-entry idle TTL. Recency is a slab-backed doubly
//! linked list with a hash index, so `get` and `set` are O(1) including
//! promotion to most-recently-used. Expired entries are removed lazily on
//! lookup; there is no background sweep.

use crate::dialogue::SessionState;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Sender identity as delivered by the messaging channel. Opaque, compared
/// by equality, never parsed.
pub type SessionKey = String;

struct Node {
    key: SessionKey,
    state: SessionState,
    last_access: Instant,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Recency-ordered slab: `head` is most recently used, `tail` least.
#[derive(Default)]
struct Inner {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    index: HashMap<SessionKey, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl Inner {
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(node) = self.slots[h].as_mut() {
                    node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    /// Detach a node from the list, the index, and the slab.
    fn remove(&mut self, idx: usize) -> Option<Node> {
        self.unlink(idx);
        let node = self.slots[idx].take()?;
        self.index.remove(&node.key);
        self.free.push(idx);
        Some(node)
    }

    fn insert_node(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }
}

/// Explicitly constructed, explicitly injected store — no process globals,
/// so tests and multiple engines can each have their own instance.
///
/// A single mutex guards the whole structure; every operation is a few
/// pointer updates, so contention is not a concern at webhook rates.
/// Concurrent operations on different keys can never corrupt the recency
/// list or the index. Read-modify-write for one sender's duplicate
/// deliveries is last-write-wins, not atomic.
pub struct SessionStore {
    inner: Mutex<Inner>,
    max_entries: usize,
    ttl: Duration,
}

impl SessionStore {
    /// A zero capacity would make every dialogue unreachable, so it is
    /// clamped to one entry.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<SessionState> {
        self.get_at(key, Instant::now())
    }

    pub fn set(&self, key: &str, state: SessionState) {
        self.set_at(key, state, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookup at an explicit point in time. An entry idle for the full TTL
    /// is treated as absent and removed on the spot; a live hit refreshes
    /// `last_access` and moves the entry to the most-recently-used position.
    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<SessionState> {
        let mut inner = self.lock();
        let idx = *inner.index.get(key)?;
        let expired = inner.slots[idx]
            .as_ref()
            .is_some_and(|node| now.duration_since(node.last_access) >= self.ttl);
        if expired {
            inner.remove(idx);
            tracing::debug!(sender = %key, "session expired");
            return None;
        }
        inner.unlink(idx);
        inner.push_front(idx);
        inner.slots[idx].as_mut().map(|node| {
            node.last_access = now;
            node.state.clone()
        })
    }

    /// Insert or overwrite at an explicit point in time. Inserting a new
    /// key at capacity first evicts the entry with the oldest
    /// `last_access`.
    pub(crate) fn set_at(&self, key: &str, state: SessionState, now: Instant) {
        let mut inner = self.lock();
        let existing = inner.index.get(key).copied();
        if let Some(idx) = existing {
            inner.unlink(idx);
            inner.push_front(idx);
            if let Some(node) = inner.slots[idx].as_mut() {
                node.state = state;
                node.last_access = now;
            }
            return;
        }

        if inner.index.len() >= self.max_entries {
            if let Some(victim) = inner.tail {
                if let Some(evicted) = inner.remove(victim) {
                    tracing::debug!(sender = %evicted.key, "evicting least recently used session");
                }
            }
        }

        let idx = inner.insert_node(Node {
            key: key.to_string(),
            state,
            last_access: now,
            prev: None,
            next: None,
        });
        inner.index.insert(key.to_string(), idx);
        inner.push_front(idx);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
