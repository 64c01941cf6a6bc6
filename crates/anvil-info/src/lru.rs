//! Recency list over the swappable table.
//!
//! A doubly linked list expressed as prev/next indices per [`ClassId`]
//! rather than shared mutable pointers, so relinking during promotion and
//! eviction is all checked map access. The head is the most recently used
//! entry, the tail the eviction candidate.

use std::collections::HashMap;

use crate::descriptor::ClassId;

#[derive(Debug, Default, Clone, Copy)]
struct Links {
    prev: Option<ClassId>,
    next: Option<ClassId>,
}

#[derive(Debug, Default)]
pub(crate) struct LruList {
    head: Option<ClassId>,
    tail: Option<ClassId>,
    links: HashMap<ClassId, Links>,
}

impl LruList {
    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }

    pub(crate) fn contains(&self, id: ClassId) -> bool {
        self.links.contains_key(&id)
    }

    pub(crate) fn least_recent(&self) -> Option<ClassId> {
        self.tail
    }

    /// Insert a new entry at the head. The entry must not already be linked.
    pub(crate) fn link_most_recent(&mut self, id: ClassId) {
        debug_assert!(!self.contains(id), "already linked");
        let old_head = self.head;
        self.links.insert(
            id,
            Links {
                prev: None,
                next: old_head,
            },
        );
        if let Some(old_head) = old_head {
            if let Some(links) = self.links.get_mut(&old_head) {
                links.prev = Some(id);
            }
        }
        self.head = Some(id);
        if self.tail.is_none() {
            self.tail = Some(id);
        }
    }

    /// Move an entry to the head. No-op when the entry is not linked (the
    /// record lives in an exempt table) or is already the head.
    pub(crate) fn promote(&mut self, id: ClassId) {
        if !self.contains(id) || self.head == Some(id) {
            return;
        }
        self.unlink(id);
        self.link_most_recent(id);
    }

    /// Remove an entry, patching head/tail when it was an endpoint. Returns
    /// whether the entry was linked.
    pub(crate) fn unlink(&mut self, id: ClassId) -> bool {
        let Some(links) = self.links.remove(&id) else {
            return false;
        };
        match links.prev {
            Some(prev) => {
                if let Some(prev_links) = self.links.get_mut(&prev) {
                    prev_links.next = links.next;
                }
            }
            None => self.head = links.next,
        }
        match links.next {
            Some(next) => {
                if let Some(next_links) = self.links.get_mut(&next) {
                    next_links.prev = links.prev;
                }
            }
            None => self.tail = links.prev,
        }
        true
    }
}
