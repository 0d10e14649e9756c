// Copyright (c) 2025 Hale Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Singly linked chain of entries held by one bucket.
//!
//! New entries are prepended, so iteration order is most-recently-inserted
//! first. Scans accept a `visit` callback that observes every comparison made,
//! which is how the table produces its step trace without the chain knowing
//! anything about tracing.

use super::value::TaggedValue;

/// A key/value pair owned by exactly one chain node.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    key: TaggedValue,
    value: TaggedValue,
}

impl Entry {
    /// Creates a new entry.
    pub fn new(key: TaggedValue, value: TaggedValue) -> Self {
        Self { key, value }
    }

    /// The entry key.
    pub fn key(&self) -> &TaggedValue {
        &self.key
    }

    /// The entry value.
    pub fn value(&self) -> &TaggedValue {
        &self.value
    }

    /// Replaces the value, returning the previous one.
    pub fn replace_value(&mut self, value: TaggedValue) -> TaggedValue {
        std::mem::replace(&mut self.value, value)
    }

    /// Splits the entry into its key and value.
    pub fn into_parts(self) -> (TaggedValue, TaggedValue) {
        (self.key, self.value)
    }
}

#[derive(Debug)]
struct Node {
    entry: Entry,
    next: Link,
}

type Link = Option<Box<Node>>;

/// An ordered chain of entries.
#[derive(Debug, Default)]
pub struct Chain {
    head: Link,
    len: usize,
}

impl Chain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in the chain.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the chain holds no entries.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Prepends `entry`. O(1).
    pub fn push_front(&mut self, entry: Entry) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { entry, next }));
        self.len += 1;
    }

    /// Detaches and returns the head entry.
    pub fn pop_front(&mut self) -> Option<Entry> {
        self.head.take().map(|mut node| {
            self.head = node.next.take();
            self.len -= 1;
            node.entry
        })
    }

    /// Scans from the head and returns the first entry whose key equals `key`.
    ///
    /// `visit` is called once per compared entry with the comparison result.
    pub fn find_with<F>(&self, key: &TaggedValue, mut visit: F) -> Option<&Entry>
    where
        F: FnMut(&Entry, bool),
    {
        self.iter().find(|entry| {
            let hit = entry.key == *key;
            visit(*entry, hit);
            hit
        })
    }

    /// Mutable counterpart of [`Chain::find_with`].
    pub fn find_mut_with<F>(&mut self, key: &TaggedValue, mut visit: F) -> Option<&mut Entry>
    where
        F: FnMut(&Entry, bool),
    {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            let hit = node.entry.key == *key;
            visit(&node.entry, hit);
            if hit {
                return Some(&mut node.entry);
            }
            cursor = node.next.as_deref_mut();
        }
        None
    }

    /// Unlinks and returns the first entry whose key equals `key`.
    ///
    /// O(chain length). `visit` is called once per compared entry.
    pub fn remove_with<F>(&mut self, key: &TaggedValue, mut visit: F) -> Option<Entry>
    where
        F: FnMut(&Entry, bool),
    {
        let mut cursor = &mut self.head;
        loop {
            let hit = match cursor.as_deref() {
                None => return None,
                Some(node) => {
                    let hit = node.entry.key == *key;
                    visit(&node.entry, hit);
                    hit
                }
            };
            if hit {
                break;
            }
            cursor = &mut cursor.as_mut()?.next;
        }

        let mut removed = cursor.take()?;
        *cursor = removed.next.take();
        self.len -= 1;
        Some(removed.entry)
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
        self.len = 0;
    }

    /// Iterates entries from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        // Unlink iteratively; the default recursive drop can overflow the
        // stack on very long chains.
        self.clear();
    }
}

/// Borrowing iterator over a [`Chain`].
#[derive(Debug)]
pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.entry
        })
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
