//! Snapshot cursor over nodes or edges
//!
//! A `Cursor` owns a fixed, ordered copy of the items it was built from, so
//! mutations to the store after construction are never visible through it.
//! It has a single position and no reset: iterate twice by asking the store
//! for a fresh cursor.

use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct Cursor<T> {
    items: Vec<T>,
    /// Index of the current item; `None` until the first `advance`.
    position: Option<usize>,
}

impl<T> Cursor<T> {
    pub fn new(items: Vec<T>) -> Self {
        Cursor {
            items,
            position: None,
        }
    }

    /// Move to the next item. Returns false once exhausted, and keeps
    /// returning false; the position stays on the last item.
    pub fn advance(&mut self) -> bool {
        let next = self.position.map_or(0, |p| p + 1);
        if next >= self.items.len() {
            return false;
        }
        self.position = Some(next);
        true
    }

    /// Item at the current position. Before the first `advance` this is the
    /// first item; `None` only when the snapshot is empty.
    pub fn value(&self) -> Option<&T> {
        self.items.get(self.position.unwrap_or(0))
    }

    /// Total number of items in the snapshot
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Number of items not yet reached by `advance`
    pub fn remaining(&self) -> usize {
        match self.position {
            None => self.items.len(),
            Some(p) => self.items.len() - p - 1,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

impl<T: Clone> Cursor<T> {
    /// Drain the remaining items into a bounded channel, in order.
    ///
    /// The channel is sized to hold every remaining item and the sender is
    /// dropped before returning, so the receiver yields each item once and then
    /// reports the channel closed. Works both inside and outside a runtime
    /// (`recv().await`, `blocking_recv()` or `try_recv()`).
    pub fn channel(&mut self) -> mpsc::Receiver<T> {
        let (tx, rx) = mpsc::channel(self.remaining().max(1));
        while self.advance() {
            if let Some(item) = self.value() {
                // Capacity covers every remaining item, so this cannot be full.
                if tx.try_send(item.clone()).is_err() {
                    break;
                }
            }
        }
        rx
    }

    /// Collect the remaining items, advancing the cursor to the end
    pub fn collect_remaining(&mut self) -> Vec<T> {
        self.by_ref().collect()
    }
}

impl<T: Clone> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.advance() {
            self.value().cloned()
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for Cursor<T> {}
