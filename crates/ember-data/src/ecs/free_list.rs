// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! FIFO queue of recyclable slot indices.

use std::collections::VecDeque;

/// Tracks which slots of a handle table can be handed out again.
///
/// Indices leave in the order they were freed, so a slot that was just
/// released is the last one to be reused. That maximizes the time a stale
/// handle spends pointing at a free slot rather than at a new entity.
#[derive(Debug, Clone, Default)]
pub struct FreeList {
    queue: VecDeque<u32>,
}

impl FreeList {
    /// Creates an empty free list.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Appends `index` at the tail.
    ///
    /// Callers guarantee `index` is not queued yet; the handle table only
    /// enqueues slots it just moved out of a valid state.
    pub fn enqueue(&mut self, index: u32) {
        self.queue.push_back(index);
    }

    /// Takes the index at the head, if any.
    pub fn dequeue(&mut self) -> Option<u32> {
        self.queue.pop_front()
    }

    /// Returns `true` if no slot is available for reuse.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of queued slots.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Replaces the queue with `indices`, in the order given.
    ///
    /// Used by bulk teardown, when every reusable slot of the table is free
    /// again.
    pub fn rebuild(&mut self, indices: impl IntoIterator<Item = u32>) {
        self.queue.clear();
        self.queue.extend(indices);
    }

    /// Forgets every queued slot.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Iterates from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.queue.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeues_in_fifo_order() {
        let mut free = FreeList::new();
        free.enqueue(4);
        free.enqueue(1);
        free.enqueue(7);

        assert_eq!(free.dequeue(), Some(4));
        assert_eq!(free.dequeue(), Some(1));
        free.enqueue(2);
        assert_eq!(free.dequeue(), Some(7));
        assert_eq!(free.dequeue(), Some(2));
        assert_eq!(free.dequeue(), None);
        assert!(free.is_empty());
    }

    #[test]
    fn rebuild_replaces_the_queue() {
        let mut free = FreeList::new();
        free.enqueue(2);
        free.rebuild([0, 1, 3]);

        assert_eq!(free.iter().collect::<Vec<_>>(), vec![0, 1, 3]);
        assert_eq!(free.len(), 3);
    }

    #[test]
    fn rebuild_from_nothing_is_empty() {
        let mut free = FreeList::new();
        free.enqueue(0);
        free.rebuild(std::iter::empty());
        assert!(free.is_empty());
    }
}
