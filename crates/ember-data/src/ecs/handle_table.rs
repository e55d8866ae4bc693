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

//! The table of entity slots that owns the identifier space.

use ember_core::EntityHandle;

use crate::ecs::free_list::FreeList;

/// Lifecycle state of one slot.
///
/// Only the combinations the lifecycle can actually reach are representable:
///
/// ```text
/// Free -> Pending -> Active -> PendingDestroy { activated: true } -> Free
///            |                                                        ^
///            +-----> PendingDestroy { activated: false } -------------+
/// ```
///
/// A slot whose version cannot be bumped any further ends up
/// [`Retired`](SlotState::Retired) instead of `Free`, and stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    /// In the free list, waiting to be reused.
    #[default]
    Free,
    /// Handed out, waiting for its create command to be drained.
    Pending,
    /// Finalized and visible to the rest of the engine.
    Active,
    /// A destroy command is queued for this slot.
    PendingDestroy {
        /// Whether the slot had been finalized before it was freed.
        activated: bool,
    },
    /// Out of versions. Never handed out again.
    Retired,
}

impl SlotState {
    /// The slot belongs to an entity, whatever its stage.
    #[inline]
    pub fn is_valid(self) -> bool {
        !matches!(self, SlotState::Free | SlotState::Retired)
    }

    /// The entity passed its finalize check and was not freed yet.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(
            self,
            SlotState::Active | SlotState::PendingDestroy { activated: true }
        )
    }

    /// A destroy command is waiting in the queue.
    #[inline]
    pub fn is_pending_destroy(self) -> bool {
        matches!(self, SlotState::PendingDestroy { .. })
    }
}

/// One slot of the table. Entries are never removed, only recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleEntry {
    /// The handle currently issued for this slot.
    pub handle: EntityHandle,
    /// Where the slot stands in the lifecycle.
    pub state: SlotState,
}

/// Dense, identifier-indexed storage of every slot ever allocated.
///
/// Identifier `n` lives at index `n - 1`. Every index is at any time in the
/// free list, held by a valid entry, or retired. Exactly one of the three.
#[derive(Debug, Clone)]
pub struct HandleTable {
    entries: Vec<HandleEntry>,
    free: FreeList,
    max_identifier: u32,
}

impl HandleTable {
    /// Creates a table able to hand out identifiers `1..=max_identifier`.
    pub fn new(max_identifier: u32) -> Self {
        Self::with_capacity(0, max_identifier)
    }

    /// Like [`new`](Self::new), reserving room for `capacity` slots upfront.
    pub fn with_capacity(capacity: usize, max_identifier: u32) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            free: FreeList::new(),
            max_identifier,
        }
    }

    /// Hands out a slot in the [`Pending`](SlotState::Pending) state.
    ///
    /// Reuses the oldest free slot if there is one, otherwise appends a new
    /// slot with version 0.
    ///
    /// # Panics
    ///
    /// Panics if every identifier up to the configured maximum is in use.
    pub fn allocate(&mut self) -> EntityHandle {
        let index = match self.free.dequeue() {
            Some(index) => index as usize,
            None => {
                let identifier = self.entries.len() as u64 + 1;
                assert!(
                    identifier <= u64::from(self.max_identifier),
                    "entity identifier space exhausted ({} slots)",
                    self.max_identifier
                );

                self.entries.push(HandleEntry {
                    handle: EntityHandle::new(identifier as u32, 0),
                    state: SlotState::Free,
                });
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[index];
        assert_eq!(
            entry.state,
            SlotState::Free,
            "free list handed out slot {} which is in use",
            entry.handle
        );
        entry.state = SlotState::Pending;
        entry.handle
    }

    /// Frees the slot `handle` points to, bumps its version and appends it to
    /// the free list. A slot already at the last version is retired instead.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not match the slot or the slot is already free.
    pub fn recycle(&mut self, handle: EntityHandle) {
        let index = Self::index_of(handle);
        let entry = self
            .entries
            .get_mut(index)
            .unwrap_or_else(|| panic!("recycling unknown entity {handle}"));

        assert_eq!(entry.handle, handle, "recycling a stale entity handle");
        assert!(entry.state.is_valid(), "recycling free entity {handle}");

        if Self::release(entry) {
            self.free.enqueue(index as u32);
        }
    }

    /// Frees every valid slot and rebuilds the free list as one chain over
    /// every non-retired slot, in identifier order. `on_release` sees each
    /// handle before its version changes.
    pub fn release_all(&mut self, mut on_release: impl FnMut(EntityHandle)) {
        for entry in &mut self.entries {
            if entry.state.is_valid() {
                on_release(entry.handle);
                Self::release(entry);
            }
        }

        let free = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.state == SlotState::Free)
            .map(|(index, _)| index as u32);
        self.free.rebuild(free);
    }

    /// Moves a valid entry to `Free` with the next version. Returns `false`
    /// if the slot ran out of versions and was retired.
    fn release(entry: &mut HandleEntry) -> bool {
        match entry.handle.next_version() {
            Some(next) => {
                entry.handle = next;
                entry.state = SlotState::Free;
                true
            }
            None => {
                log::debug!("Retiring slot {} after its last version.", entry.handle);
                entry.state = SlotState::Retired;
                false
            }
        }
    }

    /// Returns `true` if `handle` refers to the current occupant of its slot
    /// and that occupant is not scheduled for destruction.
    pub fn is_live(&self, handle: EntityHandle) -> bool {
        self.entry(handle).is_some_and(|entry| {
            entry.state.is_valid() && !entry.state.is_pending_destroy()
        })
    }

    /// Returns the entry `handle` points to if the versions still match.
    pub fn entry(&self, handle: EntityHandle) -> Option<&HandleEntry> {
        if !handle.is_set() {
            return None;
        }
        self.entries
            .get(Self::index_of(handle))
            .filter(|entry| entry.handle == handle)
    }

    /// Mutable counterpart of [`entry`](Self::entry).
    pub fn entry_mut(&mut self, handle: EntityHandle) -> Option<&mut HandleEntry> {
        if !handle.is_set() {
            return None;
        }
        self.entries
            .get_mut(Self::index_of(handle))
            .filter(|entry| entry.handle == handle)
    }

    /// Returns the entry stored under `identifier`, whatever its version.
    pub fn entry_by_identifier(&self, identifier: u32) -> Option<&HandleEntry> {
        if identifier == 0 {
            return None;
        }
        self.entries.get(identifier as usize - 1)
    }

    /// Iterates over every slot in identifier order.
    pub fn iter(&self) -> std::slice::Iter<'_, HandleEntry> {
        self.entries.iter()
    }

    /// Number of slots ever allocated, free, retired or in use.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no slot was ever allocated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of slots waiting in the free list.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of slots that ran out of versions.
    pub fn retired_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.state == SlotState::Retired)
            .count()
    }

    /// The free list, head first.
    pub fn free_list(&self) -> &FreeList {
        &self.free
    }

    /// Drops every slot and forgets the free list. Identifiers start over at 1.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.free.clear();
    }

    #[inline]
    fn index_of(handle: EntityHandle) -> usize {
        debug_assert!(handle.is_set());
        handle.identifier() as usize - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_dense_one_based_identifiers() {
        let mut table = HandleTable::new(u32::MAX);
        assert!(table.is_empty());
        let a = table.allocate();
        let b = table.allocate();

        assert_eq!((a.identifier(), a.version()), (1, 0));
        assert_eq!((b.identifier(), b.version()), (2, 0));
        assert_eq!(table.len(), 2);
        assert_eq!(table.entry(a).map(|e| e.state), Some(SlotState::Pending));
    }

    #[test]
    fn recycle_invalidates_and_reuses_in_fifo_order() {
        let mut table = HandleTable::new(u32::MAX);
        let a = table.allocate();
        let b = table.allocate();

        table.recycle(b);
        table.recycle(a);

        assert!(!table.is_live(a));
        assert!(!table.is_live(b));
        assert!(table.entry(a).is_none(), "Stale handles resolve to nothing");

        let reused_b = table.allocate();
        let reused_a = table.allocate();
        assert_eq!(reused_b.identifier(), b.identifier());
        assert_eq!(reused_b.version(), 1);
        assert_eq!(reused_a.identifier(), a.identifier());
        assert!(table.is_live(reused_a));
        assert!(!table.is_live(a));
        assert_eq!(table.len(), 2, "No new slot while free ones remain");
    }

    #[test]
    fn is_live_rejects_invalid_and_out_of_range() {
        let mut table = HandleTable::new(u32::MAX);
        let a = table.allocate();

        assert!(!table.is_live(EntityHandle::INVALID));
        assert!(!table.is_live(EntityHandle::new(2, 0)));
        assert!(!table.is_live(EntityHandle::new(a.identifier(), 1)));
        assert!(table.is_live(a));
    }

    #[test]
    fn pending_destroy_is_not_live() {
        let mut table = HandleTable::new(u32::MAX);
        let a = table.allocate();
        table.entry_mut(a).unwrap().state = SlotState::PendingDestroy { activated: false };

        assert!(!table.is_live(a));
        assert!(table.entry(a).is_some(), "The slot itself is still held");
    }

    #[test]
    fn release_all_chains_every_slot() {
        let mut table = HandleTable::new(u32::MAX);
        let a = table.allocate();
        let b = table.allocate();
        let c = table.allocate();
        table.recycle(b);

        let mut released = Vec::new();
        table.release_all(|handle| released.push(handle));

        assert_eq!(released, vec![a, c]);
        assert_eq!(table.free_list().iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(table.iter().all(|entry| entry.state == SlotState::Free));
        assert_eq!(table.entry_by_identifier(1).unwrap().handle.version(), 1);
        assert_eq!(table.entry_by_identifier(2).unwrap().handle.version(), 1);
    }

    #[test]
    #[should_panic(expected = "identifier space exhausted")]
    fn allocate_past_the_maximum_panics() {
        let mut table = HandleTable::new(2);
        table.allocate();
        table.allocate();
        table.allocate();
    }

    #[test]
    fn maximum_still_allows_reuse() {
        let mut table = HandleTable::new(1);
        let a = table.allocate();
        table.recycle(a);
        let b = table.allocate();
        assert_eq!(b.identifier(), 1);
    }

    #[test]
    #[should_panic(expected = "stale")]
    fn recycling_twice_panics() {
        let mut table = HandleTable::new(u32::MAX);
        let a = table.allocate();
        table.recycle(a);
        table.recycle(a);
    }

    /// Forces the slot of `handle` to its last version and returns the
    /// handle that now refers to it.
    fn age_to_last_version(table: &mut HandleTable, handle: EntityHandle) -> EntityHandle {
        let last = EntityHandle::new(handle.identifier(), u32::MAX);
        table.entry_mut(handle).unwrap().handle = last;
        last
    }

    #[test]
    fn slot_out_of_versions_is_retired() {
        let mut table = HandleTable::new(u32::MAX);
        let a = table.allocate();
        let last = age_to_last_version(&mut table, a);

        table.recycle(last);

        assert!(!table.is_live(last));
        assert_eq!(table.free_count(), 0, "A retired slot is never queued");
        assert_eq!(table.retired_count(), 1);
        assert_eq!(table.entry_by_identifier(1).unwrap().state, SlotState::Retired);

        let fresh = table.allocate();
        assert_eq!((fresh.identifier(), fresh.version()), (2, 0));
        assert!(!table.is_live(last), "Stale handle {last} must stay dead");
        assert!(!table.is_live(a));
    }

    #[test]
    fn release_all_skips_retired_slots() {
        let mut table = HandleTable::new(u32::MAX);
        let a = table.allocate();
        let b = table.allocate();
        let c = table.allocate();
        let last = age_to_last_version(&mut table, b);

        let mut released = Vec::new();
        table.release_all(|handle| released.push(handle));

        assert_eq!(released, vec![a, last, c]);
        assert_eq!(table.free_list().iter().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(table.retired_count(), 1);

        // Later teardowns keep the retired slot out of the chain.
        table.allocate();
        table.release_all(|_| {});
        assert_eq!(table.free_list().iter().collect::<Vec<_>>(), vec![0, 2]);
        assert!(!table.is_live(last));
    }

    #[test]
    #[should_panic(expected = "identifier space exhausted")]
    fn retired_slots_count_against_the_maximum() {
        let mut table = HandleTable::new(1);
        let a = table.allocate();
        let last = age_to_last_version(&mut table, a);
        table.recycle(last);
        table.allocate();
    }

    #[test]
    fn slot_state_predicates() {
        assert!(!SlotState::Free.is_valid());
        assert!(SlotState::Pending.is_valid());
        assert!(!SlotState::Pending.is_active());
        assert!(SlotState::Active.is_active());
        assert!(SlotState::PendingDestroy { activated: true }.is_active());
        assert!(!SlotState::PendingDestroy { activated: false }.is_active());
        assert!(SlotState::PendingDestroy { activated: false }.is_pending_destroy());
        assert!(!SlotState::Retired.is_valid());
        assert!(!SlotState::Retired.is_active());
    }
}
