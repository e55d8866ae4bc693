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

//! Seeded random churn over the entity system, checking the lifecycle
//! invariants after every frame.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use ember_core::EntityHandle;
use ember_data::ecs::{
    ComponentSystem, EntityCreated, EntityDestroyed, EntitySystem, EntitySystemConfig,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Rejects roughly one entity in seven, deterministically per handle.
struct PickyComponents {
    stored: HashSet<EntityHandle>,
}

impl PickyComponents {
    fn rejects(handle: EntityHandle) -> bool {
        (handle.identifier() * 31 + handle.version()) % 7 == 0
    }
}

impl ComponentSystem for PickyComponents {
    fn finalize_entity(&mut self, handle: EntityHandle) -> bool {
        if Self::rejects(handle) {
            return false;
        }
        self.stored.insert(handle);
        true
    }

    fn entity_destroyed(&mut self, handle: EntityHandle) {
        self.stored.remove(&handle);
    }
}

#[derive(Default)]
struct Tally {
    created: HashMap<EntityHandle, usize>,
    destroyed: HashMap<EntityHandle, usize>,
}

#[test]
fn random_churn_preserves_lifecycle_invariants() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
    let components = Rc::new(RefCell::new(PickyComponents {
        stored: HashSet::new(),
    }));
    let mut entities =
        EntitySystem::with_config(EntitySystemConfig::default().with_initial_capacity(64));
    entities.initialize(components.clone()).unwrap();

    let tally = Rc::new(RefCell::new(Tally::default()));
    let sink = tally.clone();
    entities
        .events_mut()
        .subscribe_created(move |event: &EntityCreated| {
            *sink.borrow_mut().created.entry(event.handle).or_default() += 1;
        });
    let sink = tally.clone();
    entities
        .events_mut()
        .subscribe_destroyed(move |event: &EntityDestroyed| {
            *sink.borrow_mut().destroyed.entry(event.handle).or_default() += 1;
        });

    let mut issued: Vec<EntityHandle> = Vec::new();
    let mut gone: HashSet<EntityHandle> = HashSet::new();

    for frame in 0..500 {
        for _ in 0..rng.gen_range(0..6) {
            let handle = entities.create_entity();
            assert!(entities.is_handle_valid(handle));
            assert!(!gone.contains(&handle), "a handle value was issued twice");
            issued.push(handle);
        }

        for _ in 0..rng.gen_range(0..5) {
            if issued.is_empty() {
                break;
            }
            let target = issued[rng.gen_range(0..issued.len())];
            entities.destroy_entity(target);
            assert!(!entities.is_handle_valid(target));
        }

        if frame % 97 == 96 {
            entities.destroy_all_entities();
        }

        entities.process_commands();
        assert_eq!(entities.pending_commands(), 0);

        // Stale handles never come back.
        for handle in &issued {
            if gone.contains(handle) {
                assert!(!entities.is_handle_valid(*handle), "{handle} revived");
            }
        }
        for handle in &issued {
            if !entities.is_handle_valid(*handle) {
                gone.insert(*handle);
            }
        }

        // No two live entities share an identifier.
        let live: Vec<_> = issued
            .iter()
            .copied()
            .filter(|handle| entities.is_handle_valid(*handle))
            .collect();
        let identifiers: HashSet<_> = live.iter().map(|handle| handle.identifier()).collect();
        assert_eq!(identifiers.len(), live.len());

        // After a drain every live entity is active and counted.
        let active: Vec<_> = entities.iter_active().collect();
        assert_eq!(active.len(), live.len());
        assert_eq!(entities.entity_count(), active.len());
        assert_eq!(components.borrow().stored.len(), active.len());
        assert_eq!(
            entities.capacity(),
            live.len() + entities.free_count(),
            "every slot is either live or free"
        );
    }

    let tally = tally.borrow();
    for handle in &issued {
        let created = tally.created.get(handle).copied().unwrap_or(0);
        let destroyed = tally.destroyed.get(handle).copied().unwrap_or(0);

        assert!(created <= 1 && destroyed <= 1, "{handle}: {created}/{destroyed}");
        if PickyComponents::rejects(*handle) {
            assert_eq!(created, 0, "{handle} activated despite the veto");
            assert_eq!(destroyed, 1, "{handle} was rejected but never destroyed");
        }
        if gone.contains(handle) {
            assert_eq!(destroyed, 1);
        }
    }
}
