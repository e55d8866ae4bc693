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

//! The entity system: the single entry point for creating, destroying and
//! querying entities.

use std::cell::RefCell;
use std::rc::Rc;

use ember_core::EntityHandle;

use crate::ecs::command::{CommandQueue, EntityCommand};
use crate::ecs::component_system::{ComponentSystem, InitError};
use crate::ecs::config::EntitySystemConfig;
use crate::ecs::events::{EntityDestroyed, EntityEvents, EntityFinalize};
use crate::ecs::handle_table::{HandleEntry, HandleTable, SlotState};

/// Allocates entity handles and applies their lifecycle in deferred batches.
///
/// Creating or destroying an entity only queues a command. The change becomes
/// visible when the owning frame loop calls
/// [`process_commands`](EntitySystem::process_commands), which should happen
/// once per frame before any subsystem reads active entities.
///
/// ```text
/// create_entity()    -> handle is valid, not active yet
/// process_commands() -> finalize check, then Created (or Destroyed on veto)
/// destroy_entity(h)  -> handle no longer valid, entity still counted
/// process_commands() -> Destroyed, slot recycled with a new version
/// ```
///
/// Before [`initialize`](EntitySystem::initialize) succeeds every mutating
/// operation is a silent no-op and every query answers negatively.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use ember_core::EntityHandle;
/// use ember_data::ecs::{ComponentSystem, EntitySystem};
///
/// struct Components;
///
/// impl ComponentSystem for Components {
///     fn finalize_entity(&mut self, _: EntityHandle) -> bool {
///         true
///     }
///
///     fn entity_destroyed(&mut self, _: EntityHandle) {}
/// }
///
/// let mut entities = EntitySystem::new();
/// entities.initialize(Rc::new(RefCell::new(Components))).unwrap();
///
/// let entity = entities.create_entity();
/// entities.process_commands();
/// assert_eq!(entities.entity_count(), 1);
///
/// entities.destroy_entity(entity);
/// assert!(!entities.is_handle_valid(entity));
/// entities.process_commands();
/// assert_eq!(entities.entity_count(), 0);
/// ```
pub struct EntitySystem {
    config: EntitySystemConfig,
    handles: HandleTable,
    commands: CommandQueue,
    events: EntityEvents,
    /// Number of slots that passed finalization and were not recycled yet.
    entity_count: usize,
    initialized: bool,
}

impl EntitySystem {
    /// Creates an uninitialized entity system with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EntitySystemConfig::default())
    }

    /// Creates an uninitialized entity system.
    pub fn with_config(config: EntitySystemConfig) -> Self {
        Self {
            config,
            handles: HandleTable::with_capacity(config.initial_capacity, config.max_identifier),
            commands: CommandQueue::new(),
            events: EntityEvents::new(),
            entity_count: 0,
            initialized: false,
        }
    }

    /// The configuration this system was built with.
    pub fn config(&self) -> &EntitySystemConfig {
        &self.config
    }

    /// Binds the entity system to its component storage.
    ///
    /// The component system is subscribed to the finalize and destroyed
    /// channels. Initializing an already initialized system cleans it up
    /// first.
    ///
    /// # Errors
    ///
    /// Fails if the component system is borrowed or refuses to bind. The entity
    /// system then stays uninitialized and the call can be retried.
    pub fn initialize<C>(&mut self, components: Rc<RefCell<C>>) -> Result<(), InitError>
    where
        C: ComponentSystem + 'static,
    {
        if self.initialized {
            self.cleanup();
        }

        if let Err(err) = Self::bind(&components) {
            log::warn!("Failed to initialize the entity system! {err}");
            return Err(err);
        }

        let finalizer = Rc::clone(&components);
        self.events.subscribe_finalize(move |event: &EntityFinalize| {
            finalizer.borrow_mut().finalize_entity(event.handle)
        });
        self.events.subscribe_destroyed(move |event: &EntityDestroyed| {
            components.borrow_mut().entity_destroyed(event.handle);
        });

        self.initialized = true;
        log::debug!("Entity system initialized.");
        Ok(())
    }

    fn bind<C: ComponentSystem>(components: &RefCell<C>) -> Result<(), InitError> {
        let mut components = components
            .try_borrow_mut()
            .map_err(|_| InitError::CollaboratorBusy)?;
        components.on_bind().map_err(InitError::CollaboratorRejected)
    }

    /// Restores the instance to its original, uninitialized state.
    ///
    /// Remaining entities are destroyed (their Destroyed events fire) before
    /// every subscriber is disconnected and the handle table is dropped.
    pub fn cleanup(&mut self) {
        if self.initialized {
            self.destroy_all_entities();
            self.process_commands();
        }

        self.events.clear();
        self.commands.clear();
        self.handles.clear();
        self.entity_count = 0;
        self.initialized = false;
        log::debug!("Entity system cleaned up.");
    }

    /// Returns `true` once [`initialize`](Self::initialize) succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Allocates an entity and queues its creation.
    ///
    /// The returned handle is valid right away but the entity only becomes
    /// active on the next [`process_commands`](Self::process_commands).
    /// Returns [`EntityHandle::INVALID`] if the system is not initialized.
    ///
    /// # Panics
    ///
    /// Panics if the identifier space is exhausted.
    pub fn create_entity(&mut self) -> EntityHandle {
        if !self.initialized {
            return EntityHandle::INVALID;
        }

        let handle = self.handles.allocate();
        self.commands.submit(EntityCommand::Create(handle));
        log::trace!("Queued creation of entity {handle}.");
        handle
    }

    /// Queues the destruction of an entity.
    ///
    /// The handle stops being valid immediately. Does nothing if the handle is
    /// not valid, so destroying twice queues a single command.
    pub fn destroy_entity(&mut self, handle: EntityHandle) {
        if !self.is_handle_valid(handle) {
            return;
        }
        self.schedule_destroy(handle);
    }

    fn schedule_destroy(&mut self, handle: EntityHandle) {
        let entry = Self::slot_mut(&mut self.handles, handle, "destroy");
        entry.state = SlotState::PendingDestroy {
            activated: entry.state.is_active(),
        };

        self.commands.submit(EntityCommand::Destroy(handle));
        log::trace!("Queued destruction of entity {handle}.");
    }

    /// Destroys every entity at once and chains all slots into the free list.
    ///
    /// Pending commands are processed first. Meant for full teardown, not for
    /// per-frame use.
    pub fn destroy_all_entities(&mut self) {
        if !self.initialized {
            return;
        }

        self.process_commands();

        let events = &mut self.events;
        let mut destroyed = 0usize;
        self.handles.release_all(|handle| {
            events.destroyed(handle);
            destroyed += 1;
        });
        self.entity_count = 0;

        log::debug!("Destroyed all {destroyed} entities.");
    }

    /// Applies every queued command in submission order.
    ///
    /// Commands queued while processing, such as the destruction of an entity
    /// that failed finalization, are appended and applied before returning.
    ///
    /// # Panics
    ///
    /// Panics if a command no longer matches its slot. That only happens if
    /// the lifecycle invariants were broken, and continuing would corrupt the
    /// free list.
    pub fn process_commands(&mut self) {
        if !self.initialized {
            return;
        }

        while let Some(command) = self.commands.pop() {
            log::trace!("Processing {command:?}.");
            match command {
                EntityCommand::Create(handle) => self.apply_create(handle),
                EntityCommand::Destroy(handle) => self.apply_destroy(handle),
            }
        }
    }

    fn apply_create(&mut self, handle: EntityHandle) {
        let state = Self::slot_mut(&mut self.handles, handle, "create").state;
        assert!(
            matches!(
                state,
                SlotState::Pending | SlotState::PendingDestroy { activated: false }
            ),
            "entity {handle} finalized twice (state {state:?})"
        );

        if !self.events.finalize(handle) {
            log::debug!("Entity {handle} was rejected during finalization.");
            // Already pending destruction: the queued command completes it.
            if self.handles.is_live(handle) {
                self.schedule_destroy(handle);
            }
            return;
        }

        let entry = Self::slot_mut(&mut self.handles, handle, "create");
        entry.state = match entry.state {
            SlotState::PendingDestroy { .. } => SlotState::PendingDestroy { activated: true },
            _ => SlotState::Active,
        };
        self.entity_count += 1;

        self.events.created(handle);
    }

    fn apply_destroy(&mut self, handle: EntityHandle) {
        let Some(entry) = self.handles.entry(handle) else {
            panic!("entity {handle} destroyed twice");
        };
        let state = entry.state;
        assert!(
            state.is_pending_destroy(),
            "destroy command for entity {handle} in state {state:?}"
        );

        self.events.destroyed(handle);

        if state.is_active() {
            self.entity_count -= 1;
        }
        self.handles.recycle(handle);
    }

    fn slot_mut<'a>(
        handles: &'a mut HandleTable,
        handle: EntityHandle,
        command: &str,
    ) -> &'a mut HandleEntry {
        handles.entry_mut(handle).unwrap_or_else(|| {
            panic!("{command} command for entity {handle} does not match its slot")
        })
    }

    /// Returns `true` if `handle` refers to a live entity that is not
    /// scheduled for destruction. A stale handle is simply not valid.
    pub fn is_handle_valid(&self, handle: EntityHandle) -> bool {
        self.initialized && self.handles.is_live(handle)
    }

    /// Returns `true` if `handle` is valid and already passed finalization.
    pub fn is_handle_active(&self, handle: EntityHandle) -> bool {
        self.is_handle_valid(handle)
            && self
                .handles
                .entry(handle)
                .is_some_and(|entry| entry.state.is_active())
    }

    /// Number of active entities, including those pending destruction.
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Active entities in identifier order, excluding those pending
    /// destruction.
    pub fn iter_active(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.handles
            .iter()
            .filter(|entry| entry.state == SlotState::Active)
            .map(|entry| entry.handle)
    }

    /// Number of commands waiting for the next drain.
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Number of slots ever allocated.
    pub fn capacity(&self) -> usize {
        self.handles.len()
    }

    /// Number of slots waiting to be reused.
    pub fn free_count(&self) -> usize {
        self.handles.free_count()
    }

    /// The lifecycle channels, for subsystems to subscribe to.
    pub fn events_mut(&mut self) -> &mut EntityEvents {
        &mut self.events
    }

    #[cfg(test)]
    pub(crate) fn handles(&self) -> &HandleTable {
        &self.handles
    }
}

impl Default for EntitySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EntitySystem {
    fn drop(&mut self) {
        if self.initialized {
            self.cleanup();
        }
    }
}
