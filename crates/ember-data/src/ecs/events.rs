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

//! The three lifecycle channels of the entity system.

use std::cell::RefCell;
use std::rc::Rc;

use ember_core::event::{Dispatcher, Finalizer, Subscriber, SubscriptionId, VetoDispatcher};
use ember_core::EntityHandle;

/// Asks whether an entity may become active. Any finalizer can reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityFinalize {
    /// The entity being finalized.
    pub handle: EntityHandle,
}

/// An entity became active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityCreated {
    /// The entity that became active.
    pub handle: EntityHandle,
}

/// An entity is about to be recycled.
///
/// Sent before the slot is reclaimed, so the handle still carries the old
/// identity and can be used to tear down associated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDestroyed {
    /// The entity being torn down.
    pub handle: EntityHandle,
}

/// Subscription points for entity lifecycle transitions.
///
/// Subscribers run in the order they were registered, per channel.
#[derive(Debug, Default)]
pub struct EntityEvents {
    finalize: VetoDispatcher<EntityFinalize>,
    created: Dispatcher<EntityCreated>,
    destroyed: Dispatcher<EntityDestroyed>,
}

impl EntityEvents {
    /// Creates the channels without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a finalizer. Returning `false` keeps the entity from activating.
    pub fn subscribe_finalize(
        &mut self,
        finalizer: impl Finalizer<EntityFinalize> + 'static,
    ) -> SubscriptionId {
        self.finalize.subscribe(finalizer)
    }

    /// Adds a reaction to entities becoming active.
    pub fn subscribe_created(
        &mut self,
        subscriber: impl Subscriber<EntityCreated> + 'static,
    ) -> SubscriptionId {
        self.created.subscribe(subscriber)
    }

    /// Adds a reaction to entities being torn down.
    pub fn subscribe_destroyed(
        &mut self,
        subscriber: impl Subscriber<EntityDestroyed> + 'static,
    ) -> SubscriptionId {
        self.destroyed.subscribe(subscriber)
    }

    /// Adds a finalizer object that its owner keeps a handle on.
    pub fn subscribe_finalize_shared<T>(&mut self, finalizer: Rc<RefCell<T>>) -> SubscriptionId
    where
        T: Finalizer<EntityFinalize> + 'static,
    {
        self.finalize.subscribe_shared(finalizer)
    }

    /// Adds a created reaction that its owner keeps a handle on.
    pub fn subscribe_created_shared<T>(&mut self, subscriber: Rc<RefCell<T>>) -> SubscriptionId
    where
        T: Subscriber<EntityCreated> + 'static,
    {
        self.created.subscribe_shared(subscriber)
    }

    /// Adds a destroyed reaction that its owner keeps a handle on.
    pub fn subscribe_destroyed_shared<T>(&mut self, subscriber: Rc<RefCell<T>>) -> SubscriptionId
    where
        T: Subscriber<EntityDestroyed> + 'static,
    {
        self.destroyed.subscribe_shared(subscriber)
    }

    /// Removes a finalizer.
    pub fn unsubscribe_finalize(&mut self, id: SubscriptionId) -> bool {
        self.finalize.unsubscribe(id)
    }

    /// Removes a created reaction.
    pub fn unsubscribe_created(&mut self, id: SubscriptionId) -> bool {
        self.created.unsubscribe(id)
    }

    /// Removes a destroyed reaction.
    pub fn unsubscribe_destroyed(&mut self, id: SubscriptionId) -> bool {
        self.destroyed.unsubscribe(id)
    }

    /// Disconnects every subscriber of every channel.
    pub fn clear(&mut self) {
        self.finalize.clear();
        self.created.clear();
        self.destroyed.clear();
    }

    /// Total subscribers across the three channels.
    pub fn subscriber_count(&self) -> usize {
        self.finalize.len() + self.created.len() + self.destroyed.len()
    }

    pub(crate) fn finalize(&mut self, handle: EntityHandle) -> bool {
        self.finalize.dispatch(&EntityFinalize { handle })
    }

    pub(crate) fn created(&mut self, handle: EntityHandle) {
        self.created.dispatch(&EntityCreated { handle });
    }

    pub(crate) fn destroyed(&mut self, handle: EntityHandle) {
        self.destroyed.dispatch(&EntityDestroyed { handle });
    }
}
