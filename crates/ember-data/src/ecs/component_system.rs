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

//! The contract between the entity system and the component storage it feeds.

use ember_core::EntityHandle;
use thiserror::Error;

/// Storage of per-entity data that follows the entity lifecycle.
///
/// The entity system takes the component system at initialization and
/// subscribes it to the finalize and destroyed channels, ahead of any
/// subscriber added later.
pub trait ComponentSystem {
    /// Called once when an entity system binds to this collaborator.
    ///
    /// Returning an error aborts the initialization.
    fn on_bind(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Decides whether `handle` may become active, e.g. once all of its
    /// required components are in place.
    fn finalize_entity(&mut self, handle: EntityHandle) -> bool;

    /// Drops whatever is stored for `handle`.
    fn entity_destroyed(&mut self, handle: EntityHandle);
}

/// Why [`EntitySystem::initialize`](crate::ecs::EntitySystem::initialize) failed.
///
/// The entity system is left uninitialized and can be initialized again.
#[derive(Debug, Error)]
pub enum InitError {
    /// The component system was borrowed while binding.
    #[error("component system is borrowed elsewhere")]
    CollaboratorBusy,
    /// The component system refused to bind.
    #[error("component system refused to bind: {0}")]
    CollaboratorRejected(#[source] anyhow::Error),
}
