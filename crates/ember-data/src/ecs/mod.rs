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

//! Implements the entity lifecycle engine.
//!
//! Entities are plain [`EntityHandle`] values issued by a [`HandleTable`]. A
//! handle becomes stale as soon as its slot is recycled, because recycling
//! bumps the slot's version.
//!
//! Creation and destruction are deferred: [`EntitySystem`] queues
//! [`EntityCommand`]s and applies them in one batch, so subsystems following
//! the [`EntityEvents`] channels never observe a half-created or
//! half-destroyed entity in the middle of a frame.
//!
//! [`EntityHandle`]: ember_core::EntityHandle

mod command;
mod component_system;
mod config;
mod entity_system;
mod events;
mod free_list;
mod handle_table;

pub use command::{CommandQueue, EntityCommand};
pub use component_system::{ComponentSystem, InitError};
pub use config::EntitySystemConfig;
pub use entity_system::EntitySystem;
pub use events::{EntityCreated, EntityDestroyed, EntityEvents, EntityFinalize};
pub use free_list::FreeList;
pub use handle_table::{HandleEntry, HandleTable, SlotState};
