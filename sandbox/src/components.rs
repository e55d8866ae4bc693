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

//! A minimal component system for the sandbox: one transform per entity.

use std::collections::HashMap;

use ember_core::EntityHandle;
use ember_data::ecs::ComponentSystem;

/// 2D placement of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: [f32; 2],
    pub scale: [f32; 2],
    /// Degrees, clockwise.
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            scale: [1.0, 1.0],
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// Unit vector the entity is facing.
    pub fn direction(&self) -> [f32; 2] {
        let radians = self.rotation.to_radians();
        [radians.sin(), radians.cos()]
    }
}

/// Transforms are staged while their entity is pending and only become
/// visible once the entity is finalized. Entities without a staged
/// transform are rejected.
#[derive(Debug, Default)]
pub struct TransformStore {
    staged: HashMap<EntityHandle, Transform>,
    live: HashMap<EntityHandle, Transform>,
}

impl TransformStore {
    /// Attaches a transform to an entity that has not been finalized yet.
    pub fn insert(&mut self, handle: EntityHandle, transform: Transform) {
        self.staged.insert(handle, transform);
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&Transform> {
        self.live.get(&handle)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&EntityHandle, &mut Transform)> {
        self.live.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }
}

impl ComponentSystem for TransformStore {
    fn on_bind(&mut self) -> anyhow::Result<()> {
        log::debug!("Transform store bound to an entity system.");
        Ok(())
    }

    fn finalize_entity(&mut self, handle: EntityHandle) -> bool {
        match self.staged.remove(&handle) {
            Some(transform) => {
                self.live.insert(handle, transform);
                true
            }
            None => {
                log::warn!("Entity {handle} has no transform, rejecting it.");
                false
            }
        }
    }

    fn entity_destroyed(&mut self, handle: EntityHandle) {
        self.staged.remove(&handle);
        self.live.remove(&handle);
    }
}
