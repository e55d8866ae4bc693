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

//! Tunables of the entity system.

use serde::{Deserialize, Serialize};

/// Configuration of an [`EntitySystem`](crate::ecs::EntitySystem).
///
/// Missing fields take their default value when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitySystemConfig {
    /// Number of slots reserved upfront.
    pub initial_capacity: usize,
    /// Highest identifier the handle table may hand out.
    pub max_identifier: u32,
}

impl Default for EntitySystemConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_identifier: u32::MAX,
        }
    }
}

impl EntitySystemConfig {
    /// Sets the number of slots reserved upfront.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the highest identifier that can be handed out.
    #[must_use]
    pub fn with_max_identifier(mut self, max_identifier: u32) -> Self {
        self.max_identifier = max_identifier;
        self
    }
}
