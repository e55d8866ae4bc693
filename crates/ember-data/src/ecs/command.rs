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

//! Deferred lifecycle commands.

use std::collections::VecDeque;

use ember_core::EntityHandle;

/// A lifecycle change requested now and applied on the next drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityCommand {
    /// Finalize and activate a freshly allocated entity.
    Create(EntityHandle),
    /// Tear down an entity and recycle its slot.
    Destroy(EntityHandle),
}

impl EntityCommand {
    /// The entity the command applies to.
    pub fn handle(self) -> EntityHandle {
        match self {
            EntityCommand::Create(handle) | EntityCommand::Destroy(handle) => handle,
        }
    }
}

/// Append-only FIFO of pending [`EntityCommand`]s.
///
/// Commands submitted while a drain is running land at the tail and are
/// processed by that same drain, after everything submitted before them.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    commands: VecDeque<EntityCommand>,
}

impl CommandQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            commands: VecDeque::new(),
        }
    }

    /// Appends a command at the tail.
    pub fn submit(&mut self, command: EntityCommand) {
        self.commands.push_back(command);
    }

    /// Takes the oldest command.
    pub fn pop(&mut self) -> Option<EntityCommand> {
        self.commands.pop_front()
    }

    /// Number of commands waiting.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drops every pending command without applying it.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
