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

//! Defines the handle used to refer to entities.

use std::fmt;

/// A generation-tagged reference to an entity slot.
///
/// It combines an identifier with a version count to solve the "ABA problem".
/// When an entity is destroyed its identifier is recycled for a new entity,
/// but the version is incremented. Old copies of the handle then no longer
/// match the slot and are detected as stale.
///
/// Identifiers are 1-based; `0` is reserved for [`EntityHandle::INVALID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle {
    pub(crate) identifier: u32,
    pub(crate) version: u32,
}

impl EntityHandle {
    /// The unset handle. Never refers to an entity.
    pub const INVALID: Self = Self {
        identifier: 0,
        version: 0,
    };

    /// Creates a handle from its raw parts.
    ///
    /// Intended for handle tables; a handle built by hand is only meaningful
    /// if some table actually issued it.
    #[inline]
    #[must_use]
    pub const fn new(identifier: u32, version: u32) -> Self {
        Self {
            identifier,
            version,
        }
    }

    /// The 1-based identifier of the slot this handle points to.
    #[inline]
    #[must_use]
    pub const fn identifier(self) -> u32 {
        self.identifier
    }

    /// The version the slot had when this handle was issued.
    #[inline]
    #[must_use]
    pub const fn version(self) -> u32 {
        self.version
    }

    /// Returns `true` if this is not [`EntityHandle::INVALID`].
    ///
    /// This says nothing about liveness, only that the handle was issued by a
    /// table at some point.
    #[inline]
    #[must_use]
    pub const fn is_set(self) -> bool {
        self.identifier != 0
    }

    /// Returns the same slot with the next version, or `None` once the version
    /// space of the slot is used up.
    ///
    /// Versions never wrap: a slot that reached `u32::MAX` must be retired, or
    /// it would reissue handles equal to ones handed out long ago.
    #[inline]
    #[must_use]
    pub const fn next_version(self) -> Option<Self> {
        match self.version.checked_add(1) {
            Some(version) => Some(Self {
                identifier: self.identifier,
                version,
            }),
            None => None,
        }
    }
}

impl Default for EntityHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.identifier, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_invalid() {
        let handle = EntityHandle::default();
        assert_eq!(handle, EntityHandle::INVALID);
        assert!(!handle.is_set());
    }

    #[test]
    fn next_version_keeps_identifier() {
        let handle = EntityHandle::new(7, 3);
        let next = handle.next_version().unwrap();

        assert_eq!(next.identifier(), 7);
        assert_eq!(next.version(), 4);
        assert_ne!(handle, next, "A recycled slot must not compare equal");
    }

    #[test]
    fn next_version_does_not_wrap() {
        let handle = EntityHandle::new(1, u32::MAX);
        assert_eq!(handle.next_version(), None);
        assert_eq!(
            EntityHandle::new(1, u32::MAX - 1).next_version(),
            Some(handle)
        );
    }

    #[test]
    fn display_shows_both_parts() {
        assert_eq!(EntityHandle::new(12, 5).to_string(), "12:5");
    }
}
