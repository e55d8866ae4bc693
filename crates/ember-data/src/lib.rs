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

//! # Ember Data
//!
//! The entity lifecycle engine: handle allocation and recycling, deferred
//! create/destroy commands and the broadcasts that let other subsystems follow
//! entities as they appear and disappear.
//!
//! The primary entry point is [`ecs::EntitySystem`].

#![warn(missing_docs)]

pub mod ecs;
