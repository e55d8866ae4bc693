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

//! Provides foundational primitives for lifecycle broadcasting.
//!
//! Two kinds of channel exist:
//! - [`Dispatcher`]: fire-and-forget, every subscriber sees every event.
//! - [`VetoDispatcher`]: collect-while-true, any subscriber may reject and
//!   stops the broadcast.
//!
//! Both invoke their subscribers strictly in registration order. They are
//! single-threaded; subscribers are owned by the dispatcher and shared state is
//! expressed with `Rc<RefCell<_>>`.

mod dispatcher;

pub use self::dispatcher::{Dispatcher, Finalizer, Subscriber, SubscriptionId, VetoDispatcher};
