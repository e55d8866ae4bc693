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

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Identifies a subscription so that it can be removed later.
///
/// Identifiers are unique per dispatcher and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A reaction to a broadcast event. Cannot veto.
pub trait Subscriber<E> {
    /// Called once per dispatched event, in registration order.
    fn receive(&mut self, event: &E);
}

impl<E, F> Subscriber<E> for F
where
    F: FnMut(&E),
{
    fn receive(&mut self, event: &E) {
        self(event)
    }
}

/// A predicate taking part in a collect-while-true broadcast.
pub trait Finalizer<E> {
    /// Returns `false` to reject the event.
    fn finalize(&mut self, event: &E) -> bool;
}

impl<E, F> Finalizer<E> for F
where
    F: FnMut(&E) -> bool,
{
    fn finalize(&mut self, event: &E) -> bool {
        self(event)
    }
}

/// Forwards to a subscriber whose owner keeps its own handle on it.
///
/// Blanket impls for `Rc<RefCell<T>>` would overlap with the closure impls,
/// so shared subscribers go through this adapter instead.
struct Shared<T>(Rc<RefCell<T>>);

impl<E, T: Subscriber<E>> Subscriber<E> for Shared<T> {
    fn receive(&mut self, event: &E) {
        self.0.borrow_mut().receive(event);
    }
}

impl<E, T: Finalizer<E>> Finalizer<E> for Shared<T> {
    fn finalize(&mut self, event: &E) -> bool {
        self.0.borrow_mut().finalize(event)
    }
}

/// Ordered storage shared by both dispatcher kinds.
struct Subscriptions<T: ?Sized> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<T>)>,
}

impl<T: ?Sized> Subscriptions<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, subscriber: Box<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, subscriber));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        // `Vec::remove` rather than `swap_remove`: the order is the contract.
        match self.entries.iter().position(|(entry, _)| *entry == id) {
            Some(position) => {
                self.entries.remove(position);
                true
            }
            None => false,
        }
    }
}

/// A fire-and-forget broadcast channel.
///
/// Every subscriber receives every event, in the order the subscribers were
/// registered. A subscriber that panics unwinds through [`dispatch`]; the
/// failure is never swallowed.
///
/// # Example
///
/// ```rust
/// use ember_core::event::Dispatcher;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let total = Rc::new(Cell::new(0));
/// let mut dispatcher = Dispatcher::<u32>::new();
///
/// let sink = total.clone();
/// dispatcher.subscribe(move |value: &u32| sink.set(sink.get() + value));
/// dispatcher.dispatch(&7);
///
/// assert_eq!(total.get(), 7);
/// ```
///
/// [`dispatch`]: Dispatcher::dispatch
pub struct Dispatcher<E> {
    subscriptions: Subscriptions<dyn Subscriber<E>>,
}

impl<E> Dispatcher<E> {
    /// Creates a dispatcher without subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Subscriptions::new(),
        }
    }

    /// Appends a subscriber after every existing one.
    pub fn subscribe(&mut self, subscriber: impl Subscriber<E> + 'static) -> SubscriptionId {
        self.subscriptions.push(Box::new(subscriber))
    }

    /// Appends a subscriber the caller keeps sharing.
    ///
    /// The subscriber is mutably borrowed for the duration of each delivery,
    /// so it must not be borrowed elsewhere while an event is dispatched.
    pub fn subscribe_shared<T>(&mut self, subscriber: Rc<RefCell<T>>) -> SubscriptionId
    where
        T: Subscriber<E> + 'static,
    {
        self.subscribe(Shared(subscriber))
    }

    /// Removes a subscriber. Returns `false` if `id` is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(id)
    }

    /// Removes every subscriber.
    pub fn clear(&mut self) {
        self.subscriptions.entries.clear();
    }

    /// Returns the number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.entries.len()
    }

    /// Returns `true` if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.entries.is_empty()
    }

    /// Delivers `event` to every subscriber in registration order.
    pub fn dispatch(&mut self, event: &E) {
        log::trace!(
            "Dispatching an event to {} subscriber(s).",
            self.subscriptions.entries.len()
        );

        for (_, subscriber) in &mut self.subscriptions.entries {
            subscriber.receive(event);
        }
    }
}

impl<E> Default for Dispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Dispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// A collect-while-true broadcast channel.
///
/// [`dispatch`](VetoDispatcher::dispatch) asks each finalizer in registration
/// order and stops at the first rejection. The aggregate is the logical AND of
/// the answers that were collected, so an empty dispatcher accepts.
pub struct VetoDispatcher<E> {
    subscriptions: Subscriptions<dyn Finalizer<E>>,
}

impl<E> VetoDispatcher<E> {
    /// Creates a dispatcher without finalizers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Subscriptions::new(),
        }
    }

    /// Appends a finalizer after every existing one.
    pub fn subscribe(&mut self, finalizer: impl Finalizer<E> + 'static) -> SubscriptionId {
        self.subscriptions.push(Box::new(finalizer))
    }

    /// Appends a finalizer the caller keeps sharing. See
    /// [`Dispatcher::subscribe_shared`].
    pub fn subscribe_shared<T>(&mut self, finalizer: Rc<RefCell<T>>) -> SubscriptionId
    where
        T: Finalizer<E> + 'static,
    {
        self.subscribe(Shared(finalizer))
    }

    /// Removes a finalizer. Returns `false` if `id` is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(id)
    }

    /// Removes every finalizer.
    pub fn clear(&mut self) {
        self.subscriptions.entries.clear();
    }

    /// Returns the number of finalizers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.entries.len()
    }

    /// Returns `true` if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.entries.is_empty()
    }

    /// Returns `true` if every finalizer accepted `event`.
    ///
    /// Finalizers after the first rejecting one are not called.
    pub fn dispatch(&mut self, event: &E) -> bool {
        for (id, finalizer) in &mut self.subscriptions.entries {
            if !finalizer.finalize(event) {
                log::trace!("Finalizer {id:?} rejected the event.");
                return false;
            }
        }
        true
    }
}

impl<E> Default for VetoDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for VetoDispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VetoDispatcher")
            .field("finalizers", &self.len())
            .finish()
    }
}
