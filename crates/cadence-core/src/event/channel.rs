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

use super::{LifecycleSignal, SignalEvent};

/// A failure reported by a single listener.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ListenerError {
    /// Human readable description.
    pub message: String,
}

impl ListenerError {
    /// Creates a listener error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Every listener failure collected while publishing one signal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} listener(s) failed on `{}`", .failures.len(), .signal)]
pub struct PublishError {
    /// The signal being published.
    pub signal: LifecycleSignal,
    /// `(listener name, error)` pairs, in subscription order.
    pub failures: Vec<(String, ListenerError)>,
}

impl PublishError {
    /// A publish failure with a single anonymous cause.
    pub fn single(
        signal: LifecycleSignal,
        listener: impl Into<String>,
        error: ListenerError,
    ) -> Self {
        Self {
            signal,
            failures: vec![(listener.into(), error)],
        }
    }
}

/// Interface contract for the lifecycle notification collaborator.
///
/// Implementations report listener failures through the returned error; the
/// scheduler logs them and carries on.
pub trait NotificationChannel {
    /// Delivers `event` to every interested listener.
    fn publish(&mut self, event: &SignalEvent) -> Result<(), PublishError>;
}

type Listener = Box<dyn FnMut(&SignalEvent) -> Result<(), ListenerError>>;

struct Subscription {
    name: String,
    filter: Option<LifecycleSignal>,
    listener: Listener,
}

/// An explicit, instance-owned list of lifecycle listeners.
///
/// Each listener runs in its own result scope: a failing listener is recorded
/// and the remaining listeners still run.
#[derive(Default)]
pub struct ObserverList {
    subscriptions: Vec<Subscription>,
}

impl ObserverList {
    /// Creates an empty observer list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `listener` to a single signal.
    pub fn subscribe<F>(&mut self, name: impl Into<String>, signal: LifecycleSignal, listener: F)
    where
        F: FnMut(&SignalEvent) -> Result<(), ListenerError> + 'static,
    {
        self.push(name.into(), Some(signal), Box::new(listener));
    }

    /// Subscribes `listener` to every signal.
    pub fn subscribe_all<F>(&mut self, name: impl Into<String>, listener: F)
    where
        F: FnMut(&SignalEvent) -> Result<(), ListenerError> + 'static,
    {
        self.push(name.into(), None, Box::new(listener));
    }

    /// Forwards every signal into a channel, typically obtained from
    /// [`SignalBus::sender`](super::SignalBus::sender).
    ///
    /// A disconnected receiver surfaces as a listener failure.
    pub fn forward_to(&mut self, name: impl Into<String>, sender: flume::Sender<SignalEvent>) {
        self.subscribe_all(name, move |event| {
            sender
                .send(*event)
                .map_err(|e| ListenerError::new(format!("signal receiver disconnected: {e}")))
        });
    }

    /// Number of subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns `true` if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    fn push(&mut self, name: String, filter: Option<LifecycleSignal>, listener: Listener) {
        log::trace!("Subscribing listener '{name}' to {filter:?}.");
        self.subscriptions.push(Subscription {
            name,
            filter,
            listener,
        });
    }
}

impl NotificationChannel for ObserverList {
    fn publish(&mut self, event: &SignalEvent) -> Result<(), PublishError> {
        let mut failures = Vec::new();
        for sub in self
            .subscriptions
            .iter_mut()
            .filter(|sub| sub.filter.map_or(true, |s| s == event.signal))
        {
            if let Err(e) = (sub.listener)(event) {
                failures.push((sub.name.clone(), e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(PublishError {
                signal: event.signal,
                failures,
            })
        }
    }
}

impl std::fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.subscriptions.iter().map(|s| (&s.name, s.filter)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(signal: LifecycleSignal) -> SignalEvent {
        SignalEvent::new(signal, 1, 0, 0.0)
    }

    #[test]
    fn test_filtered_listener_only_sees_its_signal() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = ObserverList::new();
        let sink = Rc::clone(&seen);
        observers.subscribe("steps", LifecycleSignal::PreStep, move |e| {
            sink.borrow_mut().push(e.signal);
            Ok(())
        });

        for signal in LifecycleSignal::ALL {
            observers.publish(&event(signal)).unwrap();
        }
        assert_eq!(*seen.borrow(), vec![LifecycleSignal::PreStep]);
    }

    #[test]
    fn test_failing_listener_does_not_block_others() {
        let calls = Rc::new(RefCell::new(0));
        let mut observers = ObserverList::new();
        observers.subscribe_all("broken", |_| Err(ListenerError::new("boom")));
        let counter = Rc::clone(&calls);
        observers.subscribe_all("healthy", move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        let err = observers
            .publish(&event(LifecycleSignal::PostFrame))
            .unwrap_err();
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(err.signal, LifecycleSignal::PostFrame);
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].0, "broken");
        assert_eq!(err.to_string(), "1 listener(s) failed on `post-frame`");
    }

    #[test]
    fn test_forward_reports_disconnected_receiver() {
        let (sender, receiver) = flume::unbounded();
        let mut observers = ObserverList::new();
        observers.forward_to("bus", sender);

        observers.publish(&event(LifecycleSignal::PreFrame)).unwrap();
        assert_eq!(receiver.try_recv().unwrap().signal, LifecycleSignal::PreFrame);

        drop(receiver);
        assert!(observers.publish(&event(LifecycleSignal::PreFrame)).is_err());
    }
}
