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

//! Frame-scoped step callbacks.
//!
//! A callback registered before or during a frame runs at the pre-collision
//! point of every remaining sub-step of that frame, then is dropped when the
//! frame ends.

/// A zero-argument unit of work run before collision detection.
pub type StepCallback = Box<dyn FnMut()>;

/// The scheduler-owned callback queue.
pub(crate) struct StepCallbackQueue {
    pending: Vec<StepCallback>,
    sender: flume::Sender<StepCallback>,
    receiver: flume::Receiver<StepCallback>,
}

impl StepCallbackQueue {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            pending: Vec::new(),
            sender,
            receiver,
        }
    }

    pub(crate) fn push(&mut self, callback: StepCallback) {
        self.pending.push(callback);
    }

    pub(crate) fn registrar(&self) -> StepCallbackRegistrar {
        StepCallbackRegistrar {
            sender: self.sender.clone(),
        }
    }

    /// Runs every queued callback in registration order, after pulling in
    /// anything submitted through a registrar. Returns how many ran.
    pub(crate) fn run_all(&mut self) -> usize {
        self.pending.extend(self.receiver.try_iter());
        for callback in self.pending.iter_mut() {
            callback();
        }
        self.pending.len()
    }

    /// Drops every queued and in-flight callback. Returns how many were dropped.
    pub(crate) fn clear(&mut self) -> usize {
        let in_flight = self.receiver.try_iter().count();
        let queued = self.pending.len();
        self.pending.clear();
        queued + in_flight
    }

    /// Callbacks queued or in flight.
    pub(crate) fn len(&self) -> usize {
        self.pending.len() + self.receiver.len()
    }
}

/// A cloneable handle for registering step callbacks while the scheduler is
/// mutably borrowed, e.g. from a lifecycle listener.
///
/// Submissions join the queue at the next pre-step point.
#[derive(Clone)]
pub struct StepCallbackRegistrar {
    sender: flume::Sender<StepCallback>,
}

impl StepCallbackRegistrar {
    /// Queues `callback`. Returns `false` if the scheduler has been dropped.
    pub fn register<F>(&self, callback: F) -> bool
    where
        F: FnMut() + 'static,
    {
        self.sender.send(Box::new(callback)).is_ok()
    }
}

impl std::fmt::Debug for StepCallbackRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepCallbackRegistrar").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_runs_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut queue = StepCallbackQueue::new();
        for i in 0..3 {
            let order = Rc::clone(&order);
            queue.push(Box::new(move || order.borrow_mut().push(i)));
        }

        assert_eq!(queue.run_all(), 3);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_registrar_submissions_join_after_direct_ones() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut queue = StepCallbackQueue::new();
        let registrar = queue.registrar();

        let o = Rc::clone(&order);
        assert!(registrar.register(move || o.borrow_mut().push("late")));
        let o = Rc::clone(&order);
        queue.push(Box::new(move || o.borrow_mut().push("direct")));

        queue.run_all();
        assert_eq!(*order.borrow(), vec!["direct", "late"]);
    }

    #[test]
    fn test_clear_discards_in_flight() {
        let mut queue = StepCallbackQueue::new();
        let registrar = queue.registrar();
        queue.push(Box::new(|| {}));
        registrar.register(|| {});
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.clear(), 2);
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.run_all(), 0);
    }

    #[test]
    fn test_registrar_reports_dropped_queue() {
        let queue = StepCallbackQueue::new();
        let registrar = queue.registrar();
        drop(queue);
        assert!(!registrar.register(|| {}));
    }
}
