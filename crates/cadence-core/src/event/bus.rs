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

/// An unbounded channel carrying lifecycle signals to decoupled consumers.
///
/// Wire it into an [`ObserverList`](super::ObserverList) with
/// [`forward_to`](super::ObserverList::forward_to) and drain it wherever the
/// signals are needed, including from another thread.
#[derive(Debug)]
pub struct SignalBus {
    sender: flume::Sender<SignalEvent>,
    receiver: flume::Receiver<SignalEvent>,
}

impl SignalBus {
    /// Creates a new bus with an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("Signal bus initialized.");
        Self { sender, receiver }
    }

    /// Returns a clone of the sending end.
    pub fn sender(&self) -> flume::Sender<SignalEvent> {
        self.sender.clone()
    }

    /// Returns the receiving end.
    pub fn receiver(&self) -> &flume::Receiver<SignalEvent> {
        &self.receiver
    }

    /// Takes every signal currently queued.
    pub fn drain(&self) -> Vec<SignalEvent> {
        self.receiver.try_iter().collect()
    }

    /// Takes every queued signal and counts them per kind, in
    /// [`LifecycleSignal::ALL`] order.
    pub fn drain_counts(&self) -> [(LifecycleSignal, usize); 4] {
        let mut counts = LifecycleSignal::ALL.map(|s| (s, 0));
        for event in self.receiver.try_iter() {
            if let Some(slot) = counts.iter_mut().find(|(s, _)| *s == event.signal) {
                slot.1 += 1;
            }
        }
        counts
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}
