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

//! Lifecycle notifications.
//!
//! The scheduler announces four points of every frame through a
//! [`NotificationChannel`]. The default channel, [`ObserverList`], is an
//! explicit subscriber list owned by whoever builds the scheduler; there is
//! no process-wide dispatcher. Consumers on other threads can read the same
//! signals from a [`SignalBus`].

mod bus;
mod channel;
mod signal;

pub use self::bus::SignalBus;
pub use self::channel::{ListenerError, NotificationChannel, ObserverList, PublishError};
pub use self::signal::{LifecycleSignal, SignalEvent};
