// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Business logic for the message queue.
//!
//! The `Sender` publishes messages and the `Listener` consumes them in the background.  When both
//! live in the same process, the sender can be attached to the listener so that new messages are
//! delivered right away instead of waiting for the next polling period.

mod listener;
pub use listener::{Listener, ListenerOptions};
mod sender;
pub use sender::Sender;
