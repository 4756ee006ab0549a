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

//! # Sigil Data
//!
//! The engine-facing half of the identity layer: slot bookkeeping that tracks
//! generations, the player session table, and [`SimWorld`], a simulated engine
//! used to drive the conversion core without a game server.

#![warn(missing_docs)]

pub mod sessions;
pub mod sim;
pub mod slots;

pub use sessions::{SessionError, Sessions};
pub use sim::{EntityClass, SimError, SimWorld};
pub use slots::{EntitySlots, SlotError};
