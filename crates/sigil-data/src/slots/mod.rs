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

//! Generation-tracking bookkeeping for the engine's slot table.
//!
//! The engine announces every allocation, networking, and free as a
//! [`SlotEvent`](sigil_core::slots::SlotEvent). [`EntitySlots`] applies them
//! and exposes the result through the [`SlotTable`](sigil_core::slots::SlotTable)
//! contract the conversion core reads from.

mod entity_slots;
mod error;

pub use entity_slots::EntitySlots;
pub use error::SlotError;

#[cfg(test)]
mod tests;
