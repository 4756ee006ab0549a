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

use sigil_core::config::ConfigError;
use sigil_core::identity::{EdictAddress, Index, ObjectAddress};
use thiserror::Error;

/// A slot notification that contradicts the bookkeeping's current state.
///
/// These indicate the engine and the bookkeeping disagree about a slot. The
/// notification is rejected and the state is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// The notification names a slot beyond the table.
    #[error("index {index} is outside the slot table of {capacity}")]
    OutOfRange {
        /// The offending index.
        index: Index,
        /// The table capacity.
        capacity: u32,
    },
    /// An object was allocated into a slot that already holds one.
    #[error("slot {0} already holds an object")]
    Occupied(Index),
    /// A slot was freed that holds nothing.
    #[error("slot {0} is not occupied")]
    NotOccupied(Index),
    /// An edict was attached to a slot outside the networked window.
    #[error("slot {index} is beyond the networked window of {max_edicts}")]
    NotNetworkable {
        /// The offending index.
        index: Index,
        /// The number of networkable slots.
        max_edicts: u32,
    },
    /// An edict was attached to a slot that already has one.
    #[error("slot {0} is already networked")]
    AlreadyNetworked(Index),
    /// A notification carried the null address.
    #[error("slot {0} was given a null address")]
    NullAddress(Index),
    /// The object address is already registered for another slot.
    #[error("object {address} already belongs to slot {owner}")]
    ObjectInUse {
        /// The duplicated address.
        address: ObjectAddress,
        /// The slot that owns it.
        owner: Index,
    },
    /// The edict address is already registered for another slot.
    #[error("edict {address} already belongs to slot {owner}")]
    EdictInUse {
        /// The duplicated address.
        address: EdictAddress,
        /// The slot that owns it.
        owner: Index,
    },
    /// The table could not be sized from its configuration.
    #[error("invalid identity configuration: {0}")]
    Config(#[from] ConfigError),
}
