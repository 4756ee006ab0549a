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

//! Engine-owned addresses and the identifiers built on them.
//!
//! Addresses are opaque integers: this layer never dereferences them. They are
//! only compared against what the slot table reports for a live slot, which is
//! how a dangling address is told apart from a live one.

use super::Index;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The address of a simulation object in engine memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectAddress(pub usize);

/// The address of an edict, the engine's networked wrapper around a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdictAddress(pub usize);

impl ObjectAddress {
    /// The null address. It never identifies an object.
    pub const NULL: ObjectAddress = ObjectAddress(0);

    /// Returns `true` for the null address.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl EdictAddress {
    /// The null address. It never identifies an edict.
    pub const NULL: EdictAddress = EdictAddress(0);

    /// Returns `true` for the null address.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ObjectAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for EdictAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// What kind of object an address points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectTag {
    /// A generic simulation entity.
    Entity,
    /// A player-controlled entity, bound to a network session.
    Player,
}

impl fmt::Display for ObjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectTag::Entity => write!(f, "entity"),
            ObjectTag::Player => write!(f, "player"),
        }
    }
}

/// A raw pointer to an engine-owned object, tagged with the object's kind.
///
/// The pointer never owns the object. It is only meaningful while the engine
/// keeps the object allocated; any conversion out of a `Pointer` first checks
/// that the slot table still maps the address to a live slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pointer {
    /// Where the object lives.
    pub address: ObjectAddress,
    /// The kind of object found at `address`.
    pub tag: ObjectTag,
}

impl Pointer {
    /// Creates a pointer to an object of the given kind.
    pub fn new(address: ObjectAddress, tag: ObjectTag) -> Self {
        Self { address, tag }
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pointer {}", self.tag, self.address)
    }
}

/// A reference to the edict networking a slot.
///
/// Only objects inside the engine's networked window have one. Like
/// [`Pointer`], the reference is borrowed from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdictRef {
    /// Where the edict lives.
    pub address: EdictAddress,
    /// The slot the edict wraps.
    pub index: Index,
}

impl EdictRef {
    /// Creates an edict reference from its parts.
    pub fn new(address: EdictAddress, index: Index) -> Self {
        Self { address, index }
    }
}

impl fmt::Display for EdictRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edict {} at index {}", self.address, self.index)
    }
}
