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

//! Read-side contracts onto the engine's object storage.
//!
//! The engine owns its slot table and session table. The conversion core only
//! ever sees them through [`SlotTable`] and [`SessionTable`], which keeps the
//! core free of state and lets tests substitute a plain in-memory table.
//! The engine reports changes to its storage as [`SlotEvent`]s; whatever
//! implements `SlotTable` must have applied an event before conversions are
//! expected to observe it.

use crate::identity::{EdictAddress, Generation, Index, ObjectAddress, ObjectTag, UserId};

/// What currently occupies a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    /// The object's address, or `None` while the object is still being
    /// constructed (its slot was reserved ahead of it).
    pub object: Option<ObjectAddress>,
    /// The edict networking the slot, if the object is networked.
    pub edict: Option<EdictAddress>,
    /// The kind of object occupying the slot.
    pub tag: ObjectTag,
}

impl Occupant {
    /// Returns `true` once the object has been attached to its slot.
    pub fn is_constructed(&self) -> bool {
        self.object.is_some()
    }
}

/// A snapshot of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotView {
    /// The generation the slot currently carries.
    pub generation: Generation,
    /// The current occupant, if any.
    pub occupant: Option<Occupant>,
}

impl SlotView {
    /// An unoccupied slot at the given generation.
    pub fn empty(generation: Generation) -> Self {
        Self {
            generation,
            occupant: None,
        }
    }
}

/// Read access to the engine's fixed-capacity slot table.
pub trait SlotTable {
    /// The number of slots. Valid indices are `0..capacity()`.
    fn capacity(&self) -> u32;

    /// Returns a snapshot of the slot at `index`, or `None` if the index is out
    /// of range.
    fn slot(&self, index: Index) -> Option<SlotView>;

    /// Finds the slot whose occupant lives at `address`.
    fn index_of_object(&self, address: ObjectAddress) -> Option<Index>;

    /// Finds the slot networked by the edict at `address`.
    fn index_of_edict(&self, address: EdictAddress) -> Option<Index>;
}

/// Read access to the engine's table of connected players.
pub trait SessionTable {
    /// Returns the slot of the player bound to `user`, if the session is open.
    fn index_of_user(&self, user: UserId) -> Option<Index>;

    /// Returns the user bound to the player at `index`, if any.
    fn user_of_index(&self, index: Index) -> Option<UserId>;
}

/// A change the engine made to its slot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEvent {
    /// An object was placed in the slot.
    Allocated {
        /// The slot.
        index: Index,
        /// The object's address.
        object: ObjectAddress,
        /// The kind of object.
        tag: ObjectTag,
    },
    /// An edict was attached to the slot. May arrive before
    /// [`SlotEvent::Allocated`], in which case the slot is reserved for an
    /// object still under construction.
    Networked {
        /// The slot.
        index: Index,
        /// The edict's address.
        edict: EdictAddress,
    },
    /// The slot's occupant was destroyed.
    Freed {
        /// The slot.
        index: Index,
    },
}

impl SlotEvent {
    /// The slot this event concerns.
    pub fn index(&self) -> Index {
        match self {
            SlotEvent::Allocated { index, .. }
            | SlotEvent::Networked { index, .. }
            | SlotEvent::Freed { index } => *index,
        }
    }
}

impl<T: SlotTable + ?Sized> SlotTable for &T {
    fn capacity(&self) -> u32 {
        (**self).capacity()
    }

    fn slot(&self, index: Index) -> Option<SlotView> {
        (**self).slot(index)
    }

    fn index_of_object(&self, address: ObjectAddress) -> Option<Index> {
        (**self).index_of_object(address)
    }

    fn index_of_edict(&self, address: EdictAddress) -> Option<Index> {
        (**self).index_of_edict(address)
    }
}

impl<T: SessionTable + ?Sized> SessionTable for &T {
    fn index_of_user(&self, user: UserId) -> Option<Index> {
        (**self).index_of_user(user)
    }

    fn user_of_index(&self, index: Index) -> Option<UserId> {
        (**self).user_of_index(index)
    }
}
