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

//! The identifier spaces through which a simulation object can be named.
//!
//! Every kind converts to and from [`Index`], which acts as the hub:
//!
//! - [`Index`]: dense slot position, recycled after the object is freed.
//! - [`Pointer`]: raw engine address of the object, tagged with its kind.
//! - [`WeakHandle`]: index plus generation; detects slot recycling.
//! - [`PackedHandle`]: the same weak handle squeezed into one integer.
//! - [`EdictRef`]: the engine's networked wrapper around a slot.
//! - [`UserId`]: a player's session identity, stable across respawns.

mod address;
mod handle;
mod index;
mod user;

pub use address::*;
pub use handle::*;
pub use index::*;
pub use user::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names one of the identifier spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierKind {
    /// See [`Index`].
    Index,
    /// See [`Pointer`].
    Pointer,
    /// See [`WeakHandle`].
    WeakHandle,
    /// See [`PackedHandle`].
    PackedHandle,
    /// See [`EdictRef`].
    Edict,
    /// See [`UserId`].
    UserId,
}

impl IdentifierKind {
    /// Every supported kind, in a stable order.
    pub const ALL: [IdentifierKind; 6] = [
        IdentifierKind::Index,
        IdentifierKind::Pointer,
        IdentifierKind::WeakHandle,
        IdentifierKind::PackedHandle,
        IdentifierKind::Edict,
        IdentifierKind::UserId,
    ];

    /// The snake_case name scripts use for this kind.
    pub fn name(self) -> &'static str {
        match self {
            IdentifierKind::Index => "index",
            IdentifierKind::Pointer => "pointer",
            IdentifierKind::WeakHandle => "weak_handle",
            IdentifierKind::PackedHandle => "packed_handle",
            IdentifierKind::Edict => "edict",
            IdentifierKind::UserId => "user_id",
        }
    }

    /// Parses a name produced by [`IdentifierKind::name`].
    pub fn from_name(name: &str) -> Option<IdentifierKind> {
        IdentifierKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value in any one of the identifier spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identifier {
    /// A dense slot index.
    Index(Index),
    /// A tagged engine pointer.
    Pointer(Pointer),
    /// An index and generation pair.
    WeakHandle(WeakHandle),
    /// A weak handle encoded as one integer.
    PackedHandle(PackedHandle),
    /// An edict reference.
    Edict(EdictRef),
    /// A player session identity.
    UserId(UserId),
}

impl Identifier {
    /// Returns which identifier space this value belongs to.
    pub fn kind(&self) -> IdentifierKind {
        match self {
            Identifier::Index(_) => IdentifierKind::Index,
            Identifier::Pointer(_) => IdentifierKind::Pointer,
            Identifier::WeakHandle(_) => IdentifierKind::WeakHandle,
            Identifier::PackedHandle(_) => IdentifierKind::PackedHandle,
            Identifier::Edict(_) => IdentifierKind::Edict,
            Identifier::UserId(_) => IdentifierKind::UserId,
        }
    }

    /// Returns the index if this is an [`Identifier::Index`].
    pub fn as_index(&self) -> Option<Index> {
        match self {
            Identifier::Index(index) => Some(*index),
            _ => None,
        }
    }

    /// Returns the pointer if this is an [`Identifier::Pointer`].
    pub fn as_pointer(&self) -> Option<Pointer> {
        match self {
            Identifier::Pointer(pointer) => Some(*pointer),
            _ => None,
        }
    }

    /// Returns the handle if this is an [`Identifier::WeakHandle`].
    pub fn as_weak_handle(&self) -> Option<WeakHandle> {
        match self {
            Identifier::WeakHandle(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Returns the packed handle if this is an [`Identifier::PackedHandle`].
    pub fn as_packed_handle(&self) -> Option<PackedHandle> {
        match self {
            Identifier::PackedHandle(packed) => Some(*packed),
            _ => None,
        }
    }

    /// Returns the edict reference if this is an [`Identifier::Edict`].
    pub fn as_edict(&self) -> Option<EdictRef> {
        match self {
            Identifier::Edict(edict) => Some(*edict),
            _ => None,
        }
    }

    /// Returns the user id if this is an [`Identifier::UserId`].
    pub fn as_user_id(&self) -> Option<UserId> {
        match self {
            Identifier::UserId(user) => Some(*user),
            _ => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Index(index) => write!(f, "index {index}"),
            Identifier::Pointer(pointer) => write!(f, "{pointer}"),
            Identifier::WeakHandle(handle) => write!(f, "handle {handle}"),
            Identifier::PackedHandle(packed) => write!(f, "packed handle {packed}"),
            Identifier::Edict(edict) => write!(f, "{edict}"),
            Identifier::UserId(user) => write!(f, "user id {user}"),
        }
    }
}

impl From<Index> for Identifier {
    fn from(value: Index) -> Self {
        Identifier::Index(value)
    }
}

impl From<Pointer> for Identifier {
    fn from(value: Pointer) -> Self {
        Identifier::Pointer(value)
    }
}

impl From<WeakHandle> for Identifier {
    fn from(value: WeakHandle) -> Self {
        Identifier::WeakHandle(value)
    }
}

impl From<PackedHandle> for Identifier {
    fn from(value: PackedHandle) -> Self {
        Identifier::PackedHandle(value)
    }
}

impl From<EdictRef> for Identifier {
    fn from(value: EdictRef) -> Self {
        Identifier::Edict(value)
    }
}

impl From<UserId> for Identifier {
    fn from(value: UserId) -> Self {
        Identifier::UserId(value)
    }
}
