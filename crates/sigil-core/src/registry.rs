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

//! The table of supported conversions and who owns their results.
//!
//! Every conversion the codec performs must be declared here, together with
//! how it is routed and what the caller receives. Keeping the whole table in
//! one place makes the ownership of every result auditable: a caller that
//! registers a [`Ownership::Borrowed`] result as its own would free engine
//! memory, and one that ignores a [`Ownership::NewlyOwned`] result leaks it.

use crate::identity::IdentifierKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the caller must treat a converted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ownership {
    /// The value aliases engine memory. The caller must neither free it nor
    /// use it past the owning object's lifetime.
    Borrowed,
    /// The value is a fresh wrapper the caller now owns. The object it points
    /// at is still engine-owned.
    NewlyOwned,
    /// A plain scalar; there is nothing to own.
    Value,
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ownership::Borrowed => write!(f, "borrowed"),
            Ownership::NewlyOwned => write!(f, "newly-owned"),
            Ownership::Value => write!(f, "value"),
        }
    }
}

/// How a conversion reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Converted in one step from a single slot read.
    Direct,
    /// Resolved to an [`Index`](crate::identity::Index) first, then projected
    /// from a fresh read of that slot.
    ViaIndex,
}

/// One declared (source, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversionRoute {
    /// The kind being converted from.
    pub source: IdentifierKind,
    /// The kind being converted to.
    pub target: IdentifierKind,
    /// How the conversion is carried out.
    pub route: Route,
    /// What the caller receives.
    pub ownership: Ownership,
}

const fn declare(
    source: IdentifierKind,
    target: IdentifierKind,
    route: Route,
    ownership: Ownership,
) -> ConversionRoute {
    ConversionRoute {
        source,
        target,
        route,
        ownership,
    }
}

use IdentifierKind::{Edict, Index, PackedHandle, Pointer, UserId, WeakHandle};
use Ownership::{Borrowed, NewlyOwned, Value};
use Route::{Direct, ViaIndex};

/// The standard route table: every ordered pair of distinct kinds.
///
/// Pointers built from entity identifiers are fresh wrappers the caller owns;
/// the player pointer reached from a user id is the engine's own and is lent.
/// Edicts are always lent.
pub const STANDARD_ROUTES: &[ConversionRoute] = &[
    // To index.
    declare(Pointer, Index, ViaIndex, Value),
    declare(WeakHandle, Index, ViaIndex, Value),
    declare(PackedHandle, Index, ViaIndex, Value),
    declare(Edict, Index, ViaIndex, Value),
    declare(UserId, Index, ViaIndex, Value),
    // To pointer.
    declare(Index, Pointer, ViaIndex, NewlyOwned),
    declare(WeakHandle, Pointer, ViaIndex, NewlyOwned),
    declare(PackedHandle, Pointer, ViaIndex, NewlyOwned),
    declare(Edict, Pointer, Direct, NewlyOwned),
    declare(UserId, Pointer, ViaIndex, Borrowed),
    // To weak handle.
    declare(Index, WeakHandle, ViaIndex, Value),
    declare(Pointer, WeakHandle, ViaIndex, Value),
    declare(PackedHandle, WeakHandle, Direct, Value),
    declare(Edict, WeakHandle, ViaIndex, Value),
    declare(UserId, WeakHandle, ViaIndex, Value),
    // To packed handle.
    declare(Index, PackedHandle, ViaIndex, Value),
    declare(Pointer, PackedHandle, ViaIndex, Value),
    declare(WeakHandle, PackedHandle, Direct, Value),
    declare(Edict, PackedHandle, ViaIndex, Value),
    declare(UserId, PackedHandle, ViaIndex, Value),
    // To edict.
    declare(Index, Edict, ViaIndex, Borrowed),
    declare(Pointer, Edict, Direct, Borrowed),
    declare(WeakHandle, Edict, ViaIndex, Borrowed),
    declare(PackedHandle, Edict, ViaIndex, Borrowed),
    declare(UserId, Edict, ViaIndex, Borrowed),
    // To user id.
    declare(Index, UserId, ViaIndex, Value),
    declare(Pointer, UserId, ViaIndex, Value),
    declare(WeakHandle, UserId, ViaIndex, Value),
    declare(PackedHandle, UserId, ViaIndex, Value),
    declare(Edict, UserId, ViaIndex, Value),
];

/// Looks up the declared route for a (source, target) pair.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRegistry {
    routes: &'static [ConversionRoute],
}

impl ConversionRegistry {
    /// The registry over [`STANDARD_ROUTES`].
    pub const fn standard() -> Self {
        Self {
            routes: STANDARD_ROUTES,
        }
    }

    /// A registry over a custom table. Later duplicates of a pair are ignored.
    pub const fn from_routes(routes: &'static [ConversionRoute]) -> Self {
        Self { routes }
    }

    /// Returns the route declared for `source -> target`, if any.
    pub fn lookup(
        &self,
        source: IdentifierKind,
        target: IdentifierKind,
    ) -> Option<&ConversionRoute> {
        self.routes
            .iter()
            .find(|entry| entry.source == source && entry.target == target)
    }

    /// Returns `true` if both `a -> b` and `b -> a` are declared.
    pub fn is_bidirectional(&self, a: IdentifierKind, b: IdentifierKind) -> bool {
        self.lookup(a, b).is_some() && self.lookup(b, a).is_some()
    }

    /// Iterates over every declared route.
    pub fn routes(&self) -> impl Iterator<Item = &ConversionRoute> {
        self.routes.iter()
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
