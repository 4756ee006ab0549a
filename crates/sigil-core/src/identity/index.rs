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

use serde::{Deserialize, Serialize};
use std::fmt;

/// The dense slot position of a simulation object.
///
/// An `Index` is unique among the objects alive at a given moment, but says
/// nothing about *which* object occupied the slot: once the engine frees a slot
/// the same index is handed to the next object allocated there. Code that needs
/// to hold on to an object across simulation steps should keep a
/// [`WeakHandle`](super::WeakHandle) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Index(pub u32);

/// An index that no live object can ever occupy.
///
/// It lies beyond any slot table capacity, so callers can use it as a
/// "no object" marker.
pub const INVALID_INDEX: Index = Index(u32::MAX);

impl Index {
    /// Returns the index as a `usize`, suitable for indexing slot storage.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` if this is [`INVALID_INDEX`].
    #[inline]
    pub fn is_invalid(self) -> bool {
        self == INVALID_INDEX
    }
}

impl From<u32> for Index {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
