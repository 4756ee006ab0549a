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

//! Generation-checked handles and their packed integer encoding.

use super::Index;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of low bits of a [`PackedHandle`] that hold the slot index.
pub const INDEX_BITS: u32 = 12;

/// Number of high bits of a [`PackedHandle`] that hold the generation.
pub const GENERATION_BITS: u32 = u32::BITS - INDEX_BITS;

/// The largest slot table that can be addressed by a [`PackedHandle`].
pub const MAX_SLOT_CAPACITY: u32 = 1 << INDEX_BITS;

const INDEX_MASK: u32 = MAX_SLOT_CAPACITY - 1;

/// The highest generation a slot can reach before wrapping back to
/// [`Generation::FIRST`].
///
/// One below the all-ones value, so that no live handle ever packs to
/// [`INVALID_PACKED_HANDLE`].
pub const MAX_GENERATION: u32 = (1 << GENERATION_BITS) - 2;

/// A counter distinguishing successive occupants of the same slot.
///
/// A slot starts at [`Generation::FIRST`] and advances every time its occupant
/// is freed, so handles minted for the old occupant stop matching the slot
/// before a new object can be placed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u32);

impl Generation {
    /// The generation of a slot that has never been recycled.
    pub const FIRST: Generation = Generation(1);

    /// Returns the generation that follows this one, wrapping after
    /// [`MAX_GENERATION`]. Zero is skipped so it can never match a slot.
    #[inline]
    pub fn next(self) -> Generation {
        if self.0 >= MAX_GENERATION {
            Generation::FIRST
        } else {
            Generation(self.0 + 1)
        }
    }
}

impl Default for Generation {
    fn default() -> Self {
        Generation::FIRST
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An index paired with the generation of the object it was minted for.
///
/// A weak handle resolves only while the slot still carries the same
/// generation. Once the occupant is freed the slot's generation moves on and
/// the handle is permanently stale, even if a new object later occupies the
/// same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeakHandle {
    /// The slot the object occupied when the handle was minted.
    pub index: Index,
    /// The slot generation at the time the handle was minted.
    pub generation: Generation,
}

impl WeakHandle {
    /// Creates a handle from its parts.
    pub fn new(index: Index, generation: Generation) -> Self {
        Self { index, generation }
    }

    /// Encodes the handle into a single integer.
    ///
    /// Bits above [`GENERATION_BITS`] of the generation and above
    /// [`INDEX_BITS`] of the index are discarded; handles minted by a slot
    /// table never carry such bits.
    #[inline]
    pub fn pack(self) -> PackedHandle {
        PackedHandle((self.generation.0 << INDEX_BITS) | (self.index.0 & INDEX_MASK))
    }
}

impl fmt::Display for WeakHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, gen={})", self.index, self.generation)
    }
}

/// A [`WeakHandle`] encoded as one integer, as scripts usually store it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackedHandle(pub u32);

/// A packed handle that never decodes to a live object.
///
/// Its generation field is all ones, which no slot ever reaches.
pub const INVALID_PACKED_HANDLE: PackedHandle = PackedHandle(u32::MAX);

impl PackedHandle {
    /// Decodes the integer back into its index and generation.
    ///
    /// Decoding never fails: whether the result denotes a live object is a
    /// question for the validity oracle.
    #[inline]
    pub fn unpack(self) -> WeakHandle {
        WeakHandle {
            index: Index(self.0 & INDEX_MASK),
            generation: Generation(self.0 >> INDEX_BITS),
        }
    }

    /// Returns the raw integer.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl From<WeakHandle> for PackedHandle {
    fn from(handle: WeakHandle) -> Self {
        handle.pack()
    }
}

impl From<PackedHandle> for WeakHandle {
    fn from(packed: PackedHandle) -> Self {
        packed.unpack()
    }
}

impl fmt::Display for PackedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_places_generation_above_index() {
        let handle = WeakHandle::new(Index(3), Generation(2));
        assert_eq!(handle.pack().raw(), (2 << INDEX_BITS) | 3);
        assert_eq!(handle.pack().unpack(), handle);
    }

    #[test]
    fn highest_index_and_generation_survive_packing() {
        let handle = WeakHandle::new(Index(MAX_SLOT_CAPACITY - 1), Generation(MAX_GENERATION));
        let packed = handle.pack();
        assert_ne!(packed, INVALID_PACKED_HANDLE);
        assert_eq!(packed.unpack(), handle);
    }

    #[test]
    fn generation_wraps_to_first_and_skips_zero() {
        assert_eq!(Generation(1).next(), Generation(2));
        assert_eq!(Generation(MAX_GENERATION).next(), Generation::FIRST);
        assert_eq!(Generation(0).next(), Generation(1));
    }

    #[test]
    fn invalid_packed_handle_carries_unreachable_generation() {
        let decoded = INVALID_PACKED_HANDLE.unpack();
        assert!(decoded.generation.0 > MAX_GENERATION);
    }
}
