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

//! Answers whether an index or handle still denotes a live object.

use crate::error::ConversionError;
use crate::identity::{Generation, Index, WeakHandle};
use crate::slots::{Occupant, SlotTable, SlotView};

/// A live slot, as resolved by the oracle.
///
/// Holding one means the slot was occupied by a fully constructed object at
/// the moment of the check. It is only good for the current simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSlot {
    /// The slot's index.
    pub index: Index,
    /// The slot's current generation.
    pub generation: Generation,
    /// The occupant. Its `object` is always `Some`.
    pub occupant: Occupant,
}

impl LiveSlot {
    /// A weak handle naming this slot's current occupant.
    pub fn handle(&self) -> WeakHandle {
        WeakHandle::new(self.index, self.generation)
    }
}

/// The validity oracle over a [`SlotTable`].
///
/// The query forms ([`is_live`](Self::is_live),
/// [`generation_of`](Self::generation_of)) treat out-of-range indices as a
/// plain "no"; the checking forms ([`live_slot`](Self::live_slot),
/// [`check_handle`](Self::check_handle)) say *why* an identifier is unusable.
#[derive(Debug, Clone, Copy)]
pub struct ValidityOracle<S> {
    slots: S,
}

impl<S: SlotTable> ValidityOracle<S> {
    /// Creates an oracle over the given table.
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    /// The underlying slot table.
    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Returns `true` if a fully constructed object occupies `index`.
    pub fn is_live(&self, index: Index) -> bool {
        self.slots
            .slot(index)
            .and_then(|slot| slot.occupant)
            .is_some_and(|occupant| occupant.is_constructed())
    }

    /// Returns the generation of the occupied slot at `index`, or `None` if
    /// the slot is empty or out of range.
    pub fn generation_of(&self, index: Index) -> Option<Generation> {
        self.slots
            .slot(index)
            .filter(|slot| slot.occupant.is_some())
            .map(|slot| slot.generation)
    }

    /// Resolves `index` to its live slot.
    ///
    /// Fails with `OUT_OF_RANGE`, `EMPTY_SLOT`, or `INVALID_OBJECT` (the slot
    /// is reserved for an object still under construction).
    pub fn live_slot(&self, index: Index) -> Result<LiveSlot, ConversionError> {
        let view = self.view(index)?;
        Self::require_constructed(index, view)
    }

    /// Resolves a weak handle to its live slot, requiring an exact generation
    /// match.
    ///
    /// Fails with `OUT_OF_RANGE`, then `STALE_HANDLE`, then `EMPTY_SLOT`, then
    /// `INVALID_OBJECT`. A freed slot has already moved to a new generation, so
    /// a handle to a freed object reports `STALE_HANDLE` rather than
    /// `EMPTY_SLOT`.
    pub fn check_handle(&self, handle: WeakHandle) -> Result<LiveSlot, ConversionError> {
        let view = self.view(handle.index)?;
        if view.generation != handle.generation {
            return Err(ConversionError::StaleHandle {
                handle,
                current: view.generation,
            });
        }
        Self::require_constructed(handle.index, view)
    }

    fn view(&self, index: Index) -> Result<SlotView, ConversionError> {
        self.slots
            .slot(index)
            .ok_or_else(|| ConversionError::OutOfRange {
                index,
                capacity: self.slots.capacity(),
            })
    }

    fn require_constructed(index: Index, view: SlotView) -> Result<LiveSlot, ConversionError> {
        let occupant = view.occupant.ok_or_else(|| ConversionError::EmptySlot { index })?;
        if !occupant.is_constructed() {
            return Err(ConversionError::invalid(
                index,
                "object is still under construction",
            ));
        }
        Ok(LiveSlot {
            index,
            generation: view.generation,
            occupant,
        })
    }
}
