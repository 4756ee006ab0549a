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

//! Slot bookkeeping driven by the engine's allocate and free notifications.

use std::collections::HashMap;
use std::ops::Range;

use super::SlotError;
use sigil_core::config::IdentityConfig;
use sigil_core::identity::{
    EdictAddress, Generation, Index, ObjectAddress, ObjectTag, WeakHandle,
};
use sigil_core::slots::{Occupant, SlotEvent, SlotTable, SlotView};

/// The generation-tracking mirror of the engine's slot table.
///
/// The engine itself only knows which slots are occupied. `EntitySlots` adds
/// a generation per slot, advanced the moment a slot is freed, so that weak
/// handles to the departed object stop resolving before anything else can be
/// placed there. It also keeps reverse maps from object and edict addresses
/// back to their slots.
#[derive(Debug, Clone)]
pub struct EntitySlots {
    /// One entry per slot, sized once from the configuration.
    slots: Vec<SlotView>,
    /// Reverse lookup for constructed objects.
    objects: HashMap<ObjectAddress, Index>,
    /// Reverse lookup for attached edicts.
    edicts: HashMap<EdictAddress, Index>,
    /// Slots below this index can be networked.
    max_edicts: u32,
}

impl EntitySlots {
    /// Creates an empty table sized by `config`.
    pub fn new(config: &IdentityConfig) -> Result<Self, SlotError> {
        config.validate()?;
        Ok(Self {
            slots: vec![SlotView::empty(Generation::FIRST); config.max_slots as usize],
            objects: HashMap::new(),
            edicts: HashMap::new(),
            max_edicts: config.max_edicts,
        })
    }

    /// Applies one engine notification.
    pub fn apply(&mut self, event: SlotEvent) -> Result<(), SlotError> {
        let result = match event {
            SlotEvent::Allocated { index, object, tag } => {
                self.allocate(index, object, tag).map(|_| ())
            }
            SlotEvent::Networked { index, edict } => self.network(index, edict),
            SlotEvent::Freed { index } => self.free(index).map(|_| ()),
        };
        if let Err(err) = &result {
            log::warn!("Rejected notification for slot {}: {err}", event.index());
        }
        result
    }

    /// Attaches a constructed object to `index`.
    ///
    /// If the slot was reserved by an earlier [`network`](Self::network) call,
    /// the object completes it. Returns the handle of the new occupant.
    pub fn allocate(
        &mut self,
        index: Index,
        object: ObjectAddress,
        tag: ObjectTag,
    ) -> Result<WeakHandle, SlotError> {
        let capacity = self.capacity();
        if object.is_null() {
            return Err(SlotError::NullAddress(index));
        }
        if let Some(&owner) = self.objects.get(&object) {
            return Err(SlotError::ObjectInUse {
                address: object,
                owner,
            });
        }
        let slot = self
            .slots
            .get_mut(index.as_usize())
            .ok_or(SlotError::OutOfRange { index, capacity })?;

        let occupant = match slot.occupant {
            Some(Occupant {
                object: Some(_), ..
            }) => return Err(SlotError::Occupied(index)),
            Some(reserved) => Occupant {
                object: Some(object),
                tag,
                ..reserved
            },
            None => Occupant {
                object: Some(object),
                edict: None,
                tag,
            },
        };
        slot.occupant = Some(occupant);
        let generation = slot.generation;
        self.objects.insert(object, index);

        log::debug!("Slot {index} allocated: {tag} {object} (gen {generation})");
        Ok(WeakHandle::new(index, generation))
    }

    /// Attaches an edict to `index`.
    ///
    /// On an empty slot this reserves it for an object still under
    /// construction; conversions treat such a slot as an invalid object until
    /// [`allocate`](Self::allocate) completes it.
    pub fn network(&mut self, index: Index, edict: EdictAddress) -> Result<(), SlotError> {
        let capacity = self.capacity();
        if index.0 >= capacity {
            return Err(SlotError::OutOfRange { index, capacity });
        }
        if index.0 >= self.max_edicts {
            return Err(SlotError::NotNetworkable {
                index,
                max_edicts: self.max_edicts,
            });
        }
        if edict.is_null() {
            return Err(SlotError::NullAddress(index));
        }
        if let Some(&owner) = self.edicts.get(&edict) {
            return Err(SlotError::EdictInUse {
                address: edict,
                owner,
            });
        }

        let slot = &mut self.slots[index.as_usize()];
        match slot.occupant.as_mut() {
            Some(occupant) if occupant.edict.is_some() => {
                return Err(SlotError::AlreadyNetworked(index))
            }
            Some(occupant) => occupant.edict = Some(edict),
            None => {
                slot.occupant = Some(Occupant {
                    object: None,
                    edict: Some(edict),
                    tag: ObjectTag::Entity,
                })
            }
        }
        self.edicts.insert(edict, index);

        log::debug!("Slot {index} networked by edict {edict}");
        Ok(())
    }

    /// Frees `index` and advances its generation.
    ///
    /// Returns the slot's new generation. Every handle minted before this call
    /// is stale from here on.
    pub fn free(&mut self, index: Index) -> Result<Generation, SlotError> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(index.as_usize())
            .ok_or(SlotError::OutOfRange { index, capacity })?;
        let occupant = slot.occupant.take().ok_or(SlotError::NotOccupied(index))?;
        slot.generation = slot.generation.next();
        let generation = slot.generation;

        if let Some(object) = occupant.object {
            self.objects.remove(&object);
        }
        if let Some(edict) = occupant.edict {
            self.edicts.remove(&edict);
        }

        log::debug!("Slot {index} freed, now at generation {generation}");
        Ok(generation)
    }

    /// Returns the lowest unoccupied slot within `range`.
    pub fn first_free(&self, range: Range<u32>) -> Option<Index> {
        let end = range.end.min(self.capacity());
        (range.start..end)
            .map(Index)
            .find(|index| self.slots[index.as_usize()].occupant.is_none())
    }

    /// The number of slots below which objects can be networked.
    pub fn max_edicts(&self) -> u32 {
        self.max_edicts
    }

    /// The number of occupied slots, including reserved ones.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.occupant.is_some()).count()
    }

    /// Iterates over the handles of every constructed object.
    pub fn live_handles(&self) -> impl Iterator<Item = WeakHandle> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.occupant
                .filter(Occupant::is_constructed)
                .map(|_| WeakHandle::new(Index(i as u32), slot.generation))
        })
    }
}

impl SlotTable for EntitySlots {
    fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    fn slot(&self, index: Index) -> Option<SlotView> {
        self.slots.get(index.as_usize()).copied()
    }

    fn index_of_object(&self, address: ObjectAddress) -> Option<Index> {
        self.objects.get(&address).copied()
    }

    fn index_of_edict(&self, address: EdictAddress) -> Option<Index> {
        self.edicts.get(&address).copied()
    }
}
