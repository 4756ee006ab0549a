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

//! A self-contained stand-in for the host engine.
//!
//! [`SimWorld`] owns a slot table, a session table, and a small class catalog.
//! It fabricates object and edict addresses the way a real engine would hand
//! them out, which lets the conversion layer run end to end in tests, benches,
//! and the sandbox without a game server attached.

use std::collections::HashMap;
use std::ops::Range;

use crate::sessions::{SessionError, Sessions};
use crate::slots::{EntitySlots, SlotError};
use sigil_core::config::IdentityConfig;
use sigil_core::engine::{EntityFactory, FactoryError};
use sigil_core::identity::{
    EdictAddress, Index, ObjectAddress, ObjectTag, UserId, WeakHandle,
};
use sigil_core::slots::{SessionTable, SlotTable, SlotView};
use sigil_core::IdentifierCodec;
use thiserror::Error;

/// Where the engine's edict array begins.
const EDICT_BASE: usize = 0x0800_0000;
/// Size of one edict record.
const EDICT_STRIDE: usize = 0x40;
/// Where the first simulation object is placed.
const OBJECT_BASE: usize = 0x1000_0000;
/// Spacing between fabricated objects.
const OBJECT_STRIDE: usize = 0x200;

/// The class of the player objects created for connecting users.
pub const PLAYER_CLASS: &str = "player";
/// The class occupying slot 0 for the lifetime of the world.
pub const WORLD_CLASS: &str = "worldspawn";

/// How the engine builds objects of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityClass {
    /// Networked objects live below `max_edicts` and carry an edict.
    pub networked: bool,
    /// The pointer tag of the class's objects.
    pub tag: ObjectTag,
}

impl EntityClass {
    /// A networked simulation entity.
    pub const NETWORKED: EntityClass = EntityClass {
        networked: true,
        tag: ObjectTag::Entity,
    };
    /// A server-only simulation entity.
    pub const SERVER_ONLY: EntityClass = EntityClass {
        networked: false,
        tag: ObjectTag::Entity,
    };
    /// A player object.
    pub const PLAYER: EntityClass = EntityClass {
        networked: true,
        tag: ObjectTag::Player,
    };
}

/// A request the simulated world refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// An object lifecycle call failed.
    #[error(transparent)]
    Factory(#[from] FactoryError),
    /// The slot bookkeeping rejected a notification.
    #[error(transparent)]
    Slot(#[from] SlotError),
    /// The session table rejected the request.
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone)]
struct SimObject {
    class_name: String,
    spawned: bool,
}

/// A simulated engine with slot bookkeeping and player sessions.
#[derive(Debug, Clone)]
pub struct SimWorld {
    slots: EntitySlots,
    sessions: Sessions,
    classes: HashMap<String, EntityClass>,
    objects: HashMap<Index, SimObject>,
    /// Addresses are never handed out twice, so a stale pointer can't alias a
    /// newer object.
    next_object: usize,
}

impl SimWorld {
    /// Creates a world sized by `config`, with the world object in slot 0 and
    /// a handful of stock classes registered.
    pub fn new(config: &IdentityConfig) -> Result<Self, SimError> {
        let mut world = Self {
            slots: EntitySlots::new(config)?,
            sessions: Sessions::new(config.first_user_id),
            classes: HashMap::new(),
            objects: HashMap::new(),
            next_object: OBJECT_BASE,
        };
        world.register_class(WORLD_CLASS, EntityClass::NETWORKED);
        world.register_class(PLAYER_CLASS, EntityClass::PLAYER);
        world.register_class("prop_physics", EntityClass::NETWORKED);
        world.register_class("info_target", EntityClass::SERVER_ONLY);
        world.register_class("logic_relay", EntityClass::SERVER_ONLY);

        let world_class = if config.max_edicts > 0 {
            EntityClass::NETWORKED
        } else {
            EntityClass::SERVER_ONLY
        };
        world.place(Index(0), WORLD_CLASS, world_class)?;
        world.objects.insert(
            Index(0),
            SimObject {
                class_name: WORLD_CLASS.to_string(),
                spawned: true,
            },
        );
        log::info!("SimWorld ready with {} slots", world.slots.capacity());
        Ok(world)
    }

    /// Adds a class to the catalog, replacing any previous definition.
    pub fn register_class(&mut self, name: impl Into<String>, class: EntityClass) {
        self.classes.insert(name.into(), class);
    }

    /// A conversion core reading this world's tables.
    pub fn codec(&self) -> IdentifierCodec<&EntitySlots, &Sessions> {
        IdentifierCodec::new(&self.slots, &self.sessions)
    }

    /// The slot bookkeeping.
    pub fn slots(&self) -> &EntitySlots {
        &self.slots
    }

    /// The session table.
    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// The class name of the object at `index`.
    pub fn class_of(&self, index: Index) -> Option<&str> {
        self.objects.get(&index).map(|o| o.class_name.as_str())
    }

    /// Returns `true` if the object at `index` has been spawned.
    pub fn is_spawned(&self, index: Index) -> bool {
        self.objects.get(&index).is_some_and(|o| o.spawned)
    }

    /// Starts constructing an object of a networked class.
    ///
    /// The slot gets its edict immediately but holds no object until
    /// [`finish_create`](Self::finish_create) runs. Conversions report the
    /// slot as an invalid object in between.
    pub fn begin_create(&mut self, class_name: &str) -> Result<Index, FactoryError> {
        let class = self.class(class_name)?;
        if !class.networked {
            return Err(FactoryError::Rejected(format!(
                "class '{class_name}' is not networked"
            )));
        }
        let index = self
            .vacant(1..self.slots.max_edicts())
            .ok_or(FactoryError::SlotsExhausted)?;
        self.slots
            .network(index, edict_address(index))
            .map_err(rejected)?;
        self.objects.insert(
            index,
            SimObject {
                class_name: class_name.to_string(),
                spawned: false,
            },
        );
        Ok(index)
    }

    /// Completes an object started by [`begin_create`](Self::begin_create).
    pub fn finish_create(&mut self, index: Index) -> Result<WeakHandle, FactoryError> {
        let class_name = self
            .objects
            .get(&index)
            .map(|o| o.class_name.clone())
            .ok_or(FactoryError::NoObject(index))?;
        let class = self.class(&class_name)?;
        let object = self.fresh_object();
        self.slots
            .allocate(index, object, class.tag)
            .map_err(rejected)
    }

    /// Connects a new user: opens a session and creates their player object.
    ///
    /// Nothing is placed unless the session opens, and the session is closed
    /// again if the player object can't be placed.
    pub fn connect_player(&mut self) -> Result<(UserId, WeakHandle), SimError> {
        let index = self
            .vacant(1..self.slots.max_edicts())
            .ok_or(FactoryError::SlotsExhausted)?;
        let user = self.sessions.open(index)?;
        let handle = match self.place(index, PLAYER_CLASS, EntityClass::PLAYER) {
            Ok(handle) => handle,
            Err(err) => {
                self.sessions.close(user)?;
                return Err(err.into());
            }
        };
        self.objects.insert(
            index,
            SimObject {
                class_name: PLAYER_CLASS.to_string(),
                spawned: true,
            },
        );
        Ok((user, handle))
    }

    /// Replaces the player object of `user` in place.
    ///
    /// The user id and slot survive; the object, its address, and every
    /// handle to it do not.
    pub fn respawn_player(&mut self, user: UserId) -> Result<WeakHandle, SimError> {
        let index = self
            .sessions
            .index_of_user(user)
            .ok_or(SessionError::UnknownUser(user))?;
        if self.objects.remove(&index).is_some() {
            self.slots.free(index)?;
        }
        let handle = self.place(index, PLAYER_CLASS, EntityClass::PLAYER)?;
        self.objects.insert(
            index,
            SimObject {
                class_name: PLAYER_CLASS.to_string(),
                spawned: true,
            },
        );
        log::info!("{user} respawned as {handle}");
        Ok(handle)
    }

    /// Closes the session of `user` and removes their player object.
    pub fn disconnect_player(&mut self, user: UserId) -> Result<Index, SimError> {
        let index = self.sessions.close(user)?;
        if self.objects.remove(&index).is_some() {
            self.slots.free(index)?;
        }
        Ok(index)
    }

    fn class(&self, class_name: &str) -> Result<EntityClass, FactoryError> {
        self.classes
            .get(class_name)
            .copied()
            .ok_or_else(|| FactoryError::UnknownClass(class_name.to_string()))
    }

    /// Allocates a complete object of `class` at `index`, networking it first
    /// when the class asks for it.
    fn place(
        &mut self,
        index: Index,
        class_name: &str,
        class: EntityClass,
    ) -> Result<WeakHandle, SlotError> {
        if class.networked {
            self.slots.network(index, edict_address(index))?;
        }
        let object = self.fresh_object();
        let handle = self.slots.allocate(index, object, class.tag)?;
        log::debug!("Created '{class_name}' at {handle}");
        Ok(handle)
    }

    /// The lowest empty slot in `range` that no session is holding.
    fn vacant(&self, range: Range<u32>) -> Option<Index> {
        let mut start = range.start;
        while let Some(index) = self.slots.first_free(start..range.end) {
            if self.sessions.user_of_index(index).is_none() {
                return Some(index);
            }
            start = index.0 + 1;
        }
        None
    }

    fn fresh_object(&mut self) -> ObjectAddress {
        let address = ObjectAddress(self.next_object);
        self.next_object += OBJECT_STRIDE;
        address
    }
}

impl EntityFactory for SimWorld {
    fn create(&mut self, class_name: &str) -> Result<Index, FactoryError> {
        let class = self.class(class_name)?;
        if class.networked {
            let index = self.begin_create(class_name)?;
            return self.finish_create(index).map(|handle| handle.index);
        }

        let max_edicts = self.slots.max_edicts();
        let index = self
            .vacant(max_edicts..self.slots.capacity())
            .or_else(|| self.vacant(1..max_edicts))
            .ok_or(FactoryError::SlotsExhausted)?;
        self.place(index, class_name, class).map_err(rejected)?;
        self.objects.insert(
            index,
            SimObject {
                class_name: class_name.to_string(),
                spawned: false,
            },
        );
        Ok(index)
    }

    fn spawn(&mut self, index: Index) -> Result<(), FactoryError> {
        let constructed = self
            .slots
            .slot(index)
            .and_then(|view| view.occupant)
            .is_some_and(|occupant| occupant.is_constructed());
        let object = self
            .objects
            .get_mut(&index)
            .filter(|_| constructed)
            .ok_or(FactoryError::NoObject(index))?;
        if object.spawned {
            return Err(FactoryError::AlreadySpawned(index));
        }
        object.spawned = true;
        log::debug!("Spawned '{}' at slot {index}", object.class_name);
        Ok(())
    }

    fn remove(&mut self, index: Index) -> Result<(), FactoryError> {
        if index == Index(0) {
            return Err(FactoryError::Rejected("the world object cannot be removed".into()));
        }
        let object = self
            .objects
            .remove(&index)
            .ok_or(FactoryError::NoObject(index))?;
        self.slots.free(index).map_err(rejected)?;
        log::debug!("Removed '{}' from slot {index}", object.class_name);
        Ok(())
    }
}

impl SlotTable for SimWorld {
    fn capacity(&self) -> u32 {
        self.slots.capacity()
    }

    fn slot(&self, index: Index) -> Option<SlotView> {
        self.slots.slot(index)
    }

    fn index_of_object(&self, address: ObjectAddress) -> Option<Index> {
        self.slots.index_of_object(address)
    }

    fn index_of_edict(&self, address: EdictAddress) -> Option<Index> {
        self.slots.index_of_edict(address)
    }
}

impl SessionTable for SimWorld {
    fn index_of_user(&self, user: UserId) -> Option<Index> {
        self.sessions.index_of_user(user)
    }

    fn user_of_index(&self, index: Index) -> Option<UserId> {
        self.sessions.user_of_index(index)
    }
}

/// Edicts sit in a fixed array, so a slot always gets the same edict address.
fn edict_address(index: Index) -> EdictAddress {
    EdictAddress(EDICT_BASE + index.as_usize() * EDICT_STRIDE)
}

fn rejected(err: SlotError) -> FactoryError {
    FactoryError::Rejected(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_core::identity::{Generation, Identifier, IdentifierKind, INVALID_USER_ID};
    use sigil_core::FailureKind;

    fn world() -> SimWorld {
        let config = IdentityConfig {
            max_slots: 32,
            max_edicts: 16,
            first_user_id: 2,
        };
        SimWorld::new(&config).expect("valid configuration")
    }

    #[test]
    fn test_world_object_occupies_slot_zero() {
        let world = world();
        assert_eq!(world.class_of(Index(0)), Some(WORLD_CLASS));
        assert!(world.codec().oracle().is_live(Index(0)));
    }

    #[test]
    fn test_create_places_networked_and_server_only_classes() {
        // --- 1. SETUP ---
        let mut world = world();

        // --- 2. ACTION ---
        let prop = world.create("prop_physics").unwrap();
        let target = world.create("info_target").unwrap();

        // --- 3. ASSERTIONS ---
        assert_eq!(prop, Index(1), "Networked objects take the lowest free slot");
        assert_eq!(
            target,
            Index(16),
            "Server-only objects go above the networked window"
        );
        let prop_view = world.slot(prop).unwrap().occupant.unwrap();
        assert!(prop_view.edict.is_some(), "A networked object has an edict");
        let target_view = world.slot(target).unwrap().occupant.unwrap();
        assert!(target_view.edict.is_none());
        assert!(!world.is_spawned(prop), "Created objects are not spawned yet");
    }

    #[test]
    fn test_create_rejects_unknown_class() {
        let mut world = world();
        assert_eq!(
            world.create("no_such_class"),
            Err(FactoryError::UnknownClass("no_such_class".into()))
        );
    }

    #[test]
    fn test_spawn_and_remove_lifecycle() {
        let mut world = world();
        let index = world.create("prop_physics").unwrap();

        world.spawn(index).unwrap();
        assert!(world.is_spawned(index));
        assert_eq!(world.spawn(index), Err(FactoryError::AlreadySpawned(index)));

        world.remove(index).unwrap();
        assert_eq!(world.class_of(index), None);
        assert_eq!(world.slot(index).unwrap().generation, Generation(2));
        assert_eq!(world.remove(index), Err(FactoryError::NoObject(index)));
    }

    #[test]
    fn test_partially_constructed_object_is_invalid() {
        // --- 1. SETUP ---
        let mut world = world();
        let index = world.begin_create("prop_physics").unwrap();

        // --- 2. ACTION ---
        let pending = world
            .codec()
            .convert(Identifier::Index(index), IdentifierKind::Pointer);

        // --- 3. ASSERTIONS ---
        assert_eq!(
            pending.unwrap_err().kind(),
            FailureKind::InvalidObject,
            "A slot without its object must not resolve"
        );
        assert_eq!(world.spawn(index), Err(FactoryError::NoObject(index)));

        world.finish_create(index).unwrap();
        assert!(world
            .codec()
            .convert(Identifier::Index(index), IdentifierKind::Pointer)
            .is_ok());
    }

    #[test]
    fn test_respawn_keeps_user_and_slot() {
        // --- 1. SETUP ---
        let mut world = world();
        let (user, before) = world.connect_player().unwrap();

        // --- 2. ACTION ---
        let after = world.respawn_player(user).unwrap();

        // --- 3. ASSERTIONS ---
        assert_eq!(before.index, after.index, "The player keeps their slot");
        assert_ne!(before.generation, after.generation);
        assert_eq!(world.index_of_user(user), Some(after.index));
        let stale = world
            .codec()
            .convert(Identifier::WeakHandle(before), IdentifierKind::UserId);
        assert_eq!(stale.unwrap_err().kind(), FailureKind::StaleHandle);
    }

    #[test]
    fn test_disconnect_frees_the_slot_for_the_next_user() {
        let mut world = world();
        let (first, handle) = world.connect_player().unwrap();

        assert_eq!(world.disconnect_player(first), Ok(handle.index));
        let (second, reused) = world.connect_player().unwrap();

        assert_ne!(first, second);
        assert_eq!(reused.index, handle.index);
        assert_eq!(
            world.disconnect_player(first),
            Err(SimError::Session(SessionError::UnknownUser(first)))
        );
    }

    #[test]
    fn test_exhausted_user_ids_leave_no_player_behind() {
        // --- 1. SETUP ---
        let config = IdentityConfig {
            max_slots: 32,
            max_edicts: 16,
            first_user_id: INVALID_USER_ID.0 - 1,
        };
        let mut world = SimWorld::new(&config).expect("valid configuration");
        let (_, first) = world.connect_player().unwrap();
        assert_eq!(first.index, Index(1));

        // --- 2. ACTION ---
        let result = world.connect_player();

        // --- 3. ASSERTIONS ---
        assert_eq!(
            result,
            Err(SimError::Session(SessionError::Exhausted)),
            "No user id is left for a second player"
        );
        assert!(
            !world.codec().oracle().is_live(Index(2)),
            "A failed connect must not leave an object in the slot"
        );
        assert_eq!(world.class_of(Index(2)), None);
        assert_eq!(
            world.slot(Index(2)).unwrap().generation,
            Generation::FIRST,
            "The slot was never occupied"
        );
        assert_eq!(
            world.create("prop_physics"),
            Ok(Index(2)),
            "The slot is still free for other objects"
        );
    }

    #[test]
    fn test_removed_player_keeps_its_session_slot() {
        let mut world = world();
        let (user, handle) = world.connect_player().unwrap();
        world.remove(handle.index).unwrap();

        // The slot stays reserved for the connected user.
        let prop = world.create("prop_physics").unwrap();
        assert_ne!(prop, handle.index);

        let result = world
            .codec()
            .convert(Identifier::UserId(user), IdentifierKind::Index);
        assert_eq!(result.unwrap_err().kind(), FailureKind::EmptySlot);
    }

    #[test]
    fn test_addresses_are_never_reused() {
        let mut world = world();
        let index = world.create("prop_physics").unwrap();
        let first = world.slot(index).unwrap().occupant.unwrap().object;
        world.remove(index).unwrap();
        let again = world.create("prop_physics").unwrap();
        let second = world.slot(again).unwrap().occupant.unwrap().object;

        assert_eq!(index, again);
        assert_ne!(first, second);
    }
}
