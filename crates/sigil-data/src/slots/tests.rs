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

use super::{EntitySlots, SlotError};
use sigil_core::config::IdentityConfig;
use sigil_core::identity::{
    EdictAddress, Generation, Index, ObjectAddress, ObjectTag, WeakHandle,
};
use sigil_core::slots::{SlotEvent, SlotTable};

// --- HELPERS ---

fn small_table() -> EntitySlots {
    let config = IdentityConfig {
        max_slots: 16,
        max_edicts: 8,
        first_user_id: 2,
    };
    EntitySlots::new(&config).expect("16 slots is a valid configuration")
}

const OBJECT_A: ObjectAddress = ObjectAddress(0x1000);
const OBJECT_B: ObjectAddress = ObjectAddress(0x2000);
const EDICT_A: EdictAddress = EdictAddress(0x8000);

// --- TESTS ---

#[test]
fn test_allocate_starts_at_first_generation() {
    // --- 1. SETUP ---
    let mut slots = small_table();

    // --- 2. ACTION ---
    let handle = slots
        .allocate(Index(3), OBJECT_A, ObjectTag::Entity)
        .expect("slot 3 is free");

    // --- 3. ASSERTIONS ---
    assert_eq!(handle, WeakHandle::new(Index(3), Generation::FIRST));
    assert_eq!(slots.index_of_object(OBJECT_A), Some(Index(3)));
    let view = slots.slot(Index(3)).unwrap();
    assert!(
        view.occupant.is_some_and(|o| o.is_constructed()),
        "The slot should hold a constructed object"
    );
    assert_eq!(slots.occupied(), 1);
}

#[test]
fn test_free_advances_generation_immediately() {
    // --- 1. SETUP ---
    let mut slots = small_table();
    slots
        .allocate(Index(3), OBJECT_A, ObjectTag::Entity)
        .unwrap();
    slots.network(Index(3), EDICT_A).unwrap();

    // --- 2. ACTION ---
    let generation = slots.free(Index(3)).expect("slot 3 is occupied");

    // --- 3. ASSERTIONS ---
    assert_eq!(generation, Generation(2), "Freeing should bump the generation");
    let view = slots.slot(Index(3)).unwrap();
    assert_eq!(view.generation, Generation(2));
    assert!(view.occupant.is_none(), "The slot should be empty");
    assert_eq!(
        slots.index_of_object(OBJECT_A),
        None,
        "The object address should be forgotten"
    );
    assert_eq!(
        slots.index_of_edict(EDICT_A),
        None,
        "The edict address should be forgotten"
    );
}

#[test]
fn test_reallocation_keeps_the_advanced_generation() {
    // --- 1. SETUP ---
    let mut slots = small_table();
    let first = slots
        .allocate(Index(3), OBJECT_A, ObjectTag::Entity)
        .unwrap();
    slots.free(Index(3)).unwrap();

    // --- 2. ACTION ---
    let second = slots
        .allocate(Index(3), OBJECT_B, ObjectTag::Entity)
        .unwrap();

    // --- 3. ASSERTIONS ---
    assert_eq!(first.generation, Generation(1));
    assert_eq!(second.generation, Generation(2));
    assert_ne!(first, second, "A recycled slot must mint a distinct handle");
}

#[test]
fn test_network_before_allocate_reserves_the_slot() {
    // --- 1. SETUP ---
    let mut slots = small_table();

    // --- 2. ACTION ---
    slots.network(Index(5), EDICT_A).unwrap();

    // --- 3. ASSERTIONS ---
    let view = slots.slot(Index(5)).unwrap();
    let occupant = view.occupant.expect("the edict should reserve the slot");
    assert!(!occupant.is_constructed());
    assert_eq!(slots.index_of_edict(EDICT_A), Some(Index(5)));

    // Completing the construction keeps the edict.
    slots
        .allocate(Index(5), OBJECT_A, ObjectTag::Player)
        .unwrap();
    let occupant = slots.slot(Index(5)).unwrap().occupant.unwrap();
    assert_eq!(occupant.edict, Some(EDICT_A));
    assert_eq!(occupant.tag, ObjectTag::Player);
    assert!(occupant.is_constructed());
}

#[test]
fn test_contradictory_notifications_are_rejected() {
    let mut slots = small_table();
    slots
        .allocate(Index(1), OBJECT_A, ObjectTag::Entity)
        .unwrap();
    slots.network(Index(1), EDICT_A).unwrap();

    assert_eq!(
        slots.allocate(Index(1), OBJECT_B, ObjectTag::Entity),
        Err(SlotError::Occupied(Index(1)))
    );
    assert_eq!(
        slots.allocate(Index(2), OBJECT_A, ObjectTag::Entity),
        Err(SlotError::ObjectInUse {
            address: OBJECT_A,
            owner: Index(1)
        })
    );
    assert_eq!(
        slots.network(Index(1), EdictAddress(0x9000)),
        Err(SlotError::AlreadyNetworked(Index(1)))
    );
    assert_eq!(
        slots.network(Index(2), EDICT_A),
        Err(SlotError::EdictInUse {
            address: EDICT_A,
            owner: Index(1)
        })
    );
    assert_eq!(
        slots.free(Index(4)),
        Err(SlotError::NotOccupied(Index(4)))
    );
    assert_eq!(
        slots.allocate(Index(4), ObjectAddress::NULL, ObjectTag::Entity),
        Err(SlotError::NullAddress(Index(4)))
    );
}

#[test]
fn test_out_of_range_and_unnetworkable_slots() {
    let mut slots = small_table();

    assert_eq!(
        slots.allocate(Index(16), OBJECT_A, ObjectTag::Entity),
        Err(SlotError::OutOfRange {
            index: Index(16),
            capacity: 16
        })
    );
    assert_eq!(
        slots.network(Index(8), EDICT_A),
        Err(SlotError::NotNetworkable {
            index: Index(8),
            max_edicts: 8
        })
    );
    assert!(slots.slot(Index(16)).is_none());
}

#[test]
fn test_apply_routes_events() {
    // --- 1. SETUP ---
    let mut slots = small_table();

    // --- 2. ACTION ---
    let events = [
        SlotEvent::Networked {
            index: Index(2),
            edict: EDICT_A,
        },
        SlotEvent::Allocated {
            index: Index(2),
            object: OBJECT_A,
            tag: ObjectTag::Entity,
        },
        SlotEvent::Freed { index: Index(2) },
    ];
    for event in events {
        slots.apply(event).expect("the sequence is consistent");
    }

    // --- 3. ASSERTIONS ---
    assert_eq!(slots.slot(Index(2)).unwrap().generation, Generation(2));
    assert!(
        slots.apply(SlotEvent::Freed { index: Index(2) }).is_err(),
        "A double free should be rejected"
    );
}

#[test]
fn test_first_free_and_live_handles() {
    let mut slots = small_table();
    slots
        .allocate(Index(0), OBJECT_A, ObjectTag::Entity)
        .unwrap();
    slots
        .allocate(Index(1), OBJECT_B, ObjectTag::Entity)
        .unwrap();
    slots.network(Index(2), EDICT_A).unwrap();

    assert_eq!(slots.first_free(0..16), Some(Index(3)));
    assert_eq!(slots.first_free(1..2), None);
    assert_eq!(slots.first_free(10..64), Some(Index(10)));

    let live: Vec<_> = slots.live_handles().collect();
    assert_eq!(
        live,
        vec![
            WeakHandle::new(Index(0), Generation::FIRST),
            WeakHandle::new(Index(1), Generation::FIRST),
        ],
        "Reserved slots are not live"
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = IdentityConfig {
        max_slots: 0,
        ..IdentityConfig::default()
    };
    assert!(matches!(
        EntitySlots::new(&config),
        Err(SlotError::Config(_))
    ));
}
