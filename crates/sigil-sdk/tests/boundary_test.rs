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

//! Integration tests for the scripting boundary: named functions, argument
//! checking, failure reporting, and the exported constants.

use sigil_core::identity::{IdentifierKind, ObjectTag, INVALID_INDEX, INVALID_PACKED_HANDLE};
use sigil_core::{FailureKind, IdentityConfig, Ownership};
use sigil_data::SimWorld;
use sigil_sdk::boundary::{BoundaryAdapter, ScriptError, ScriptValue};
use sigil_sdk::prelude::EntityFactory;

/// Helper: a world with one spawned prop and one connected player.
fn populated_world() -> (SimWorld, u32, u32) {
    let config = IdentityConfig {
        max_slots: 128,
        max_edicts: 64,
        first_user_id: 2,
    };
    let mut world = SimWorld::new(&config).expect("valid configuration");
    let prop = world.create("prop_physics").unwrap();
    world.spawn(prop).unwrap();
    let (user, _) = world.connect_player().unwrap();
    (world, prop.0, user.0)
}

// ─────────────────────────────────────────────────────────────────────────────
// exports() / constants()
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_exports_cover_every_declared_pair() {
    let (world, _, _) = populated_world();
    let adapter = BoundaryAdapter::new(world.codec());

    let exports = adapter.exports();

    assert_eq!(exports.len(), 30, "Every ordered pair of distinct kinds");
    for name in ["index_from_edict", "pointer_from_user_id", "packed_handle_from_weak_handle"] {
        assert!(exports.iter().any(|e| e == name), "missing export {name}");
    }
    assert!(!exports.iter().any(|e| e == "index_from_index"));
}

#[test]
fn test_constants_expose_the_sentinels() {
    let (world, _, _) = populated_world();
    let adapter = BoundaryAdapter::new(world.codec());

    let constants = adapter.constants();
    let lookup = |name: &str| {
        constants
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    };

    assert_eq!(lookup("INVALID_INDEX"), Some(i64::from(INVALID_INDEX.0)));
    assert_eq!(
        lookup("INVALID_PACKED_HANDLE"),
        Some(i64::from(INVALID_PACKED_HANDLE.raw()))
    );
    assert_eq!(lookup("INVALID_USER_ID"), Some(i64::from(u32::MAX)));
    assert_eq!(lookup("MAX_SLOTS"), Some(128));
}

// ─────────────────────────────────────────────────────────────────────────────
// call()
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_call_hands_over_value_and_ownership() {
    // --- 1. SETUP ---
    let (world, prop, _) = populated_world();
    let adapter = BoundaryAdapter::new(world.codec());

    // --- 2. ACTION ---
    let pointer = adapter
        .call("pointer_from_index", &ScriptValue::Int(i64::from(prop)))
        .unwrap();
    let edict = adapter.call("edict_from_pointer", &pointer.value).unwrap();
    let index = adapter.call("index_from_edict", &edict.value).unwrap();

    // --- 3. ASSERTIONS ---
    assert!(matches!(
        pointer.value,
        ScriptValue::Pointer {
            tag: ObjectTag::Entity,
            ..
        }
    ));
    assert_eq!(pointer.ownership, Ownership::NewlyOwned);
    assert_eq!(edict.ownership, Ownership::Borrowed);
    assert_eq!(index.value, ScriptValue::Int(i64::from(prop)));
    assert_eq!(index.ownership, Ownership::Value);
}

#[test]
fn test_call_player_pointer_is_borrowed() {
    let (world, _, user) = populated_world();
    let adapter = BoundaryAdapter::new(world.codec());

    let pointer = adapter
        .call("pointer_from_user_id", &ScriptValue::Int(i64::from(user)))
        .unwrap();

    assert_eq!(pointer.ownership, Ownership::Borrowed);
    assert!(matches!(
        pointer.value,
        ScriptValue::Pointer {
            tag: ObjectTag::Player,
            ..
        }
    ));
}

#[test]
fn test_every_failure_kind_surfaces_distinctly() {
    // --- 1. SETUP ---
    let (mut world, prop, _) = populated_world();
    let stale = {
        let adapter = BoundaryAdapter::new(world.codec());
        adapter
            .call("weak_handle_from_index", &ScriptValue::Int(i64::from(prop)))
            .unwrap()
            .value
    };
    world.remove(sigil_core::identity::Index(prop)).unwrap();
    world.create("prop_physics").unwrap();
    let server_only = world.create("info_target").unwrap();
    let adapter = BoundaryAdapter::new(world.codec());

    // --- 2. ACTION ---
    let cases = [
        (
            adapter.call("index_from_weak_handle", &stale),
            FailureKind::StaleHandle,
        ),
        (
            adapter.call("pointer_from_index", &ScriptValue::Int(128)),
            FailureKind::OutOfRange,
        ),
        (
            adapter.call("pointer_from_index", &ScriptValue::Int(100)),
            FailureKind::EmptySlot,
        ),
        (
            adapter.call(
                "edict_from_index",
                &ScriptValue::Int(i64::from(server_only.0)),
            ),
            FailureKind::InvalidObject,
        ),
        (
            adapter.call("index_from_user_id", &ScriptValue::Int(999)),
            FailureKind::UnknownSession,
        ),
        (
            adapter.call("index_from_index", &ScriptValue::Int(1)),
            FailureKind::UnsupportedConversion,
        ),
    ];

    // --- 3. ASSERTIONS ---
    for (result, expected) in cases {
        let err = result.expect_err("the call should fail");
        assert_eq!(
            err.failure_kind(),
            Some(expected),
            "expected {expected}, got {err}"
        );
    }
}

#[test]
fn test_failure_message_names_the_identifier() {
    let (world, _, _) = populated_world();
    let adapter = BoundaryAdapter::new(world.codec());

    let err = adapter
        .call("pointer_from_index", &ScriptValue::Int(42))
        .unwrap_err();

    assert_eq!(
        err,
        ScriptError::Conversion {
            kind: FailureKind::EmptySlot,
            message: "no object found for index 42".into(),
        }
    );
}

#[test]
fn test_wrong_argument_shape_is_a_type_error() {
    let (world, _, _) = populated_world();
    let adapter = BoundaryAdapter::new(world.codec());

    let err = adapter
        .call("index_from_edict", &ScriptValue::Int(3))
        .unwrap_err();

    assert!(matches!(
        err,
        ScriptError::Type {
            expected: IdentifierKind::Edict,
            ..
        }
    ));
    assert_eq!(err.failure_kind(), None);
}

#[test]
fn test_unknown_function_names() {
    let (world, _, _) = populated_world();
    let adapter = BoundaryAdapter::new(world.codec());

    for name in ["index_from_banana", "index", "from_index", ""] {
        assert_eq!(
            adapter.call(name, &ScriptValue::Int(1)),
            Err(ScriptError::UnknownFunction(name.to_string()))
        );
    }
}
