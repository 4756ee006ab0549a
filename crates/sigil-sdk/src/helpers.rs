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

//! Convenience calls for creating and destroying simulation objects.
//!
//! These sit next to the conversion functions on the scripting surface but
//! are plain calls into the engine. They change the slot table, so handles and
//! pointers obtained before them must be re-validated afterwards.

use sigil_core::engine::{EntityFactory, FactoryError};
use sigil_core::error::ConversionError;
use sigil_core::identity::{Index, WeakHandle};
use sigil_core::oracle::ValidityOracle;
use sigil_core::slots::SlotTable;
use thiserror::Error;

/// A helper call that failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HelperError {
    /// The index does not name a live object.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// The engine refused the call.
    #[error(transparent)]
    Factory(#[from] FactoryError),
}

/// Creates an object of `class_name` and returns its slot.
pub fn create_entity<W: EntityFactory>(
    world: &mut W,
    class_name: &str,
) -> Result<Index, HelperError> {
    let index = world.create(class_name)?;
    log::info!("Created '{class_name}' at index {index}");
    Ok(index)
}

/// Creates an object of `class_name` and returns a handle to it.
pub fn create_entity_handle<W>(world: &mut W, class_name: &str) -> Result<WeakHandle, HelperError>
where
    W: EntityFactory + SlotTable,
{
    let index = create_entity(world, class_name)?;
    Ok(ValidityOracle::new(&*world).live_slot(index)?.handle())
}

/// Spawns the object at `index` into the simulation.
pub fn spawn_entity<W>(world: &mut W, index: Index) -> Result<(), HelperError>
where
    W: EntityFactory + SlotTable,
{
    ValidityOracle::new(&*world).live_slot(index)?;
    world.spawn(index)?;
    log::info!("Spawned object at index {index}");
    Ok(())
}

/// Removes the object at `index`, freeing its slot.
pub fn remove_entity<W>(world: &mut W, index: Index) -> Result<(), HelperError>
where
    W: EntityFactory + SlotTable,
{
    ValidityOracle::new(&*world).live_slot(index)?;
    world.remove(index)?;
    log::info!("Removed object at index {index}");
    Ok(())
}

/// Removes the object `handle` refers to, provided the handle is still current.
pub fn remove_by_handle<W>(world: &mut W, handle: WeakHandle) -> Result<(), HelperError>
where
    W: EntityFactory + SlotTable,
{
    let live = ValidityOracle::new(&*world).check_handle(handle)?;
    world.remove(live.index)?;
    log::info!("Removed object {handle}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_core::config::IdentityConfig;
    use sigil_core::FailureKind;
    use sigil_data::SimWorld;

    fn world() -> SimWorld {
        let config = IdentityConfig {
            max_slots: 64,
            max_edicts: 32,
            first_user_id: 2,
        };
        SimWorld::new(&config).unwrap()
    }

    #[test]
    fn test_create_spawn_remove() {
        let mut world = world();

        let index = create_entity(&mut world, "prop_physics").unwrap();
        spawn_entity(&mut world, index).unwrap();
        assert!(world.is_spawned(index));

        remove_entity(&mut world, index).unwrap();
        let err = spawn_entity(&mut world, index).unwrap_err();
        assert!(
            matches!(&err, HelperError::Conversion(e) if e.kind() == FailureKind::EmptySlot),
            "Spawning a removed object should report an empty slot, got {err:?}"
        );
    }

    #[test]
    fn test_unknown_class_is_reported() {
        let mut world = world();
        assert_eq!(
            create_entity(&mut world, "weapon_bfg"),
            Err(HelperError::Factory(FactoryError::UnknownClass(
                "weapon_bfg".into()
            )))
        );
    }

    #[test]
    fn test_out_of_range_index_never_reaches_the_engine() {
        let mut world = world();
        let err = remove_entity(&mut world, Index(64)).unwrap_err();
        assert!(matches!(
            err,
            HelperError::Conversion(ConversionError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_stale_handle_does_not_remove_the_new_occupant() {
        // --- 1. SETUP ---
        let mut world = world();
        let old = create_entity_handle(&mut world, "prop_physics").unwrap();
        remove_by_handle(&mut world, old).unwrap();
        let new = create_entity_handle(&mut world, "prop_physics").unwrap();
        assert_eq!(old.index, new.index, "The slot should be recycled");

        // --- 2. ACTION ---
        let result = remove_by_handle(&mut world, old);

        // --- 3. ASSERTIONS ---
        assert!(matches!(
            result,
            Err(HelperError::Conversion(ConversionError::StaleHandle { .. }))
        ));
        assert_eq!(world.class_of(new.index), Some("prop_physics"));
    }
}
