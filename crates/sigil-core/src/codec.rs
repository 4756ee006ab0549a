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

//! The identifier codec: converts a value in one identifier space into the
//! equivalent value in another.
//!
//! The codec is a pure projection over the engine's tables at call time. It
//! never allocates, frees, or mutates a slot, and its results are only good
//! for the current simulation step: a caller that keeps an [`Index`],
//! [`Pointer`], or [`EdictRef`] across a step must convert it again (ideally
//! from a [`WeakHandle`], which detects recycling on its own).

use crate::error::ConversionError;
use crate::identity::{EdictRef, Identifier, IdentifierKind, Index, Pointer, UserId, WeakHandle};
use crate::oracle::{LiveSlot, ValidityOracle};
use crate::registry::{ConversionRegistry, Ownership, Route};
use crate::slots::{SessionTable, SlotTable};

/// A successful conversion: the target value and how the caller must treat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Converted {
    /// The value in the requested identifier space.
    pub value: Identifier,
    /// The ownership policy declared for the conversion.
    pub ownership: Ownership,
}

/// The result of one codec invocation. Either a complete target value or an
/// explicit failure; never a partial value.
pub type ConversionOutcome = Result<Converted, ConversionError>;

/// Converts identifiers between spaces.
///
/// The codec borrows the engine's tables for the duration of one simulation
/// step and holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierCodec<S, U> {
    oracle: ValidityOracle<S>,
    sessions: U,
    registry: ConversionRegistry,
}

impl<S: SlotTable, U: SessionTable> IdentifierCodec<S, U> {
    /// Creates a codec using the standard route table.
    pub fn new(slots: S, sessions: U) -> Self {
        Self::with_registry(slots, sessions, ConversionRegistry::standard())
    }

    /// Creates a codec using a custom route table.
    pub fn with_registry(slots: S, sessions: U, registry: ConversionRegistry) -> Self {
        Self {
            oracle: ValidityOracle::new(slots),
            sessions,
            registry,
        }
    }

    /// The validity oracle the codec checks identifiers with.
    pub fn oracle(&self) -> &ValidityOracle<S> {
        &self.oracle
    }

    /// The route table the codec dispatches on.
    pub fn registry(&self) -> &ConversionRegistry {
        &self.registry
    }

    /// Converts `value` into the `target` identifier space.
    ///
    /// Fails with `UNSUPPORTED_CONVERSION` if the registry declares no route
    /// for the pair; otherwise with the first reason the source or target
    /// cannot be resolved.
    pub fn convert(&self, value: Identifier, target: IdentifierKind) -> ConversionOutcome {
        let source = value.kind();
        let Some(entry) = self.registry.lookup(source, target) else {
            log::trace!("{source} -> {target}: undeclared");
            return Err(ConversionError::UnsupportedConversion {
                from: source,
                to: target,
            });
        };

        let result = match entry.route {
            Route::Direct => self
                .resolve(value)
                .and_then(|live| self.project(value, live, target)),
            Route::ViaIndex => self
                .resolve(value)
                .and_then(|live| self.oracle.live_slot(live.index))
                .and_then(|live| self.project(value, live, target)),
        };

        match &result {
            Ok(converted) => log::trace!("{source} -> {target}: {converted}"),
            Err(err) => log::trace!("{source} -> {target}: {}", err.kind()),
        }

        result.map(|value| Converted {
            value,
            ownership: entry.ownership,
        })
    }

    /// Resolves any identifier to the live slot it denotes.
    fn resolve(&self, value: Identifier) -> Result<LiveSlot, ConversionError> {
        match value {
            Identifier::Index(index) => self.oracle.live_slot(index),
            Identifier::WeakHandle(handle) => self.oracle.check_handle(handle),
            Identifier::PackedHandle(packed) => self.oracle.check_handle(packed.unpack()),
            Identifier::Pointer(pointer) => self.resolve_pointer(pointer),
            Identifier::Edict(edict) => self.resolve_edict(edict),
            Identifier::UserId(user) => self.resolve_user(user),
        }
    }

    fn resolve_pointer(&self, pointer: Pointer) -> Result<LiveSlot, ConversionError> {
        if pointer.address.is_null() {
            return Err(ConversionError::invalid(pointer, "null pointer"));
        }
        let index = self
            .oracle
            .slots()
            .index_of_object(pointer.address)
            .ok_or_else(|| {
                ConversionError::invalid(pointer, "address does not belong to a live object")
            })?;
        let live = self.oracle.live_slot(index)?;
        if live.occupant.object != Some(pointer.address) {
            return Err(ConversionError::invalid(
                pointer,
                "address does not belong to a live object",
            ));
        }
        if live.occupant.tag != pointer.tag {
            return Err(ConversionError::invalid(
                pointer,
                "object kind does not match the pointer tag",
            ));
        }
        Ok(live)
    }

    fn resolve_edict(&self, edict: EdictRef) -> Result<LiveSlot, ConversionError> {
        if edict.address.is_null() {
            return Err(ConversionError::invalid(edict, "null edict"));
        }
        let live = self.oracle.live_slot(edict.index)?;
        let owner = self.oracle.slots().index_of_edict(edict.address);
        if owner != Some(edict.index) || live.occupant.edict != Some(edict.address) {
            return Err(ConversionError::invalid(
                edict,
                "edict no longer wraps this slot",
            ));
        }
        Ok(live)
    }

    fn resolve_user(&self, user: UserId) -> Result<LiveSlot, ConversionError> {
        let index = self
            .sessions
            .index_of_user(user)
            .ok_or_else(|| ConversionError::unknown_user(user))?;
        self.oracle.live_slot(index)
    }

    /// Expresses a live slot in the target identifier space. Failures name
    /// `source`, the identifier the caller supplied.
    fn project(
        &self,
        source: Identifier,
        live: LiveSlot,
        target: IdentifierKind,
    ) -> Result<Identifier, ConversionError> {
        let value = match target {
            IdentifierKind::Index => Identifier::Index(live.index),
            IdentifierKind::WeakHandle => Identifier::WeakHandle(live.handle()),
            IdentifierKind::PackedHandle => Identifier::PackedHandle(live.handle().pack()),
            IdentifierKind::Pointer => {
                let address = live.occupant.object.ok_or_else(|| {
                    ConversionError::invalid(source, "object is still under construction")
                })?;
                Identifier::Pointer(Pointer::new(address, live.occupant.tag))
            }
            IdentifierKind::Edict => {
                let address = live
                    .occupant
                    .edict
                    .ok_or_else(|| ConversionError::invalid(source, "object is not networked"))?;
                Identifier::Edict(EdictRef::new(address, live.index))
            }
            IdentifierKind::UserId => {
                let user = self
                    .sessions
                    .user_of_index(live.index)
                    .ok_or(ConversionError::UnknownSession { subject: source })?;
                Identifier::UserId(user)
            }
        };
        Ok(value)
    }

    /// Mints a weak handle for the object at `index`.
    pub fn handle_of(&self, index: Index) -> Result<WeakHandle, ConversionError> {
        self.oracle.live_slot(index).map(|live| live.handle())
    }
}

impl std::fmt::Display for Converted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.value, self.ownership)
    }
}
