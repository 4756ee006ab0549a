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

//! The scripting boundary.
//!
//! Scripts see identifiers as plain [`ScriptValue`]s and call conversion
//! functions by name, `<target>_from_<source>`. The [`BoundaryAdapter`] reads
//! the argument as the source kind, runs the conversion core, and hands the
//! result back together with its ownership policy. Every failure surfaces as a
//! [`ScriptError`] carrying its [`FailureKind`], so a script can tell a stale
//! handle from a disconnected player.

use serde::{Deserialize, Serialize};
use sigil_core::codec::IdentifierCodec;
use sigil_core::error::{ConversionError, FailureKind};
use sigil_core::identity::{
    EdictAddress, EdictRef, Generation, Identifier, IdentifierKind, Index, ObjectAddress,
    ObjectTag, PackedHandle, Pointer, UserId, WeakHandle, INVALID_INDEX, INVALID_PACKED_HANDLE,
    INVALID_USER_ID,
};
use sigil_core::registry::Ownership;
use sigil_core::slots::{SessionTable, SlotTable};
use thiserror::Error;

/// A value as the scripting layer represents it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptValue {
    /// A plain integer: an index, a packed handle, or a user id.
    Int(i64),
    /// A weak handle.
    Handle {
        /// The slot index.
        index: u32,
        /// The generation the handle was minted at.
        generation: u32,
    },
    /// A wrapped object pointer.
    Pointer {
        /// The object's address.
        address: usize,
        /// The object's kind.
        tag: ObjectTag,
    },
    /// A wrapped edict reference.
    Edict {
        /// The edict's address.
        address: usize,
        /// The slot the edict belongs to.
        index: u32,
    },
}

impl ScriptValue {
    /// The name the scripting layer uses for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Int(_) => "int",
            ScriptValue::Handle { .. } => "handle",
            ScriptValue::Pointer { .. } => "pointer",
            ScriptValue::Edict { .. } => "edict",
        }
    }
}

impl From<Identifier> for ScriptValue {
    fn from(value: Identifier) -> Self {
        match value {
            Identifier::Index(index) => ScriptValue::Int(i64::from(index.0)),
            Identifier::PackedHandle(packed) => ScriptValue::Int(i64::from(packed.raw())),
            Identifier::UserId(user) => ScriptValue::Int(i64::from(user.0)),
            Identifier::WeakHandle(handle) => ScriptValue::Handle {
                index: handle.index.0,
                generation: handle.generation.0,
            },
            Identifier::Pointer(pointer) => ScriptValue::Pointer {
                address: pointer.address.0,
                tag: pointer.tag,
            },
            Identifier::Edict(edict) => ScriptValue::Edict {
                address: edict.address.0,
                index: edict.index.0,
            },
        }
    }
}

/// A successful conversion, ready to be registered by the script layer's
/// memory management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handover {
    /// The converted value.
    pub value: ScriptValue,
    /// Who owns `value` once it crosses the boundary.
    pub ownership: Ownership,
}

/// An error raised into the scripting layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The conversion itself failed.
    #[error("{kind}: {message}")]
    Conversion {
        /// Which of the failure kinds occurred.
        kind: FailureKind,
        /// A description naming the offending identifier.
        message: String,
    },
    /// The argument could not be read as the source kind.
    #[error("bad argument, expected {expected}: {message}")]
    Type {
        /// The kind the function expects.
        expected: IdentifierKind,
        /// What was wrong with the argument.
        message: String,
    },
    /// No conversion function has this name.
    #[error("no function named '{0}'")]
    UnknownFunction(String),
}

impl ScriptError {
    /// The failure kind, if this error came out of a conversion.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ScriptError::Conversion { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<ConversionError> for ScriptError {
    fn from(err: ConversionError) -> Self {
        ScriptError::Conversion {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Exposes the conversion core to scripts.
pub struct BoundaryAdapter<S, U> {
    codec: IdentifierCodec<S, U>,
}

impl<S: SlotTable, U: SessionTable> BoundaryAdapter<S, U> {
    /// Wraps a conversion core.
    pub fn new(codec: IdentifierCodec<S, U>) -> Self {
        Self { codec }
    }

    /// The wrapped conversion core.
    pub fn codec(&self) -> &IdentifierCodec<S, U> {
        &self.codec
    }

    /// Reads `arg` as `source` and converts it to `target`.
    pub fn convert(
        &self,
        arg: &ScriptValue,
        source: IdentifierKind,
        target: IdentifierKind,
    ) -> Result<Handover, ScriptError> {
        let value = read_argument(arg, source)?;
        let converted = self.codec.convert(value, target)?;
        Ok(Handover {
            value: converted.value.into(),
            ownership: converted.ownership,
        })
    }

    /// Calls the conversion function `name` with `arg`.
    ///
    /// Names follow `<target>_from_<source>`, e.g. `index_from_edict`. A name
    /// naming two kinds always reaches the conversion core, so an undeclared
    /// pair still reports `UNSUPPORTED_CONVERSION`.
    pub fn call(&self, name: &str, arg: &ScriptValue) -> Result<Handover, ScriptError> {
        let (target, source) = name
            .split_once("_from_")
            .and_then(|(target, source)| {
                Some((
                    IdentifierKind::from_name(target)?,
                    IdentifierKind::from_name(source)?,
                ))
            })
            .ok_or_else(|| ScriptError::UnknownFunction(name.to_string()))?;
        self.convert(arg, source, target)
    }

    /// Names of every conversion function the registry declares.
    pub fn exports(&self) -> Vec<String> {
        self.codec
            .registry()
            .routes()
            .map(|route| function_name(route.source, route.target))
            .collect()
    }

    /// The named constants scripts can compare against.
    pub fn constants(&self) -> Vec<(&'static str, i64)> {
        vec![
            ("INVALID_INDEX", i64::from(INVALID_INDEX.0)),
            ("INVALID_PACKED_HANDLE", i64::from(INVALID_PACKED_HANDLE.raw())),
            ("INVALID_USER_ID", i64::from(INVALID_USER_ID.0)),
            ("MAX_SLOTS", i64::from(self.codec.oracle().slots().capacity())),
        ]
    }
}

/// The script-side name of the `source -> target` conversion.
pub fn function_name(source: IdentifierKind, target: IdentifierKind) -> String {
    format!("{}_from_{}", target.name(), source.name())
}

/// Interprets a script value as an identifier of `kind`.
pub fn read_argument(arg: &ScriptValue, kind: IdentifierKind) -> Result<Identifier, ScriptError> {
    let mismatch = || ScriptError::Type {
        expected: kind,
        message: format!("got {}", arg.type_name()),
    };
    let value = match (kind, *arg) {
        (IdentifierKind::Index, ScriptValue::Int(n)) => Identifier::Index(Index(to_u32(n, kind)?)),
        (IdentifierKind::PackedHandle, ScriptValue::Int(n)) => {
            Identifier::PackedHandle(PackedHandle(to_u32(n, kind)?))
        }
        (IdentifierKind::UserId, ScriptValue::Int(n)) => {
            Identifier::UserId(UserId(to_u32(n, kind)?))
        }
        (IdentifierKind::WeakHandle, ScriptValue::Handle { index, generation }) => {
            Identifier::WeakHandle(WeakHandle::new(Index(index), Generation(generation)))
        }
        (IdentifierKind::Pointer, ScriptValue::Pointer { address, tag }) => {
            Identifier::Pointer(Pointer::new(ObjectAddress(address), tag))
        }
        (IdentifierKind::Edict, ScriptValue::Edict { address, index }) => {
            Identifier::Edict(EdictRef::new(EdictAddress(address), Index(index)))
        }
        _ => return Err(mismatch()),
    };
    Ok(value)
}

fn to_u32(n: i64, kind: IdentifierKind) -> Result<u32, ScriptError> {
    u32::try_from(n).map_err(|_| ScriptError::Type {
        expected: kind,
        message: format!("{n} does not fit in 32 unsigned bits"),
    })
}
