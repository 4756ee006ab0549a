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

//! Defines the failures a conversion can end in.

use crate::identity::{Generation, Identifier, IdentifierKind, Index, UserId, WeakHandle};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The flat classification of a [`ConversionError`].
///
/// Every kind is terminal for the call that produced it. Only
/// [`FailureKind::UnsupportedConversion`] indicates a programming error; the
/// others are the expected fallout of objects being freed and slots recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The identifier does not denote a usable object.
    InvalidObject,
    /// A handle's generation no longer matches its slot.
    StaleHandle,
    /// The index lies beyond the slot table capacity.
    OutOfRange,
    /// The index is in range but nothing occupies the slot.
    EmptySlot,
    /// No open session is bound to the identifier.
    UnknownSession,
    /// The (source, target) pair is not declared in the registry.
    UnsupportedConversion,
}

impl FailureKind {
    /// Every failure kind.
    pub const ALL: [FailureKind; 6] = [
        FailureKind::InvalidObject,
        FailureKind::StaleHandle,
        FailureKind::OutOfRange,
        FailureKind::EmptySlot,
        FailureKind::UnknownSession,
        FailureKind::UnsupportedConversion,
    ];

    /// The canonical upper-case name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            FailureKind::InvalidObject => "INVALID_OBJECT",
            FailureKind::StaleHandle => "STALE_HANDLE",
            FailureKind::OutOfRange => "OUT_OF_RANGE",
            FailureKind::EmptySlot => "EMPTY_SLOT",
            FailureKind::UnknownSession => "UNKNOWN_SESSION",
            FailureKind::UnsupportedConversion => "UNSUPPORTED_CONVERSION",
        }
    }

    /// Returns `true` for failures caused by the caller asking for an
    /// undeclared conversion rather than by object lifetimes.
    pub fn is_programming_error(self) -> bool {
        self == FailureKind::UnsupportedConversion
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failed conversion, carrying the identifier that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The identifier names no usable object: a dangling or null address, an
    /// edict that no longer wraps its slot, a slot whose object is still under
    /// construction, or an object that has no representation in the target
    /// space.
    InvalidObject {
        /// The identifier that failed to resolve.
        subject: Identifier,
        /// A short, human-readable reason.
        reason: &'static str,
    },
    /// The handle was minted for an earlier occupant of its slot.
    StaleHandle {
        /// The stale handle.
        handle: WeakHandle,
        /// The generation the slot carries now.
        current: Generation,
    },
    /// The index is beyond the slot table.
    OutOfRange {
        /// The offending index.
        index: Index,
        /// The capacity of the slot table.
        capacity: u32,
    },
    /// The slot at the index is unoccupied.
    EmptySlot {
        /// The offending index.
        index: Index,
    },
    /// No open session matches the identifier.
    UnknownSession {
        /// The identifier that has no session: a user id, or the identifier
        /// supplied for an object with no player bound to it.
        subject: Identifier,
    },
    /// The registry declares no route for the requested pair.
    UnsupportedConversion {
        /// The kind of the value supplied.
        from: IdentifierKind,
        /// The kind requested.
        to: IdentifierKind,
    },
}

impl ConversionError {
    /// Returns the flat classification of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            ConversionError::InvalidObject { .. } => FailureKind::InvalidObject,
            ConversionError::StaleHandle { .. } => FailureKind::StaleHandle,
            ConversionError::OutOfRange { .. } => FailureKind::OutOfRange,
            ConversionError::EmptySlot { .. } => FailureKind::EmptySlot,
            ConversionError::UnknownSession { .. } => FailureKind::UnknownSession,
            ConversionError::UnsupportedConversion { .. } => FailureKind::UnsupportedConversion,
        }
    }

    pub(crate) fn invalid(subject: impl Into<Identifier>, reason: &'static str) -> Self {
        ConversionError::InvalidObject {
            subject: subject.into(),
            reason,
        }
    }

    pub(crate) fn unknown_user(user: UserId) -> Self {
        ConversionError::UnknownSession {
            subject: Identifier::UserId(user),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::InvalidObject { subject, reason } => {
                write!(f, "no valid object for {subject}: {reason}")
            }
            ConversionError::StaleHandle { handle, current } => write!(
                f,
                "handle {handle} is stale: slot {} is at generation {current}",
                handle.index
            ),
            ConversionError::OutOfRange { index, capacity } => write!(
                f,
                "index {index} is out of range for a slot table of {capacity}"
            ),
            ConversionError::EmptySlot { index } => {
                write!(f, "no object found for index {index}")
            }
            ConversionError::UnknownSession { subject } => {
                write!(f, "no active session for {subject}")
            }
            ConversionError::UnsupportedConversion { from, to } => {
                write!(f, "conversion from {from} to {to} is not supported")
            }
        }
    }
}

impl std::error::Error for ConversionError {}
