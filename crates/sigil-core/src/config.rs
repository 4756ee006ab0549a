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

//! Sizing of the identity layer.

use crate::identity::{INVALID_USER_ID, MAX_SLOT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the `[identity]` settings of a `Sigil.toml` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Capacity of the slot table.
    pub max_slots: u32,
    /// Number of low slots that can be networked and carry an edict.
    pub max_edicts: u32,
    /// First user id handed out by the session table.
    pub first_user_id: u32,
}

impl Default for IdentityConfig {
    /// A slot table as wide as a packed handle can address, with the lower half
    /// networked.
    fn default() -> Self {
        Self {
            max_slots: MAX_SLOT_CAPACITY,
            max_edicts: MAX_SLOT_CAPACITY / 2,
            first_user_id: 2,
        }
    }
}

impl IdentityConfig {
    /// Checks that the configuration describes a usable slot table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_slots == 0 {
            return Err(ConfigError::EmptySlotTable);
        }
        if self.max_slots > MAX_SLOT_CAPACITY {
            return Err(ConfigError::TooManySlots {
                requested: self.max_slots,
                limit: MAX_SLOT_CAPACITY,
            });
        }
        if self.max_edicts > self.max_slots {
            return Err(ConfigError::EdictsExceedSlots {
                max_edicts: self.max_edicts,
                max_slots: self.max_slots,
            });
        }
        if self.first_user_id == INVALID_USER_ID.0 {
            return Err(ConfigError::ReservedUserId(self.first_user_id));
        }
        Ok(())
    }
}

/// An invalid [`IdentityConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_slots` is zero.
    EmptySlotTable,
    /// `max_slots` exceeds what a packed handle can address.
    TooManySlots {
        /// The configured value.
        requested: u32,
        /// The largest supported value.
        limit: u32,
    },
    /// More edicts than slots were requested.
    EdictsExceedSlots {
        /// The configured edict count.
        max_edicts: u32,
        /// The configured slot count.
        max_slots: u32,
    },
    /// `first_user_id` is the reserved invalid user id.
    ReservedUserId(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptySlotTable => write!(f, "max_slots must be at least 1"),
            ConfigError::TooManySlots { requested, limit } => {
                write!(f, "max_slots {requested} exceeds the supported limit of {limit}")
            }
            ConfigError::EdictsExceedSlots {
                max_edicts,
                max_slots,
            } => write!(f, "max_edicts {max_edicts} exceeds max_slots {max_slots}"),
            ConfigError::ReservedUserId(id) => {
                write!(f, "first_user_id {id} is reserved as the invalid user id")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
