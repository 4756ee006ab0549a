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

//! Player sessions: the mapping between user ids and player slots.

use std::collections::HashMap;

use sigil_core::identity::{Index, UserId, INVALID_USER_ID};
use sigil_core::slots::SessionTable;
use thiserror::Error;

/// A session request the table cannot satisfy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The slot already belongs to a connected user.
    #[error("slot {index} already belongs to {user}")]
    IndexTaken {
        /// The requested slot.
        index: Index,
        /// The user holding it.
        user: UserId,
    },
    /// No session exists for the user.
    #[error("no active session for {0}")]
    UnknownUser(UserId),
    /// Every user id has been handed out.
    #[error("user ids are exhausted")]
    Exhausted,
}

/// The engine's table of connected users.
///
/// User ids are never reused within a run: a reconnecting player receives a
/// fresh id, while a respawning player keeps theirs.
#[derive(Debug, Clone)]
pub struct Sessions {
    by_user: HashMap<UserId, Index>,
    by_index: HashMap<Index, UserId>,
    next_user: u32,
}

impl Sessions {
    /// Creates an empty table whose first session receives `first_user_id`.
    pub fn new(first_user_id: u32) -> Self {
        Self {
            by_user: HashMap::new(),
            by_index: HashMap::new(),
            next_user: first_user_id,
        }
    }

    /// Opens a session bound to the player slot `index`.
    pub fn open(&mut self, index: Index) -> Result<UserId, SessionError> {
        if let Some(&user) = self.by_index.get(&index) {
            return Err(SessionError::IndexTaken { index, user });
        }
        let user = UserId(self.next_user);
        if user == INVALID_USER_ID {
            return Err(SessionError::Exhausted);
        }
        self.next_user += 1;

        self.by_user.insert(user, index);
        self.by_index.insert(index, user);
        log::info!("Session opened: {user} at slot {index}");
        Ok(user)
    }

    /// Closes the session of `user` and returns the slot it was bound to.
    pub fn close(&mut self, user: UserId) -> Result<Index, SessionError> {
        let index = self
            .by_user
            .remove(&user)
            .ok_or(SessionError::UnknownUser(user))?;
        self.by_index.remove(&index);
        log::info!("Session closed: {user} left slot {index}");
        Ok(index)
    }

    /// The number of connected users.
    pub fn len(&self) -> usize {
        self.by_user.len()
    }

    /// Returns `true` if nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty()
    }
}

impl SessionTable for Sessions {
    fn index_of_user(&self, user: UserId) -> Option<Index> {
        self.by_user.get(&user).copied()
    }

    fn user_of_index(&self, index: Index) -> Option<UserId> {
        self.by_index.get(&index).copied()
    }
}
