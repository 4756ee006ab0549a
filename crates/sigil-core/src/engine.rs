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

//! The engine's object lifecycle entry points.
//!
//! These are thin calls into the engine. They change the slot table, so they
//! must not be interleaved with conversions of the same step.

use crate::identity::Index;
use std::fmt;

/// Creates, spawns, and removes simulation objects by class name.
pub trait EntityFactory {
    /// Creates an object of the named class and returns its slot.
    ///
    /// The object is allocated but not yet spawned into the simulation.
    fn create(&mut self, class_name: &str) -> Result<Index, FactoryError>;

    /// Activates the object at `index`.
    fn spawn(&mut self, index: Index) -> Result<(), FactoryError>;

    /// Destroys the object at `index`, freeing its slot.
    fn remove(&mut self, index: Index) -> Result<(), FactoryError>;
}

/// A lifecycle call the engine refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// No class of that name is registered.
    UnknownClass(String),
    /// Every slot is occupied.
    SlotsExhausted,
    /// No object occupies the slot.
    NoObject(Index),
    /// The object has already been spawned.
    AlreadySpawned(Index),
    /// The engine refused the request for an internal reason.
    Rejected(String),
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactoryError::UnknownClass(name) => write!(f, "unknown entity class '{name}'"),
            FactoryError::SlotsExhausted => write!(f, "no free slot left"),
            FactoryError::NoObject(index) => write!(f, "no object found for index {index}"),
            FactoryError::AlreadySpawned(index) => {
                write!(f, "object at index {index} is already spawned")
            }
            FactoryError::Rejected(reason) => write!(f, "engine rejected the request: {reason}"),
        }
    }
}

impl std::error::Error for FactoryError {}
