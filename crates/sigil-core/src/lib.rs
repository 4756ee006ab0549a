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

//! # Sigil Core
//!
//! Foundational crate containing the identifier value types, the contracts
//! onto the engine's storage, and the conversion core that translates between
//! identifier spaces while detecting stale identifiers.

#![warn(missing_docs)]

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod oracle;
pub mod registry;
pub mod slots;

pub use codec::{ConversionOutcome, Converted, IdentifierCodec};
pub use config::IdentityConfig;
pub use error::{ConversionError, FailureKind};
pub use oracle::ValidityOracle;
pub use registry::{ConversionRegistry, Ownership};
