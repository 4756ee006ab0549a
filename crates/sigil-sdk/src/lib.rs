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

//! The scripting-facing surface of the Sigil identity layer.
//!
//! This crate wires the conversion core to the scripting boundary: the
//! [`BoundaryAdapter`](boundary::BoundaryAdapter) and its named conversion
//! functions, the entity helpers, and configuration loading.

pub mod boundary;
pub mod config;
pub mod helpers;

pub mod prelude {
    //! Common imports for embedding the identity layer.
    pub use crate::boundary::{BoundaryAdapter, Handover, ScriptError, ScriptValue};
    pub use crate::config::load_config;
    pub use crate::helpers::{create_entity, remove_entity, spawn_entity, HelperError};
    pub use sigil_core::engine::EntityFactory;
    pub use sigil_core::identity::{
        Identifier, IdentifierKind, Index, PackedHandle, UserId, WeakHandle, INVALID_INDEX,
        INVALID_PACKED_HANDLE, INVALID_USER_ID,
    };
    pub use sigil_core::{ConversionError, FailureKind, IdentifierCodec, IdentityConfig, Ownership};
    pub use sigil_data::SimWorld;
}
