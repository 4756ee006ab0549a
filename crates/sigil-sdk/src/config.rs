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

//! Loading of the `Sigil.toml` settings file.

use anyhow::{Context, Result};
use serde::Deserialize;
use sigil_core::config::IdentityConfig;
use std::fs;
use std::path::Path;

/// The default settings file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "Sigil.toml";

/// Represents the structure of a `Sigil.toml` file.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SigilManifest {
    /// Slot table and session sizing.
    pub identity: IdentityConfig,
}

/// Loads the identity settings from `path`.
/// If the file does not exist, it returns the default configuration.
pub fn load_config(path: &Path) -> Result<IdentityConfig> {
    let manifest: SigilManifest = if path.exists() {
        log::info!("Found '{}'. Loading configuration.", path.display());
        let manifest_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{}'", path.display()))?;
        toml::from_str(&manifest_str)
            .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))?
    } else {
        log::info!("No '{}' found. Using default configuration.", path.display());
        SigilManifest::default()
    };

    manifest
        .identity
        .validate()
        .with_context(|| format!("Invalid [identity] section in '{}'", path.display()))?;
    Ok(manifest.identity)
}
