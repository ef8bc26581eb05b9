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

//! Configuration objects handed to every writer call.
//!
//! The serialize driver never reads these; it passes them through untouched so
//! that encoders can be tuned without the core knowing what they mean.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// General save options shared by every writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// If `false`, geometry writers skip morph targets entirely.
    pub include_morph_targets: bool,
    /// If `true`, effect records also carry the effect's mutation history.
    pub keep_effect_history: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            include_morph_targets: true,
            keep_effect_history: true,
        }
    }
}

impl Options {
    /// Parses options from RON text. Missing fields keep their defaults.
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Encoder-specific tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Enables the compressed geometry encoder.
    pub compress_geometry: bool,
    /// The number of vertex floats above which a geometry is compressed.
    pub geometry_compression_threshold: usize,
    /// If `false`, textures are written without their pixel data.
    pub embed_texture_data: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            compress_geometry: true,
            geometry_compression_threshold: 4096,
            embed_texture_data: true,
        }
    }
}

impl WriterOptions {
    /// Parses writer options from RON text. Missing fields keep their defaults.
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| Error::Config(e.to_string()))
    }
}
