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

//! A human-readable archive lane.

use super::ArchiveStrategy;
use tessera_core::archive::SceneArchive;
use tessera_core::{Error, Result};

/// Encodes archives as pretty-printed RON.
///
/// Meant for debugging and diffing; payload bytes are written as plain number
/// lists, so files grow large.
#[derive(Default)]
pub struct RonArchiveLane;

impl RonArchiveLane {
    /// The id written into archive headers by this lane.
    pub const STRATEGY_ID: &str = "TS_RON_V1";

    /// Creates a new instance of the `RonArchiveLane`.
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveStrategy for RonArchiveLane {
    fn strategy_id(&self) -> &'static str {
        Self::STRATEGY_ID
    }

    fn encode(&self, archive: &SceneArchive) -> Result<Vec<u8>> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(archive, pretty_config)
            .map(|s| s.into_bytes())
            .map_err(|e| Error::Encode(e.to_string()))
    }

    fn decode(&self, payload: &[u8]) -> Result<SceneArchive> {
        ron::de::from_bytes(payload).map_err(|e| Error::Decode(e.to_string()))
    }
}
