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

//! A plain binary archive lane.

use super::ArchiveStrategy;
use crate::payload;
use tessera_core::archive::SceneArchive;
use tessera_core::Result;

/// Encodes archives with bincode.
///
/// This lane is the default for both fast loading and long-term storage: the
/// record layout is versioned per record, so the archive itself stays stable.
#[derive(Default)]
pub struct BinaryArchiveLane;

impl BinaryArchiveLane {
    /// The id written into archive headers by this lane.
    pub const STRATEGY_ID: &str = "TS_BINARY_V1";

    /// Creates a new instance of the `BinaryArchiveLane`.
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveStrategy for BinaryArchiveLane {
    fn strategy_id(&self) -> &'static str {
        Self::STRATEGY_ID
    }

    fn encode(&self, archive: &SceneArchive) -> Result<Vec<u8>> {
        payload::encode(archive)
    }

    fn decode(&self, bytes: &[u8]) -> Result<SceneArchive> {
        // Trailing bytes after the archive mean the payload is malformed.
        payload::decode(bytes)
    }
}
