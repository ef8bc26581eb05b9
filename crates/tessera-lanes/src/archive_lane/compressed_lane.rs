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

//! A compressed binary archive lane.

use super::{ArchiveStrategy, BinaryArchiveLane};
use crate::payload::{self, MAX_LZ4_RATIO};
use tessera_core::archive::SceneArchive;
use tessera_core::Result;

/// Encodes archives with bincode, then compresses them with LZ4.
#[derive(Default)]
pub struct CompressedArchiveLane {
    inner: BinaryArchiveLane,
}

impl CompressedArchiveLane {
    /// The id written into archive headers by this lane.
    pub const STRATEGY_ID: &str = "TS_BINARY_LZ4_V1";

    /// Creates a new instance of the `CompressedArchiveLane`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArchiveStrategy for CompressedArchiveLane {
    fn strategy_id(&self) -> &'static str {
        Self::STRATEGY_ID
    }

    fn encode(&self, archive: &SceneArchive) -> Result<Vec<u8>> {
        let raw = self.inner.encode(archive)?;
        let compressed = lz4_flex::compress_prepend_size(&raw);
        log::debug!(
            "Compressed archive payload from {} to {} bytes",
            raw.len(),
            compressed.len()
        );
        Ok(compressed)
    }

    fn decode(&self, bytes: &[u8]) -> Result<SceneArchive> {
        let raw = payload::decompress(bytes, bytes.len().saturating_mul(MAX_LZ4_RATIO))?;
        self.inner.decode(&raw)
    }
}
