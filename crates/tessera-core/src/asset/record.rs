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

use super::{AssetId, AssetKind, RecordKey};
use serde::{Deserialize, Serialize};

/// One encoded asset.
///
/// The payload format belongs to the encoder that produced it and is opaque to
/// the serializer core. A consumer only needs `kind` and `id` to route the
/// record, and `version` to pick the matching decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedRecord {
    /// The kind namespace of `id`.
    pub kind: AssetKind,
    /// The id the asset was registered under during the save session.
    pub id: AssetId,
    /// Identifies the encoder that produced `payload`.
    pub version: i16,
    /// The encoded asset.
    pub payload: Vec<u8>,
    /// Sub-resources requested by the encoder while it ran.
    ///
    /// Only geometry encoders may fill this list.
    #[serde(default)]
    pub extra_dependencies: Vec<RecordKey>,
}

impl SerializedRecord {
    /// Creates a record without extra dependencies.
    pub fn new(kind: AssetKind, id: AssetId, version: i16, payload: Vec<u8>) -> Self {
        Self {
            kind,
            id,
            version,
            payload,
            extra_dependencies: Vec::new(),
        }
    }

    /// Returns the demultiplexing key of this record.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.kind, self.id)
    }
}
