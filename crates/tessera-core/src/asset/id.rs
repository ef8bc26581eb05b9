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

use super::AssetKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable reference handle for one asset within a serialization session.
///
/// Ids are scoped per [`AssetKind`]: texture `0` and geometry `0` are unrelated.
/// Within a kind, ids are handed out sequentially from [`AssetId::BASE`] in
/// first-registration order and are never reused during a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct AssetId(pub u32);

impl AssetId {
    /// The first id assigned in every kind namespace.
    pub const BASE: AssetId = AssetId(0);

    /// Returns the id that follows this one.
    pub const fn next(self) -> AssetId {
        AssetId(self.0 + 1)
    }

    /// Returns the zero-based position of this id within its namespace.
    pub const fn index(self) -> usize {
        (self.0 - Self::BASE.0) as usize
    }

    /// Builds the id at the given zero-based position of a namespace.
    pub const fn from_index(index: usize) -> AssetId {
        AssetId(Self::BASE.0 + index as u32)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The demultiplexing key of a record: an id qualified by its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    /// The namespace of the id.
    pub kind: AssetKind,
    /// The id within that namespace.
    pub id: AssetId,
}

impl RecordKey {
    /// Creates a new key.
    pub const fn new(kind: AssetKind, id: AssetId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_and_index() {
        let first = AssetId::BASE;
        assert_eq!(first.index(), 0);
        assert_eq!(first.next().index(), 1);
        assert_eq!(AssetId::from_index(7), AssetId(7));
    }

    #[test]
    fn test_record_keys_order_by_kind_then_id() {
        let texture = RecordKey::new(AssetKind::Texture, AssetId(9));
        let geometry = RecordKey::new(AssetKind::Geometry, AssetId(0));
        assert!(texture < geometry);
        assert_eq!(format!("{geometry}"), "geometry #0");
    }
}
