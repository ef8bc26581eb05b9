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

//! Defines the contract for archive encoding strategies.
//!
//! The core of this module is the [`ArchiveStrategy`] trait, which provides a
//! unified interface over every way of encoding a whole [`SceneArchive`]. This
//! allows the serialization agent to register lanes and dispatch to them by
//! the strategy id stored in the archive header.

mod binary_lane;
mod compressed_lane;
mod ron_lane;

pub use binary_lane::BinaryArchiveLane;
pub use compressed_lane::CompressedArchiveLane;
pub use ron_lane::RonArchiveLane;

use tessera_core::archive::SceneArchive;
use tessera_core::Result;

/// The abstract contract for an archive encoding lane.
pub trait ArchiveStrategy: Send + Sync {
    /// Returns the unique, versioned identifier of this strategy.
    ///
    /// It is written into the archive header and used on load to find the lane
    /// able to read the payload. At most 32 bytes. Example: `"TS_BINARY_V1"`.
    fn strategy_id(&self) -> &'static str;

    /// Encodes a scene archive into a payload.
    fn encode(&self, archive: &SceneArchive) -> Result<Vec<u8>>;

    /// Decodes a payload previously produced by [`ArchiveStrategy::encode`].
    ///
    /// The header is assumed to be parsed and validated already.
    fn decode(&self, payload: &[u8]) -> Result<SceneArchive>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::asset::{AssetId, AssetKind, RecordKey, SerializedRecord};
    use tessera_core::Error;

    fn sample() -> SceneArchive {
        let mut geometry = SerializedRecord::new(AssetKind::Geometry, AssetId(0), 2, vec![1, 2, 3]);
        geometry.extra_dependencies = vec![RecordKey::new(AssetKind::Geometry, AssetId(1))];
        SceneArchive {
            root: Some(RecordKey::new(AssetKind::SubScene, AssetId(0))),
            records: vec![
                SerializedRecord::new(AssetKind::Texture, AssetId(0), 1, vec![0; 64]),
                geometry,
                SerializedRecord::new(AssetKind::Geometry, AssetId(1), 1, vec![9]),
                SerializedRecord::new(AssetKind::SubScene, AssetId(0), 1, Vec::new()),
            ],
        }
    }

    #[test]
    fn test_every_lane_restores_the_archive() -> anyhow::Result<()> {
        let lanes: Vec<Box<dyn ArchiveStrategy>> = vec![
            Box::new(BinaryArchiveLane::new()),
            Box::new(CompressedArchiveLane::new()),
            Box::new(RonArchiveLane::new()),
        ];
        let archive = sample();
        for lane in &lanes {
            let payload = lane.encode(&archive)?;
            assert_eq!(lane.decode(&payload)?, archive, "{}", lane.strategy_id());
        }
        Ok(())
    }

    #[test]
    fn test_strategy_ids_are_distinct_and_fit_the_header() {
        let ids = [
            BinaryArchiveLane::new().strategy_id(),
            CompressedArchiveLane::new().strategy_id(),
            RonArchiveLane::new().strategy_id(),
        ];
        for id in ids {
            assert!(id.len() <= 32);
        }
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[test]
    fn test_ron_payload_is_text() {
        let payload = RonArchiveLane::new().encode(&sample()).unwrap();
        let text = std::str::from_utf8(&payload).unwrap();
        assert!(text.contains("SubScene"));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(BinaryArchiveLane::new().decode(&[0xff; 3]).is_err());
        assert!(CompressedArchiveLane::new().decode(&[0xff; 3]).is_err());
        assert!(RonArchiveLane::new().decode(b"not ron (").is_err());
    }

    #[test]
    fn test_trailing_bytes_are_rejected() -> anyhow::Result<()> {
        let binary = BinaryArchiveLane::new();
        let mut payload = binary.encode(&SceneArchive::default())?;
        payload.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(binary.decode(&payload), Err(Error::Decode(_))));

        let compressed = CompressedArchiveLane::new();
        let mut raw = binary.encode(&sample())?;
        raw.push(0);
        let payload = lz4_flex::compress_prepend_size(&raw);
        assert!(matches!(compressed.decode(&payload), Err(Error::Decode(_))));
        Ok(())
    }

    #[test]
    fn test_oversized_size_prefix_is_rejected() {
        let mut payload = u32::MAX.to_le_bytes().to_vec();
        payload.extend_from_slice(&[0x10, 0xaa]);
        assert!(matches!(
            CompressedArchiveLane::new().decode(&payload),
            Err(Error::Decode(_))
        ));
    }
}
