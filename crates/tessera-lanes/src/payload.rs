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

//! Stable payload layouts shared by the encoders and the decoders.
//!
//! Live assets hold arena handles; these layouts hold [`AssetId`]s instead, so
//! they can cross a session boundary.

use bincode::config;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tessera_core::asset::AssetId;
use tessera_core::effect::{EffectCommand, Pass};
use tessera_core::{Error, Result};
use tessera_data::TextureFormat;

pub(crate) const RAW_GEOMETRY_VERSION: i16 = 1;
pub(crate) const COMPRESSED_GEOMETRY_VERSION: i16 = 2;
pub(crate) const TEXTURE_VERSION: i16 = 1;
pub(crate) const MATERIAL_VERSION: i16 = 1;
pub(crate) const EFFECT_VERSION: i16 = 1;
pub(crate) const NODE_VERSION: i16 = 1;

/// The largest output an LZ4 block can expand to, per compressed byte.
pub(crate) const MAX_LZ4_RATIO: usize = 255;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StreamPayload {
    pub name: String,
    pub size: u32,
    pub float_count: u32,
}

/// `vertex_bytes` holds every stream's floats back to back, in stream order.
/// The compressed encoder stores them LZ4-compressed with a size prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct GeometryPayload {
    pub name: String,
    pub streams: Vec<StreamPayload>,
    pub vertex_bytes: Vec<u8>,
    pub indices: Vec<u32>,
    pub morph_targets: Vec<AssetId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TexturePayload {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) enum PropertyPayload {
    Float(f32),
    Int(i32),
    Bool(bool),
    Vec4([f32; 4]),
    Texture(AssetId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct MaterialPayload {
    pub name: String,
    pub properties: Vec<(String, PropertyPayload)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct EffectPayload {
    pub name: String,
    pub techniques: Vec<(String, Vec<Pass>)>,
    pub fallbacks: Vec<(String, String)>,
    pub history: Vec<EffectCommand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct NodePayload {
    pub name: String,
    pub layouts: u32,
    pub children: Vec<AssetId>,
    pub geometry: Option<AssetId>,
    pub material: Option<AssetId>,
    pub effect: Option<AssetId>,
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serde::encode_to_vec(value, config::standard()).map_err(|e| Error::Encode(e.to_string()))
}

/// Decodes a whole payload. Trailing bytes mean the payload was not produced
/// by the matching encoder.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (value, read): (T, usize) = bincode::serde::decode_from_slice(bytes, config::standard())
        .map_err(|e| Error::Decode(e.to_string()))?;
    if read != bytes.len() {
        return Err(Error::Decode(format!(
            "{} trailing bytes after payload",
            bytes.len() - read
        )));
    }
    Ok(value)
}

/// Decompresses an LZ4 block written with a size prefix.
///
/// The prefix comes from untrusted input, so it is checked against `limit`
/// before anything is allocated.
pub(crate) fn decompress(bytes: &[u8], limit: usize) -> Result<Vec<u8>> {
    let prefix: [u8; 4] = bytes
        .get(..4)
        .and_then(|prefix| prefix.try_into().ok())
        .ok_or_else(|| Error::Decode("compressed block has no size prefix".into()))?;
    let declared = u32::from_le_bytes(prefix) as usize;
    if declared > limit {
        return Err(Error::Decode(format!(
            "compressed block declares {declared} bytes, at most {limit} expected"
        )));
    }
    lz4_flex::decompress_size_prepended(bytes).map_err(|e| Error::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompress_honors_the_limit() -> anyhow::Result<()> {
        let block = lz4_flex::compress_prepend_size(&[7u8; 64]);
        assert_eq!(decompress(&block, 64)?, vec![7u8; 64]);
        assert!(matches!(decompress(&block, 63), Err(Error::Decode(_))));
        Ok(())
    }

    #[test]
    fn test_decompress_rejects_forged_prefix() {
        let mut forged = u32::MAX.to_le_bytes().to_vec();
        forged.extend_from_slice(&[0x10, 0xaa]);
        assert!(matches!(
            decompress(&forged, forged.len() * MAX_LZ4_RATIO),
            Err(Error::Decode(_))
        ));
        assert!(matches!(decompress(&[1, 2], 1024), Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() -> anyhow::Result<()> {
        let mut bytes = encode(&StreamPayload {
            name: "position".into(),
            size: 3,
            float_count: 9,
        })?;
        bytes.push(0);
        assert!(matches!(
            decode::<StreamPayload>(&bytes),
            Err(Error::Decode(_))
        ));
        Ok(())
    }
}
