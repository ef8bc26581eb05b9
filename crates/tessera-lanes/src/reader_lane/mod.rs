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

//! The load-side decoder dispatch.
//!
//! A record is decoded by the decoder registered for its `(kind, version)` pair.
//! Decoded assets carry the [`AssetId`]s they reference instead of handles: the
//! loader resolves them once every record of the stream is known.

use crate::payload::{
    self, EffectPayload, GeometryPayload, MaterialPayload, NodePayload, PropertyPayload,
    TexturePayload, COMPRESSED_GEOMETRY_VERSION, EFFECT_VERSION, MATERIAL_VERSION, NODE_VERSION,
    RAW_GEOMETRY_VERSION, TEXTURE_VERSION,
};
use ahash::AHashMap;
use tessera_core::asset::{AssetId, AssetKind, RecordKey, SerializedRecord};
use tessera_core::effect::Effect;
use tessera_core::{Error, Result};
use tessera_data::{Geometry, Layouts, Material, MaterialValue, Node, Texture, VertexStream};

/// The outgoing references of a decoded scene node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeLinks {
    /// Child node ids, in order.
    pub children: Vec<AssetId>,
    /// The geometry id.
    pub geometry: Option<AssetId>,
    /// The material id.
    pub material: Option<AssetId>,
    /// The effect id.
    pub effect: Option<AssetId>,
}

/// An asset decoded from one record, its references still unresolved.
///
/// Reference-holding fields of the asset itself are left empty.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedAsset {
    /// A texture. Textures reference nothing.
    Texture(Texture),
    /// A geometry and the ids of its morph targets.
    Geometry {
        /// The geometry, with no morph targets.
        geometry: Geometry,
        /// Morph target ids, in order.
        morph_targets: Vec<AssetId>,
    },
    /// A material and the ids of its texture properties.
    Material {
        /// The material, without its texture properties.
        material: Material,
        /// `(property name, texture id)` pairs.
        textures: Vec<(String, AssetId)>,
    },
    /// An effect. Effects reference nothing.
    Effect(Effect),
    /// A scene node and its links.
    SubScene {
        /// The node, with no children or surface.
        node: Node,
        /// The ids the node points at.
        links: NodeLinks,
    },
}

impl DecodedAsset {
    /// The kind of the decoded asset.
    pub fn kind(&self) -> AssetKind {
        match self {
            DecodedAsset::Texture(_) => AssetKind::Texture,
            DecodedAsset::Geometry { .. } => AssetKind::Geometry,
            DecodedAsset::Material { .. } => AssetKind::Material,
            DecodedAsset::Effect(_) => AssetKind::Effect,
            DecodedAsset::SubScene { .. } => AssetKind::SubScene,
        }
    }

    /// Every record this asset references.
    pub fn references(&self) -> Vec<RecordKey> {
        match self {
            DecodedAsset::Texture(_) | DecodedAsset::Effect(_) => Vec::new(),
            DecodedAsset::Geometry { morph_targets, .. } => morph_targets
                .iter()
                .map(|id| RecordKey::new(AssetKind::Geometry, *id))
                .collect(),
            DecodedAsset::Material { textures, .. } => textures
                .iter()
                .map(|(_, id)| RecordKey::new(AssetKind::Texture, *id))
                .collect(),
            DecodedAsset::SubScene { links, .. } => {
                let mut keys: Vec<RecordKey> = links
                    .children
                    .iter()
                    .map(|id| RecordKey::new(AssetKind::SubScene, *id))
                    .collect();
                keys.extend(links.geometry.map(|id| RecordKey::new(AssetKind::Geometry, id)));
                keys.extend(links.material.map(|id| RecordKey::new(AssetKind::Material, id)));
                keys.extend(links.effect.map(|id| RecordKey::new(AssetKind::Effect, id)));
                keys
            }
        }
    }
}

/// A function turning a record payload back into an asset.
pub type DecoderFn = dyn Fn(&SerializedRecord) -> Result<DecodedAsset> + Send + Sync;

/// Maps `(kind, version)` pairs to decoders.
#[derive(Default)]
pub struct DecoderRegistry {
    map: AHashMap<(AssetKind, i16), Box<DecoderFn>>,
}

impl DecoderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry able to read everything the built-in writers produce.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(AssetKind::Texture, TEXTURE_VERSION, decode_texture);
        registry.register(AssetKind::Geometry, RAW_GEOMETRY_VERSION, decode_raw_geometry);
        registry.register(
            AssetKind::Geometry,
            COMPRESSED_GEOMETRY_VERSION,
            decode_compressed_geometry,
        );
        registry.register(AssetKind::Material, MATERIAL_VERSION, decode_material);
        registry.register(AssetKind::Effect, EFFECT_VERSION, decode_effect);
        registry.register(AssetKind::SubScene, NODE_VERSION, decode_node);
        registry
    }

    /// Registers the decoder of `(kind, version)` records, replacing any previous one.
    pub fn register<F>(&mut self, kind: AssetKind, version: i16, decoder: F)
    where
        F: Fn(&SerializedRecord) -> Result<DecodedAsset> + Send + Sync + 'static,
    {
        if self.map.insert((kind, version), Box::new(decoder)).is_some() {
            log::debug!("Replaced the {} decoder for version {}", kind, version);
        }
    }

    /// Returns `true` if a decoder handles `(kind, version)`.
    pub fn contains(&self, kind: AssetKind, version: i16) -> bool {
        self.map.contains_key(&(kind, version))
    }

    /// Decodes one record with the decoder matching its kind and version.
    pub fn decode(&self, record: &SerializedRecord) -> Result<DecodedAsset> {
        let decoder = self
            .map
            .get(&(record.kind, record.version))
            .ok_or(Error::UnknownEncoding {
                kind: record.kind,
                version: record.version,
            })?;
        let decoded = decoder(record)?;
        if decoded.kind() != record.kind {
            return Err(Error::MalformedStream(format!(
                "{} decoded as a {}",
                record.key(),
                decoded.kind()
            )));
        }
        Ok(decoded)
    }
}

fn decode_texture(record: &SerializedRecord) -> Result<DecodedAsset> {
    let payload: TexturePayload = payload::decode(&record.payload)?;
    Ok(DecodedAsset::Texture(Texture {
        name: payload.name,
        width: payload.width,
        height: payload.height,
        format: payload.format,
        data: payload.data.unwrap_or_default(),
    }))
}

fn decode_raw_geometry(record: &SerializedRecord) -> Result<DecodedAsset> {
    let payload: GeometryPayload = payload::decode(&record.payload)?;
    let floats = floats_from_bytes(&payload.vertex_bytes)?;
    build_geometry(payload, floats)
}

fn decode_compressed_geometry(record: &SerializedRecord) -> Result<DecodedAsset> {
    let payload: GeometryPayload = payload::decode(&record.payload)?;
    let expected: usize = payload.streams.iter().map(|s| s.float_count as usize).sum();
    let bytes = payload::decompress(
        &payload.vertex_bytes,
        expected.saturating_mul(std::mem::size_of::<f32>()),
    )?;
    let floats = floats_from_bytes(&bytes)?;
    build_geometry(payload, floats)
}

fn floats_from_bytes(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % std::mem::size_of::<f32>() != 0 {
        return Err(Error::Decode(format!(
            "{} vertex bytes do not form whole floats",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(std::mem::size_of::<f32>())
        .map(bytemuck::pod_read_unaligned::<f32>)
        .collect())
}

fn build_geometry(payload: GeometryPayload, floats: Vec<f32>) -> Result<DecodedAsset> {
    let expected: usize = payload.streams.iter().map(|s| s.float_count as usize).sum();
    if expected != floats.len() {
        return Err(Error::Decode(format!(
            "geometry '{}' declares {} vertex floats but carries {}",
            payload.name,
            expected,
            floats.len()
        )));
    }

    let mut offset = 0;
    let mut streams = Vec::with_capacity(payload.streams.len());
    for stream in payload.streams {
        let end = offset + stream.float_count as usize;
        streams.push(VertexStream {
            name: stream.name,
            size: stream.size,
            data: floats[offset..end].to_vec(),
        });
        offset = end;
    }

    Ok(DecodedAsset::Geometry {
        geometry: Geometry {
            name: payload.name,
            streams,
            indices: payload.indices,
            morph_targets: Vec::new(),
        },
        morph_targets: payload.morph_targets,
    })
}

fn decode_material(record: &SerializedRecord) -> Result<DecodedAsset> {
    let payload: MaterialPayload = payload::decode(&record.payload)?;
    let mut material = Material::new(payload.name);
    let mut textures = Vec::new();
    for (name, value) in payload.properties {
        match value {
            PropertyPayload::Float(v) => material.set(name, MaterialValue::Float(v)),
            PropertyPayload::Int(v) => material.set(name, MaterialValue::Int(v)),
            PropertyPayload::Bool(v) => material.set(name, MaterialValue::Bool(v)),
            PropertyPayload::Vec4(v) => material.set(name, MaterialValue::Vec4(v)),
            PropertyPayload::Texture(id) => textures.push((name, id)),
        }
    }
    Ok(DecodedAsset::Material { material, textures })
}

fn decode_effect(record: &SerializedRecord) -> Result<DecodedAsset> {
    let payload: EffectPayload = payload::decode(&record.payload)?;
    let effect = Effect::restore(
        payload.name,
        payload.techniques,
        payload.fallbacks,
        payload.history,
    )?;
    Ok(DecodedAsset::Effect(effect))
}

fn decode_node(record: &SerializedRecord) -> Result<DecodedAsset> {
    let payload: NodePayload = payload::decode(&record.payload)?;
    Ok(DecodedAsset::SubScene {
        node: Node::new(payload.name).with_layouts(Layouts::from_bits(payload.layouts)),
        links: NodeLinks {
            children: payload.children,
            geometry: payload.geometry,
            material: payload.material,
            effect: payload.effect,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer_lane::{SubDependencies, WriteContext, WriterRegistry};
    use tessera_core::{Options, WriterOptions};
    use tessera_data::{AssetLibrary, Dependency, TextureFormat};

    #[test]
    fn test_geometry_survives_both_encodings() {
        let mut library = AssetLibrary::new();
        let target = library.add(Geometry::new("target"));
        let geometry = Geometry::new("mesh")
            .with_stream("position", 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])
            .with_stream("uv", 2, vec![0.25, 0.75, 0.5, 0.5])
            .with_indices(vec![0, 1, 0])
            .with_morph_target(target);

        let dependencies = Dependency::new();
        let registry = WriterRegistry::with_defaults();
        let decoders = DecoderRegistry::with_defaults();
        let options = Options::default();

        for threshold in [0, usize::MAX] {
            let writer_options = WriterOptions {
                geometry_compression_threshold: threshold,
                ..Default::default()
            };
            let ctx = WriteContext {
                dependencies: &dependencies,
                library: &library,
                options: &options,
                writer_options: &writer_options,
            };
            let mut sub = SubDependencies::new(&dependencies);
            let record = registry
                .write_geometry(&ctx, &geometry, AssetId(1), &mut sub)
                .unwrap();

            match decoders.decode(&record).unwrap() {
                DecodedAsset::Geometry {
                    geometry: decoded,
                    morph_targets,
                } => {
                    assert_eq!(decoded.streams, geometry.streams);
                    assert_eq!(decoded.indices, geometry.indices);
                    assert_eq!(morph_targets, vec![AssetId(0)]);
                }
                other => panic!("unexpected {:?}", other.kind()),
            }
        }
    }

    #[test]
    fn test_texture_stub_has_no_pixels() {
        let library = AssetLibrary::new();
        let dependencies = Dependency::new();
        let options = Options::default();
        let writer_options = WriterOptions {
            embed_texture_data: false,
            ..Default::default()
        };
        let ctx = WriteContext {
            dependencies: &dependencies,
            library: &library,
            options: &options,
            writer_options: &writer_options,
        };
        let texture = Texture::new("albedo", 2, 2, TextureFormat::Rgba8);
        let record = WriterRegistry::with_defaults()
            .write_texture(&ctx, &texture, AssetId(0))
            .unwrap();

        match DecoderRegistry::with_defaults().decode(&record).unwrap() {
            DecodedAsset::Texture(decoded) => {
                assert_eq!((decoded.width, decoded.height), (2, 2));
                assert!(!decoded.has_data());
            }
            other => panic!("unexpected {:?}", other.kind()),
        }
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let record = SerializedRecord::new(AssetKind::Geometry, AssetId(0), 42, Vec::new());
        assert!(matches!(
            DecoderRegistry::with_defaults().decode(&record),
            Err(Error::UnknownEncoding {
                kind: AssetKind::Geometry,
                version: 42
            })
        ));
    }

    #[test]
    fn test_compressed_geometry_size_must_match_its_streams() -> anyhow::Result<()> {
        let floats = [1.0f32, 2.0, 3.0];
        let mut vertex_bytes =
            lz4_flex::compress_prepend_size(bytemuck::cast_slice::<f32, u8>(&floats[..]));
        vertex_bytes[..4].copy_from_slice(&u32::MAX.to_le_bytes());
        let geometry = GeometryPayload {
            name: "forged".into(),
            streams: vec![payload::StreamPayload {
                name: "position".into(),
                size: 3,
                float_count: 3,
            }],
            vertex_bytes,
            indices: Vec::new(),
            morph_targets: Vec::new(),
        };
        let record = SerializedRecord::new(
            AssetKind::Geometry,
            AssetId(0),
            COMPRESSED_GEOMETRY_VERSION,
            payload::encode(&geometry)?,
        );
        assert!(matches!(
            DecoderRegistry::with_defaults().decode(&record),
            Err(Error::Decode(_))
        ));
        Ok(())
    }

    #[test]
    fn test_node_references_list_every_link() {
        let decoded = DecodedAsset::SubScene {
            node: Node::new("n"),
            links: NodeLinks {
                children: vec![AssetId(2), AssetId(3)],
                geometry: Some(AssetId(0)),
                material: None,
                effect: Some(AssetId(1)),
            },
        };
        assert_eq!(
            decoded.references(),
            vec![
                RecordKey::new(AssetKind::SubScene, AssetId(2)),
                RecordKey::new(AssetKind::SubScene, AssetId(3)),
                RecordKey::new(AssetKind::Geometry, AssetId(0)),
                RecordKey::new(AssetKind::Effect, AssetId(1)),
            ]
        );
    }
}
