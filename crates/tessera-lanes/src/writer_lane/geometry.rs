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

//! Built-in geometry writers: raw vertex floats and LZ4-compressed vertex floats.

use super::{SubDependencies, WriteContext};
use crate::payload::{
    self, GeometryPayload, StreamPayload, COMPRESSED_GEOMETRY_VERSION, RAW_GEOMETRY_VERSION,
};
use tessera_core::asset::{AssetId, AssetKind, SerializedRecord};
use tessera_core::{Result, WriterOptions};
use tessera_data::Geometry;

/// The priority of the raw writer: last resort, accepts everything.
pub const RAW_GEOMETRY_PRIORITY: u32 = 100;
/// The priority of the compressed writer: tried before the raw one.
pub const COMPRESSED_GEOMETRY_PRIORITY: u32 = 10;

/// Selects the compressed writer for geometries above the configured size.
pub fn compressed_geometry_test(geometry: &Geometry, writer_options: &WriterOptions) -> bool {
    writer_options.compress_geometry
        && geometry.vertex_float_count() > writer_options.geometry_compression_threshold
}

/// Writes the vertex floats as-is.
pub fn write_raw_geometry(
    ctx: &WriteContext<'_>,
    geometry: &Geometry,
    id: AssetId,
    sub_dependencies: &mut SubDependencies<'_>,
) -> Result<SerializedRecord> {
    let payload = build_payload(ctx, geometry, sub_dependencies, vertex_bytes(geometry))?;
    Ok(SerializedRecord::new(
        AssetKind::Geometry,
        id,
        RAW_GEOMETRY_VERSION,
        payload::encode(&payload)?,
    ))
}

/// Writes the vertex floats compressed with LZ4.
pub fn write_compressed_geometry(
    ctx: &WriteContext<'_>,
    geometry: &Geometry,
    id: AssetId,
    sub_dependencies: &mut SubDependencies<'_>,
) -> Result<SerializedRecord> {
    let compressed = lz4_flex::compress_prepend_size(&vertex_bytes(geometry));
    let payload = build_payload(ctx, geometry, sub_dependencies, compressed)?;
    Ok(SerializedRecord::new(
        AssetKind::Geometry,
        id,
        COMPRESSED_GEOMETRY_VERSION,
        payload::encode(&payload)?,
    ))
}

fn vertex_bytes(geometry: &Geometry) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(geometry.vertex_float_count() * 4);
    for stream in &geometry.streams {
        bytes.extend_from_slice(bytemuck::cast_slice(&stream.data));
    }
    bytes
}

fn build_payload(
    ctx: &WriteContext<'_>,
    geometry: &Geometry,
    sub_dependencies: &mut SubDependencies<'_>,
    vertex_bytes: Vec<u8>,
) -> Result<GeometryPayload> {
    let mut morph_targets = Vec::new();
    if ctx.options.include_morph_targets {
        for target in &geometry.morph_targets {
            ctx.library.get(*target)?;
            morph_targets.push(sub_dependencies.request_geometry(*target));
        }
    }

    Ok(GeometryPayload {
        name: geometry.name.clone(),
        streams: geometry
            .streams
            .iter()
            .map(|stream| StreamPayload {
                name: stream.name.clone(),
                size: stream.size,
                float_count: stream.data.len() as u32,
            })
            .collect(),
        vertex_bytes,
        indices: geometry.indices.clone(),
        morph_targets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::Options;
    use tessera_data::{AssetLibrary, Dependency};

    #[test]
    fn test_morph_targets_are_requested_unless_disabled() {
        let mut library = AssetLibrary::new();
        let smile = library.add(Geometry::new("smile"));
        let face = Geometry::new("face")
            .with_stream("position", 3, vec![1.0, 2.0, 3.0])
            .with_morph_target(smile);
        let dependencies = Dependency::new();
        let mut options = Options::default();
        let writer_options = WriterOptions::default();

        let mut sub = SubDependencies::new(&dependencies);
        let ctx = WriteContext {
            dependencies: &dependencies,
            library: &library,
            options: &options,
            writer_options: &writer_options,
        };
        let record = write_raw_geometry(&ctx, &face, AssetId(0), &mut sub).unwrap();
        assert_eq!(record.kind, AssetKind::Geometry);
        assert_eq!(sub.requests().len(), 1);

        options.include_morph_targets = false;
        let mut sub = SubDependencies::new(&dependencies);
        let ctx = WriteContext {
            dependencies: &dependencies,
            library: &library,
            options: &options,
            writer_options: &writer_options,
        };
        write_compressed_geometry(&ctx, &face, AssetId(0), &mut sub).unwrap();
        assert!(sub.is_empty());
    }

    #[test]
    fn test_compression_test_honors_threshold_and_switch() {
        let geometry = Geometry::new("g").with_stream("position", 3, vec![0.0; 9]);
        let mut writer_options = WriterOptions {
            geometry_compression_threshold: 8,
            ..Default::default()
        };
        assert!(compressed_geometry_test(&geometry, &writer_options));
        writer_options.geometry_compression_threshold = 9;
        assert!(!compressed_geometry_test(&geometry, &writer_options));
        writer_options.geometry_compression_threshold = 0;
        writer_options.compress_geometry = false;
        assert!(!compressed_geometry_test(&geometry, &writer_options));
    }
}
