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

//! The per-kind writer dispatch.
//!
//! A [`WriterRegistry`] owns one pluggable writer for textures and one for
//! materials, plus a priority-ordered table of competing geometry writers, each
//! guarded by a selection test. Effects and scene nodes are always encoded by the
//! built-in [`write_effect`] and [`write_node`].
//!
//! The registry is configured during a single-threaded setup phase, then shared
//! read-only (usually behind an `Arc`) by every save session.

mod builtin;
mod geometry;
mod material;
mod sub_dependencies;
mod texture;

pub use builtin::{write_effect, write_node};
pub use geometry::{
    compressed_geometry_test, write_compressed_geometry, write_raw_geometry,
    COMPRESSED_GEOMETRY_PRIORITY, RAW_GEOMETRY_PRIORITY,
};
pub use material::write_material;
pub use sub_dependencies::SubDependencies;
pub use texture::write_texture;

use std::collections::BTreeMap;
use tessera_core::asset::{AssetId, AssetKind, SerializedRecord};
use tessera_core::{Error, Options, Result, WriterOptions};
use tessera_data::{AssetLibrary, Dependency, Geometry, Material, Texture};

/// Everything a writer may read besides the object it encodes.
///
/// The options are passed through untouched: only writers interpret them.
#[derive(Clone, Copy)]
pub struct WriteContext<'a> {
    /// The identity registry of the running session. Read-only for writers.
    pub dependencies: &'a Dependency,
    /// The library owning every asset.
    pub library: &'a AssetLibrary,
    /// General save options.
    pub options: &'a Options,
    /// Encoder-specific options.
    pub writer_options: &'a WriterOptions,
}

/// A pluggable encoder for one object of kind `T`.
pub type WriterFn<T> =
    dyn Fn(&WriteContext<'_>, &T, AssetId) -> Result<SerializedRecord> + Send + Sync;

/// A geometry encoder. It may request sub-dependencies through the accumulator.
pub type GeometryWriterFn = dyn Fn(&WriteContext<'_>, &Geometry, AssetId, &mut SubDependencies<'_>) -> Result<SerializedRecord>
    + Send
    + Sync;

/// Decides whether the geometry writer it guards applies to a geometry.
pub type GeometryTestFn = dyn Fn(&Geometry, &WriterOptions) -> bool + Send + Sync;

struct GeometryEntry {
    test: Box<GeometryTestFn>,
    writer: Box<GeometryWriterFn>,
}

/// The registry of pluggable encoders.
#[derive(Default)]
pub struct WriterRegistry {
    texture: Option<Box<WriterFn<Texture>>>,
    material: Option<Box<WriterFn<Material>>>,
    /// Tried in ascending priority order.
    geometry: BTreeMap<u32, GeometryEntry>,
}

impl WriterRegistry {
    /// Creates a registry with no writer at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in texture, material and geometry writers.
    ///
    /// The compressed geometry writer is tried first; the raw writer accepts
    /// every geometry and closes the table.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_texture_writer(write_texture);
        registry.register_material_writer(write_material);
        registry.register_geometry_writer(
            COMPRESSED_GEOMETRY_PRIORITY,
            compressed_geometry_test,
            write_compressed_geometry,
        );
        registry.register_geometry_writer(RAW_GEOMETRY_PRIORITY, |_, _| true, write_raw_geometry);
        registry
    }

    /// Sets the texture writer, replacing any previous one.
    pub fn register_texture_writer<F>(&mut self, writer: F)
    where
        F: Fn(&WriteContext<'_>, &Texture, AssetId) -> Result<SerializedRecord> + Send + Sync + 'static,
    {
        if self.texture.replace(Box::new(writer)).is_some() {
            log::debug!("Replaced the texture writer");
        }
    }

    /// Sets the material writer, replacing any previous one.
    pub fn register_material_writer<F>(&mut self, writer: F)
    where
        F: Fn(&WriteContext<'_>, &Material, AssetId) -> Result<SerializedRecord> + Send + Sync + 'static,
    {
        if self.material.replace(Box::new(writer)).is_some() {
            log::debug!("Replaced the material writer");
        }
    }

    /// Sets the geometry writer at `priority`, replacing any previous one there.
    ///
    /// Lower priorities are tried first.
    pub fn register_geometry_writer<T, F>(&mut self, priority: u32, test: T, writer: F)
    where
        T: Fn(&Geometry, &WriterOptions) -> bool + Send + Sync + 'static,
        F: Fn(&WriteContext<'_>, &Geometry, AssetId, &mut SubDependencies<'_>) -> Result<SerializedRecord>
            + Send
            + Sync
            + 'static,
    {
        let entry = GeometryEntry {
            test: Box::new(test),
            writer: Box::new(writer),
        };
        if self.geometry.insert(priority, entry).is_some() {
            log::debug!("Replaced the geometry writer at priority {}", priority);
        }
    }

    /// Removes the geometry writer at `priority`. Returns `true` if one existed.
    pub fn unregister_geometry_writer(&mut self, priority: u32) -> bool {
        self.geometry.remove(&priority).is_some()
    }

    /// The registered geometry priorities, in the order they are tried.
    pub fn geometry_priorities(&self) -> impl Iterator<Item = u32> + '_ {
        self.geometry.keys().copied()
    }

    /// Returns `true` if a writer is registered for `kind`.
    ///
    /// Effects and scene nodes always have their built-in writer.
    pub fn has_writer(&self, kind: AssetKind) -> bool {
        match kind {
            AssetKind::Texture => self.texture.is_some(),
            AssetKind::Material => self.material.is_some(),
            AssetKind::Geometry => !self.geometry.is_empty(),
            AssetKind::Effect | AssetKind::SubScene => true,
        }
    }

    /// Encodes a texture with the registered texture writer.
    pub fn write_texture(
        &self,
        ctx: &WriteContext<'_>,
        texture: &Texture,
        id: AssetId,
    ) -> Result<SerializedRecord> {
        let writer = self.texture.as_ref().ok_or(Error::MissingWriter {
            kind: AssetKind::Texture,
        })?;
        writer(ctx, texture, id)
    }

    /// Encodes a material with the registered material writer.
    pub fn write_material(
        &self,
        ctx: &WriteContext<'_>,
        material: &Material,
        id: AssetId,
    ) -> Result<SerializedRecord> {
        let writer = self.material.as_ref().ok_or(Error::MissingWriter {
            kind: AssetKind::Material,
        })?;
        writer(ctx, material, id)
    }

    /// Encodes a geometry with the first writer whose test accepts it.
    ///
    /// A geometry no test accepts is a configuration error.
    pub fn write_geometry(
        &self,
        ctx: &WriteContext<'_>,
        geometry: &Geometry,
        id: AssetId,
        sub_dependencies: &mut SubDependencies<'_>,
    ) -> Result<SerializedRecord> {
        for (priority, entry) in &self.geometry {
            if (entry.test)(geometry, ctx.writer_options) {
                log::trace!(
                    "Geometry '{}' selected the writer at priority {}",
                    geometry.name,
                    priority
                );
                return (entry.writer)(ctx, geometry, id, sub_dependencies);
            }
        }
        log::error!("No geometry writer accepts geometry '{}'", geometry.name);
        Err(Error::NoMatchingEncoder {
            name: geometry.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_data::TextureFormat;

    fn tagged(version: i16) -> impl Fn(&WriteContext<'_>, &Geometry, AssetId, &mut SubDependencies<'_>) -> Result<SerializedRecord>
           + Send
           + Sync
           + 'static {
        move |_, _, id, _| Ok(SerializedRecord::new(AssetKind::Geometry, id, version, Vec::new()))
    }

    struct Fixture {
        library: AssetLibrary,
        dependencies: Dependency,
        options: Options,
        writer_options: WriterOptions,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                library: AssetLibrary::new(),
                dependencies: Dependency::new(),
                options: Options::default(),
                writer_options: WriterOptions::default(),
            }
        }

        fn ctx(&self) -> WriteContext<'_> {
            WriteContext {
                dependencies: &self.dependencies,
                library: &self.library,
                options: &self.options,
                writer_options: &self.writer_options,
            }
        }
    }

    #[test]
    fn test_geometry_writers_are_tried_by_ascending_priority() {
        let mut registry = WriterRegistry::new();
        registry.register_geometry_writer(20, |_, _| true, tagged(20));
        registry.register_geometry_writer(5, |g, _| g.name == "special", tagged(5));
        registry.register_geometry_writer(10, |_, _| true, tagged(10));

        let fixture = Fixture::new();
        let mut sub = SubDependencies::new(&fixture.dependencies);
        let special = Geometry::new("special");
        let plain = Geometry::new("plain");

        let record = registry
            .write_geometry(&fixture.ctx(), &special, AssetId(0), &mut sub)
            .unwrap();
        assert_eq!(record.version, 5);
        let record = registry
            .write_geometry(&fixture.ctx(), &plain, AssetId(1), &mut sub)
            .unwrap();
        assert_eq!(record.version, 10);
        assert_eq!(registry.geometry_priorities().collect::<Vec<_>>(), vec![5, 10, 20]);
    }

    #[test]
    fn test_no_matching_geometry_writer_is_an_error() {
        let mut registry = WriterRegistry::new();
        registry.register_geometry_writer(1, |_, _| false, tagged(1));

        let fixture = Fixture::new();
        let mut sub = SubDependencies::new(&fixture.dependencies);
        let result =
            registry.write_geometry(&fixture.ctx(), &Geometry::new("lonely"), AssetId(0), &mut sub);
        assert!(matches!(result, Err(Error::NoMatchingEncoder { name }) if name == "lonely"));
    }

    #[test]
    fn test_registering_twice_overwrites() {
        let mut registry = WriterRegistry::new();
        registry.register_geometry_writer(1, |_, _| true, tagged(1));
        registry.register_geometry_writer(1, |_, _| true, tagged(7));
        registry.register_texture_writer(|_, _, id| {
            Ok(SerializedRecord::new(AssetKind::Texture, id, 1, Vec::new()))
        });
        registry.register_texture_writer(|_, _, id| {
            Ok(SerializedRecord::new(AssetKind::Texture, id, 9, Vec::new()))
        });

        let fixture = Fixture::new();
        let mut sub = SubDependencies::new(&fixture.dependencies);
        let geometry = registry
            .write_geometry(&fixture.ctx(), &Geometry::new("g"), AssetId(0), &mut sub)
            .unwrap();
        let texture = registry
            .write_texture(&fixture.ctx(), &Texture::new("t", 1, 1, TextureFormat::R8), AssetId(0))
            .unwrap();
        assert_eq!(geometry.version, 7);
        assert_eq!(texture.version, 9);
        assert_eq!(registry.geometry_priorities().count(), 1);
    }

    #[test]
    fn test_missing_writer_is_reported() {
        let registry = WriterRegistry::new();
        let fixture = Fixture::new();
        assert!(!registry.has_writer(AssetKind::Material));
        assert!(registry.has_writer(AssetKind::Effect));
        assert!(matches!(
            registry.write_material(&fixture.ctx(), &Material::new("m"), AssetId(0)),
            Err(Error::MissingWriter {
                kind: AssetKind::Material
            })
        ));
    }

    #[test]
    fn test_defaults_pick_compression_by_size() {
        let registry = WriterRegistry::with_defaults();
        let mut fixture = Fixture::new();
        fixture.writer_options.geometry_compression_threshold = 8;

        let small = Geometry::new("small").with_stream("position", 3, vec![0.0; 6]);
        let large = Geometry::new("large").with_stream("position", 3, vec![0.5; 12]);
        let mut sub = SubDependencies::new(&fixture.dependencies);
        let small = registry
            .write_geometry(&fixture.ctx(), &small, AssetId(0), &mut sub)
            .unwrap();
        let large = registry
            .write_geometry(&fixture.ctx(), &large, AssetId(1), &mut sub)
            .unwrap();
        assert_eq!(small.version, crate::payload::RAW_GEOMETRY_VERSION);
        assert_eq!(large.version, crate::payload::COMPRESSED_GEOMETRY_VERSION);

        fixture.writer_options.compress_geometry = false;
        let large = Geometry::new("large").with_stream("position", 3, vec![0.5; 12]);
        let mut sub = SubDependencies::new(&fixture.dependencies);
        let record = registry
            .write_geometry(&fixture.ctx(), &large, AssetId(1), &mut sub)
            .unwrap();
        assert_eq!(record.version, crate::payload::RAW_GEOMETRY_VERSION);
    }
}
