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

//! The asset library: one arena per asset kind.
//!
//! The library owns every asset. Session tables only hold [`Handle`]s into it,
//! so they never extend an asset's lifetime.

mod geometry;
mod layout;
mod material;
mod node;
mod texture;

pub use geometry::*;
pub use layout::*;
pub use material::*;
pub use node::*;
pub use texture::*;

use crate::arena::{Arena, Handle};
use crate::tracked::Tracked;
use tessera_core::asset::AssetKind;
use tessera_core::effect::Effect;
use tessera_core::{Error, Result};

/// A type-erased handle to any tracked asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRef {
    /// A texture handle.
    Texture(Handle<Texture>),
    /// A geometry handle.
    Geometry(Handle<Geometry>),
    /// A material handle.
    Material(Handle<Material>),
    /// An effect handle.
    Effect(Handle<Effect>),
    /// A scene node handle.
    SubScene(Handle<Node>),
}

impl AssetRef {
    /// The kind namespace of the referenced asset.
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetRef::Texture(_) => AssetKind::Texture,
            AssetRef::Geometry(_) => AssetKind::Geometry,
            AssetRef::Material(_) => AssetKind::Material,
            AssetRef::Effect(_) => AssetKind::Effect,
            AssetRef::SubScene(_) => AssetKind::SubScene,
        }
    }

    /// The raw arena index of the handle.
    pub fn index(&self) -> u32 {
        match self {
            AssetRef::Texture(h) => h.index(),
            AssetRef::Geometry(h) => h.index(),
            AssetRef::Material(h) => h.index(),
            AssetRef::Effect(h) => h.index(),
            AssetRef::SubScene(h) => h.index(),
        }
    }
}

/// Owning storage for every asset of a scene graph.
#[derive(Default)]
pub struct AssetLibrary {
    pub(crate) textures: Arena<Texture>,
    pub(crate) geometries: Arena<Geometry>,
    pub(crate) materials: Arena<Material>,
    pub(crate) effects: Arena<Effect>,
    pub(crate) nodes: Arena<Node>,
}

impl AssetLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves an asset into the library.
    pub fn add<T: Tracked>(&mut self, asset: T) -> Handle<T> {
        T::arena_mut(self).insert(asset)
    }

    /// Returns an asset, failing on stale or foreign handles.
    pub fn get<T: Tracked>(&self, handle: Handle<T>) -> Result<&T> {
        T::arena(self).get(handle).ok_or(Error::InvalidHandle {
            kind: T::KIND,
            index: handle.index(),
        })
    }

    /// Returns an asset mutably, failing on stale or foreign handles.
    pub fn get_mut<T: Tracked>(&mut self, handle: Handle<T>) -> Result<&mut T> {
        T::arena_mut(self).get_mut(handle).ok_or(Error::InvalidHandle {
            kind: T::KIND,
            index: handle.index(),
        })
    }

    /// Returns `true` if the handle points at a live asset.
    pub fn contains<T: Tracked>(&self, handle: Handle<T>) -> bool {
        T::arena(self).contains(handle)
    }

    /// The arena holding every asset of type `T`.
    pub fn arena<T: Tracked>(&self) -> &Arena<T> {
        T::arena(self)
    }

    /// Appends `child` to the children of `parent`.
    pub fn add_child(&mut self, parent: Handle<Node>, child: Handle<Node>) -> Result<()> {
        self.get::<Node>(child)?;
        self.get_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Lists the structural dependencies of an asset.
    ///
    /// Structural edges are the ones every encoder relies on: material to
    /// textures, node to children, geometry, material and effect. Geometry morph
    /// targets are not structural.
    pub fn dependencies_of(&self, asset: AssetRef) -> Result<Vec<AssetRef>> {
        let dependencies = match asset {
            AssetRef::Texture(handle) => {
                self.get(handle)?;
                Vec::new()
            }
            AssetRef::Geometry(handle) => {
                self.get(handle)?;
                Vec::new()
            }
            AssetRef::Effect(handle) => {
                self.get(handle)?;
                Vec::new()
            }
            AssetRef::Material(handle) => {
                self.get(handle)?.textures().map(AssetRef::Texture).collect()
            }
            AssetRef::SubScene(handle) => {
                let node = self.get(handle)?;
                let mut dependencies: Vec<AssetRef> =
                    node.children.iter().copied().map(AssetRef::SubScene).collect();
                dependencies.extend(node.geometry.map(AssetRef::Geometry));
                dependencies.extend(node.material.map(AssetRef::Material));
                dependencies.extend(node.effect.map(AssetRef::Effect));
                dependencies
            }
        };
        Ok(dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_depends_on_its_textures() {
        let mut library = AssetLibrary::new();
        let albedo = library.add(Texture::new("albedo", 1, 1, TextureFormat::Rgba8));
        let normal = library.add(Texture::new("normal", 1, 1, TextureFormat::Rgba8));
        let material = library.add(
            Material::new("brick")
                .with("albedo_map", MaterialValue::Texture(albedo))
                .with("normal_map", MaterialValue::Texture(normal))
                .with("roughness", MaterialValue::Float(0.5)),
        );

        let deps = library.dependencies_of(AssetRef::Material(material)).unwrap();
        assert_eq!(
            deps,
            vec![AssetRef::Texture(albedo), AssetRef::Texture(normal)]
        );
    }

    #[test]
    fn test_node_dependencies_and_morph_targets() {
        let mut library = AssetLibrary::new();
        let target = library.add(Geometry::new("smile"));
        let geometry = library.add(Geometry::new("face").with_morph_target(target));
        let material = library.add(Material::new("skin"));
        let effect = library.add(Effect::new("phong"));
        let child = library.add(Node::new("child"));
        let root = library.add(
            Node::new("root")
                .with_child(child)
                .with_surface(geometry, material, effect),
        );

        let deps = library.dependencies_of(AssetRef::SubScene(root)).unwrap();
        assert_eq!(
            deps,
            vec![
                AssetRef::SubScene(child),
                AssetRef::Geometry(geometry),
                AssetRef::Material(material),
                AssetRef::Effect(effect),
            ]
        );
        assert!(library
            .dependencies_of(AssetRef::Geometry(geometry))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut library = AssetLibrary::new();
        let mut other = AssetLibrary::new();
        other.add(Texture::default());
        let foreign = other.add(Texture::default());

        assert!(matches!(
            library.get(foreign),
            Err(Error::InvalidHandle {
                kind: AssetKind::Texture,
                index: 1
            })
        ));
    }

    #[test]
    fn test_add_child_requires_live_child() {
        let mut library = AssetLibrary::new();
        let root = library.add(Node::new("root"));
        let child = library.add(Node::new("child"));
        library.add_child(root, child).unwrap();
        assert_eq!(library.get(root).unwrap().children, vec![child]);

        let mut other = AssetLibrary::new();
        other.add(Node::default());
        other.add(Node::default());
        let foreign = other.add(Node::default());
        assert!(library.add_child(root, foreign).is_err());
    }
}
