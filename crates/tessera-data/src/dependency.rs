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

//! The save-side identity registry.
//!
//! A [`Dependency`] session assigns one [`AssetId`] per distinct object, per kind,
//! in first-registration order. It is created fresh for one save operation and
//! discarded afterwards.

use crate::arena::Handle;
use crate::library::{AssetRef, Geometry, Material, Node, Texture};
use crate::tracked::Tracked;
use ahash::AHashMap;
use tessera_core::asset::{AssetId, AssetKind};
use tessera_core::effect::Effect;
use tessera_core::{Error, Result};

/// A bijection between object handles and ids for one asset kind.
pub struct DependencyTable<T> {
    ids: AHashMap<Handle<T>, AssetId>,
    handles: Vec<Handle<T>>,
}

impl<T> Default for DependencyTable<T> {
    fn default() -> Self {
        Self {
            ids: AHashMap::new(),
            handles: Vec::new(),
        }
    }
}

impl<T> DependencyTable<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the handle already has an id.
    pub fn has(&self, handle: Handle<T>) -> bool {
        self.ids.contains_key(&handle)
    }

    /// Returns the id assigned to the handle.
    pub fn id_of(&self, handle: Handle<T>) -> Option<AssetId> {
        self.ids.get(&handle).copied()
    }

    /// Returns the handle registered under an id.
    pub fn handle_of(&self, id: AssetId) -> Option<Handle<T>> {
        self.handles.get(id.index()).copied()
    }

    /// Assigns the next id to the handle, or returns its existing id.
    ///
    /// The boolean is `true` if the handle was newly registered.
    pub fn register(&mut self, handle: Handle<T>) -> (AssetId, bool) {
        if let Some(id) = self.ids.get(&handle) {
            return (*id, false);
        }
        let id = self.next_id();
        self.ids.insert(handle, id);
        self.handles.push(handle);
        (id, true)
    }

    /// The id the next newly registered handle will receive.
    pub fn next_id(&self) -> AssetId {
        AssetId::from_index(self.handles.len())
    }

    /// The number of registered handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Iterates over `(id, handle)` pairs in increasing id order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetId, Handle<T>)> + '_ {
        self.handles
            .iter()
            .enumerate()
            .map(|(index, handle)| (AssetId::from_index(index), *handle))
    }
}

/// The identity registry of one save session, one table per asset kind.
#[derive(Default)]
pub struct Dependency {
    pub(crate) textures: DependencyTable<Texture>,
    pub(crate) geometries: DependencyTable<Geometry>,
    pub(crate) materials: DependencyTable<Material>,
    pub(crate) effects: DependencyTable<Effect>,
    pub(crate) nodes: DependencyTable<Node>,
}

impl Dependency {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table of kind `T`.
    pub fn table<T: Tracked>(&self) -> &DependencyTable<T> {
        T::dependencies(self)
    }

    /// Returns `true` if this object instance already has an id.
    pub fn has_dependency<T: Tracked>(&self, handle: Handle<T>) -> bool {
        T::dependencies(self).has(handle)
    }

    /// Assigns the next id of the object's kind, or returns its existing id.
    pub fn register_dependency<T: Tracked>(&mut self, handle: Handle<T>) -> AssetId {
        let (id, added) = T::dependencies_mut(self).register(handle);
        if added {
            log::trace!("Registered {} {:?} as {}", T::KIND, handle, id);
        }
        id
    }

    /// Returns the id of an object that must already be registered.
    ///
    /// Encoders use this to resolve the ids of the objects they reference.
    pub fn dependency_id<T: Tracked>(&self, handle: Handle<T>) -> Result<AssetId> {
        T::dependencies(self)
            .id_of(handle)
            .ok_or(Error::UnregisteredDependency {
                kind: T::KIND,
                index: handle.index(),
            })
    }

    /// Type-erased [`Dependency::has_dependency`].
    pub fn has_ref(&self, asset: AssetRef) -> bool {
        self.id_of_ref(asset).is_some()
    }

    /// Type-erased lookup of an object's id.
    pub fn id_of_ref(&self, asset: AssetRef) -> Option<AssetId> {
        match asset {
            AssetRef::Texture(h) => self.textures.id_of(h),
            AssetRef::Geometry(h) => self.geometries.id_of(h),
            AssetRef::Material(h) => self.materials.id_of(h),
            AssetRef::Effect(h) => self.effects.id_of(h),
            AssetRef::SubScene(h) => self.nodes.id_of(h),
        }
    }

    /// Type-erased [`Dependency::register_dependency`].
    pub fn register_ref(&mut self, asset: AssetRef) -> AssetId {
        match asset {
            AssetRef::Texture(h) => self.register_dependency(h),
            AssetRef::Geometry(h) => self.register_dependency(h),
            AssetRef::Material(h) => self.register_dependency(h),
            AssetRef::Effect(h) => self.register_dependency(h),
            AssetRef::SubScene(h) => self.register_dependency(h),
        }
    }

    /// Returns the object registered under `id` in the `kind` namespace.
    pub fn handle_at(&self, kind: AssetKind, id: AssetId) -> Option<AssetRef> {
        match kind {
            AssetKind::Texture => self.textures.handle_of(id).map(AssetRef::Texture),
            AssetKind::Geometry => self.geometries.handle_of(id).map(AssetRef::Geometry),
            AssetKind::Material => self.materials.handle_of(id).map(AssetRef::Material),
            AssetKind::Effect => self.effects.handle_of(id).map(AssetRef::Effect),
            AssetKind::SubScene => self.nodes.handle_of(id).map(AssetRef::SubScene),
        }
    }

    /// The id the next new object of `kind` will receive.
    pub fn next_id(&self, kind: AssetKind) -> AssetId {
        AssetId::from_index(self.len(kind))
    }

    /// The number of objects registered under `kind`.
    pub fn len(&self, kind: AssetKind) -> usize {
        match kind {
            AssetKind::Texture => self.textures.len(),
            AssetKind::Geometry => self.geometries.len(),
            AssetKind::Material => self.materials.len(),
            AssetKind::Effect => self.effects.len(),
            AssetKind::SubScene => self.nodes.len(),
        }
    }

    /// The number of objects registered across every kind.
    pub fn total_len(&self) -> usize {
        AssetKind::SERIALIZATION_ORDER
            .iter()
            .map(|kind| self.len(*kind))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{AssetLibrary, TextureFormat};

    #[test]
    fn test_ids_restart_per_kind_and_are_idempotent() {
        let mut library = AssetLibrary::new();
        let g1 = library.add(Geometry::new("g1"));
        let t1 = library.add(Texture::new("t1", 1, 1, TextureFormat::R8));

        let mut session = Dependency::new();
        assert_eq!(session.register_dependency(g1), AssetId(0));
        assert_eq!(session.register_dependency(t1), AssetId(0));
        assert_eq!(session.register_dependency(g1), AssetId(0));
        assert_eq!(session.len(AssetKind::Geometry), 1);
    }

    #[test]
    fn test_identity_not_value_decides() {
        let mut library = AssetLibrary::new();
        let a = library.add(Geometry::new("same").with_indices(vec![0, 1, 2]));
        let b = library.add(Geometry::new("same").with_indices(vec![0, 1, 2]));

        let mut session = Dependency::new();
        let id_a = session.register_dependency(a);
        let id_b = session.register_dependency(b);
        assert_ne!(id_a, id_b);
    }

    #[test]
    fn test_ids_follow_first_registration_order() {
        let mut library = AssetLibrary::new();
        let handles: Vec<_> = (0..5)
            .map(|i| library.add(Material::new(format!("m{i}"))))
            .collect();

        let mut session = Dependency::new();
        for handle in handles.iter().rev() {
            session.register_dependency(*handle);
        }
        let ids: Vec<_> = session.table::<Material>().iter().collect();
        for (position, (id, handle)) in ids.iter().enumerate() {
            assert_eq!(*id, AssetId(position as u32));
            assert_eq!(*handle, handles[4 - position]);
        }
    }

    #[test]
    fn test_dependency_id_requires_registration() {
        let mut library = AssetLibrary::new();
        let node = library.add(Node::new("root"));
        let session = Dependency::new();
        assert!(!session.has_dependency(node));
        assert!(matches!(
            session.dependency_id(node),
            Err(Error::UnregisteredDependency {
                kind: AssetKind::SubScene,
                ..
            })
        ));
    }

    #[test]
    fn test_type_erased_accessors_agree() {
        let mut library = AssetLibrary::new();
        let effect = library.add(Effect::new("fx"));
        let mut session = Dependency::new();

        let id = session.register_ref(AssetRef::Effect(effect));
        assert!(session.has_dependency(effect));
        assert_eq!(session.id_of_ref(effect.into()), Some(id));
        assert_eq!(
            session.handle_at(AssetKind::Effect, id),
            Some(AssetRef::Effect(effect))
        );
        assert_eq!(session.next_id(AssetKind::Effect), AssetId(1));
        assert_eq!(session.total_len(), 1);
    }
}
