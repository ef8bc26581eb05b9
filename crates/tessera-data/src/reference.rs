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

//! The load-side reference registry.
//!
//! A [`References`] session maps the ids read from a stream back to the objects
//! reconstructed from it. An id goes through three states: unknown, pending
//! (declared by a record but not yet reconstructed) and materialized.

use crate::arena::Handle;
use crate::library::{Geometry, Material, Node, Texture};
use crate::tracked::Tracked;
use ahash::AHashMap;
use tessera_core::asset::{AssetId, AssetKind, RecordKey};
use tessera_core::effect::Effect;
use tessera_core::{Error, Result};

/// The load state of one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceState {
    /// No record has declared this id.
    Unknown,
    /// A record declares this id but the object is not reconstructed yet.
    Pending,
    /// The object is reconstructed and bound to the id.
    Materialized,
}

/// Id to object bindings for one asset kind.
pub struct ReferenceTable<T> {
    slots: AHashMap<AssetId, Option<Handle<T>>>,
}

impl<T> Default for ReferenceTable<T> {
    fn default() -> Self {
        Self {
            slots: AHashMap::new(),
        }
    }
}

impl<T> ReferenceTable<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an id as pending. Declaring the same id twice is an error.
    pub fn declare(&mut self, kind: AssetKind, id: AssetId) -> Result<()> {
        if self.slots.contains_key(&id) {
            return Err(Error::DuplicateRecord {
                key: RecordKey::new(kind, id),
            });
        }
        self.slots.insert(id, None);
        Ok(())
    }

    /// Binds an id to a reconstructed object.
    ///
    /// An undeclared id is declared implicitly. Binding an already
    /// materialized id is an error.
    pub fn register(&mut self, kind: AssetKind, id: AssetId, handle: Handle<T>) -> Result<()> {
        match self.slots.get_mut(&id) {
            Some(Some(_)) => Err(Error::DuplicateReference { kind, id }),
            Some(slot) => {
                *slot = Some(handle);
                Ok(())
            }
            None => {
                self.slots.insert(id, Some(handle));
                Ok(())
            }
        }
    }

    /// Returns the object bound to an id.
    ///
    /// `Ok(None)` means the id is pending. An id no record declared is an error.
    pub fn get(&self, kind: AssetKind, id: AssetId) -> Result<Option<Handle<T>>> {
        self.slots
            .get(&id)
            .copied()
            .ok_or(Error::UnknownReference { kind, id })
    }

    /// The state of an id.
    pub fn state(&self, id: AssetId) -> ReferenceState {
        match self.slots.get(&id) {
            None => ReferenceState::Unknown,
            Some(None) => ReferenceState::Pending,
            Some(Some(_)) => ReferenceState::Materialized,
        }
    }

    /// Returns `true` if a record declared this id.
    pub fn exists(&self, id: AssetId) -> bool {
        self.slots.contains_key(&id)
    }

    /// The number of known ids.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no id is known.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The reference registry of one load session.
#[derive(Default)]
pub struct References {
    pub(crate) textures: ReferenceTable<Texture>,
    pub(crate) geometries: ReferenceTable<Geometry>,
    pub(crate) materials: ReferenceTable<Material>,
    pub(crate) effects: ReferenceTable<Effect>,
    pub(crate) nodes: ReferenceTable<Node>,
    loaded_root: Option<Handle<Node>>,
}

macro_rules! kind_accessors {
    ($ty:ty, $get:ident, $exist:ident, $state:ident) => {
        #[doc = concat!("Returns the `", stringify!($ty), "` bound to `id`, `None` while pending.")]
        pub fn $get(&self, id: AssetId) -> Result<Option<Handle<$ty>>> {
            self.get_reference::<$ty>(id)
        }

        #[doc = concat!("Returns `true` if a `", stringify!($ty), "` record declared `id`.")]
        pub fn $exist(&self, id: AssetId) -> bool {
            <$ty as Tracked>::references(self).exists(id)
        }

        #[doc = concat!("The load state of `", stringify!($ty), "` id `id`.")]
        pub fn $state(&self, id: AssetId) -> ReferenceState {
            <$ty as Tracked>::references(self).state(id)
        }
    };
}

impl References {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as pending in its kind namespace.
    pub fn declare(&mut self, key: RecordKey) -> Result<()> {
        match key.kind {
            AssetKind::Texture => self.textures.declare(key.kind, key.id),
            AssetKind::Geometry => self.geometries.declare(key.kind, key.id),
            AssetKind::Material => self.materials.declare(key.kind, key.id),
            AssetKind::Effect => self.effects.declare(key.kind, key.id),
            AssetKind::SubScene => self.nodes.declare(key.kind, key.id),
        }
    }

    /// The state of `key` in its kind namespace.
    pub fn state_of(&self, key: RecordKey) -> ReferenceState {
        match key.kind {
            AssetKind::Texture => self.textures.state(key.id),
            AssetKind::Geometry => self.geometries.state(key.id),
            AssetKind::Material => self.materials.state(key.id),
            AssetKind::Effect => self.effects.state(key.id),
            AssetKind::SubScene => self.nodes.state(key.id),
        }
    }

    /// Binds an id to a reconstructed object.
    pub fn register_reference<T: Tracked>(&mut self, id: AssetId, handle: Handle<T>) -> Result<()> {
        T::references_mut(self).register(T::KIND, id, handle)?;
        log::trace!("Materialized {} {} as {:?}", T::KIND, id, handle);
        Ok(())
    }

    /// Returns the object bound to an id, `None` while it is pending.
    pub fn get_reference<T: Tracked>(&self, id: AssetId) -> Result<Option<Handle<T>>> {
        T::references(self).get(T::KIND, id)
    }

    /// Returns the object bound to an id, failing unless it is materialized.
    pub fn resolve<T: Tracked>(&self, id: AssetId) -> Result<Handle<T>> {
        self.get_reference::<T>(id)?
            .ok_or(Error::UnknownReference { kind: T::KIND, id })
    }

    kind_accessors!(
        Texture,
        get_texture_reference,
        texture_reference_exist,
        texture_reference_state
    );
    kind_accessors!(
        Geometry,
        get_geometry_reference,
        geometry_reference_exist,
        geometry_reference_state
    );
    kind_accessors!(
        Material,
        get_material_reference,
        material_reference_exist,
        material_reference_state
    );
    kind_accessors!(
        Effect,
        get_effect_reference,
        effect_reference_exist,
        effect_reference_state
    );
    kind_accessors!(
        Node,
        get_subscene_reference,
        subscene_reference_exist,
        subscene_reference_state
    );

    /// The root node of the loaded scene, once loading completed.
    pub fn loaded_root(&self) -> Option<Handle<Node>> {
        self.loaded_root
    }

    /// Binds the loaded root to the node materialized under `id`.
    ///
    /// The root can only be set once.
    pub fn set_loaded_root(&mut self, id: AssetId) -> Result<Handle<Node>> {
        if self.loaded_root.is_some() {
            return Err(Error::MalformedStream(format!(
                "loaded root already set when binding sub-scene {id}"
            )));
        }
        let handle = self.resolve::<Node>(id)?;
        self.loaded_root = Some(handle);
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::AssetLibrary;

    #[test]
    fn test_state_transitions() {
        let mut library = AssetLibrary::new();
        let texture = library.add(Texture::default());
        let mut refs = References::new();
        let id = AssetId(3);

        assert_eq!(refs.texture_reference_state(id), ReferenceState::Unknown);
        assert!(matches!(
            refs.get_texture_reference(id),
            Err(Error::UnknownReference { .. })
        ));

        refs.declare(RecordKey::new(AssetKind::Texture, id)).unwrap();
        assert_eq!(refs.texture_reference_state(id), ReferenceState::Pending);
        assert!(refs.texture_reference_exist(id));
        assert_eq!(refs.get_texture_reference(id).unwrap(), None);

        refs.register_reference(id, texture).unwrap();
        assert_eq!(refs.texture_reference_state(id), ReferenceState::Materialized);
        assert_eq!(refs.get_texture_reference(id).unwrap(), Some(texture));
    }

    #[test]
    fn test_namespaces_are_per_kind() {
        let mut refs = References::new();
        refs.declare(RecordKey::new(AssetKind::Geometry, AssetId(0)))
            .unwrap();
        refs.declare(RecordKey::new(AssetKind::Material, AssetId(0)))
            .unwrap();
        assert!(refs.geometry_reference_exist(AssetId(0)));
        assert!(!refs.texture_reference_exist(AssetId(0)));
        assert!(!refs.effect_reference_exist(AssetId(0)));
    }

    #[test]
    fn test_duplicate_declaration_and_registration_fail() {
        let mut library = AssetLibrary::new();
        let first = library.add(Material::new("a"));
        let second = library.add(Material::new("b"));
        let mut refs = References::new();
        let key = RecordKey::new(AssetKind::Material, AssetId(0));

        refs.declare(key).unwrap();
        assert!(matches!(
            refs.declare(key),
            Err(Error::DuplicateRecord { .. })
        ));

        refs.register_reference(AssetId(0), first).unwrap();
        assert!(matches!(
            refs.register_reference(AssetId(0), second),
            Err(Error::DuplicateReference { .. })
        ));
    }

    #[test]
    fn test_register_declares_implicitly() {
        let mut library = AssetLibrary::new();
        let effect = library.add(Effect::new("fx"));
        let mut refs = References::new();
        refs.register_reference(AssetId(7), effect).unwrap();
        assert_eq!(refs.get_effect_reference(AssetId(7)).unwrap(), Some(effect));
    }

    #[test]
    fn test_loaded_root_is_set_once() {
        let mut library = AssetLibrary::new();
        let root = library.add(Node::new("root"));
        let mut refs = References::new();
        assert_eq!(refs.loaded_root(), None);
        assert!(refs.set_loaded_root(AssetId(0)).is_err());

        refs.register_reference(AssetId(0), root).unwrap();
        assert_eq!(refs.set_loaded_root(AssetId(0)).unwrap(), root);
        assert_eq!(refs.loaded_root(), Some(root));
        assert!(refs.set_loaded_root(AssetId(0)).is_err());
    }
}
