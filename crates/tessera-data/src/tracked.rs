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

use crate::arena::{Arena, Handle};
use crate::dependency::{Dependency, DependencyTable};
use crate::library::{AssetLibrary, AssetRef, Geometry, Material, Node, Texture};
use crate::reference::{ReferenceTable, References};
use tessera_core::asset::Asset;
use tessera_core::effect::Effect;

/// An asset type with its own arena, dependency table and reference table.
///
/// This is the static dispatch behind the per-kind accessor sets: one
/// implementation per asset kind routes generic calls to the right table.
pub trait Tracked: Asset + Sized {
    /// The arena holding this kind in a library.
    fn arena(library: &AssetLibrary) -> &Arena<Self>;
    /// The arena holding this kind in a library, mutably.
    fn arena_mut(library: &mut AssetLibrary) -> &mut Arena<Self>;
    /// The save-side table of this kind.
    fn dependencies(session: &Dependency) -> &DependencyTable<Self>;
    /// The save-side table of this kind, mutably.
    fn dependencies_mut(session: &mut Dependency) -> &mut DependencyTable<Self>;
    /// The load-side table of this kind.
    fn references(session: &References) -> &ReferenceTable<Self>;
    /// The load-side table of this kind, mutably.
    fn references_mut(session: &mut References) -> &mut ReferenceTable<Self>;
    /// Erases the handle type.
    fn to_ref(handle: Handle<Self>) -> AssetRef;
}

macro_rules! impl_tracked {
    ($ty:ty, $field:ident, $variant:ident) => {
        impl Tracked for $ty {
            fn arena(library: &AssetLibrary) -> &Arena<Self> {
                &library.$field
            }
            fn arena_mut(library: &mut AssetLibrary) -> &mut Arena<Self> {
                &mut library.$field
            }
            fn dependencies(session: &Dependency) -> &DependencyTable<Self> {
                &session.$field
            }
            fn dependencies_mut(session: &mut Dependency) -> &mut DependencyTable<Self> {
                &mut session.$field
            }
            fn references(session: &References) -> &ReferenceTable<Self> {
                &session.$field
            }
            fn references_mut(session: &mut References) -> &mut ReferenceTable<Self> {
                &mut session.$field
            }
            fn to_ref(handle: Handle<Self>) -> AssetRef {
                AssetRef::$variant(handle)
            }
        }

        impl From<Handle<$ty>> for AssetRef {
            fn from(handle: Handle<$ty>) -> Self {
                AssetRef::$variant(handle)
            }
        }
    };
}

impl_tracked!(Texture, textures, Texture);
impl_tracked!(Geometry, geometries, Geometry);
impl_tracked!(Material, materials, Material);
impl_tracked!(Effect, effects, Effect);
impl_tracked!(Node, nodes, SubScene);
