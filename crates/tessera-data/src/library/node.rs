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

use super::{Geometry, Layouts, Material};
use crate::arena::Handle;
use tessera_core::asset::{Asset, AssetKind};
use tessera_core::effect::Effect;

/// A scene node: a named, layered container of children and surface assets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// A descriptive name.
    pub name: String,
    /// The layout groups this node belongs to.
    pub layouts: Layouts,
    /// Child nodes, in order.
    pub children: Vec<Handle<Node>>,
    /// The geometry drawn by this node.
    pub geometry: Option<Handle<Geometry>>,
    /// The material applied to `geometry`.
    pub material: Option<Handle<Material>>,
    /// The effect used to draw `geometry`.
    pub effect: Option<Handle<Effect>>,
}

impl Asset for Node {
    const KIND: AssetKind = AssetKind::SubScene;
}

impl Node {
    /// Creates an empty node in the default layout group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the layout groups.
    pub fn with_layouts(mut self, layouts: Layouts) -> Self {
        self.layouts = layouts;
        self
    }

    /// Appends a child.
    pub fn with_child(mut self, child: Handle<Node>) -> Self {
        self.children.push(child);
        self
    }

    /// Attaches a surface: geometry, material and effect.
    pub fn with_surface(
        mut self,
        geometry: Handle<Geometry>,
        material: Handle<Material>,
        effect: Handle<Effect>,
    ) -> Self {
        self.geometry = Some(geometry);
        self.material = Some(material);
        self.effect = Some(effect);
        self
    }
}
