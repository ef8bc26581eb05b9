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

use super::Texture;
use crate::arena::Handle;
use std::collections::BTreeMap;
use tessera_core::asset::{Asset, AssetKind};

/// A single material property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialValue {
    /// A scalar.
    Float(f32),
    /// An integer.
    Int(i32),
    /// A boolean switch.
    Bool(bool),
    /// A color or four-component vector.
    Vec4([f32; 4]),
    /// A sampled texture.
    Texture(Handle<Texture>),
}

/// A named set of surface properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    /// A descriptive name.
    pub name: String,
    /// Properties keyed by name.
    pub properties: BTreeMap<String, MaterialValue>,
}

impl Asset for Material {
    const KIND: AssetKind = AssetKind::Material;
}

impl Material {
    /// Creates a material with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Sets a property, builder style.
    pub fn with(mut self, name: impl Into<String>, value: MaterialValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Sets a property.
    pub fn set(&mut self, name: impl Into<String>, value: MaterialValue) {
        self.properties.insert(name.into(), value);
    }

    /// Returns a property.
    pub fn get(&self, name: &str) -> Option<&MaterialValue> {
        self.properties.get(name)
    }

    /// Iterates over the referenced textures, in property name order.
    pub fn textures(&self) -> impl Iterator<Item = Handle<Texture>> + '_ {
        self.properties.values().filter_map(|value| match value {
            MaterialValue::Texture(handle) => Some(*handle),
            _ => None,
        })
    }
}
