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

use crate::arena::Handle;
use tessera_core::asset::{Asset, AssetKind};

/// One named per-vertex attribute stream.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexStream {
    /// The attribute name, e.g. `"position"`.
    pub name: String,
    /// The number of floats per vertex.
    pub size: u32,
    /// The attribute data, `size` floats per vertex.
    pub data: Vec<f32>,
}

/// Vertex streams and triangle indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    /// A descriptive name.
    pub name: String,
    /// The vertex attribute streams.
    pub streams: Vec<VertexStream>,
    /// Triangle indices into the streams.
    pub indices: Vec<u32>,
    /// Blend-shape targets.
    ///
    /// Morph targets are private to the geometry encoders: they are only
    /// registered when an encoder asks for them.
    pub morph_targets: Vec<Handle<Geometry>>,
}

impl Asset for Geometry {
    const KIND: AssetKind = AssetKind::Geometry;
}

impl Geometry {
    /// Creates an empty geometry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends a vertex stream.
    pub fn with_stream(mut self, name: impl Into<String>, size: u32, data: Vec<f32>) -> Self {
        self.streams.push(VertexStream {
            name: name.into(),
            size,
            data,
        });
        self
    }

    /// Sets the triangle indices.
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = indices;
        self
    }

    /// Adds a morph target.
    pub fn with_morph_target(mut self, target: Handle<Geometry>) -> Self {
        self.morph_targets.push(target);
        self
    }

    /// The total number of floats across all streams.
    pub fn vertex_float_count(&self) -> usize {
        self.streams.iter().map(|s| s.data.len()).sum()
    }
}
