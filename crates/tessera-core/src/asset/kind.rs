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

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of an asset.
///
/// Each kind owns a separate id namespace and its own encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetKind {
    /// Pixel data sampled by materials.
    Texture,
    /// Vertex streams and indices.
    Geometry,
    /// Named surface properties, possibly referencing textures.
    Material,
    /// Named techniques made of rendering passes.
    Effect,
    /// A scene node and the assets it references.
    SubScene,
}

impl AssetKind {
    /// The fixed order in which kinds are concatenated in a serialized output.
    ///
    /// Leaves come first so a streaming reader sees referenced kinds before the
    /// kinds that reference them. This order is part of the wire contract.
    pub const SERIALIZATION_ORDER: [AssetKind; 5] = [
        AssetKind::Texture,
        AssetKind::Geometry,
        AssetKind::Material,
        AssetKind::Effect,
        AssetKind::SubScene,
    ];

    /// Returns the stable wire tag of this kind.
    pub const fn tag(self) -> u8 {
        match self {
            AssetKind::Texture => 0,
            AssetKind::Geometry => 1,
            AssetKind::Material => 2,
            AssetKind::Effect => 3,
            AssetKind::SubScene => 4,
        }
    }

    /// Resolves a wire tag back into a kind, returning `None` for unknown tags.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(AssetKind::Texture),
            1 => Some(AssetKind::Geometry),
            2 => Some(AssetKind::Material),
            3 => Some(AssetKind::Effect),
            4 => Some(AssetKind::SubScene),
            _ => None,
        }
    }

    /// Returns the position of this kind in [`AssetKind::SERIALIZATION_ORDER`].
    pub const fn order(self) -> usize {
        self.tag() as usize
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Texture => "texture",
            AssetKind::Geometry => "geometry",
            AssetKind::Material => "material",
            AssetKind::Effect => "effect",
            AssetKind::SubScene => "sub-scene",
        };
        f.write_str(name)
    }
}
