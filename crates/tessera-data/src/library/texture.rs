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
use tessera_core::asset::{Asset, AssetKind};

/// The pixel layout of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureFormat {
    /// 8-bit RGBA.
    #[default]
    Rgba8,
    /// 8-bit RGB.
    Rgb8,
    /// 8-bit single channel.
    R8,
    /// 32-bit float RGBA.
    Rgba32Float,
}

impl TextureFormat {
    /// The size of one pixel in bytes.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::Rgba8 => 4,
            TextureFormat::Rgb8 => 3,
            TextureFormat::R8 => 1,
            TextureFormat::Rgba32Float => 16,
        }
    }
}

/// A two-dimensional texture and its pixels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Texture {
    /// A descriptive name.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// The pixel layout of `data`.
    pub format: TextureFormat,
    /// Tightly packed rows of pixels. May be empty for a header-only texture.
    pub data: Vec<u8>,
}

impl Asset for Texture {
    const KIND: AssetKind = AssetKind::Texture;
}

impl Texture {
    /// Creates a texture filled with zeroed pixels.
    pub fn new(name: impl Into<String>, width: u32, height: u32, format: TextureFormat) -> Self {
        let size = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            name: name.into(),
            width,
            height,
            format,
            data: vec![0; size],
        }
    }

    /// Returns `true` if the texture carries its pixel data.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }
}
