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

use super::WriteContext;
use crate::payload::{self, TexturePayload, TEXTURE_VERSION};
use tessera_core::asset::{AssetId, AssetKind, SerializedRecord};
use tessera_core::Result;
use tessera_data::Texture;

/// The built-in texture writer.
///
/// Pixel data is left out when `embed_texture_data` is off, producing a
/// header-only record.
pub fn write_texture(
    ctx: &WriteContext<'_>,
    texture: &Texture,
    id: AssetId,
) -> Result<SerializedRecord> {
    let data = if ctx.writer_options.embed_texture_data {
        Some(texture.data.clone())
    } else {
        None
    };
    let payload = TexturePayload {
        name: texture.name.clone(),
        width: texture.width,
        height: texture.height,
        format: texture.format,
        data,
    };
    Ok(SerializedRecord::new(
        AssetKind::Texture,
        id,
        TEXTURE_VERSION,
        payload::encode(&payload)?,
    ))
}
