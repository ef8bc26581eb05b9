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
use crate::payload::{self, MaterialPayload, PropertyPayload, MATERIAL_VERSION};
use tessera_core::asset::{AssetId, AssetKind, SerializedRecord};
use tessera_core::Result;
use tessera_data::{Material, MaterialValue};

/// The built-in material writer.
///
/// Texture properties are written as texture ids, so every texture the
/// material uses must already be registered in the session.
pub fn write_material(
    ctx: &WriteContext<'_>,
    material: &Material,
    id: AssetId,
) -> Result<SerializedRecord> {
    let mut properties = Vec::with_capacity(material.properties.len());
    for (name, value) in &material.properties {
        let value = match *value {
            MaterialValue::Float(v) => PropertyPayload::Float(v),
            MaterialValue::Int(v) => PropertyPayload::Int(v),
            MaterialValue::Bool(v) => PropertyPayload::Bool(v),
            MaterialValue::Vec4(v) => PropertyPayload::Vec4(v),
            MaterialValue::Texture(handle) => {
                PropertyPayload::Texture(ctx.dependencies.dependency_id(handle)?)
            }
        };
        properties.push((name.clone(), value));
    }

    let payload = MaterialPayload {
        name: material.name.clone(),
        properties,
    };
    Ok(SerializedRecord::new(
        AssetKind::Material,
        id,
        MATERIAL_VERSION,
        payload::encode(&payload)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Error, Options, WriterOptions};
    use tessera_data::{AssetLibrary, Dependency, Texture, TextureFormat};

    #[test]
    fn test_textures_must_be_registered_first() {
        let mut library = AssetLibrary::new();
        let albedo = library.add(Texture::new("albedo", 1, 1, TextureFormat::Rgba8));
        let material = Material::new("brick").with("albedo_map", MaterialValue::Texture(albedo));
        let mut dependencies = Dependency::new();
        let options = Options::default();
        let writer_options = WriterOptions::default();

        let ctx = WriteContext {
            dependencies: &dependencies,
            library: &library,
            options: &options,
            writer_options: &writer_options,
        };
        assert!(matches!(
            write_material(&ctx, &material, AssetId(0)),
            Err(Error::UnregisteredDependency {
                kind: AssetKind::Texture,
                ..
            })
        ));

        dependencies.register_dependency(albedo);
        let ctx = WriteContext {
            dependencies: &dependencies,
            library: &library,
            options: &options,
            writer_options: &writer_options,
        };
        let record = write_material(&ctx, &material, AssetId(0)).unwrap();
        assert_eq!(record.version, MATERIAL_VERSION);
        assert!(record.extra_dependencies.is_empty());
    }
}
