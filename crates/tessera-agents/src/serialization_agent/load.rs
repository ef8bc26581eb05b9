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

//! The two-phase loader.
//!
//! Phase one decodes every record and declares its id. Phase two checks that
//! every reference names a declared id, allocates the objects, binds them to
//! their ids and only then patches the references, so forward references and
//! cycles need no deferred bookkeeping.

use tessera_core::asset::{AssetId, AssetKind, RecordKey, SerializedRecord};
use tessera_core::effect::Effect;
use tessera_core::{Error, Result};
use tessera_data::{
    AssetLibrary, Geometry, Handle, Material, MaterialValue, Node, ReferenceState, References,
    Texture,
};
use tessera_lanes::{DecodedAsset, DecoderRegistry, NodeLinks};

/// A reference field left empty at allocation time.
enum Patch {
    MorphTargets(Handle<Geometry>, Vec<AssetId>),
    Textures(Handle<Material>, Vec<(String, AssetId)>),
    Links(Handle<Node>, NodeLinks),
}

pub(super) fn run(
    decoders: &DecoderRegistry,
    records: &[SerializedRecord],
    root: Option<RecordKey>,
) -> Result<(AssetLibrary, References)> {
    let mut references = References::new();

    let mut decoded = Vec::with_capacity(records.len());
    for record in records {
        references.declare(record.key())?;
        decoded.push((record, decoders.decode(record)?));
    }
    log::debug!("Decoded {} records", decoded.len());

    for (record, asset) in &decoded {
        let outgoing = asset
            .references()
            .into_iter()
            .chain(record.extra_dependencies.iter().copied());
        for key in outgoing {
            ensure_declared(&references, key, record.key())?;
        }
    }
    if let Some(root) = root {
        if root.kind != AssetKind::SubScene {
            return Err(Error::MalformedStream(format!(
                "the root {} is not a sub-scene",
                root
            )));
        }
        ensure_declared(&references, root, root)?;
    }

    let mut library = AssetLibrary::new();
    let mut patches = Vec::new();
    for (record, asset) in decoded {
        let id = record.id;
        match asset {
            DecodedAsset::Texture(texture) => {
                let handle = library.add(texture);
                references.register_reference(id, handle)?;
            }
            DecodedAsset::Effect(effect) => {
                let handle = library.add(effect);
                references.register_reference(id, handle)?;
            }
            DecodedAsset::Geometry {
                geometry,
                morph_targets,
            } => {
                let handle = library.add(geometry);
                references.register_reference(id, handle)?;
                patches.push(Patch::MorphTargets(handle, morph_targets));
            }
            DecodedAsset::Material { material, textures } => {
                let handle = library.add(material);
                references.register_reference(id, handle)?;
                patches.push(Patch::Textures(handle, textures));
            }
            DecodedAsset::SubScene { node, links } => {
                let handle = library.add(node);
                references.register_reference(id, handle)?;
                patches.push(Patch::Links(handle, links));
            }
        }
    }

    for patch in patches {
        apply(&mut library, &references, patch)?;
    }

    if let Some(root) = root {
        references.set_loaded_root(root.id)?;
    }
    log::info!("Loaded {} assets", records.len());
    Ok((library, references))
}

fn ensure_declared(references: &References, key: RecordKey, from: RecordKey) -> Result<()> {
    if references.state_of(key) == ReferenceState::Unknown {
        log::error!("{} references {}, which the stream never declares", from, key);
        return Err(Error::UnknownReference {
            kind: key.kind,
            id: key.id,
        });
    }
    Ok(())
}

fn apply(library: &mut AssetLibrary, references: &References, patch: Patch) -> Result<()> {
    match patch {
        Patch::MorphTargets(handle, targets) => {
            let targets = targets
                .into_iter()
                .map(|id| references.resolve::<Geometry>(id))
                .collect::<Result<Vec<_>>>()?;
            library.get_mut(handle)?.morph_targets = targets;
        }
        Patch::Textures(handle, textures) => {
            for (name, id) in textures {
                let texture = references.resolve::<Texture>(id)?;
                library
                    .get_mut(handle)?
                    .set(name, MaterialValue::Texture(texture));
            }
        }
        Patch::Links(handle, links) => {
            let children = links
                .children
                .into_iter()
                .map(|id| references.resolve::<Node>(id))
                .collect::<Result<Vec<_>>>()?;
            let geometry = links
                .geometry
                .map(|id| references.resolve::<Geometry>(id))
                .transpose()?;
            let material = links
                .material
                .map(|id| references.resolve::<Material>(id))
                .transpose()?;
            let effect = links
                .effect
                .map(|id| references.resolve::<Effect>(id))
                .transpose()?;

            let node = library.get_mut(handle)?;
            node.children = children;
            node.geometry = geometry;
            node.material = material;
            node.effect = effect;
        }
    }
    Ok(())
}
