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

//! The save driver: closes the registered set and runs every writer once.

use std::collections::VecDeque;
use tessera_core::asset::{AssetId, AssetKind, RecordKey, SerializedRecord};
use tessera_core::{Error, Options, Result, WriterOptions};
use tessera_data::{AssetLibrary, AssetRef, Dependency};
use tessera_lanes::writer_lane::{write_effect, write_node};
use tessera_lanes::{SubDependencies, WriteContext, WriterRegistry};

/// Registers everything structurally reachable from `roots`.
///
/// Structural edges are the ones the library knows about (material to
/// textures, node to children and surface). Returns the number of newly
/// registered objects.
pub(super) fn close_structural(
    dependencies: &mut Dependency,
    library: &AssetLibrary,
    roots: impl IntoIterator<Item = AssetRef>,
) -> Result<usize> {
    let mut queue: VecDeque<AssetRef> = roots.into_iter().collect();
    let mut added = 0;
    while let Some(asset) = queue.pop_front() {
        for dependency in library.dependencies_of(asset)? {
            if !dependencies.has_ref(dependency) {
                dependencies.register_ref(dependency);
                queue.push_back(dependency);
                added += 1;
            }
        }
    }
    Ok(added)
}

/// Every registered object, in kind order then id order.
fn registered_assets(dependencies: &Dependency) -> Vec<AssetRef> {
    AssetKind::SERIALIZATION_ORDER
        .iter()
        .flat_map(|kind| {
            (0..dependencies.len(*kind))
                .filter_map(move |index| dependencies.handle_at(*kind, AssetId::from_index(index)))
        })
        .collect()
}

pub(super) struct SaveDriver<'a> {
    pub writers: &'a WriterRegistry,
    pub library: &'a AssetLibrary,
    pub options: &'a Options,
    pub writer_options: &'a WriterOptions,
}

impl SaveDriver<'_> {
    pub fn run(&self, dependencies: &mut Dependency) -> Result<Vec<SerializedRecord>> {
        let roots = registered_assets(dependencies);
        let discovered = close_structural(dependencies, self.library, roots)?;
        log::debug!(
            "Structural discovery added {} assets ({} registered)",
            discovered,
            dependencies.total_len()
        );

        let mut per_kind: [Vec<SerializedRecord>; 5] = Default::default();

        // Writers may surface sub-dependencies of any kind, including kinds
        // already drained in this pass, so repeat until nothing new appears.
        // The cursor of a kind only moves forward, so no id is written twice.
        loop {
            let mut progressed = false;
            for kind in AssetKind::SERIALIZATION_ORDER {
                while per_kind[kind.order()].len() < dependencies.len(kind) {
                    let id = AssetId::from_index(per_kind[kind.order()].len());
                    let record = self.write_one(dependencies, kind, id)?;
                    log::trace!(
                        "Wrote {} (version {}, {} bytes)",
                        record.key(),
                        record.version,
                        record.payload.len()
                    );
                    per_kind[kind.order()].push(record);
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        Ok(per_kind.into_iter().flatten().collect())
    }

    fn write_one(
        &self,
        dependencies: &mut Dependency,
        kind: AssetKind,
        id: AssetId,
    ) -> Result<SerializedRecord> {
        let asset = dependencies
            .handle_at(kind, id)
            .ok_or(Error::UnknownReference { kind, id })?;

        let (record, requests) = {
            let dependencies: &Dependency = dependencies;
            let ctx = WriteContext {
                dependencies,
                library: self.library,
                options: self.options,
                writer_options: self.writer_options,
            };
            match asset {
                AssetRef::Texture(h) => (
                    self.writers.write_texture(&ctx, self.library.get(h)?, id)?,
                    Vec::new(),
                ),
                AssetRef::Material(h) => (
                    self.writers.write_material(&ctx, self.library.get(h)?, id)?,
                    Vec::new(),
                ),
                AssetRef::Effect(h) => (write_effect(&ctx, self.library.get(h)?, id)?, Vec::new()),
                AssetRef::SubScene(h) => (write_node(&ctx, self.library.get(h)?, id)?, Vec::new()),
                AssetRef::Geometry(h) => {
                    let mut sub = SubDependencies::new(dependencies);
                    let mut record =
                        self.writers
                            .write_geometry(&ctx, self.library.get(h)?, id, &mut sub)?;
                    record.extra_dependencies = sub.keys();
                    (record, sub.into_requests())
                }
            }
        };

        let expected = RecordKey::new(kind, id);
        if record.key() != expected {
            return Err(Error::Encode(format!(
                "the writer of {} produced a record for {}",
                expected,
                record.key()
            )));
        }

        if kind != AssetKind::Geometry && !record.extra_dependencies.is_empty() {
            log::error!(
                "The writer of {} declared {} extra dependencies",
                expected,
                record.extra_dependencies.len()
            );
            return Err(Error::Encode(format!(
                "only geometry records may carry extra dependencies, {} has {}",
                expected,
                record.extra_dependencies.len()
            )));
        }

        self.fold(dependencies, requests)?;
        Ok(record)
    }

    /// Registers a writer's requests in request order and closes them.
    fn fold(&self, dependencies: &mut Dependency, requests: Vec<(AssetRef, AssetId)>) -> Result<()> {
        let mut added = Vec::new();
        for (asset, reserved) in requests {
            let known = dependencies.has_ref(asset);
            let assigned = dependencies.register_ref(asset);
            // Reservations are computed from this same registry.
            debug_assert_eq!(assigned, reserved, "{} reservation drifted", asset.kind());
            if !known {
                added.push(asset);
            }
        }
        if !added.is_empty() {
            log::debug!("Folded {} sub-dependencies into the pass", added.len());
        }
        close_structural(dependencies, self.library, added)?;
        Ok(())
    }
}
