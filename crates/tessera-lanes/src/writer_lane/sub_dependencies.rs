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

use tessera_core::asset::{AssetId, AssetKind, RecordKey};
use tessera_data::{AssetRef, Dependency, Geometry, Handle};

/// Collects the sub-resources a writer discovers while encoding one object.
///
/// Writers must not mutate the identity registry, so a request only *reserves*
/// an id: an object already registered keeps its id, a new object gets the id
/// the registry will hand out once the driver registers the requests in order.
pub struct SubDependencies<'a> {
    dependencies: &'a Dependency,
    requests: Vec<(AssetRef, AssetId)>,
}

impl<'a> SubDependencies<'a> {
    /// Creates an empty accumulator over the session's registry.
    pub fn new(dependencies: &'a Dependency) -> Self {
        Self {
            dependencies,
            requests: Vec::new(),
        }
    }

    /// Requests an object and returns the id it has or will have.
    ///
    /// Requesting the same object twice returns the same id.
    pub fn request(&mut self, asset: AssetRef) -> AssetId {
        if let Some(id) = self.dependencies.id_of_ref(asset) {
            self.remember(asset, id);
            return id;
        }
        if let Some((_, id)) = self.requests.iter().find(|(requested, _)| *requested == asset) {
            return *id;
        }
        let id = AssetId::from_index(
            self.dependencies.len(asset.kind()) + self.pending_count(asset.kind()),
        );
        self.requests.push((asset, id));
        id
    }

    /// Requests a geometry, typically a morph target.
    pub fn request_geometry(&mut self, geometry: Handle<Geometry>) -> AssetId {
        self.request(AssetRef::Geometry(geometry))
    }

    /// Every request, in the order it was first made, with its reserved id.
    pub fn requests(&self) -> &[(AssetRef, AssetId)] {
        &self.requests
    }

    /// The record keys of every request, in request order.
    pub fn keys(&self) -> Vec<RecordKey> {
        self.requests
            .iter()
            .map(|(asset, id)| RecordKey::new(asset.kind(), *id))
            .collect()
    }

    /// Returns `true` if nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Consumes the accumulator, returning its requests.
    pub fn into_requests(self) -> Vec<(AssetRef, AssetId)> {
        self.requests
    }

    fn remember(&mut self, asset: AssetRef, id: AssetId) {
        if !self.requests.iter().any(|(requested, _)| *requested == asset) {
            self.requests.push((asset, id));
        }
    }

    /// Requests of `kind` that are not registered yet.
    fn pending_count(&self, kind: AssetKind) -> usize {
        self.requests
            .iter()
            .filter(|(asset, _)| asset.kind() == kind && !self.dependencies.has_ref(*asset))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_data::AssetLibrary;

    #[test]
    fn test_reservations_follow_registry_and_request_order() {
        let mut library = AssetLibrary::new();
        let known = library.add(Geometry::new("known"));
        let first = library.add(Geometry::new("first"));
        let second = library.add(Geometry::new("second"));

        let mut dependencies = Dependency::new();
        dependencies.register_dependency(known);

        let mut sub = SubDependencies::new(&dependencies);
        assert_eq!(sub.request_geometry(first), AssetId(1));
        assert_eq!(sub.request_geometry(known), AssetId(0));
        assert_eq!(sub.request_geometry(second), AssetId(2));
        assert_eq!(sub.request_geometry(first), AssetId(1));

        assert_eq!(
            sub.keys(),
            vec![
                RecordKey::new(AssetKind::Geometry, AssetId(1)),
                RecordKey::new(AssetKind::Geometry, AssetId(0)),
                RecordKey::new(AssetKind::Geometry, AssetId(2)),
            ]
        );
    }

    #[test]
    fn test_requests_do_not_touch_the_registry() {
        let mut library = AssetLibrary::new();
        let target = library.add(Geometry::new("target"));
        let dependencies = Dependency::new();

        let mut sub = SubDependencies::new(&dependencies);
        sub.request_geometry(target);
        assert!(!dependencies.has_dependency(target));
        assert_eq!(sub.requests().len(), 1);
    }
}
