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

//! The agent responsible for scene graph serialization.
//!
//! This agent is the entry point for every save and load. It holds the shared
//! [`WriterRegistry`], a [`DecoderRegistry`] and a registry of
//! [`ArchiveStrategy`] lanes, and maps a [`SerializationGoal`] to the lane that
//! frames the records.

mod load;
mod save;

use std::collections::HashMap;
use std::sync::Arc;
use tessera_core::archive::{
    ArchiveFile, ArchiveHeader, HeaderError, SceneArchive, SerializationGoal,
};
use tessera_core::asset::{AssetId, AssetKind, RecordKey, SerializedRecord};
use tessera_core::{Options, Result, WriterOptions};
use tessera_data::{AssetLibrary, Dependency, Handle, Node, References};
use tessera_lanes::reader_lane::DecodedAsset;
use tessera_lanes::{
    ArchiveStrategy, BinaryArchiveLane, CompressedArchiveLane, DecoderRegistry, RonArchiveLane,
    WriterRegistry,
};

/// An error that can occur within the `SerializationAgent`.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// No lane is registered under the strategy id of the archive.
    #[error("no archive strategy registered under '{0}'")]
    StrategyNotFound(String),
    /// The archive header is invalid or corrupted.
    #[error("invalid archive header: {0}")]
    InvalidHeader(#[from] HeaderError),
    /// The payload does not hash to the value recorded in the header.
    #[error("archive payload does not match its recorded hash")]
    CorruptPayload,
    /// Saving or loading the record stream failed.
    #[error(transparent)]
    Serialization(#[from] tessera_core::Error),
}

/// The result of a completed load.
pub struct LoadedScene {
    /// Every asset reconstructed from the archive.
    pub library: AssetLibrary,
    /// The id to object bindings of the load session.
    pub references: References,
}

impl LoadedScene {
    /// The root node of the scene, if the archive named one.
    pub fn root(&self) -> Option<Handle<Node>> {
        self.references.loaded_root()
    }
}

/// The agent responsible for the entire scene serialization process.
pub struct SerializationAgent {
    writers: Arc<WriterRegistry>,
    decoders: DecoderRegistry,
    /// Archive lanes, keyed by their unique strategy id.
    strategies: HashMap<String, Box<dyn ArchiveStrategy>>,
}

impl SerializationAgent {
    /// Creates an agent over a configured writer registry and registers the
    /// built-in decoders and archive lanes.
    pub fn new(writers: Arc<WriterRegistry>) -> Self {
        let mut agent = Self {
            writers,
            decoders: DecoderRegistry::with_defaults(),
            strategies: HashMap::new(),
        };
        agent.register_strategy(BinaryArchiveLane::new());
        agent.register_strategy(CompressedArchiveLane::new());
        agent.register_strategy(RonArchiveLane::new());
        agent
    }

    /// Creates an agent using the built-in writers.
    pub fn with_default_writers() -> Self {
        Self::new(Arc::new(WriterRegistry::with_defaults()))
    }

    /// The writer registry used by every save.
    pub fn writers(&self) -> &WriterRegistry {
        &self.writers
    }

    /// Registers an archive lane, replacing any lane with the same id.
    pub fn register_strategy<S: ArchiveStrategy + 'static>(&mut self, strategy: S) {
        let id = strategy.strategy_id().to_string();
        if self.strategies.insert(id.clone(), Box::new(strategy)).is_some() {
            log::debug!("Replaced archive strategy '{}'", id);
        }
    }

    /// Registers the decoder of `(kind, version)` records.
    ///
    /// Needed for every custom writer producing a version the built-in
    /// decoders do not know.
    pub fn register_decoder<F>(&mut self, kind: AssetKind, version: i16, decoder: F)
    where
        F: Fn(&SerializedRecord) -> Result<DecodedAsset> + Send + Sync + 'static,
    {
        self.decoders.register(kind, version, decoder);
    }

    /// Registers a scene root in a save session and returns its id.
    ///
    /// Everything the root reaches is discovered when [`Self::serialize`] runs.
    pub fn register_scene(
        &self,
        dependencies: &mut Dependency,
        library: &AssetLibrary,
        root: Handle<Node>,
    ) -> Result<AssetId> {
        library.get(root)?;
        Ok(dependencies.register_dependency(root))
    }

    /// Serializes every object registered in `dependencies` and everything it
    /// depends on.
    ///
    /// Records are grouped by kind in [`AssetKind::SERIALIZATION_ORDER`], in
    /// increasing id order within a kind. Any error aborts the whole pass.
    pub fn serialize(
        &self,
        dependencies: &mut Dependency,
        library: &AssetLibrary,
        options: &Options,
        writer_options: &WriterOptions,
    ) -> Result<Vec<SerializedRecord>> {
        log::info!(
            "Serializing a session with {} registered assets",
            dependencies.total_len()
        );
        let driver = save::SaveDriver {
            writers: &self.writers,
            library,
            options,
            writer_options,
        };
        let records = driver.run(dependencies)?;
        log::info!("Serialized {} records", records.len());
        Ok(records)
    }

    /// Rebuilds a scene from a record stream.
    ///
    /// `root`, if given, must name a sub-scene record of the stream; it becomes
    /// the loaded root once every reference is resolved.
    pub fn deserialize(
        &self,
        records: &[SerializedRecord],
        root: Option<RecordKey>,
    ) -> Result<(AssetLibrary, References)> {
        log::info!("Deserializing {} records", records.len());
        load::run(&self.decoders, records, root)
    }

    /// Saves the scene under `root` as a framed archive, encoded for `goal`.
    pub fn save_scene(
        &self,
        library: &AssetLibrary,
        root: Handle<Node>,
        goal: SerializationGoal,
        options: &Options,
        writer_options: &WriterOptions,
    ) -> Result<Vec<u8>, AgentError> {
        let mut dependencies = Dependency::new();
        let root_id = self.register_scene(&mut dependencies, library, root)?;
        let records = self.serialize(&mut dependencies, library, options, writer_options)?;
        let archive = SceneArchive {
            root: Some(RecordKey::new(AssetKind::SubScene, root_id)),
            records,
        };

        let strategy = self.strategy_for(goal)?;
        let payload = strategy.encode(&archive)?;
        let header = ArchiveHeader::new(
            strategy.strategy_id(),
            payload.len() as u64,
            *blake3::hash(&payload).as_bytes(),
        )?;
        log::debug!(
            "Framed {} payload bytes with '{}'",
            payload.len(),
            strategy.strategy_id()
        );
        Ok(ArchiveFile { header, payload }.to_bytes())
    }

    /// Loads a framed archive produced by [`Self::save_scene`].
    pub fn load_scene(&self, bytes: &[u8]) -> Result<LoadedScene, AgentError> {
        let file = ArchiveFile::from_bytes(bytes)?;
        if blake3::hash(&file.payload).as_bytes() != &file.header.payload_hash {
            log::error!("Archive payload hash mismatch");
            return Err(AgentError::CorruptPayload);
        }

        let strategy_id = file.header.strategy()?;
        let strategy = self
            .strategies
            .get(strategy_id)
            .ok_or_else(|| AgentError::StrategyNotFound(strategy_id.to_string()))?;
        let archive = strategy.decode(&file.payload)?;
        let (library, references) = self.deserialize(&archive.records, archive.root)?;
        Ok(LoadedScene {
            library,
            references,
        })
    }

    fn strategy_for(&self, goal: SerializationGoal) -> Result<&dyn ArchiveStrategy, AgentError> {
        let id = match goal {
            SerializationGoal::FastestLoad | SerializationGoal::LongTermStability => {
                BinaryArchiveLane::STRATEGY_ID
            }
            SerializationGoal::SmallestFileSize => CompressedArchiveLane::STRATEGY_ID,
            SerializationGoal::HumanReadableDebug => RonArchiveLane::STRATEGY_ID,
        };
        self.strategies
            .get(id)
            .map(|strategy| &**strategy)
            .ok_or_else(|| AgentError::StrategyNotFound(id.to_string()))
    }
}

impl Default for SerializationAgent {
    fn default() -> Self {
        Self::with_default_writers()
    }
}
