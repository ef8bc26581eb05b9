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

//! Defines the error taxonomy shared by save and load sessions.
//!
//! Every variant is fatal for the operation that raised it: the caller must
//! discard any partial output and restart from scratch. Conditions a caller is
//! expected to recover from, such as a reference that is declared but not yet
//! materialized, are reported as negative results by the accessors instead.

use crate::asset::{AssetId, AssetKind, RecordKey};
use crate::effect::EffectError;

/// An error raised by a save or load session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A record was produced twice for the same key in one session.
    #[error("{key} was already finalized in this session")]
    DuplicateRecord {
        /// The key that collided.
        key: RecordKey,
    },
    /// An id was bound to a second object on the load side.
    #[error("{kind} {id} is already materialized")]
    DuplicateReference {
        /// The kind namespace of the id.
        kind: AssetKind,
        /// The id that was bound twice.
        id: AssetId,
    },
    /// An id was looked up that was never declared in this session.
    #[error("no {kind} exists under {id}")]
    UnknownReference {
        /// The kind namespace of the id.
        kind: AssetKind,
        /// The id that was looked up.
        id: AssetId,
    },
    /// An object handle does not point at a live object of the asset library.
    #[error("{kind} handle {index} does not point at a live object")]
    InvalidHandle {
        /// The kind of object the handle refers to.
        kind: AssetKind,
        /// The raw arena index of the handle.
        index: u32,
    },
    /// An encoder needed the id of an object that was never registered.
    #[error("{kind} at handle {index} was used before being registered")]
    UnregisteredDependency {
        /// The kind of the missing dependency.
        kind: AssetKind,
        /// The raw arena index of the missing dependency.
        index: u32,
    },
    /// No registered geometry predicate accepted a geometry.
    #[error("no geometry writer accepts geometry '{name}'")]
    NoMatchingEncoder {
        /// The name of the rejected geometry.
        name: String,
    },
    /// A pluggable writer slot was never filled.
    #[error("no {kind} writer is registered")]
    MissingWriter {
        /// The kind whose writer slot is empty.
        kind: AssetKind,
    },
    /// A record was produced by an encoder no decoder knows about.
    #[error("no decoder for {kind} records of version {version}")]
    UnknownEncoding {
        /// The kind of the record.
        kind: AssetKind,
        /// The encoder version stamped on the record.
        version: i16,
    },
    /// The record stream is inconsistent.
    #[error("malformed stream: {0}")]
    MalformedStream(String),
    /// An effect technique registry operation failed.
    #[error(transparent)]
    Effect(#[from] EffectError),
    /// A payload could not be encoded.
    #[error("encoding failed: {0}")]
    Encode(String),
    /// A payload could not be decoded.
    #[error("decoding failed: {0}")]
    Decode(String),
    /// A configuration object could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A `Result` alias defaulting to the session [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_key() {
        let err = Error::DuplicateRecord {
            key: RecordKey::new(AssetKind::Material, AssetId(3)),
        };
        assert_eq!(err.to_string(), "material #3 was already finalized in this session");

        let err = Error::UnknownReference {
            kind: AssetKind::SubScene,
            id: AssetId(12),
        };
        assert_eq!(err.to_string(), "no sub-scene exists under #12");
    }

    #[test]
    fn test_effect_errors_convert() {
        let err: Error = EffectError::UnknownTechnique("ghost".to_string()).into();
        assert!(matches!(err, Error::Effect(_)));
        assert!(err.to_string().contains("ghost"));
    }
}
