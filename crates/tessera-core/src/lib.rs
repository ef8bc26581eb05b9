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

//! # Tessera Core
//!
//! Foundational crate containing the identity types, record contracts and
//! configuration objects shared by every layer of the asset-graph serializer,
//! along with the effect technique registry.
//!
//! Nothing in this crate knows how an asset is stored or encoded. It only
//! defines the vocabulary the other crates speak.

#![warn(missing_docs)]

pub mod archive;
pub mod asset;
pub mod effect;
pub mod error;
pub mod options;

pub use asset::{AssetId, AssetKind, RecordKey, SerializedRecord};
pub use error::{Error, Result};
pub use options::{Options, WriterOptions};
