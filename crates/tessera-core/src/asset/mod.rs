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

//! Provides the primitive identity types of the serializer.
//!
//! This module defines the "common language" used when talking about a serialized
//! asset graph:
//! - [`AssetKind`]: the category of an asset, each with its own id namespace.
//! - [`AssetId`]: the per-kind, session-scoped reference handle.
//! - [`RecordKey`]: the `(kind, id)` pair used to demultiplex records.
//! - [`SerializedRecord`]: one encoded asset, opaque payload included.
//!
//! These types carry no knowledge of how assets are stored or encoded.

mod id;
mod kind;
mod record;

pub use id::*;
pub use kind::*;
pub use record::*;

/// A marker trait for types that can be tracked by the serializer.
///
/// The `'static` bound keeps assets free of borrowed data so they can be owned
/// by an asset library for the lifetime of a session.
pub trait Asset: 'static {
    /// The kind namespace this asset type is registered under.
    const KIND: AssetKind;
}
