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

//! # Tessera Lanes
//!
//! Hot-path strategies used by the serialization agent:
//!
//! - [`writer_lane`]: the pluggable [`WriterRegistry`] and the built-in per-kind encoders.
//! - [`reader_lane`]: the [`DecoderRegistry`] turning records back into assets.
//! - [`archive_lane`]: the [`ArchiveStrategy`] lanes that frame a whole record stream.

#![warn(missing_docs)]

pub mod archive_lane;
mod payload;
pub mod reader_lane;
pub mod writer_lane;

pub use archive_lane::{
    ArchiveStrategy, BinaryArchiveLane, CompressedArchiveLane, RonArchiveLane,
};
pub use reader_lane::{DecodedAsset, DecoderRegistry, NodeLinks};
pub use writer_lane::{SubDependencies, WriteContext, WriterRegistry};
