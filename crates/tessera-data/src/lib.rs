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

//! # Tessera Data
//!
//! Data layouts for the serializer: the arena-backed [`AssetLibrary`], the
//! save-side [`Dependency`] session (identity registry) and the load-side
//! [`References`] session (reference table).
//!
//! Object identity is the arena [`Handle`], never the value: two geometries with
//! identical vertex data live in two slots and are two distinct dependencies.

#![warn(missing_docs)]

pub mod arena;
pub mod dependency;
pub mod library;
pub mod reference;
mod tracked;

pub use arena::{Arena, Handle};
pub use dependency::{Dependency, DependencyTable};
pub use library::*;
pub use reference::{ReferenceState, ReferenceTable, References};
pub use tracked::Tracked;
