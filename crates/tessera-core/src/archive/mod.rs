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

//! The archive container: a fixed header, followed by an encoded [`SceneArchive`].

mod goal;
mod header;

pub use goal::*;
pub use header::*;

use crate::asset::{RecordKey, SerializedRecord};
use serde::{Deserialize, Serialize};

/// The logical content of an archive payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SceneArchive {
    /// The sub-scene record holding the root node, if the archive has one.
    pub root: Option<RecordKey>,
    /// Every record of the save session, in emission order.
    pub records: Vec<SerializedRecord>,
}
