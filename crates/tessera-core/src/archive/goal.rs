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

//! Defines the public API for choosing how an archive payload is encoded.
//!
//! Callers express their *intent* through a [`SerializationGoal`] rather than
//! picking a concrete encoding. The serialization agent maps each goal to one of
//! its registered archive lanes.

/// Defines the caller's high-level intention for a save operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializationGoal {
    /// Prioritizes the fastest possible loading time.
    /// The payload is plain binary and not meant to be read by humans.
    FastestLoad,

    /// Prioritizes the smallest possible archive size.
    /// The binary payload is compressed; loading pays for decompression.
    SmallestFileSize,

    /// Prioritizes human-readability for debugging and version control.
    /// The payload is text and can be inspected and diffed. This is the slowest option.
    HumanReadableDebug,

    /// Prioritizes long-term stability.
    /// The payload uses the stable, versioned binary record layout.
    LongTermStability,
}
