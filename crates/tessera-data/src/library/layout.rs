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

//! Layout groups and masks carried by scene nodes.

/// A set of layout bits.
///
/// A node belongs to one or more *groups*; systems filter nodes with *masks*.
/// Multiple values can be combined using bitwise operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layouts {
    bits: u32,
}

impl Layouts {
    /// The group every node starts in.
    pub const DEFAULT: Self = Self { bits: 1 << 0 };
    /// Nodes ignored by ray casts.
    pub const IGNORE_RAYCASTING: Self = Self { bits: 1 << 1 };
    /// Nodes subject to frustum culling.
    pub const CULLING: Self = Self { bits: 1 << 2 };
    /// Nodes that can be picked.
    pub const PICKING: Self = Self { bits: 1 << 3 };

    /// Mask matching nothing.
    pub const NOTHING: Self = Self { bits: 0 };
    /// Mask matching every group.
    pub const EVERYTHING: Self = Self { bits: u32::MAX };
    /// Default mask used by dynamic collision queries.
    pub const COLLISIONS_DYNAMIC_DEFAULT: Self = Self::EVERYTHING;
    /// Default mask used by ray casts.
    pub const RAYCASTING_DEFAULT: Self = Self {
        bits: u32::MAX & !Self::IGNORE_RAYCASTING.bits,
    };

    /// Creates a set of layouts from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of layouts.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns `true` if every bit of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Returns `true` if at least one bit is shared with the mask.
    pub const fn matches(&self, mask: Self) -> bool {
        (self.bits & mask.bits) != 0
    }
}

impl Default for Layouts {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::ops::BitOr for Layouts {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for Layouts {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raycasting_mask_skips_ignored_group() {
        let ignored = Layouts::DEFAULT | Layouts::IGNORE_RAYCASTING;
        assert!(ignored.contains(Layouts::IGNORE_RAYCASTING));
        assert!(!Layouts::IGNORE_RAYCASTING.matches(Layouts::RAYCASTING_DEFAULT));
        assert!(Layouts::PICKING.matches(Layouts::RAYCASTING_DEFAULT));
        assert!(!Layouts::DEFAULT.matches(Layouts::NOTHING));
    }
}
