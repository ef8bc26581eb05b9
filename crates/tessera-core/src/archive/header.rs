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

//! Defines the container format of a serialized asset graph.
//!
//! Every archive starts with a fixed-size [`ArchiveHeader`] followed by a
//! variable-length payload. The header names the encoding strategy used for the
//! payload so the loader can dispatch it to the matching lane.

/// A unique byte sequence identifying Tessera archives.
pub const HEADER_MAGIC_BYTES: [u8; 8] = *b"TESSERA\0";
/// The version of the header layout written by this build.
pub const FORMAT_VERSION: u8 = 1;
const STRATEGY_ID_LEN: usize = 32;
const HASH_LEN: usize = 32;

/// An error raised while parsing an [`ArchiveHeader`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// The input is shorter than [`ArchiveHeader::SIZE`].
    #[error("not enough bytes to form a valid header")]
    TooShort,
    /// The input does not start with [`HEADER_MAGIC_BYTES`].
    #[error("invalid magic bytes; not a Tessera archive")]
    InvalidMagic,
    /// The header was written by an incompatible build.
    #[error("unsupported header version {0}")]
    UnsupportedVersion(u8),
    /// The strategy id is too long or not valid UTF-8.
    #[error("invalid strategy id")]
    InvalidStrategyId,
    /// The payload length does not match the header.
    #[error("payload length mismatch: header says {expected}, found {found}")]
    LengthMismatch {
        /// Length recorded in the header.
        expected: u64,
        /// Length actually available.
        found: u64,
    },
}

/// The fixed-size header at the beginning of every archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// Must be [`HEADER_MAGIC_BYTES`].
    pub magic_bytes: [u8; 8],
    /// The version of the header layout.
    pub format_version: u8,
    /// A null-padded UTF-8 string naming the payload strategy, e.g. `"TS_BINARY_V1"`.
    pub strategy_id: [u8; STRATEGY_ID_LEN],
    /// The payload length in bytes.
    pub payload_length: u64,
    /// The BLAKE3 hash of the payload.
    pub payload_hash: [u8; HASH_LEN],
}

// The header is fixed-layout and written by hand rather than through serde.
impl ArchiveHeader {
    /// The total size of the header in bytes.
    pub const SIZE: usize = 8 + 1 + STRATEGY_ID_LEN + 8 + HASH_LEN;

    /// Builds a header for the given strategy and payload metadata.
    pub fn new(
        strategy_id: &str,
        payload_length: u64,
        payload_hash: [u8; HASH_LEN],
    ) -> Result<Self, HeaderError> {
        if strategy_id.len() > STRATEGY_ID_LEN {
            return Err(HeaderError::InvalidStrategyId);
        }
        let mut strategy_bytes = [0u8; STRATEGY_ID_LEN];
        strategy_bytes[..strategy_id.len()].copy_from_slice(strategy_id.as_bytes());

        Ok(Self {
            magic_bytes: HEADER_MAGIC_BYTES,
            format_version: FORMAT_VERSION,
            strategy_id: strategy_bytes,
            payload_length,
            payload_hash,
        })
    }

    /// Returns the strategy id without its null padding.
    pub fn strategy(&self) -> Result<&str, HeaderError> {
        std::str::from_utf8(&self.strategy_id)
            .map(|s| s.trim_end_matches('\0'))
            .map_err(|_| HeaderError::InvalidStrategyId)
    }

    /// Writes the header into its fixed little-endian layout.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..8].copy_from_slice(&self.magic_bytes);
        bytes[8] = self.format_version;
        bytes[9..9 + STRATEGY_ID_LEN].copy_from_slice(&self.strategy_id);
        let length_start = 9 + STRATEGY_ID_LEN;
        bytes[length_start..length_start + 8].copy_from_slice(&self.payload_length.to_le_bytes());
        bytes[length_start + 8..].copy_from_slice(&self.payload_hash);
        bytes
    }

    /// Attempts to parse a header from the beginning of a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < Self::SIZE {
            return Err(HeaderError::TooShort);
        }

        let magic_bytes: [u8; 8] = bytes[0..8]
            .try_into()
            .map_err(|_| HeaderError::TooShort)?;
        if magic_bytes != HEADER_MAGIC_BYTES {
            return Err(HeaderError::InvalidMagic);
        }

        let format_version = bytes[8];
        if format_version != FORMAT_VERSION {
            return Err(HeaderError::UnsupportedVersion(format_version));
        }

        let strategy_id: [u8; STRATEGY_ID_LEN] = bytes[9..9 + STRATEGY_ID_LEN]
            .try_into()
            .map_err(|_| HeaderError::TooShort)?;

        let length_start = 9 + STRATEGY_ID_LEN;
        let payload_length = u64::from_le_bytes(
            bytes[length_start..length_start + 8]
                .try_into()
                .map_err(|_| HeaderError::TooShort)?,
        );
        let payload_hash: [u8; HASH_LEN] = bytes[length_start + 8..Self::SIZE]
            .try_into()
            .map_err(|_| HeaderError::TooShort)?;

        Ok(Self {
            magic_bytes,
            format_version,
            strategy_id,
            payload_length,
            payload_hash,
        })
    }
}

/// A logical representation of a full archive in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    /// The parsed header.
    pub header: ArchiveHeader,
    /// The encoded payload.
    pub payload: Vec<u8>,
}

impl ArchiveFile {
    /// Concatenates header and payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(ArchiveHeader::SIZE + self.payload.len());
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Splits raw bytes into header and payload, checking the recorded length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        let header = ArchiveHeader::from_bytes(bytes)?;
        let payload = &bytes[ArchiveHeader::SIZE..];
        if payload.len() as u64 != header.payload_length {
            return Err(HeaderError::LengthMismatch {
                expected: header.payload_length,
                found: payload.len() as u64,
            });
        }
        Ok(Self {
            header,
            payload: payload.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout_round_trip() {
        let header = ArchiveHeader::new("TS_BINARY_V1", 42, [7u8; 32]).unwrap();
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), 81);
        assert_eq!(&bytes[0..8], b"TESSERA\0");

        let parsed = ArchiveHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.strategy().unwrap(), "TS_BINARY_V1");
    }

    #[test]
    fn test_rejects_short_and_foreign_input() {
        assert_eq!(ArchiveHeader::from_bytes(&[0u8; 10]), Err(HeaderError::TooShort));
        assert_eq!(
            ArchiveHeader::from_bytes(&[0u8; ArchiveHeader::SIZE]),
            Err(HeaderError::InvalidMagic)
        );
    }

    #[test]
    fn test_rejects_long_strategy_id() {
        let id = "X".repeat(33);
        assert_eq!(
            ArchiveHeader::new(&id, 0, [0; 32]),
            Err(HeaderError::InvalidStrategyId)
        );
    }

    #[test]
    fn test_file_checks_payload_length() {
        let header = ArchiveHeader::new("TS_RON_V1", 4, [0; 32]).unwrap();
        let mut bytes = ArchiveFile {
            header,
            payload: vec![1, 2, 3, 4],
        }
        .to_bytes();
        assert!(ArchiveFile::from_bytes(&bytes).is_ok());

        bytes.pop();
        assert_eq!(
            ArchiveFile::from_bytes(&bytes),
            Err(HeaderError::LengthMismatch {
                expected: 4,
                found: 3
            })
        );
    }
}
