//! Stored document frame
//!
//! Frame layout:
//!
//! ```text
//! +------------------+
//! | Frame Length     | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Document Body    | (UTF-8 JSON object)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 over length + body)
//! +------------------+
//! ```

use std::io;

use serde_json::Value;

use super::checksum::compute_checksum;

/// Smallest possible frame: length + empty body + checksum
pub const MIN_FRAME_SIZE: usize = 4 + 4;

/// One stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    /// Document body
    pub body: Value,
}

impl DocumentRecord {
    /// Wraps a document body
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Serialize the record into a checksummed frame.
    pub fn serialize(&self) -> Vec<u8> {
        // serde_json::Value serialization cannot fail
        let body = serde_json::to_vec(&self.body).unwrap_or_default();
        let frame_length = (4 + body.len() + 4) as u32;

        let mut frame = Vec::with_capacity(frame_length as usize);
        frame.extend_from_slice(&frame_length.to_le_bytes());
        frame.extend_from_slice(&body);

        let checksum = compute_checksum(&frame);
        frame.extend_from_slice(&checksum.to_le_bytes());
        frame
    }

    /// Deserialize one frame, verifying its checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_FRAME_SIZE {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "Frame too short"));
        }

        let frame_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if frame_length < MIN_FRAME_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid frame length: {}", frame_length),
            ));
        }
        if data.len() < frame_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Frame truncated: expected {} bytes, got {}",
                    frame_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = frame_length - 4;
        let stored = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed = compute_checksum(&data[..checksum_offset]);
        if stored != computed {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: stored {:08x}, computed {:08x}",
                    stored, computed
                ),
            ));
        }

        let body: Value = serde_json::from_slice(&data[4..checksum_offset]).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid document body: {}", e))
        })?;

        Ok((Self { body }, frame_length))
    }
}
