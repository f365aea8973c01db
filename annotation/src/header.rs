//! The fixed-size container preamble.
//!
//! ```text
//! magic(4) | version(4) | count(8) | capacity(8) | heap_size(8)
//! ```

use crate::{codec::SLOT_SIZE, common::*};

pub const MAGIC: [u8; 4] = *b"ANNC";
pub const VERSION: u32 = 1;
pub const HEADER_SIZE: u64 = 32;

#[derive(Debug, BinRead)]
struct RawHeader {
    magic: [u8; 4],
    version: u32,
    count: u64,
    capacity: u64,
    heap_size: u64,
}

/// Decoded header fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Header {
    /// Number of live slots.
    pub count: u64,
    /// Number of allocated slots.
    pub capacity: u64,
    /// Bytes used by the string heap.
    pub heap_size: u64,
}

impl Header {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if (bytes.len() as u64) < HEADER_SIZE {
            return Err(Error::corrupt_container(format!(
                "header is truncated to {} bytes",
                bytes.len()
            )));
        }

        let RawHeader {
            magic,
            version,
            count,
            capacity,
            heap_size,
        } = Cursor::new(bytes)
            .read_le()
            .map_err(|err| Error::corrupt_container(format!("{:?}", err)))?;

        if magic != MAGIC {
            return Err(Error::corrupt_container(format!("bad magic {:02x?}", magic)));
        }
        if version != VERSION {
            return Err(Error::UnsupportedVersion {
                found: version,
                expected: VERSION,
            });
        }
        if count > capacity {
            return Err(Error::corrupt_container(format!(
                "count {} exceeds capacity {}",
                count, capacity
            )));
        }

        let header = Self {
            count,
            capacity,
            heap_size,
        };
        if !header.fits() {
            return Err(Error::corrupt_container(
                "slot table and heap sizes overflow",
            ));
        }

        Ok(header)
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE as usize] {
        let mut bytes = [0u8; HEADER_SIZE as usize];
        bytes[0..4].copy_from_slice(&MAGIC);
        LittleEndian::write_u32(&mut bytes[4..8], VERSION);
        LittleEndian::write_u64(&mut bytes[8..16], self.count);
        LittleEndian::write_u64(&mut bytes[16..24], self.capacity);
        LittleEndian::write_u64(&mut bytes[24..32], self.heap_size);
        bytes
    }

    /// Check that the file length of this layout is addressable.
    ///
    /// The offset functions below assume this holds.
    pub fn fits(&self) -> bool {
        self.capacity
            .checked_mul(SLOT_SIZE as u64)
            .and_then(|len| len.checked_add(HEADER_SIZE))
            .and_then(|len| len.checked_add(self.heap_size))
            .is_some()
    }

    /// Byte offset of the slot at `index`.
    pub fn slot_offset(index: u64) -> u64 {
        HEADER_SIZE + index * SLOT_SIZE as u64
    }

    /// Byte offset where the string heap begins.
    pub fn heap_start(&self) -> u64 {
        Self::slot_offset(self.capacity)
    }

    /// The least file length holding the slot table and the heap.
    pub fn file_len(&self) -> u64 {
        self.heap_start() + self.heap_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        let header = Header {
            count: 3,
            capacity: 5,
            heap_size: 16,
        };
        let bytes = header.encode();
        assert_eq!(&bytes[0..4], b"ANNC");
        assert_eq!(bytes[4..8], 1u32.to_le_bytes());
        assert_eq!(bytes[8..16], 3u64.to_le_bytes());
        assert_eq!(Header::decode(&bytes).unwrap(), header);
        assert_eq!(Header::slot_offset(1), 32 + 33);
        assert_eq!(header.heap_start(), 32 + 5 * 33);
        assert_eq!(header.file_len(), 32 + 5 * 33 + 16);
    }

    #[test]
    fn header_rejects_bad_magic() {
        let mut bytes = Header::default().encode();
        bytes[0] = b'X';
        assert!(matches!(
            Header::decode(&bytes),
            Err(Error::CorruptContainer { .. })
        ));
    }

    #[test]
    fn header_rejects_other_versions() {
        let mut bytes = Header::default().encode();
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        assert!(matches!(
            Header::decode(&bytes),
            Err(Error::UnsupportedVersion {
                found: 2,
                expected: 1
            })
        ));
    }

    #[test]
    fn header_rejects_inconsistent_sizes() {
        let bytes = Header {
            count: 4,
            capacity: 2,
            heap_size: 0,
        }
        .encode();
        assert!(matches!(
            Header::decode(&bytes),
            Err(Error::CorruptContainer { .. })
        ));

        let bytes = Header {
            count: 0,
            capacity: u64::MAX,
            heap_size: 0,
        }
        .encode();
        assert!(matches!(
            Header::decode(&bytes),
            Err(Error::CorruptContainer { .. })
        ));

        assert!(matches!(
            Header::decode(&[0u8; 16]),
            Err(Error::CorruptContainer { .. })
        ));
    }
}
