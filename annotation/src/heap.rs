//! Append-only storage of path strings.
//!
//! The heap never reuses space. A record whose path is rewritten leaves the
//! old bytes behind, and only [Storage::compact](crate::storage::Storage::compact)
//! gives them back.

use crate::common::*;

/// The heap region of a container, located at `start` and `size` bytes long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringHeap {
    start: u64,
    size: u64,
}

impl StringHeap {
    pub fn new(start: u64, size: u64) -> Self {
        Self { start, size }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn contains(&self, offset: u64, len: u64) -> bool {
        offset
            .checked_add(len)
            .map_or(false, |end| end <= self.size)
    }

    /// Write `bytes` at the end of the heap and return their offset.
    pub fn append<F>(&mut self, io: &mut F, bytes: &[u8]) -> io::Result<u64>
    where
        F: Write + Seek + ?Sized,
    {
        let offset = self.size;
        io.seek(SeekFrom::Start(self.start + offset))?;
        io.write_all(bytes)?;
        self.size += bytes.len() as u64;
        Ok(offset)
    }

    /// Read `len` bytes at `offset` on behalf of the slot at `index`.
    pub fn read<F>(&self, io: &mut F, index: u64, offset: u64, len: u64) -> Result<Vec<u8>>
    where
        F: Read + Seek + ?Sized,
    {
        if !self.contains(offset, len) {
            return Err(Error::corrupt_slot(
                index,
                format!(
                    "path range {}+{} exceeds heap size {}",
                    offset, len, self.size
                ),
            ));
        }

        let mut bytes = vec![0u8; len as usize];
        io.seek(SeekFrom::Start(self.start + offset))?;
        io.read_exact(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_appends_at_end() {
        let mut io = Cursor::new(vec![0xffu8; 8]);
        let mut heap = StringHeap::new(8, 0);

        assert_eq!(heap.append(&mut io, b"abc").unwrap(), 0);
        assert_eq!(heap.append(&mut io, b"de").unwrap(), 3);
        assert_eq!(heap.size(), 5);
        assert_eq!(&io.get_ref()[..8], &[0xffu8; 8]);
        assert_eq!(heap.read(&mut io, 0, 3, 2).unwrap(), b"de");
        assert_eq!(heap.read(&mut io, 0, 0, 0).unwrap(), b"");
    }

    #[test]
    fn heap_read_is_bounds_checked() {
        let mut io = Cursor::new(vec![]);
        let mut heap = StringHeap::new(0, 0);
        heap.append(&mut io, b"abcd").unwrap();

        assert!(matches!(
            heap.read(&mut io, 9, 2, 3),
            Err(Error::CorruptSlot { index: 9, .. })
        ));
        assert!(matches!(
            heap.read(&mut io, 9, u64::MAX, 2),
            Err(Error::CorruptSlot { .. })
        ));
    }
}
