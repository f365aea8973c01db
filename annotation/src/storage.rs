//! The on-disk container layout and the operations on it.
//!
//! ```text
//! header (32 bytes) | capacity x slot (33 bytes) | string heap (heap_size bytes)
//! ```
//!
//! Every mutation writes slot and heap bytes first and rewrites the header
//! last. A read-only storage reloads the header before each access, so it
//! observes either the old or the new `count`, `capacity` and heap location,
//! although it may still catch a slot in the middle of an update.

use crate::{
    access::{Access, Disposition},
    codec::{self, Slot, SLOT_SIZE},
    common::*,
    header::{Header, HEADER_SIZE},
    heap::StringHeap,
    options::Options,
    record::AnnotationRecord,
};

/// An open container file.
#[derive(Debug)]
pub struct Storage {
    path: PathBuf,
    file: Option<File>,
    header: Header,
    writable: bool,
    options: Options,
}

impl Storage {
    /// Open or create the container at `path`.
    ///
    /// A storage that is not `writable` never modifies the file, so it cannot
    /// create a missing container or truncate an existing one.
    pub fn open(
        path: &Path,
        disposition: Disposition,
        writable: bool,
        options: Options,
    ) -> Result<Self> {
        let create = match disposition {
            Disposition::CreateAlways => true,
            Disposition::OpenAlways => !path.exists(),
        };

        let (file, header) = match (create, writable) {
            (true, true) => {
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)?;
                let header = Header::default();
                write_header(&file, &header, options.sync_writes)?;
                debug!("created container {}", path.display());
                (file, header)
            }
            (true, false) if disposition == Disposition::CreateAlways => {
                return Err(Error::AccessDenied {
                    operation: "truncate",
                    access: Access::Read,
                });
            }
            _ => {
                let file = OpenOptions::new().read(true).write(writable).open(path)?;
                let header = load_header(&file)?;
                debug!(
                    "opened container {} (count={}, capacity={}, heap_size={})",
                    path.display(),
                    header.count,
                    header.capacity,
                    header.heap_size
                );
                (file, header)
            }
        };

        Ok(Self {
            path: path.to_owned(),
            file: Some(file),
            header,
            writable,
            options,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The header as last committed to the file.
    ///
    /// If the header cannot be reloaded, the last one seen is returned.
    pub fn header(&self) -> Header {
        self.current().unwrap_or_else(|err| {
            warn!(
                "failed to reload the header of {}: {}",
                self.path.display(),
                err
            );
            self.header
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn count(&self) -> u64 {
        self.header().count
    }

    /// A writable storage holds the write lock, so its own header is always
    /// current. Others reload it since a writer may have committed meanwhile.
    fn current(&self) -> Result<Header> {
        if self.writable {
            return Ok(self.header);
        }
        load_header(opened(&self.file)?)
    }

    pub fn get(&self, index: u64) -> Result<AnnotationRecord> {
        let header = self.current()?;
        check_index(&header, index)?;

        let mut file = opened(&self.file)?;
        let mut bytes = [0u8; SLOT_SIZE];
        file.seek(SeekFrom::Start(Header::slot_offset(index)))?;
        file.read_exact(&mut bytes)?;
        trace!("read slot {} of {}", index, self.path.display());

        codec::decode(index, &bytes, &heap_of(&header), &mut file)
    }

    /// Rewrite the slot at `index` in place.
    ///
    /// A non-empty path is appended to the heap even if an equal path is
    /// already stored there.
    pub fn update(&mut self, index: u64, record: &AnnotationRecord) -> Result<()> {
        check_index(&self.header, index)?;

        let mut file = opened(&self.file)?;
        let mut heap = heap_of(&self.header);
        let slot = codec::encode(record, &mut heap, &mut file, self.options.max_path_len)?;
        file.seek(SeekFrom::Start(Header::slot_offset(index)))?;
        file.write_all(&slot.encode())?;
        trace!("wrote slot {} of {}", index, self.path.display());

        self.commit(Header {
            heap_size: heap.size(),
            ..self.header
        })
    }

    /// Set the number of records.
    ///
    /// Slots that become live again are reset to the default record, whether
    /// they are freshly allocated or left over from an earlier shrink.
    /// Shrinking only lowers `count` and keeps the capacity.
    pub fn resize(&mut self, new_count: u64) -> Result<()> {
        let Header {
            count, capacity, ..
        } = self.header;
        let next = Header {
            count: new_count,
            capacity: capacity.max(new_count),
            ..self.header
        };
        if !next.fits() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot allocate {} slots", new_count),
            )
            .into());
        }

        let mut file = opened(&self.file)?;
        let file_end = file.metadata()?.len();

        if next.capacity > capacity {
            // move the heap behind the enlarged slot table, leaving the old
            // copy in place until the moved one is on disk
            let heap = heap_of(&self.header);
            let mut heap_bytes = vec![0u8; heap.size() as usize];
            file.seek(SeekFrom::Start(heap.start()))?;
            file.read_exact(&mut heap_bytes)?;

            file.set_len(next.file_len())?;
            file.seek(SeekFrom::Start(next.heap_start()))?;
            file.write_all(&heap_bytes)?;
            if self.options.sync_writes {
                file.sync_data()?;
            }
            debug!(
                "moved {} heap bytes of {} from offset {} to {}",
                heap_bytes.len(),
                self.path.display(),
                heap.start(),
                next.heap_start()
            );
        }

        // set_len() zero-fills everything past the previous end of file
        let zero_start = Header::slot_offset(count);
        let zero_end = Header::slot_offset(new_count).min(file_end);
        if new_count > count && zero_end > zero_start {
            file.seek(SeekFrom::Start(zero_start))?;
            io::copy(&mut io::repeat(0).take(zero_end - zero_start), &mut file)?;
        }

        self.commit(next)?;
        debug!(
            "resized {} from {} to {} records (capacity {})",
            self.path.display(),
            count,
            new_count,
            next.capacity
        );

        Ok(())
    }

    /// Rebuild the heap from the paths of live records and return the number
    /// of bytes given back.
    ///
    /// Slots beyond `count` are reset to the default record.
    pub fn compact(&mut self) -> Result<u64> {
        let Header {
            count,
            capacity,
            heap_size,
        } = self.header;
        let heap = heap_of(&self.header);
        let mut file = opened(&self.file)?;

        let mut table = vec![0u8; capacity as usize * SLOT_SIZE];
        let live_len = count as usize * SLOT_SIZE;
        file.seek(SeekFrom::Start(HEADER_SIZE))?;
        file.read_exact(&mut table[..live_len])?;

        let mut compacted = vec![];
        for (index, chunk) in table[..live_len].chunks_exact_mut(SLOT_SIZE).enumerate() {
            let index = index as u64;
            let mut slot = Slot::decode(index, chunk)?;
            let path = heap.read(&mut file, index, slot.path_offset, slot.path_len as u64)?;
            slot.path_offset = if path.is_empty() {
                0
            } else {
                compacted.len() as u64
            };
            compacted.extend_from_slice(&path);
            chunk.copy_from_slice(&slot.encode());
        }

        file.seek(SeekFrom::Start(HEADER_SIZE))?;
        file.write_all(&table)?;
        file.seek(SeekFrom::Start(heap.start()))?;
        file.write_all(&compacted)?;

        let next = Header {
            heap_size: compacted.len() as u64,
            ..self.header
        };
        self.commit(next)?;
        opened(&self.file)?.set_len(next.file_len())?;

        let reclaimed = heap_size - next.heap_size;
        debug!(
            "compacted heap of {} from {} to {} bytes",
            self.path.display(),
            heap_size,
            next.heap_size
        );
        Ok(reclaimed)
    }

    /// Flush and release the file. Closing a closed storage does nothing.
    pub fn close(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            if self.writable {
                file.sync_all()?;
            }
            debug!("closed container {}", self.path.display());
        }
        Ok(())
    }

    fn commit(&mut self, next: Header) -> Result<()> {
        write_header(opened(&self.file)?, &next, self.options.sync_writes)?;
        self.header = next;
        Ok(())
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("failed to close container {}: {}", self.path.display(), err);
        }
    }
}

fn heap_of(header: &Header) -> StringHeap {
    StringHeap::new(header.heap_start(), header.heap_size)
}

fn check_index(header: &Header, index: u64) -> Result<()> {
    let count = header.count;
    if index >= count {
        return Err(Error::IndexOutOfRange { index, count });
    }
    Ok(())
}

fn opened(file: &Option<File>) -> io::Result<&File> {
    file.as_ref()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "container is closed"))
}

fn write_header(mut file: &File, header: &Header, sync: bool) -> io::Result<()> {
    if sync {
        file.sync_data()?;
    }
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&header.encode())?;
    Ok(())
}

fn load_header(mut file: &File) -> Result<Header> {
    let len = file.metadata()?.len();
    if len < HEADER_SIZE {
        return Err(Error::corrupt_container(format!(
            "file is {} bytes long, shorter than the header",
            len
        )));
    }

    let mut bytes = [0u8; HEADER_SIZE as usize];
    file.seek(SeekFrom::Start(0))?;
    file.read_exact(&mut bytes)?;
    let header = Header::decode(&bytes)?;

    if len < header.file_len() {
        return Err(Error::corrupt_container(format!(
            "file is {} bytes long, but the layout needs {} bytes",
            len,
            header.file_len()
        )));
    }

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn read_only_storage_refuses_to_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("res.anc");

        let result = Storage::open(&path, Disposition::CreateAlways, false, Options::default());
        assert!(matches!(
            result,
            Err(Error::AccessDenied {
                operation: "truncate",
                access: Access::Read
            })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn grow_over_trailing_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("res.anc");

        let mut storage =
            Storage::open(&path, Disposition::CreateAlways, true, Options::default()).unwrap();
        storage.resize(1).unwrap();
        storage
            .update(
                0,
                &AnnotationRecord {
                    id: 3,
                    image_path: "0001.jpg".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        storage.close().unwrap();

        // bytes past the layout are tolerated and must not leak into new slots
        let mut bytes = fs::read(&path).unwrap();
        bytes.extend_from_slice(&[0xff; SLOT_SIZE * 3]);
        fs::write(&path, &bytes).unwrap();

        let mut storage =
            Storage::open(&path, Disposition::OpenAlways, true, Options::default()).unwrap();
        storage.resize(4).unwrap();
        assert_eq!(storage.get(0).unwrap().image_path, "0001.jpg");
        (1..4).for_each(|index| assert!(storage.get(index).unwrap().is_default()));
        assert_eq!(
            fs::metadata(&path).unwrap().len(),
            storage.header().file_len()
        );
    }
}
