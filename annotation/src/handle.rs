use crate::{
    access::{Access, Disposition},
    common::*,
    lock::{self, WriteLock},
    options::Options,
    record::AnnotationRecord,
    storage::Storage,
};

/// An open session on a container, with a declared access mode.
///
/// A handle with write capability holds the process-wide write lock on its
/// path. The file is closed and the lock released when the handle is closed
/// or dropped, including when it is dropped while an error propagates.
#[derive(Debug)]
pub struct Handle {
    storage: Storage,
    access: Access,
    // declared after `storage` so that it is released after the file is closed
    _lock: Option<WriteLock>,
}

impl Handle {
    pub fn open<P>(path: P, access: Access, disposition: Disposition) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::open_with(path, access, disposition, Options::default())
    }

    pub fn open_with<P>(
        path: P,
        access: Access,
        disposition: Disposition,
        options: Options,
    ) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = lock::resolve_path(path.as_ref())?;

        if disposition == Disposition::CreateAlways && !access.can_write() {
            return Err(Error::AccessDenied {
                operation: "truncate",
                access,
            });
        }

        let lock = access
            .can_write()
            .then(|| WriteLock::acquire(&path))
            .transpose()?;
        let storage = Storage::open(&path, disposition, access.can_write(), options)?;

        Ok(Self {
            storage,
            access,
            _lock: lock,
        })
    }

    fn require_read(&self, operation: &'static str) -> Result<()> {
        if !self.access.can_read() {
            return Err(Error::AccessDenied {
                operation,
                access: self.access,
            });
        }
        Ok(())
    }

    fn require_write(&self, operation: &'static str) -> Result<()> {
        if !self.access.can_write() {
            return Err(Error::AccessDenied {
                operation,
                access: self.access,
            });
        }
        Ok(())
    }

    /// The number of records. Available in every access mode.
    pub fn count(&self) -> u64 {
        self.storage.count()
    }

    pub fn get(&self, index: u64) -> Result<AnnotationRecord> {
        self.require_read("get")?;
        self.storage.get(index)
    }

    pub fn update(&mut self, index: u64, record: &AnnotationRecord) -> Result<()> {
        self.require_write("update")?;
        self.storage.update(index, record)
    }

    pub fn resize(&mut self, new_count: u64) -> Result<()> {
        self.require_write("resize")?;
        self.storage.resize(new_count)
    }

    /// Drop heap bytes that no live record refers to.
    pub fn compact(&mut self) -> Result<u64> {
        self.require_write("compact")?;
        self.storage.compact()
    }

    /// Iterate over all records in index order.
    pub fn records(&self) -> Result<Records<'_>> {
        self.require_read("records")?;
        Ok(Records {
            storage: &self.storage,
            range: 0..self.storage.count(),
        })
    }

    pub fn stats(&self) -> Stats {
        let header = self.storage.header();
        Stats {
            path: self.storage.path().to_owned(),
            access: self.access,
            count: header.count,
            capacity: header.capacity,
            heap_size: header.heap_size,
        }
    }

    /// The resolved path of the container.
    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn close(mut self) -> Result<()> {
        self.storage.close()
    }
}

/// Iterator over the records of a [Handle].
#[derive(Debug)]
pub struct Records<'a> {
    storage: &'a Storage,
    range: Range<u64>,
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<AnnotationRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.range.next()?;
        Some(self.storage.get(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

/// Summary of an open container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub path: PathBuf,
    pub access: Access,
    pub count: u64,
    pub capacity: u64,
    pub heap_size: u64,
}
