//! File-backed containers of object tracking annotations.
//!
//! A container stores one [AnnotationRecord] per slot. Records are addressed
//! by a zero-based index and accessed through a [Handle], which owns the open
//! file and, for writers, the process-wide write lock on its path.
//!
//! ```no_run
//! use annotation::{Access, AnnotationRecord, Disposition, Handle};
//!
//! # fn main() -> annotation::Result<()> {
//! let mut handle = Handle::open("res.anc", Access::Both, Disposition::CreateAlways)?;
//! handle.resize(3)?;
//! handle.update(
//!     0,
//!     &AnnotationRecord {
//!         id: 7,
//!         is_labeled: true,
//!         image_path: "0001.jpg".into(),
//!         ..Default::default()
//!     },
//! )?;
//! assert_eq!(handle.count(), 3);
//! handle.close()?;
//! # Ok(())
//! # }
//! ```

mod common;

pub mod access;
pub mod codec;
pub mod dataset;
pub mod error;
pub mod handle;
pub mod header;
pub mod heap;
pub mod lock;
pub mod options;
pub mod record;
pub mod storage;

pub use access::{Access, Disposition};
pub use dataset::{list_sequences, sequence_path};
pub use error::{Error, Result};
pub use handle::{Handle, Records, Stats};
pub use options::Options;
pub use record::AnnotationRecord;
