pub use crate::error::{Error, Result};
pub use binread::{BinRead, BinReaderExt as _};
pub use byteorder::{ByteOrder, LittleEndian};
pub use log::{debug, trace, warn};
pub use once_cell::sync::Lazy;
pub use serde::{Deserialize, Serialize};
pub use std::{
    collections::HashSet,
    fmt,
    fs::{self, File, OpenOptions},
    io::{self, Cursor, Read, Seek, SeekFrom, Write},
    ops::{BitOr, Range},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
