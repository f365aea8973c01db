use crate::common::*;

pub const DEFAULT_MAX_PATH_LEN: usize = 4096;

/// Engine options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// The maximum image path length in UTF-16 code units.
    #[serde(default = "default_max_path_len")]
    pub max_path_len: usize,
    /// Sync slot and heap bytes to disk before every header rewrite.
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_path_len: default_max_path_len(),
            sync_writes: default_sync_writes(),
        }
    }
}

fn default_max_path_len() -> usize {
    DEFAULT_MAX_PATH_LEN
}

fn default_sync_writes() -> bool {
    true
}
