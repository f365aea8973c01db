//! Tool configuration format.

use annotation::{dataset::DEFAULT_CONTAINER_FILE_NAME, Options};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The tool configuration, loaded from a JSON5 file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The directory holding `<sequence>/<sub_sequence>` directories.
    pub dataset_dir: Option<PathBuf>,
    /// The container file name inside each sub-sequence directory.
    #[serde(default = "default_container_file_name")]
    pub container_file_name: String,
    #[serde(default)]
    pub options: Options,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_dir: None,
            container_file_name: default_container_file_name(),
            options: Options::default(),
        }
    }
}

fn default_container_file_name() -> String {
    DEFAULT_CONTAINER_FILE_NAME.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_partial_config() -> Result<()> {
        let config: Config = json5::from_str(
            r#"{
                // annotations of the tracking benchmark
                dataset_dir: "/data/tracking",
                options: { max_path_len: 260 },
            }"#,
        )?;
        assert_eq!(config.dataset_dir, Some(PathBuf::from("/data/tracking")));
        assert_eq!(config.container_file_name, "annotation.anc");
        assert_eq!(config.options.max_path_len, 260);
        assert!(config.options.sync_writes);
        Ok(())
    }
}
