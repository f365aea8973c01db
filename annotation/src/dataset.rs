//! Locating containers in a dataset directory.
//!
//! A dataset is laid out as `<dataset_dir>/<sequence>/<sub_sequence>/`, and
//! each sub-sequence directory keeps its annotations in one container file.

use crate::common::*;

pub const DEFAULT_CONTAINER_FILE_NAME: &str = "annotation.anc";

/// List the `"<sequence>/<sub_sequence>"` names found in a dataset directory, sorted.
pub fn list_sequences<P>(dataset_dir: P) -> Result<Vec<String>>
where
    P: AsRef<Path>,
{
    let mut sequences = vec![];

    for entry in fs::read_dir(dataset_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let sequence = entry.file_name();

        for sub_entry in fs::read_dir(entry.path())? {
            let sub_entry = sub_entry?;
            if !sub_entry.file_type()?.is_dir() {
                continue;
            }
            sequences.push(format!(
                "{}/{}",
                sequence.to_string_lossy(),
                sub_entry.file_name().to_string_lossy()
            ));
        }
    }

    sequences.sort();
    Ok(sequences)
}

/// The container path of a `"<sequence>/<sub_sequence>"` name.
pub fn sequence_path<P>(dataset_dir: P, sequence: &str, file_name: &str) -> Result<PathBuf>
where
    P: AsRef<Path>,
{
    let parts: Vec<_> = sequence.split('/').collect();
    let valid = |part: &&str| !part.is_empty() && *part != "." && *part != "..";

    match parts.as_slice() {
        [seq, sub] if valid(seq) && valid(sub) => {
            Ok(dataset_dir.as_ref().join(seq).join(sub).join(file_name))
        }
        _ => Err(Error::InvalidPath {
            path: PathBuf::from(sequence),
            reason: "expect a '<sequence>/<sub_sequence>' name".into(),
        }),
    }
}
