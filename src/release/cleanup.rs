use std::{fs, path::Path};

use error_stack::{IntoReport, ResultExt};
use log::debug;

use crate::{
    release::release_header::{ReleaseError, ResultReleaseErr},
    utils::fs_utils::{
        create_file, exists, remove_contents_except, replace_by_prefix, FsError, FsResult,
    },
};

/// Writes `key=value` lines into the marker at `path`. An existing marker
/// that already carries every key is updated line by line so anything else
/// stored in it stays untouched.
pub fn write_version_marker(path: impl AsRef<Path>, entries: &[(&str, &str)]) -> FsResult<()> {
    let path = path.as_ref();
    let existing = if exists(path) {
        Some(
            fs::read_to_string(path)
                .report()
                .change_context_lazy(|| FsError::Read(path.display().to_string()))?,
        )
    } else {
        None
    };

    match existing {
        Some(content)
            if entries.iter().all(|(key, _)| {
                content
                    .split('\n')
                    .any(|line| line.starts_with(&format!("{}=", key)))
            }) =>
        {
            debug!("Update {}", path.display());
            for (key, value) in entries {
                let prefix = format!("{}=", key);
                replace_by_prefix(path, &prefix, &format!("{}{}", prefix, value))?;
            }
            Ok(())
        }
        _ => {
            debug!("Create {}", path.display());
            let content = entries
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<String>>()
                .join("\n");
            create_file(path, &content)
        }
    }
}

pub fn remove_folder(path: impl AsRef<Path>) -> ResultReleaseErr<()> {
    let path = path.as_ref();
    if !exists(path) {
        return Ok(());
    }
    fs::remove_dir_all(path)
        .report()
        .change_context_lazy(|| ReleaseError::Cleanup(path.display().to_string()))?;
    debug!("Directory: {} Removed", path.display());
    Ok(())
}

/// Empties the temp folder but keeps `keep` (the version marker).
pub fn clean_tmp(tmp_path: impl AsRef<Path>, keep: &str) -> ResultReleaseErr<()> {
    let tmp_path = tmp_path.as_ref();
    if !exists(tmp_path) {
        return Ok(());
    }
    remove_contents_except(tmp_path, &[keep])
        .change_context_lazy(|| ReleaseError::Cleanup(tmp_path.display().to_string()))?;
    Ok(())
}
