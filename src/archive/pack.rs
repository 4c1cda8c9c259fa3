use std::{
    fs::{self, File},
    io,
    path::Path,
};

use error_stack::{IntoReport, ResultExt};
use log::{info, trace};
use walkdir::WalkDir;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use super::{ArchiveError, ArchiveResult};

/// Packs the content of `source` into a new zip at `archive_path`.
/// Entry names are relative to `source` and always use `/`.
pub fn pack(source: impl AsRef<Path>, archive_path: impl AsRef<Path>) -> ArchiveResult<usize> {
    let source = source.as_ref();
    let archive_path = archive_path.as_ref();
    info!("Packing {} into {}", source.display(), archive_path.display());

    let file = File::create(archive_path)
        .report()
        .change_context_lazy(|| ArchiveError::FileCreate(archive_path.display().to_string()))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut packed = 0;
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry
            .report()
            .change_context_lazy(|| ArchiveError::Walk(source.display().to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .report()
            .change_context_lazy(|| ArchiveError::Walk(source.display().to_string()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            trace!("Add folder {}", name);
            zip.add_directory(name.as_str(), options)
                .report()
                .change_context_lazy(|| ArchiveError::StartFile(name.clone()))?;
        } else {
            trace!("Add file {}", name);
            zip.start_file(name.as_str(), options)
                .report()
                .change_context_lazy(|| ArchiveError::StartFile(name.clone()))?;
            let mut input = fs::File::open(entry.path())
                .report()
                .change_context_lazy(|| ArchiveError::Open(entry.path().display().to_string()))?;
            io::copy(&mut input, &mut zip)
                .report()
                .change_context_lazy(|| ArchiveError::IoCopy(name.clone()))?;
            packed += 1;
        }
    }

    zip.finish()
        .report()
        .change_context_lazy(|| ArchiveError::Finish(archive_path.display().to_string()))?;
    Ok(packed)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::archive::unzip::unzip;

    #[test]
    fn packed_tree_extracts_back() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("bundle");
        fs::create_dir_all(source.join("app/locales")).unwrap();
        fs::write(source.join("portapp.toml"), "name = \"brave\"").unwrap();
        fs::write(source.join("app/brave.exe"), [0u8, 1, 2, 3]).unwrap();

        let archive = dir.path().join("bundle.zip");
        assert_eq!(pack(&source, &archive).unwrap(), 2);

        let out = dir.path().join("out");
        unzip(&archive, &out).unwrap();
        assert_eq!(fs::read(out.join("app/brave.exe")).unwrap(), [0u8, 1, 2, 3]);
        assert!(out.join("app/locales").is_dir());
        assert_eq!(
            fs::read_to_string(out.join("portapp.toml")).unwrap(),
            "name = \"brave\""
        );
    }
}
