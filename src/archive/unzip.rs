use std::{
    fs, io,
    path::{Path, PathBuf},
};

use error_stack::{IntoReport, ResultExt};
use log::{debug, info, trace, warn};

use super::{ArchiveError, ArchiveResult};

/// Extracts `file_to_unzip` below `destination` and returns the number of
/// files written. Entries whose name would escape `destination` are skipped.
pub fn unzip(file_to_unzip: impl AsRef<Path>, destination: impl AsRef<Path>) -> ArchiveResult<usize> {
    info!(
        "Unzipping files from {} to {}",
        file_to_unzip.as_ref().display(),
        destination.as_ref().display()
    );
    let file = fs::File::open(&file_to_unzip)
        .report()
        .change_context_lazy(|| ArchiveError::Open(file_to_unzip.as_ref().display().to_string()))?;

    let mut archive = zip::ZipArchive::new(file)
        .report()
        .change_context(ArchiveError::ZipNew)?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .report()
            .change_context(ArchiveError::ByIndex(i))?;
        let outpath = match file.enclosed_name() {
            Some(path) => path.to_owned(),
            None => {
                warn!("Skip entry {} with unsafe name {:?}", i, file.name());
                continue;
            }
        };

        let final_path: PathBuf = destination.as_ref().join(outpath);

        {
            let comment = file.comment();
            if !comment.is_empty() {
                debug!("File {} comment: {}", i, comment);
            }
        }

        if file.is_dir() {
            trace!("Folder {} extracted to \"{}\"", i, final_path.display());
            fs::create_dir_all(&final_path)
                .report()
                .change_context_lazy(|| ArchiveError::CreateDir(final_path.display().to_string()))?;
        } else {
            trace!(
                "File {} extracted to \"{}\" ({} bytes)",
                i,
                final_path.display(),
                file.size()
            );

            if let Some(p) = final_path.parent() {
                if !p.exists() {
                    fs::create_dir_all(p)
                        .report()
                        .change_context_lazy(|| ArchiveError::CreateDir(p.display().to_string()))?;
                }
            }

            let mut outfile = fs::File::create(&final_path)
                .report()
                .change_context_lazy(|| ArchiveError::FileCreate(final_path.display().to_string()))?;
            io::copy(&mut file, &mut outfile)
                .report()
                .change_context_lazy(|| ArchiveError::IoCopy(final_path.display().to_string()))?;
            extracted += 1;
        }

        // Get and Set permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            if let Some(mode) = file.unix_mode() {
                fs::set_permissions(&final_path, fs::Permissions::from_mode(mode))
                    .report()
                    .change_context_lazy(|| {
                        ArchiveError::SetPermissions(final_path.display().to_string())
                    })?;
            }
        }
    }

    Ok(extracted)
}
