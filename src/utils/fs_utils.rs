use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};

use error_stack::{IntoReport, Report, Result, ResultExt};
use log::{error, info, trace};
use walkdir::WalkDir;

pub type FsResult<T> = Result<T, FsError>;

#[derive(Debug)]
pub enum FsError {
    Open(String),
    Create(String),
    Copy(String),
    Sync(String),
    Read(String),
    Write(String),
    Remove(String),
    CreateDir(String),
    Walk(String),
}

impl Display for FsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FsError::Open(path) => write!(f, "Cannot open {}", path),
            FsError::Create(path) => write!(f, "Cannot create {}", path),
            FsError::Copy(path) => write!(f, "Cannot copy to {}", path),
            FsError::Sync(path) => write!(f, "Cannot flush {} to disk", path),
            FsError::Read(path) => write!(f, "Cannot read {}", path),
            FsError::Write(path) => write!(f, "Cannot write {}", path),
            FsError::Remove(path) => write!(f, "Cannot remove {}", path),
            FsError::CreateDir(path) => write!(f, "Cannot create folder {}", path),
            FsError::Walk(path) => write!(f, "Cannot walk folder {}", path),
        }
    }
}

impl Error for FsError {}

fn display(path: impl AsRef<Path>) -> String {
    path.as_ref().display().to_string()
}

/// Copies `src` into `dest` and forces the destination to stable storage.
///
/// The destination is written in place, so a failure in the middle of the
/// copy can leave a truncated file behind.
pub fn copy_file(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> FsResult<()> {
    let mut src_file = File::open(&src)
        .report()
        .change_context_lazy(|| FsError::Open(display(&src)))?;
    let mut dest_file = File::create(&dest)
        .report()
        .change_context_lazy(|| FsError::Create(display(&dest)))?;

    io::copy(&mut src_file, &mut dest_file)
        .report()
        .change_context_lazy(|| FsError::Copy(display(&dest)))
        .attach_printable_lazy(|| format!("source {}", display(&src)))?;

    dest_file
        .sync_all()
        .report()
        .change_context_lazy(|| FsError::Sync(display(&dest)))?;
    Ok(())
}

/// Mirrors the `src` tree into `dest`, creating folders on the way.
/// Stops at the first entry that fails.
pub fn copy_folder(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> FsResult<()> {
    let src = src.as_ref();
    let dest = dest.as_ref();
    create_folder_check(dest)?;

    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry
            .report()
            .change_context_lazy(|| FsError::Walk(display(src)))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .report()
            .change_context_lazy(|| FsError::Walk(display(src)))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            trace!("Create folder {}", target.display());
            create_folder_check(&target)?;
        } else {
            trace!("Copy {} to {}", entry.path().display(), target.display());
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Removes every entry inside `dir` while keeping `dir` itself.
pub fn remove_contents(dir: impl AsRef<Path>) -> FsResult<()> {
    remove_contents_except(dir, &[])
}

/// [`remove_contents`] that never touches the direct children named in `keep`.
pub fn remove_contents_except(dir: impl AsRef<Path>, keep: &[&str]) -> FsResult<()> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir)
        .report()
        .change_context_lazy(|| FsError::Open(display(dir)))?;

    for entry in entries {
        let entry = entry
            .report()
            .change_context_lazy(|| FsError::Read(display(dir)))?;
        if keep.iter().any(|name| entry.file_name() == *name) {
            trace!("Keep {}", display(entry.path()));
            continue;
        }
        let path = entry.path();
        let file_type = entry
            .file_type()
            .report()
            .change_context_lazy(|| FsError::Read(display(&path)))?;
        let removed = if file_type.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed
            .report()
            .change_context_lazy(|| FsError::Remove(display(&path)))?;
    }
    Ok(())
}

/// Creates `path` and any missing parent. Succeeds when it already exists.
pub fn create_folder_check(path: impl AsRef<Path>) -> FsResult<PathBuf> {
    fs::create_dir_all(&path)
        .report()
        .change_context_lazy(|| FsError::CreateDir(display(&path)))?;
    Ok(path.as_ref().to_path_buf())
}

/// Same as [`create_folder_check`] for setup steps that cannot go on
/// without the folder: a failure is logged and ends the process.
pub fn create_folder(path: impl AsRef<Path>) -> PathBuf {
    info!("Create folder {}...", path.as_ref().display());
    match create_folder_check(&path) {
        Ok(path) => path,
        Err(err) => {
            error!("Cannot create folder: {:?}", err);
            process::exit(1);
        }
    }
}

/// Creates or truncates `path`, writes `content` and syncs it.
pub fn create_file(path: impl AsRef<Path>, content: &str) -> FsResult<()> {
    let mut file = File::create(&path)
        .report()
        .change_context_lazy(|| FsError::Create(display(&path)))?;
    file.write_all(content.as_bytes())
        .report()
        .change_context_lazy(|| FsError::Write(display(&path)))?;
    file.sync_all()
        .report()
        .change_context_lazy(|| FsError::Sync(display(&path)))?;
    Ok(())
}

/// Creates or truncates `path` and writes `content` without syncing.
pub fn write_to_file(path: impl AsRef<Path>, content: &str) -> FsResult<()> {
    let mut file = File::create(&path)
        .report()
        .change_context_lazy(|| FsError::Create(display(&path)))?;
    file.write_all(content.as_bytes())
        .report()
        .change_context_lazy(|| FsError::Write(display(&path)))?;
    Ok(())
}

/// Reports whether `path` exists. Only a `NotFound` answer from the OS
/// counts as missing.
pub fn exists(path: impl AsRef<Path>) -> bool {
    match fs::metadata(path) {
        Ok(_) => true,
        Err(err) => err.kind() != io::ErrorKind::NotFound,
    }
}

pub fn is_dir_empty(path: impl AsRef<Path>) -> FsResult<bool> {
    let mut entries = fs::read_dir(&path)
        .report()
        .change_context_lazy(|| FsError::Open(display(&path)))?;
    match entries.next() {
        None => Ok(true),
        Some(Ok(_)) => Ok(false),
        Some(Err(err)) => Err(Report::new(err).change_context(FsError::Read(display(&path)))),
    }
}

/// Replaces every line of `path` starting with `prefix` by `replace`.
/// Lines are split and joined on `\n` only.
pub fn replace_by_prefix(path: impl AsRef<Path>, prefix: &str, replace: &str) -> FsResult<()> {
    let input = fs::read_to_string(&path)
        .report()
        .change_context_lazy(|| FsError::Read(display(&path)))?;

    let output = input
        .split('\n')
        .map(|line| if line.starts_with(prefix) { replace } else { line })
        .collect::<Vec<&str>>()
        .join("\n");

    fs::write(&path, output)
        .report()
        .change_context_lazy(|| FsError::Write(display(&path)))?;
    Ok(())
}
