use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

pub mod pack;
pub mod unzip;

#[derive(Debug, PartialEq)]
pub enum ArchiveError {
    Open(String),
    ZipNew,
    ByIndex(usize),
    CreateDir(String),
    FileCreate(String),
    IoCopy(String),
    SetPermissions(String),
    Walk(String),
    StartFile(String),
    Finish(String),
}

impl Display for ArchiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::Open(path) => write!(f, "Cannot open archive {}", path),
            ArchiveError::ZipNew => write!(f, "Not a zip archive"),
            ArchiveError::ByIndex(index) => write!(f, "Cannot read archive entry {}", index),
            ArchiveError::CreateDir(path) => write!(f, "Cannot create folder {}", path),
            ArchiveError::FileCreate(path) => write!(f, "Cannot create {}", path),
            ArchiveError::IoCopy(path) => write!(f, "Cannot copy data for {}", path),
            ArchiveError::SetPermissions(path) => write!(f, "Cannot set permissions of {}", path),
            ArchiveError::Walk(path) => write!(f, "Cannot walk {}", path),
            ArchiveError::StartFile(name) => write!(f, "Cannot add {} to archive", name),
            ArchiveError::Finish(path) => write!(f, "Cannot finish archive {}", path),
        }
    }
}

impl Error for ArchiveError {}

pub type ArchiveResult<T> = error_stack::Result<T, ArchiveError>;
