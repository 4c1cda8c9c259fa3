//! Thin wrappers over Windows primitives used while packaging.
//!
//! Every call returns [`OsError::Unsupported`] (or the matching shortcut
//! error) on other platforms so callers stay platform agnostic.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

pub mod attributes;
#[cfg(windows)]
mod com;
pub mod console;
pub mod shortcut;
pub mod winver;

#[derive(Debug, PartialEq)]
pub enum OsError {
    SetAttributes(String),
    LoadLibrary(String),
    ProcNotFound(String),
    ConsoleTitle,
    Version,
    Unsupported,
}

impl Display for OsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OsError::SetAttributes(path) => write!(f, "Cannot set attributes of {}", path),
            OsError::LoadLibrary(name) => write!(f, "Cannot load {}", name),
            OsError::ProcNotFound(name) => write!(f, "Entry point {} not found", name),
            OsError::ConsoleTitle => write!(f, "Cannot set console title"),
            OsError::Version => write!(f, "Cannot read OS version"),
            OsError::Unsupported => write!(f, "Only available on Windows"),
        }
    }
}

impl Error for OsError {}

pub type OsResult<T> = error_stack::Result<T, OsError>;

/// Null terminated UTF-16 copy of `s` for `PCWSTR` arguments.
#[cfg(windows)]
pub(crate) fn to_wide(s: impl AsRef<std::ffi::OsStr>) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;

    s.as_ref().encode_wide().chain(std::iter::once(0)).collect()
}
