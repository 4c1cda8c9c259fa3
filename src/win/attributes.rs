use std::path::Path;

use log::debug;

use super::OsResult;

pub const FILE_ATTRIBUTE_READONLY: u32 = 0x1;
pub const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
pub const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;
pub const FILE_ATTRIBUTE_ARCHIVE: u32 = 0x20;
pub const FILE_ATTRIBUTE_NORMAL: u32 = 0x80;

/// Applies the raw attribute bitmask `attrs` to `path`.
pub fn set_file_attributes(path: impl AsRef<Path>, attrs: u32) -> OsResult<()> {
    debug!("Set attributes {:#x} on {}", attrs, path.as_ref().display());
    imp::set_file_attributes(path.as_ref(), attrs)
}

#[cfg(windows)]
mod imp {
    use std::path::Path;

    use error_stack::{IntoReport, ResultExt};
    use windows::{
        core::PCWSTR,
        Win32::Storage::FileSystem::{SetFileAttributesW, FILE_FLAGS_AND_ATTRIBUTES},
    };

    use crate::win::{to_wide, OsError, OsResult};

    pub(super) fn set_file_attributes(path: &Path, attrs: u32) -> OsResult<()> {
        let wide = to_wide(path);
        unsafe { SetFileAttributesW(PCWSTR(wide.as_ptr()), FILE_FLAGS_AND_ATTRIBUTES(attrs)) }
            .report()
            .change_context_lazy(|| OsError::SetAttributes(path.display().to_string()))
    }
}

#[cfg(not(windows))]
mod imp {
    use std::path::Path;

    use error_stack::Report;

    use crate::win::{OsError, OsResult};

    pub(super) fn set_file_attributes(_path: &Path, _attrs: u32) -> OsResult<()> {
        Err(Report::new(OsError::Unsupported))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(windows)]
    #[test]
    fn toggles_readonly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        std::fs::write(&path, "x").unwrap();

        set_file_attributes(&path, FILE_ATTRIBUTE_READONLY).unwrap();
        assert!(std::fs::metadata(&path).unwrap().permissions().readonly());

        set_file_attributes(&path, FILE_ATTRIBUTE_NORMAL).unwrap();
        assert!(!std::fs::metadata(&path).unwrap().permissions().readonly());
    }

    #[cfg(not(windows))]
    #[test]
    fn unsupported_outside_windows() {
        let err = set_file_attributes("whatever", FILE_ATTRIBUTE_HIDDEN).unwrap_err();
        assert_eq!(err.current_context(), &crate::win::OsError::Unsupported);
    }
}
