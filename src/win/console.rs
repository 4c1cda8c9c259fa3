use log::debug;

use super::OsResult;

/// Sets the console window title through a dynamically loaded
/// `SetConsoleTitleW` and returns its raw result.
pub fn set_console_title(title: &str) -> OsResult<i32> {
    debug!("Set console title {}", title);
    imp::set_console_title(title)
}

#[cfg(windows)]
mod imp {
    use error_stack::{Report, ResultExt};
    use windows::{
        core::{s, w, PCWSTR},
        Win32::{
            Foundation::{FreeLibrary, HMODULE},
            System::LibraryLoader::{GetProcAddress, LoadLibraryW},
        },
    };

    use crate::win::{to_wide, OsError, OsResult};

    const KERNEL32: &str = "kernel32.dll";
    const SET_CONSOLE_TITLE: &str = "SetConsoleTitleW";

    type SetConsoleTitleFn = unsafe extern "system" fn(PCWSTR) -> i32;

    /// Frees the library handle on every exit path.
    struct Library(HMODULE);

    impl Drop for Library {
        fn drop(&mut self) {
            let _ = unsafe { FreeLibrary(self.0) };
        }
    }

    pub(super) fn set_console_title(title: &str) -> OsResult<i32> {
        let library = unsafe { LoadLibraryW(w!("kernel32.dll")) }
            .map(Library)
            .map_err(|err| {
                Report::new(OsError::LoadLibrary(KERNEL32.to_string()))
                    .attach_printable(err.to_string())
            })?;

        let proc = unsafe { GetProcAddress(library.0, s!("SetConsoleTitleW")) }
            .ok_or_else(|| Report::new(OsError::ProcNotFound(SET_CONSOLE_TITLE.to_string())))?;
        let set_title: SetConsoleTitleFn = unsafe { std::mem::transmute(proc) };

        let wide = to_wide(title);
        let result = unsafe { set_title(PCWSTR(wide.as_ptr())) };
        if result == 0 {
            return Err(Report::new(OsError::ConsoleTitle))
                .attach_printable(windows::core::Error::from_win32().to_string());
        }
        Ok(result)
    }
}

#[cfg(not(windows))]
mod imp {
    use error_stack::Report;

    use crate::win::{OsError, OsResult};

    pub(super) fn set_console_title(_title: &str) -> OsResult<i32> {
        Err(Report::new(OsError::Unsupported))
    }
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;
    use crate::win::OsError;

    #[test]
    fn unsupported_outside_windows() {
        let err = set_console_title("portapps").unwrap_err();
        assert_eq!(err.current_context(), &OsError::Unsupported);
    }
}
