use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use error_stack::Result;
use log::info;

#[derive(Debug, PartialEq)]
pub enum ShortcutError {
    Init,
    Property(&'static str),
    Save(String),
    Thread,
    Unsupported,
}

impl Display for ShortcutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutError::Init => write!(f, "Cannot initialize the shell link object"),
            ShortcutError::Property(name) => write!(f, "Cannot set shortcut property {}", name),
            ShortcutError::Save(path) => write!(f, "Cannot save shortcut {}", path),
            ShortcutError::Thread => write!(f, "Shortcut worker thread panicked"),
            ShortcutError::Unsupported => write!(f, "Shortcuts are only available on Windows"),
        }
    }
}

impl Error for ShortcutError {}

pub type ShortcutResult<T> = Result<T, ShortcutError>;

/// One optional shortcut field. An empty value is only written when `clear`
/// is set, which removes the field from an existing shortcut.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortcutProperty {
    pub value: String,
    pub clear: bool,
}

impl ShortcutProperty {
    pub fn value(value: impl Into<String>) -> Self {
        ShortcutProperty {
            value: value.into(),
            clear: false,
        }
    }

    pub fn clear() -> Self {
        ShortcutProperty {
            value: String::new(),
            clear: true,
        }
    }

    pub fn should_apply(&self) -> bool {
        !self.value.is_empty() || self.clear
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowsShortcut {
    pub shortcut_path: PathBuf,
    pub target_path: PathBuf,
    pub arguments: ShortcutProperty,
    pub description: ShortcutProperty,
    /// Shell notation `path[,index]`.
    pub icon_location: ShortcutProperty,
    pub working_directory: ShortcutProperty,
}

/// Splits `C:\app\app.exe,2` into the icon path and its index.
pub fn split_icon_location(location: &str) -> (&str, i32) {
    match location.rsplit_once(',') {
        Some((path, index)) => match index.trim().parse::<i32>() {
            Ok(index) => (path, index),
            Err(_) => (location, 0),
        },
        None => (location, 0),
    }
}

/// Creates or replaces the shortcut described by `shortcut`.
///
/// The shell link object lives in a single-threaded apartment, so the work
/// runs on its own thread which enters the apartment, writes the `.lnk` and
/// leaves it again before being joined.
pub fn create_shortcut(shortcut: &WindowsShortcut) -> ShortcutResult<()> {
    info!(
        "Create shortcut for {} in {}...",
        shortcut.target_path.display(),
        shortcut.shortcut_path.display()
    );
    imp::create_shortcut(shortcut)
}

#[cfg(windows)]
mod imp {
    use std::thread;

    use error_stack::Report;
    use windows::{
        core::{Interface, PCWSTR},
        Win32::{
            System::Com::{CoCreateInstance, IPersistFile, CLSCTX_INPROC_SERVER},
            UI::Shell::{IShellLinkW, ShellLink},
        },
    };

    use super::{split_icon_location, ShortcutError, ShortcutResult, WindowsShortcut};
    use crate::win::{com::ComApartment, to_wide};

    pub(super) fn create_shortcut(shortcut: &WindowsShortcut) -> ShortcutResult<()> {
        thread::scope(|scope| {
            scope
                .spawn(|| write_link(shortcut))
                .join()
                .unwrap_or_else(|_| Err(Report::new(ShortcutError::Thread)))
        })
    }

    fn write_link(shortcut: &WindowsShortcut) -> ShortcutResult<()> {
        let _apartment = ComApartment::enter()
            .map_err(|err| Report::new(ShortcutError::Init).attach_printable(err.to_string()))?;

        let link: IShellLinkW = unsafe { CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER) }
            .map_err(|err| Report::new(ShortcutError::Init).attach_printable(err.to_string()))?;
        let file: IPersistFile = link
            .cast()
            .map_err(|err| Report::new(ShortcutError::Init).attach_printable(err.to_string()))?;

        let target = to_wide(&shortcut.target_path);
        unsafe { link.SetPath(PCWSTR(target.as_ptr())) }
            .map_err(|err| property_error("TargetPath", err))?;

        if shortcut.arguments.should_apply() {
            let value = to_wide(&shortcut.arguments.value);
            unsafe { link.SetArguments(PCWSTR(value.as_ptr())) }
                .map_err(|err| property_error("Arguments", err))?;
        }
        if shortcut.description.should_apply() {
            let value = to_wide(&shortcut.description.value);
            unsafe { link.SetDescription(PCWSTR(value.as_ptr())) }
                .map_err(|err| property_error("Description", err))?;
        }
        if shortcut.icon_location.should_apply() {
            let (path, index) = split_icon_location(&shortcut.icon_location.value);
            let value = to_wide(path);
            unsafe { link.SetIconLocation(PCWSTR(value.as_ptr()), index) }
                .map_err(|err| property_error("IconLocation", err))?;
        }
        if shortcut.working_directory.should_apply() {
            let value = to_wide(&shortcut.working_directory.value);
            unsafe { link.SetWorkingDirectory(PCWSTR(value.as_ptr())) }
                .map_err(|err| property_error("WorkingDirectory", err))?;
        }

        let path = to_wide(&shortcut.shortcut_path);
        unsafe { file.Save(PCWSTR(path.as_ptr()), true.into()) }
            .map_err(|err| {
                Report::new(ShortcutError::Save(
                    shortcut.shortcut_path.display().to_string(),
                ))
                .attach_printable(err.message().to_string())
            })?;

        Ok(())
    }

    fn property_error(name: &'static str, err: windows::core::Error) -> Report<ShortcutError> {
        Report::new(ShortcutError::Property(name)).attach_printable(err.to_string())
    }
}

#[cfg(not(windows))]
mod imp {
    use error_stack::Report;

    use super::{ShortcutError, ShortcutResult, WindowsShortcut};

    pub(super) fn create_shortcut(_shortcut: &WindowsShortcut) -> ShortcutResult<()> {
        Err(Report::new(ShortcutError::Unsupported))
    }
}
