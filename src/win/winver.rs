use std::fmt::{self, Display, Formatter};

use log::debug;

use super::OsResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WinVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl Display for WinVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// Real kernel version. `RtlGetVersion` is not subject to the
/// compatibility shims that make `GetVersionEx` lie to unmanifested
/// processes.
pub fn raw_winver() -> OsResult<WinVersion> {
    let version = imp::raw_winver()?;
    debug!("Windows version {}", version);
    Ok(version)
}

#[cfg(windows)]
mod imp {
    use error_stack::Report;
    use windows::{
        Wdk::System::SystemServices::RtlGetVersion,
        Win32::System::SystemInformation::OSVERSIONINFOW,
    };

    use super::WinVersion;
    use crate::win::{OsError, OsResult};

    pub(super) fn raw_winver() -> OsResult<WinVersion> {
        let mut info = OSVERSIONINFOW {
            dwOSVersionInfoSize: std::mem::size_of::<OSVERSIONINFOW>() as u32,
            ..Default::default()
        };
        unsafe { RtlGetVersion(&mut info) }
            .ok()
            .map_err(|err| Report::new(OsError::Version).attach_printable(err.to_string()))?;
        Ok(WinVersion {
            major: info.dwMajorVersion,
            minor: info.dwMinorVersion,
            build: info.dwBuildNumber,
        })
    }
}

#[cfg(not(windows))]
mod imp {
    use error_stack::Report;

    use super::WinVersion;
    use crate::win::{OsError, OsResult};

    pub(super) fn raw_winver() -> OsResult<WinVersion> {
        Err(Report::new(OsError::Unsupported))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_triple() {
        let version = WinVersion {
            major: 10,
            minor: 0,
            build: 22631,
        };
        assert_eq!(version.to_string(), "10.0.22631");
        assert!(version > WinVersion { major: 6, minor: 3, build: 9600 });
    }

    #[cfg(windows)]
    #[test]
    fn reads_a_plausible_version() {
        let version = raw_winver().unwrap();
        assert!(version.major >= 6);
    }
}
