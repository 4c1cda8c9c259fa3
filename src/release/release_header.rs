use std::{
    error::Error,
    fmt::{self},
    path::PathBuf,
};

use error_stack::Result;
use log::Level;

use crate::{
    conf::{
        config::ConfigProvider,
        config_struct::{Arch, ArchParams, BuildParams},
        properties::Properties,
    },
    download::Downloader,
};

pub type ResultReleaseErr<T> = Result<T, ReleaseError>;

/// Transient marker holding the build id while archs are released.
pub const BUILD_ID_MARKER: &str = "buildid";
/// Survives the cleanup of the temp folder.
pub const VERSION_FILENAME: &str = "version.dat";
pub const MANIFEST_FILENAME: &str = "portapp.toml";
pub const APP_FOLDER: &str = "app";

pub struct ReleaseManager {
    pub properties: Properties,
    pub overrides: Vec<String>,
    pub params: Option<BuildParams>,
    pub config_provider: Box<dyn ConfigProvider>,
    pub downloader: Box<dyn Downloader>,
    pub state: ReleaseManagerState,
}

#[derive(Default, Debug)]
pub struct ReleaseManagerState {
    pub skip_next: bool,
    pub build_id: Option<String>,
    pub released: Vec<Arch>,
    pub packages: Vec<PathBuf>,
}

pub trait ReleaseThings {
    fn load_config(&mut self) -> ResultReleaseErr<&mut Self>;
    fn validate(&mut self) -> ResultReleaseErr<&mut Self>;
    fn set_title(&mut self) -> ResultReleaseErr<&mut Self>;
    fn prepare_folders(&mut self) -> ResultReleaseErr<&mut Self>;
    fn release(&mut self) -> ResultReleaseErr<&mut Self>;
    fn release_arch(
        &self,
        params: &BuildParams,
        arch: &ArchParams,
        build_id: &str,
    ) -> ResultReleaseErr<PathBuf>;
    fn stamp_build_id(&self, params: &BuildParams, build_id: &str) -> ResultReleaseErr<()>;
    fn finalize(&mut self) -> ResultReleaseErr<&mut Self>;
    fn cleanup(&mut self) -> ResultReleaseErr<&mut Self>;
    fn bind(
        &mut self,
        cb: impl Fn(&mut ReleaseManager) -> ResultReleaseErr<&mut Self>,
        log_level: Level,
    ) -> &mut Self;
    fn or_log_err(
        &mut self,
        cb: impl Fn(&mut ReleaseManager) -> ResultReleaseErr<&mut Self>,
        log_level: Level,
    ) -> &mut Self;
}

#[derive(Debug, PartialEq)]
pub enum ReleaseError {
    LoadConfig,
    Validation,
    NotValidated,
    ConsoleTitle,
    Download(Arch),
    Extract(Arch),
    AssertExtract(String),
    Bundle(Arch),
    Manifest(Arch),
    Package(Arch),
    BuildIdMarker,
    VersionMarker,
    Cleanup(String),
}

impl fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseError::LoadConfig => write!(f, "LoadConfig"),
            ReleaseError::Validation => write!(f, "Validation failed"),
            ReleaseError::NotValidated => write!(f, "Build parameters are not validated"),
            ReleaseError::ConsoleTitle => write!(f, "ConsoleTitle"),
            ReleaseError::Download(arch) => write!(f, "Download of {} archive failed", arch),
            ReleaseError::Extract(arch) => write!(f, "Extraction of {} archive failed", arch),
            ReleaseError::AssertExtract(path) => {
                write!(f, "Extraction check failed, {} not found", path)
            }
            ReleaseError::Bundle(arch) => write!(f, "Cannot assemble {} bundle", arch),
            ReleaseError::Manifest(arch) => write!(f, "Cannot write {} manifest", arch),
            ReleaseError::Package(arch) => write!(f, "Cannot package {} bundle", arch),
            ReleaseError::BuildIdMarker => write!(f, "BuildIdMarker"),
            ReleaseError::VersionMarker => write!(f, "VersionMarker"),
            ReleaseError::Cleanup(path) => write!(f, "Cannot clean {}", path),
        }
    }
}

impl Error for ReleaseError {}
