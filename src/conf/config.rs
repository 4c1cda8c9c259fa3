#[cfg(test)]
use mockall::automock;

use std::{
    fs,
    path::{Path, PathBuf},
};

use error_stack::{IntoReport, ResultExt};

use super::{
    config_struct::ConfigError,
    properties::{ConfigResult, Properties},
};

pub const DEFAULT_CONFIG_FILENAME: &str = "build.toml";

pub struct BuildConfigProvider {
    filename: PathBuf,
}

#[cfg_attr(test, automock)]
pub trait ConfigProvider {
    fn load_from_file(&self) -> ConfigResult<Properties>;
}

impl ConfigProvider for BuildConfigProvider {
    fn load_from_file(&self) -> ConfigResult<Properties> {
        let content = fs::read_to_string(&self.filename)
            .report()
            .change_context(ConfigError::ConfigFile)
            .attach_printable_lazy(|| format!("Error reading {}", self.filename.display()))?;

        Properties::from_toml(&content)
            .attach_printable_lazy(|| format!("Error parsing {}", self.filename.display()))
    }
}

impl BuildConfigProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        BuildConfigProvider {
            filename: path.as_ref().to_path_buf(),
        }
    }
}
