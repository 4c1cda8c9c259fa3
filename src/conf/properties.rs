use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use error_stack::{IntoReport, Report, Result, ResultExt};
use log::{debug, trace};
use toml::Value;

use super::config_struct::{Arch, ArchParams, BuildParams, ConfigError};

pub type ConfigResult<T> = Result<T, ConfigError>;

pub const APP_NAME: &str = "app.name";
pub const APP_TYPE: &str = "app.type";
pub const APP_VERSION: &str = "app.version";
pub const BUILD_PATH: &str = "build.path";
pub const SETUP_PATH: &str = "setup.path";
pub const TMP_PATH: &str = "tmp.path";
pub const RELEASE_PATH: &str = "release.path";
pub const DEBUG: &str = "debug";

const DEFAULT_PATHS: [(&str, &str); 4] = [
    (BUILD_PATH, "build"),
    (SETUP_PATH, "setup"),
    (TMP_PATH, "tmp"),
    (RELEASE_PATH, "dist"),
];

/// Flat `key=value` bag. Nested TOML tables become dotted keys.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let value = content
            .parse::<Value>()
            .report()
            .change_context(ConfigError::Deserializer)?;
        let mut properties = Properties::new();
        properties.flatten(None, &value)?;
        trace!("Properties from toml {:#?}", properties.values);
        Ok(properties)
    }

    fn flatten(&mut self, prefix: Option<&str>, value: &Value) -> ConfigResult<()> {
        let key = || prefix.unwrap_or_default().to_string();
        match value {
            Value::Table(table) => {
                for (name, child) in table {
                    let child_key = match prefix {
                        Some(prefix) => format!("{}.{}", prefix, name),
                        None => name.to_string(),
                    };
                    self.flatten(Some(&child_key), child)?;
                }
            }
            Value::String(s) => self.set(key(), s.to_string()),
            Value::Boolean(b) => self.set(key(), b.to_string()),
            Value::Integer(i) => self.set(key(), i.to_string()),
            Value::Float(f) => self.set(key(), f.to_string()),
            Value::Datetime(d) => self.set(key(), d.to_string()),
            Value::Array(_) => return Err(Report::new(ConfigError::UnsupportedValue(key()))),
        }
        Ok(())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Applies `key=value` overrides on top of the current values.
    pub fn apply_overrides(&mut self, overrides: &[String]) -> ConfigResult<()> {
        for raw in overrides {
            let (key, value) = raw
                .split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .ok_or_else(|| Report::new(ConfigError::InvalidOverride(raw.to_string())))?;
            debug!("Override {} = {}", key.trim(), value);
            self.set(key.trim(), value);
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Value of `key` when it is defined and not empty.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }

    pub fn flag(&self, key: &str) -> ConfigResult<bool> {
        match self.get(key).map(|v| v.trim().to_ascii_lowercase()) {
            None => Ok(false),
            Some(v) => match v.as_str() {
                "" | "false" | "0" | "no" | "off" => Ok(false),
                "true" | "1" | "yes" | "on" => Ok(true),
                _ => Err(Report::new(ConfigError::InvalidProperty(key.to_string())))
                    .attach_printable(format!("got {}", v)),
            },
        }
    }

    fn required(&self, key: &str, missing: &mut Vec<String>) -> String {
        match self.non_empty(key) {
            Some(value) => value.to_string(),
            None => {
                missing.push(key.to_string());
                String::new()
            }
        }
    }

    /// Checks required properties and builds the typed parameters.
    /// Every missing key is reported at once.
    pub fn to_build_params(&self) -> ConfigResult<BuildParams> {
        let mut missing = Vec::new();
        let app_name = self.required(APP_NAME, &mut missing);
        let app_type = self.required(APP_TYPE, &mut missing);
        let app_version = self.required(APP_VERSION, &mut missing);

        let mut archs = Vec::new();
        for arch in Arch::ALL {
            let url = match self.non_empty(&arch.property("url")) {
                Some(url) => url.to_string(),
                None => continue,
            };
            let filename = self.required(&arch.property("filename"), &mut missing);
            let ext = self.required(&arch.property("ext"), &mut missing);
            let assert_key = arch.property("assertextract");
            let assert_extract = match self.get(&assert_key) {
                Some(value) if !is_inside_relative(value.trim()) => {
                    return Err(Report::new(ConfigError::InvalidProperty(assert_key)))
                        .attach_printable(format!(
                            "{} must be relative to the extraction folder",
                            value
                        ));
                }
                Some(value) => value.trim().to_string(),
                None => {
                    missing.push(assert_key);
                    String::new()
                }
            };
            archs.push(ArchParams {
                arch,
                url,
                filename,
                ext,
                assert_extract,
            });
        }

        if !missing.is_empty() {
            return Err(Report::new(ConfigError::MissingProperties(missing)));
        }
        if archs.is_empty() {
            return Err(Report::new(ConfigError::NoArchToRelease));
        }

        let path = |key: &str| -> PathBuf {
            let default = DEFAULT_PATHS
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, default)| *default)
                .unwrap_or_default();
            PathBuf::from(self.non_empty(key).unwrap_or(default))
        };

        Ok(BuildParams {
            app_name,
            app_type,
            app_version,
            build_path: path(BUILD_PATH),
            setup_path: path(SETUP_PATH),
            tmp_path: path(TMP_PATH),
            release_path: path(RELEASE_PATH),
            debug: self.flag(DEBUG)?,
            archs,
        })
    }
}

/// True for a path that stays below the folder it is joined to, with either
/// separator: no root, no drive and no `..` segment.
fn is_inside_relative(value: &str) -> bool {
    let path = Path::new(value);
    !path.has_root()
        && !path.is_absolute()
        && !value.starts_with(|c: char| c == '/' || c == '\\')
        && !value.contains(':')
        && value
            .split(|c: char| c == '/' || c == '\\')
            .all(|segment| segment != "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = r#"
        debug = false

        [app]
        name = "brave"
        type = "chromium"
        version = "1.2.3"

        [atf.win64]
        url = "https://example.com/brave-x64.zip"
        filename = "brave-x64"
        ext = "zip"
        assertextract = "brave.exe"

        [tmp]
        path = "work/tmp"
    "#;

    #[test]
    fn flattens_nested_tables() {
        let properties = Properties::from_toml(CONTENT).unwrap();
        assert_eq!(properties.get("app.name"), Some("brave"));
        assert_eq!(properties.get("atf.win64.ext"), Some("zip"));
        assert_eq!(properties.get("debug"), Some("false"));
        assert_eq!(properties.get("tmp.path"), Some("work/tmp"));
        assert!(!properties.is_set("atf.win32.url"));
    }

    #[test]
    fn rejects_arrays() {
        let err = Properties::from_toml("list = [1, 2]").unwrap_err();
        assert_eq!(
            err.current_context(),
            &ConfigError::UnsupportedValue("list".to_string())
        );
    }

    #[test]
    fn overrides_win() {
        let mut properties = Properties::from_toml(CONTENT).unwrap();
        properties
            .apply_overrides(&["app.version=2.0.0".to_string(), "debug=true".to_string()])
            .unwrap();
        assert_eq!(properties.get("app.version"), Some("2.0.0"));
        assert!(properties.flag("debug").unwrap());

        let err = properties
            .apply_overrides(&["no-equal-sign".to_string()])
            .unwrap_err();
        assert_eq!(
            err.current_context(),
            &ConfigError::InvalidOverride("no-equal-sign".to_string())
        );
    }

    #[test]
    fn builds_params_with_defaults() {
        let params = Properties::from_toml(CONTENT)
            .unwrap()
            .to_build_params()
            .unwrap();
        assert_eq!(params.app_name, "brave");
        assert_eq!(params.build_path, PathBuf::from("build"));
        assert_eq!(params.tmp_path, PathBuf::from("work/tmp"));
        assert_eq!(params.release_path, PathBuf::from("dist"));
        assert!(!params.debug);
        assert_eq!(params.archs.len(), 1);
        assert_eq!(params.archs[0].arch, Arch::Win64);
        assert_eq!(params.archs[0].archive_name(), "brave-x64.zip");
        assert!(params.archs[0].is_zip());
        assert_eq!(params.package_name(Arch::Win64), "brave-1.2.3-win64.zip");
    }

    #[test]
    fn names_every_missing_property() {
        let mut properties = Properties::new();
        properties.set("app.name", "brave");
        properties.set("atf.win32.url", "https://example.com/a.7z");
        properties.set("atf.win32.ext", "7z");

        let err = properties.to_build_params().unwrap_err();
        assert_eq!(
            err.current_context(),
            &ConfigError::MissingProperties(vec![
                "app.type".to_string(),
                "app.version".to_string(),
                "atf.win32.filename".to_string(),
                "atf.win32.assertextract".to_string(),
            ])
        );
    }

    #[test]
    fn empty_assertextract_is_allowed() {
        let mut properties = Properties::from_toml(CONTENT).unwrap();
        properties.set("atf.win64.assertextract", "");
        let params = properties.to_build_params().unwrap();
        assert_eq!(params.archs[0].assert_extract, "");
    }

    #[test]
    fn assertextract_must_stay_in_extraction_folder() {
        for value in [
            "../brave.exe",
            r"bin\..\..\brave.exe",
            "/usr/bin/brave",
            r"\brave.exe",
            r"C:\brave\brave.exe",
        ] {
            let mut properties = Properties::from_toml(CONTENT).unwrap();
            properties.set("atf.win64.assertextract", value);
            let err = properties.to_build_params().unwrap_err();
            assert_eq!(
                err.current_context(),
                &ConfigError::InvalidProperty("atf.win64.assertextract".to_string()),
                "{}",
                value
            );
        }

        let mut properties = Properties::from_toml(CONTENT).unwrap();
        properties.set("atf.win64.assertextract", r"bin\brave.exe");
        assert!(properties.to_build_params().is_ok());
    }

    #[test]
    fn needs_at_least_one_arch() {
        let mut properties = Properties::from_toml(CONTENT).unwrap();
        properties.set("atf.win64.url", "");
        let err = properties.to_build_params().unwrap_err();
        assert_eq!(err.current_context(), &ConfigError::NoArchToRelease);
    }

    #[test]
    fn rejects_unknown_flag_values() {
        let mut properties = Properties::new();
        properties.set("debug", "maybe");
        assert!(properties.flag("debug").is_err());
        properties.set("debug", "On");
        assert!(properties.flag("debug").unwrap());
    }

    #[test]
    fn releases_archs_in_order() {
        let mut properties = Properties::from_toml(CONTENT).unwrap();
        for arch in [Arch::Win3264, Arch::Win32] {
            properties.set(arch.property("url"), "https://example.com/x.zip");
            properties.set(arch.property("filename"), "x");
            properties.set(arch.property("ext"), "zip");
            properties.set(arch.property("assertextract"), "");
        }
        let archs: Vec<Arch> = properties
            .to_build_params()
            .unwrap()
            .archs
            .iter()
            .map(|params| params.arch)
            .collect();
        assert_eq!(archs, vec![Arch::Win32, Arch::Win64, Arch::Win3264]);
    }
}
