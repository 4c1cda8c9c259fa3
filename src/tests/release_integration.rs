use std::{fs, path::Path};

use tempfile::tempdir;

use crate::{
    archive::unzip::unzip,
    conf::{
        config_struct::{Arch, PortappManifest},
        properties::Properties,
    },
    release::release_header::{ReleaseManager, BUILD_ID_MARKER, VERSION_FILENAME},
    strategy::strategy_factory::StrategyFactory,
    tests::downloader_mock::{get_config_provider_mock, get_downloader_mock, release_properties},
    utils::build_id::BUILD_ID_LENGTH,
};

fn run_release(properties: Properties, downloads: usize, overrides: Vec<String>) -> ReleaseManager {
    let mut manager = ReleaseManager::new(
        get_config_provider_mock(properties),
        get_downloader_mock(downloads),
        overrides,
    );
    let strategy = StrategyFactory::get_strategy(&mut manager);
    strategy(&mut manager);
    manager
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn release_packages_and_cleans_working_folders() {
    let root = tempdir().unwrap();
    let manager = run_release(release_properties(root.path()), 1, vec![]);

    assert!(!manager.state.skip_next);
    assert_eq!(manager.state.released, vec![Arch::Win64]);
    let package = root.path().join("dist").join("brave-1.2.3-win64.zip");
    assert_eq!(manager.state.packages, vec![package.clone()]);
    assert!(package.is_file());

    assert!(!root.path().join("build").exists());
    assert!(!root.path().join("setup").exists());
    let tmp = root.path().join("tmp");
    assert_eq!(file_names(&tmp), vec![VERSION_FILENAME.to_string()]);

    let build_id = manager.state.build_id.clone().unwrap();
    assert_eq!(build_id.len(), BUILD_ID_LENGTH);
    assert_eq!(
        fs::read_to_string(tmp.join(VERSION_FILENAME)).unwrap(),
        format!("version=1.2.3\nbuildid={}\narchs=win64", build_id)
    );
}

#[test]
fn package_holds_app_and_manifest() {
    let root = tempdir().unwrap();
    let manager = run_release(release_properties(root.path()), 1, vec![]);

    let out = root.path().join("out");
    unzip(&manager.state.packages[0], &out).unwrap();
    assert_eq!(
        fs::read_to_string(out.join("app").join("brave.exe")).unwrap(),
        "MZ fake binary"
    );
    assert!(out.join("app").join("locales").join("en-US.pak").is_file());

    let manifest: PortappManifest =
        toml::from_str(&fs::read_to_string(out.join("portapp.toml")).unwrap()).unwrap();
    assert_eq!(manifest.name, "brave");
    assert_eq!(manifest.app_type, "chromium");
    assert_eq!(manifest.arch, Arch::Win64);
    assert_eq!(Some(manifest.build_id), manager.state.build_id);
}

#[test]
fn debug_keeps_working_folders() {
    let root = tempdir().unwrap();
    let manager = run_release(
        release_properties(root.path()),
        1,
        vec!["debug=true".to_string()],
    );

    assert!(!manager.state.skip_next);
    let build = root.path().join("build").join("win64");
    assert!(build.join("app").join("brave.exe").is_file());
    assert!(build.join("portapp.toml").is_file());
    assert!(root.path().join("setup").join("win64").join("portapp.toml").is_file());

    let tmp = root.path().join("tmp");
    assert!(tmp.join("brave-x64.zip").is_file());
    assert!(tmp.join("win64").join("brave.exe").is_file());
    assert!(tmp.join(VERSION_FILENAME).is_file());
    assert!(!tmp.join(BUILD_ID_MARKER).exists());
}

#[test]
fn failed_extract_check_stops_release() {
    let root = tempdir().unwrap();
    let mut properties = release_properties(root.path());
    properties.set("atf.win64.assertextract", "missing.exe");
    let manager = run_release(properties, 1, vec![]);

    assert!(manager.state.skip_next);
    assert!(manager.state.released.is_empty());
    assert!(manager.state.packages.is_empty());
    let tmp = root.path().join("tmp");
    assert!(!tmp.join(VERSION_FILENAME).exists());
    assert!(!tmp.join(BUILD_ID_MARKER).exists());
    assert!(!root.path().join("dist").join("brave-1.2.3-win64.zip").exists());
    // cleanup is skipped after a failure
    assert!(tmp.join("win64").join("brave.exe").is_file());
}

#[test]
fn invalid_properties_download_nothing() {
    let root = tempdir().unwrap();
    let mut properties = release_properties(root.path());
    properties.set("app.version", "");
    let manager = run_release(properties, 0, vec![]);

    assert!(manager.state.skip_next);
    assert!(manager.params.is_none());
    assert!(!root.path().join("tmp").exists());
    assert!(!root.path().join("build").exists());
}

#[test]
fn invalid_override_stops_before_validation() {
    let root = tempdir().unwrap();
    let manager = run_release(
        release_properties(root.path()),
        0,
        vec!["app.version".to_string()],
    );

    assert!(manager.state.skip_next);
    assert!(manager.params.is_none());
}

#[test]
fn other_archives_are_copied_as_is() {
    let root = tempdir().unwrap();
    let mut properties = release_properties(root.path());
    properties.set("atf.win64.url", "https://example.com/brave-x64.7z");
    properties.set("atf.win64.ext", "7z");
    properties.set("atf.win64.assertextract", "brave-x64.7z");
    let manager = run_release(properties, 1, vec![]);

    assert!(!manager.state.skip_next);
    let out = root.path().join("out");
    unzip(&manager.state.packages[0], &out).unwrap();
    assert_eq!(
        fs::read_to_string(out.join("app").join("brave-x64.7z")).unwrap(),
        "7z fixture"
    );
}

#[test]
fn every_configured_arch_is_released_in_order() {
    let root = tempdir().unwrap();
    let mut properties = release_properties(root.path());
    properties.set("atf.win32.url", "https://example.com/brave-x86.zip");
    properties.set("atf.win32.filename", "brave-x86");
    properties.set("atf.win32.ext", "zip");
    properties.set("atf.win32.assertextract", "");
    let manager = run_release(properties, 2, vec![]);

    assert!(!manager.state.skip_next);
    assert_eq!(manager.state.released, vec![Arch::Win32, Arch::Win64]);
    let dist = root.path().join("dist");
    assert_eq!(
        file_names(&dist),
        vec!["brave-1.2.3-win32.zip", "brave-1.2.3-win64.zip"]
    );
    let version = fs::read_to_string(root.path().join("tmp").join(VERSION_FILENAME)).unwrap();
    assert!(version.ends_with("archs=win32,win64"));
}

#[test]
fn existing_version_file_is_updated_in_place() {
    let root = tempdir().unwrap();
    let tmp = root.path().join("tmp");
    fs::create_dir_all(&tmp).unwrap();
    fs::write(
        tmp.join(VERSION_FILENAME),
        "# portable\nversion=0.1\nbuildid=old\narchs=win32\n",
    )
    .unwrap();

    let manager = run_release(release_properties(root.path()), 1, vec![]);

    assert!(!manager.state.skip_next);
    assert_eq!(
        fs::read_to_string(tmp.join(VERSION_FILENAME)).unwrap(),
        format!(
            "# portable\nversion=1.2.3\nbuildid={}\narchs=win64\n",
            manager.state.build_id.unwrap()
        )
    );
}
