use std::{fs, path::PathBuf};

use error_stack::{IntoReport, Report, ResultExt};
use indicatif::ProgressBar;
use log::{debug, info, log, trace, warn, Level};

use crate::{
    archive::{pack::pack, unzip::unzip},
    conf::{
        config::ConfigProvider,
        config_struct::{ArchParams, BuildParams, PortappManifest},
    },
    download::Downloader,
    release::{
        cleanup::{clean_tmp, remove_folder, write_version_marker},
        release_header::{
            ReleaseError, ReleaseManager, ReleaseManagerState, ReleaseThings, ResultReleaseErr,
            APP_FOLDER, BUILD_ID_MARKER, MANIFEST_FILENAME, VERSION_FILENAME,
        },
    },
    utils::{
        build_id::generate_build_id,
        fs_utils::{
            copy_file, copy_folder, create_file, create_folder, create_folder_check, exists,
            remove_contents,
        },
        progress_style,
    },
    win::console::set_console_title,
};

impl ReleaseManager {
    pub fn new(
        config_provider: Box<dyn ConfigProvider>,
        downloader: Box<dyn Downloader>,
        overrides: Vec<String>,
    ) -> Self {
        Self {
            properties: Default::default(),
            overrides,
            params: None,
            config_provider,
            downloader,
            state: ReleaseManagerState::default(),
        }
    }

    fn params(&self) -> ResultReleaseErr<BuildParams> {
        self.params
            .clone()
            .ok_or_else(|| Report::new(ReleaseError::NotValidated))
    }

    /// Empties (or creates) `path` and returns it.
    fn fresh_folder(path: PathBuf, context: ReleaseError) -> ResultReleaseErr<PathBuf> {
        if exists(&path) {
            remove_contents(&path).change_context(context)?;
        } else {
            create_folder_check(&path).change_context(context)?;
        }
        Ok(path)
    }
}

impl ReleaseThings for ReleaseManager {
    fn load_config(&mut self) -> ResultReleaseErr<&mut Self> {
        let mut properties = self
            .config_provider
            .load_from_file()
            .change_context(ReleaseError::LoadConfig)?;
        properties
            .apply_overrides(&self.overrides)
            .change_context(ReleaseError::LoadConfig)?;
        self.properties = properties;
        info!("config loaded successfully");
        Ok(self)
    }

    fn validate(&mut self) -> ResultReleaseErr<&mut Self> {
        let params = self
            .properties
            .to_build_params()
            .change_context(ReleaseError::Validation)?;
        debug!("Build params {:#?}", params);
        info!(
            "Releasing {} {} ({}) for {}",
            params.app_name,
            params.app_version,
            params.app_type,
            params
                .archs
                .iter()
                .map(|arch| arch.arch.as_str())
                .collect::<Vec<&str>>()
                .join(", ")
        );
        self.params = Some(params);
        Ok(self)
    }

    fn set_title(&mut self) -> ResultReleaseErr<&mut Self> {
        let params = self.params()?;
        set_console_title(&format!("{} release", params.app_name))
            .change_context(ReleaseError::ConsoleTitle)?;
        Ok(self)
    }

    fn prepare_folders(&mut self) -> ResultReleaseErr<&mut Self> {
        let params = self.params()?;
        for path in [
            &params.build_path,
            &params.setup_path,
            &params.tmp_path,
            &params.release_path,
        ] {
            create_folder(path);
        }
        Ok(self)
    }

    fn release(&mut self) -> ResultReleaseErr<&mut Self> {
        let params = self.params()?;
        let build_id = generate_build_id();
        info!("Build id {}", build_id);
        self.state.build_id = Some(build_id.clone());

        for arch in &params.archs {
            let package = self
                .release_arch(&params, arch, &build_id)
                .attach_printable_lazy(|| format!("Release of {} stopped", arch.arch))?;
            info!("{} released to {}", arch.arch, package.display());
            self.stamp_build_id(&params, &build_id)?;
            self.state.released.push(arch.arch);
            self.state.packages.push(package);
        }
        Ok(self)
    }

    fn release_arch(
        &self,
        params: &BuildParams,
        arch: &ArchParams,
        build_id: &str,
    ) -> ResultReleaseErr<PathBuf> {
        let archive = params.tmp_path.join(arch.archive_name());
        self.downloader
            .download(&arch.url, &archive)
            .change_context(ReleaseError::Download(arch.arch))?;

        let extract_dir = Self::fresh_folder(
            params.tmp_path.join(arch.arch.as_str()),
            ReleaseError::Extract(arch.arch),
        )?;
        if arch.is_zip() {
            let pb = ProgressBar::new_spinner();
            pb.enable_steady_tick(80);
            pb.set_style(progress_style::get_progress_style());
            pb.set_message(format!("Extracting {} ...", arch.archive_name()));
            let extracted =
                unzip(&archive, &extract_dir).change_context(ReleaseError::Extract(arch.arch))?;
            pb.finish_with_message(format!("{} files extracted", extracted));
        } else {
            warn!(
                "{} is not a zip archive, it is copied as is",
                arch.archive_name()
            );
            copy_file(&archive, extract_dir.join(arch.archive_name()))
                .change_context(ReleaseError::Extract(arch.arch))?;
        }

        if !arch.assert_extract.is_empty() {
            let expected = extract_dir.join(&arch.assert_extract);
            trace!("Check {} exists", expected.display());
            if !exists(&expected) {
                return Err(Report::new(ReleaseError::AssertExtract(
                    expected.display().to_string(),
                )));
            }
        }

        let arch_build = Self::fresh_folder(
            params.build_path.join(arch.arch.as_str()),
            ReleaseError::Bundle(arch.arch),
        )?;
        copy_folder(&extract_dir, arch_build.join(APP_FOLDER))
            .change_context(ReleaseError::Bundle(arch.arch))?;

        let manifest = PortappManifest {
            name: params.app_name.clone(),
            app_type: params.app_type.clone(),
            version: params.app_version.clone(),
            arch: arch.arch,
            build_id: build_id.to_string(),
        };
        let manifest = toml::to_string_pretty(&manifest)
            .report()
            .change_context(ReleaseError::Manifest(arch.arch))?;
        create_file(arch_build.join(MANIFEST_FILENAME), &manifest)
            .change_context(ReleaseError::Manifest(arch.arch))?;

        let arch_setup = Self::fresh_folder(
            params.setup_path.join(arch.arch.as_str()),
            ReleaseError::Package(arch.arch),
        )?;
        copy_folder(&arch_build, &arch_setup).change_context(ReleaseError::Package(arch.arch))?;

        let package = params.release_path.join(params.package_name(arch.arch));
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(80);
        pb.set_style(progress_style::get_progress_style());
        pb.set_message(format!("Packing {} ...", package.display()));
        pack(&arch_setup, &package).change_context(ReleaseError::Package(arch.arch))?;
        pb.finish_with_message("Done");

        Ok(package)
    }

    fn stamp_build_id(&self, params: &BuildParams, build_id: &str) -> ResultReleaseErr<()> {
        let marker = params.tmp_path.join(BUILD_ID_MARKER);
        debug!("Stamp build id in {}", marker.display());
        create_file(&marker, build_id).change_context(ReleaseError::BuildIdMarker)
    }

    fn finalize(&mut self) -> ResultReleaseErr<&mut Self> {
        let params = match self.params.clone() {
            Some(params) => params,
            None => {
                debug!("Nothing to finalize");
                return Ok(self);
            }
        };

        let build_id = self
            .state
            .build_id
            .as_ref()
            .filter(|_| !self.state.released.is_empty());
        if let Some(build_id) = build_id {
            let archs = self
                .state
                .released
                .iter()
                .map(|arch| arch.as_str())
                .collect::<Vec<&str>>()
                .join(",");
            write_version_marker(
                params.tmp_path.join(VERSION_FILENAME),
                &[
                    ("version", params.app_version.as_str()),
                    ("buildid", build_id.as_str()),
                    ("archs", archs.as_str()),
                ],
            )
            .change_context(ReleaseError::VersionMarker)?;
        }

        let marker = params.tmp_path.join(BUILD_ID_MARKER);
        if exists(&marker) {
            fs::remove_file(&marker)
                .report()
                .change_context(ReleaseError::BuildIdMarker)?;
        }
        Ok(self)
    }

    fn cleanup(&mut self) -> ResultReleaseErr<&mut Self> {
        let params = self.params()?;
        if params.debug {
            info!(
                "Debug enabled, keeping {}, {} and {}",
                params.build_path.display(),
                params.setup_path.display(),
                params.tmp_path.display()
            );
            return Ok(self);
        }

        remove_folder(&params.build_path)?;
        remove_folder(&params.setup_path)?;
        clean_tmp(&params.tmp_path, VERSION_FILENAME)?;
        info!("Working folders cleaned");
        Ok(self)
    }

    fn bind(
        &mut self,
        cb: impl Fn(&mut ReleaseManager) -> ResultReleaseErr<&mut Self>,
        log_level: Level,
    ) -> &mut Self {
        if self.state.skip_next {
            return self;
        }
        match cb(self) {
            Ok(_) => self,
            Err(err) => {
                self.state.skip_next = true;
                log!(log_level, "{}", err);
                debug!("Error {:?}", err);
                self
            }
        }
    }

    fn or_log_err(
        &mut self,
        cb: impl Fn(&mut ReleaseManager) -> ResultReleaseErr<&mut Self>,
        log_level: Level,
    ) -> &mut Self {
        match cb(self) {
            Ok(_) => self,
            Err(err) => {
                log!(log_level, "{}", err);
                debug!("Error {:?}", err);
                self
            }
        }
    }
}
