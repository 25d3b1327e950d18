use std::{
    path::{Path, PathBuf},
    process::Child,
    sync::Arc,
    time::Duration,
};

use url::Url;

use crate::{
    build_mode::BuildMode,
    content_source::ContentSource,
    launch_plan::{self, LaunchPlan},
    process_control::{self, StopOutcome, StopSignal},
    runtime_paths::ShellPaths,
    shell_config::ShellConfig,
    DEV_HELPER_SCRIPT, PACKAGED_HELPER_BINARY, PACKAGED_INDEX_DOCUMENT,
};

/// Everything that differs between development and production builds.
///
/// Selected once at startup and shared by the supervisor and the window manager.
pub(crate) trait LaunchStrategy: Send + Sync {
    fn build_mode(&self) -> BuildMode;

    /// `Ok(None)` means this build runs without a helper.
    fn helper_plan(&self, paths: &ShellPaths) -> Result<Option<LaunchPlan>, String>;

    fn stop_helper(&self, child: &mut Child) -> Result<StopOutcome, String>;

    fn content_source(&self) -> ContentSource;

    fn open_devtools(&self) -> bool;
}

pub(crate) fn select_strategy(config: &ShellConfig) -> Arc<dyn LaunchStrategy> {
    match config.build_mode {
        BuildMode::Development => Arc::new(DevelopmentStrategy::from_config(config)),
        BuildMode::Production => Arc::new(ProductionStrategy::from_config(config)),
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DevelopmentStrategy {
    dev_server_url: Url,
    script_enabled: bool,
    interpreter: String,
    helper_command: Option<Vec<String>>,
    helper_cwd: Option<PathBuf>,
}

impl DevelopmentStrategy {
    pub(crate) fn from_config(config: &ShellConfig) -> Self {
        Self {
            dev_server_url: config.dev_server_url.clone(),
            script_enabled: config.dev_helper_enabled,
            interpreter: config.dev_interpreter.clone(),
            helper_command: config.helper_command.clone(),
            helper_cwd: config.helper_cwd.clone(),
        }
    }
}

impl LaunchStrategy for DevelopmentStrategy {
    fn build_mode(&self) -> BuildMode {
        BuildMode::Development
    }

    fn helper_plan(&self, paths: &ShellPaths) -> Result<Option<LaunchPlan>, String> {
        let default_cwd = || {
            self.helper_cwd
                .clone()
                .unwrap_or_else(|| paths.source_root.join("engine"))
        };

        if let Some(pieces) = &self.helper_command {
            return launch_plan::custom_launch_plan(pieces, default_cwd(), false).map(Some);
        }
        if !self.script_enabled {
            return Ok(None);
        }

        let script_path = paths.source_root.join(DEV_HELPER_SCRIPT);
        if !script_path.is_file() {
            return Err(format!(
                "Development helper script is missing: {}",
                script_path.display()
            ));
        }
        let cwd = self.helper_cwd.clone().unwrap_or_else(|| {
            script_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| paths.source_root.clone())
        });

        Ok(Some(LaunchPlan {
            cmd: self.interpreter.clone(),
            args: vec![script_path.to_string_lossy().to_string()],
            cwd,
            hide_console: false,
        }))
    }

    fn stop_helper(&self, child: &mut Child) -> Result<StopOutcome, String> {
        process_control::stop_child_process(child, StopSignal::Kill, Duration::ZERO)
    }

    fn content_source(&self) -> ContentSource {
        ContentSource::DevServer(self.dev_server_url.clone())
    }

    fn open_devtools(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ProductionStrategy {
    helper_command: Option<Vec<String>>,
    helper_cwd: Option<PathBuf>,
    stop_grace: Duration,
}

impl ProductionStrategy {
    pub(crate) fn from_config(config: &ShellConfig) -> Self {
        Self {
            helper_command: config.helper_command.clone(),
            helper_cwd: config.helper_cwd.clone(),
            stop_grace: config.stop_grace,
        }
    }
}

/// `<resource_dir>/../lib/api/<binary>`, next to the application's resource bundle.
pub(crate) fn packaged_helper_path(resource_dir: &Path) -> PathBuf {
    resource_dir
        .join("..")
        .join("lib")
        .join("api")
        .join(PACKAGED_HELPER_BINARY)
}

impl LaunchStrategy for ProductionStrategy {
    fn build_mode(&self) -> BuildMode {
        BuildMode::Production
    }

    fn helper_plan(&self, paths: &ShellPaths) -> Result<Option<LaunchPlan>, String> {
        if let Some(pieces) = &self.helper_command {
            let cwd = self
                .helper_cwd
                .clone()
                .or_else(|| paths.resource_dir.clone())
                .unwrap_or_else(|| paths.source_root.clone());
            return launch_plan::custom_launch_plan(pieces, cwd, true).map(Some);
        }

        let resource_dir = paths
            .resource_dir
            .as_deref()
            .ok_or_else(|| "Application resource directory is unavailable.".to_string())?;
        let executable = packaged_helper_path(resource_dir);
        if !executable.is_file() {
            return Err(format!(
                "Packaged helper executable is missing: {}",
                executable.display()
            ));
        }
        let cwd = self.helper_cwd.clone().unwrap_or_else(|| {
            executable
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| resource_dir.to_path_buf())
        });

        Ok(Some(LaunchPlan {
            cmd: executable.to_string_lossy().to_string(),
            args: Vec::new(),
            cwd,
            hide_console: true,
        }))
    }

    fn stop_helper(&self, child: &mut Child) -> Result<StopOutcome, String> {
        process_control::stop_child_process(child, StopSignal::Interrupt, self.stop_grace)
    }

    fn content_source(&self) -> ContentSource {
        ContentSource::Packaged(PathBuf::from(PACKAGED_INDEX_DOCUMENT))
    }

    fn open_devtools(&self) -> bool {
        false
    }
}
