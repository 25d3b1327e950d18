use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{LOG_DIR_ENV, PACKAGED_ROOT_DIR_NAME};

/// Filesystem locations the shell resolves once at startup.
#[derive(Debug, Clone)]
pub(crate) struct ShellPaths {
    pub(crate) resource_dir: Option<PathBuf>,
    pub(crate) source_root: PathBuf,
    pub(crate) log_dir: Option<PathBuf>,
}

impl ShellPaths {
    pub(crate) fn new(resource_dir: Option<PathBuf>) -> Self {
        Self {
            resource_dir,
            source_root: source_root_dir(),
            log_dir: resolve_log_dir(default_packaged_root_dir()),
        }
    }
}

pub(crate) fn default_packaged_root_dir() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(PACKAGED_ROOT_DIR_NAME))
}

pub(crate) fn resolve_log_dir(packaged_root_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Ok(raw) = env::var(LOG_DIR_ENV) {
        let path = PathBuf::from(raw.trim());
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }

    packaged_root_dir.map(|root| root.join("logs"))
}

/// Repository root in a source checkout; the development helper script lives under it.
pub(crate) fn source_root_dir() -> PathBuf {
    let candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..");
    candidate.canonicalize().unwrap_or(candidate)
}

pub(crate) fn log_file_path(log_dir: Option<&Path>, file_name: &str) -> Option<PathBuf> {
    log_dir.map(|dir| dir.join(file_name))
}
