pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const MAIN_WINDOW_TITLE: &str = "Component Gallery";
pub(crate) const MAIN_WINDOW_WIDTH: f64 = 800.0;
pub(crate) const MAIN_WINDOW_HEIGHT: f64 = 600.0;

pub(crate) const DEFAULT_DEV_SERVER_URL: &str = "http://localhost:5173";
pub(crate) const PACKAGED_INDEX_DOCUMENT: &str = "index.html";
pub(crate) const DEFAULT_HELPER_URL: &str = "http://127.0.0.1:7777/";

pub(crate) const DEV_HELPER_SCRIPT: &str = "engine/api.py";
#[cfg(target_os = "windows")]
pub(crate) const PACKAGED_HELPER_BINARY: &str = "api.exe";
#[cfg(not(target_os = "windows"))]
pub(crate) const PACKAGED_HELPER_BINARY: &str = "api";
#[cfg(target_os = "windows")]
pub(crate) const DEFAULT_DEV_INTERPRETER: &str = "python";
#[cfg(not(target_os = "windows"))]
pub(crate) const DEFAULT_DEV_INTERPRETER: &str = "python3";

pub(crate) const DEFAULT_HELPER_READY_ATTEMPTS: u32 = 50;
pub(crate) const DEFAULT_HELPER_READY_INTERVAL_MS: u64 = 200;
pub(crate) const HELPER_PING_TIMEOUT_MS: u64 = 400;
pub(crate) const DEFAULT_HELPER_STOP_GRACE_MS: u64 = 3_000;

pub(crate) const HELPER_READINESS_EVENT: &str = "helper://readiness";

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const HELPER_LOG_FILE: &str = "helper.log";
pub(crate) const LOG_ROTATE_BYTES: u64 = 5 * 1024 * 1024;
pub(crate) const PACKAGED_ROOT_DIR_NAME: &str = ".gallery-desktop";

pub(crate) const BUILD_MODE_ENV: &str = "GALLERY_BUILD_MODE";
pub(crate) const DEV_SERVER_URL_ENV: &str = "GALLERY_DEV_SERVER_URL";
pub(crate) const HELPER_URL_ENV: &str = "GALLERY_HELPER_URL";
pub(crate) const DEV_HELPER_ENV: &str = "GALLERY_DEV_HELPER";
pub(crate) const PYTHON_ENV: &str = "GALLERY_PYTHON";
pub(crate) const HELPER_CMD_ENV: &str = "GALLERY_HELPER_CMD";
pub(crate) const HELPER_CWD_ENV: &str = "GALLERY_HELPER_CWD";
pub(crate) const HELPER_READY_ATTEMPTS_ENV: &str = "GALLERY_HELPER_READY_ATTEMPTS";
pub(crate) const HELPER_READY_INTERVAL_ENV: &str = "GALLERY_HELPER_READY_INTERVAL_MS";
pub(crate) const HELPER_STOP_GRACE_ENV: &str = "GALLERY_HELPER_STOP_GRACE_MS";
pub(crate) const LOG_DIR_ENV: &str = "GALLERY_LOG_DIR";
