use std::{env, path::PathBuf, time::Duration};

use url::Url;

use crate::{
    build_mode::BuildMode, BUILD_MODE_ENV, DEFAULT_DEV_INTERPRETER, DEFAULT_DEV_SERVER_URL,
    DEFAULT_HELPER_READY_ATTEMPTS, DEFAULT_HELPER_READY_INTERVAL_MS, DEFAULT_HELPER_STOP_GRACE_MS,
    DEFAULT_HELPER_URL, DEV_HELPER_ENV, DEV_SERVER_URL_ENV, HELPER_CMD_ENV, HELPER_CWD_ENV,
    HELPER_READY_ATTEMPTS_ENV, HELPER_READY_INTERVAL_ENV, HELPER_STOP_GRACE_ENV, HELPER_URL_ENV,
    PYTHON_ENV,
};

/// Startup configuration, resolved once from the environment.
#[derive(Debug, Clone)]
pub(crate) struct ShellConfig {
    pub(crate) build_mode: BuildMode,
    pub(crate) dev_server_url: Url,
    pub(crate) helper_url: Url,
    pub(crate) dev_helper_enabled: bool,
    pub(crate) dev_interpreter: String,
    pub(crate) helper_command: Option<Vec<String>>,
    pub(crate) helper_cwd: Option<PathBuf>,
    pub(crate) ready_attempts: u32,
    pub(crate) ready_interval: Duration,
    pub(crate) stop_grace: Duration,
}

impl ShellConfig {
    pub(crate) fn from_env<F>(log: F) -> Self
    where
        F: Fn(&str),
    {
        Self::from_lookup(|key| env::var(key).ok(), log)
    }

    pub(crate) fn from_lookup<L, F>(lookup: L, log: F) -> Self
    where
        L: Fn(&str) -> Option<String>,
        F: Fn(&str),
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let build_mode = match read(BUILD_MODE_ENV) {
            Some(raw) => BuildMode::parse(&raw).unwrap_or_else(|| {
                log(&format!(
                    "ignoring unsupported {BUILD_MODE_ENV}='{raw}', using compiled build mode"
                ));
                BuildMode::compiled()
            }),
            None => BuildMode::compiled(),
        };

        let helper_command = read(HELPER_CMD_ENV).and_then(|raw| match shlex::split(&raw) {
            Some(pieces) if !pieces.is_empty() => Some(pieces),
            _ => {
                log(&format!("ignoring invalid {HELPER_CMD_ENV}: {raw}"));
                None
            }
        });

        Self {
            build_mode,
            dev_server_url: normalize_url(
                read(DEV_SERVER_URL_ENV).as_deref(),
                DEFAULT_DEV_SERVER_URL,
            ),
            helper_url: normalize_url(read(HELPER_URL_ENV).as_deref(), DEFAULT_HELPER_URL),
            dev_helper_enabled: read(DEV_HELPER_ENV).is_some_and(|value| parse_flag(&value)),
            dev_interpreter: read(PYTHON_ENV)
                .unwrap_or_else(|| DEFAULT_DEV_INTERPRETER.to_string()),
            helper_command,
            helper_cwd: read(HELPER_CWD_ENV).map(PathBuf::from),
            ready_attempts: parse_positive(
                read(HELPER_READY_ATTEMPTS_ENV).as_deref(),
                DEFAULT_HELPER_READY_ATTEMPTS,
            ),
            ready_interval: Duration::from_millis(parse_positive(
                read(HELPER_READY_INTERVAL_ENV).as_deref(),
                DEFAULT_HELPER_READY_INTERVAL_MS,
            )),
            stop_grace: Duration::from_millis(parse_positive(
                read(HELPER_STOP_GRACE_ENV).as_deref(),
                DEFAULT_HELPER_STOP_GRACE_MS,
            )),
        }
    }
}

pub(crate) fn normalize_url(raw: Option<&str>, default_url: &str) -> Url {
    // Defaults are compile-time constants that always parse.
    let fallback = || Url::parse(default_url).expect("built-in default URL is valid");
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return fallback();
    };

    match Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => parsed,
        _ => fallback(),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_positive<T>(raw: Option<&str>, default_value: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    raw.and_then(|value| value.parse::<T>().ok())
        .filter(|value| *value > T::default())
        .unwrap_or(default_value)
}
