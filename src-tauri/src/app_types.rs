use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard,
};

use crate::{
    helper_readiness::{HelperReadiness, ReadinessProbe},
    launch_strategy::LaunchStrategy,
    process_supervisor::ProcessSupervisor,
    runtime_paths::ShellPaths,
    shell_config::ShellConfig,
    shell_lifecycle::{MainWindowSpec, PlatformConvention, ShellLifecycle},
    HELPER_PING_TIMEOUT_MS, MAIN_WINDOW_HEIGHT, MAIN_WINDOW_TITLE, MAIN_WINDOW_WIDTH,
};

/// Application context registered as Tauri managed state; every event handler
/// reaches the window spec, supervisor and lifecycle through it.
pub(crate) struct ShellContext {
    pub(crate) config: ShellConfig,
    pub(crate) strategy: Arc<dyn LaunchStrategy>,
    pub(crate) supervisor: ProcessSupervisor,
    pub(crate) window_spec: MainWindowSpec,
    lifecycle: Mutex<ShellLifecycle>,
}

impl ShellContext {
    pub(crate) fn new(
        config: ShellConfig,
        strategy: Arc<dyn LaunchStrategy>,
        paths: ShellPaths,
    ) -> Self {
        let window_spec = MainWindowSpec {
            title: MAIN_WINDOW_TITLE,
            width: MAIN_WINDOW_WIDTH,
            height: MAIN_WINDOW_HEIGHT,
            content: strategy.content_source(),
            open_devtools: strategy.open_devtools(),
        };

        Self {
            supervisor: ProcessSupervisor::new(strategy.clone(), paths),
            lifecycle: Mutex::new(ShellLifecycle::new(PlatformConvention::current())),
            config,
            strategy,
            window_spec,
        }
    }

    pub(crate) fn lifecycle(&self) -> Result<MutexGuard<'_, ShellLifecycle>, String> {
        self.lifecycle
            .lock()
            .map_err(|_| "Shell lifecycle lock poisoned.".to_string())
    }

    pub(crate) fn readiness_probe(&self) -> ReadinessProbe {
        ReadinessProbe {
            url: self.config.helper_url.clone(),
            attempts: self.config.ready_attempts,
            interval: self.config.ready_interval,
            ping_timeout: std::time::Duration::from_millis(HELPER_PING_TIMEOUT_MS),
        }
    }

    pub(crate) fn bridge_state(&self) -> ShellBridgeState {
        ShellBridgeState {
            build_mode: self.strategy.build_mode().as_str(),
            content_source: self.window_spec.content.describe(),
            helper_running: self.supervisor.is_running(),
            helper_readiness: self.supervisor.readiness(),
            lifecycle_phase: self
                .lifecycle
                .lock()
                .map(|guard| guard.phase().as_str())
                .unwrap_or("unknown"),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShellBridgeState {
    pub(crate) build_mode: &'static str,
    pub(crate) content_source: String,
    pub(crate) helper_running: bool,
    pub(crate) helper_readiness: HelperReadiness,
    pub(crate) lifecycle_phase: &'static str,
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
