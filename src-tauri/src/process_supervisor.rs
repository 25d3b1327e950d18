use std::{
    process::Child,
    sync::{atomic::AtomicBool, Arc, Mutex},
};

use crate::{
    app_types::AtomicFlagGuard,
    helper_readiness::{HelperLiveness, HelperReadiness},
    launch_plan::{self, build_debug_command},
    launch_strategy::LaunchStrategy,
    process_control::StopOutcome,
    runtime_paths::{self, ShellPaths},
    shell_lifecycle::HelperControl,
    HELPER_LOG_FILE,
};

/// Owns the single helper process. An empty slot means nothing was started
/// (or it was already stopped), and stopping an empty slot is a no-op.
pub(crate) struct ProcessSupervisor {
    strategy: Arc<dyn LaunchStrategy>,
    paths: ShellPaths,
    child: Mutex<Option<Child>>,
    readiness: Mutex<HelperReadiness>,
    is_spawning: AtomicBool,
}

impl ProcessSupervisor {
    pub(crate) fn new(strategy: Arc<dyn LaunchStrategy>, paths: ShellPaths) -> Self {
        Self {
            strategy,
            paths,
            child: Mutex::new(None),
            readiness: Mutex::new(HelperReadiness::Disabled),
            is_spawning: AtomicBool::new(false),
        }
    }

    /// Returns the helper pid, or `None` when this build runs without a helper.
    pub(crate) fn start(&self) -> Result<Option<u32>, String> {
        let Some(_spawn_guard) = AtomicFlagGuard::try_set(&self.is_spawning) else {
            return Err("Helper start already in progress.".to_string());
        };

        let mut guard = self
            .child
            .lock()
            .map_err(|_| "Helper process lock poisoned.".to_string())?;
        if let Some(child) = guard.as_mut() {
            if matches!(child.try_wait(), Ok(None)) {
                return Ok(Some(child.id()));
            }
            *guard = None;
        }

        let Some(plan) = self.strategy.helper_plan(&self.paths)? else {
            self.set_readiness(HelperReadiness::Disabled);
            return Ok(None);
        };

        let log_path =
            runtime_paths::log_file_path(self.paths.log_dir.as_deref(), HELPER_LOG_FILE);
        let mut command = launch_plan::build_command(&plan, log_path.as_deref())
            .or_else(|_| launch_plan::build_command(&plan, None))?;
        let child = command.spawn().map_err(|error| {
            format!(
                "Failed to spawn helper process with command {:?}: {}",
                build_debug_command(&plan),
                error
            )
        })?;

        let pid = child.id();
        *guard = Some(child);
        drop(guard);
        self.set_readiness(HelperReadiness::Pending);
        Ok(Some(pid))
    }

    pub(crate) fn stop(&self) -> Result<StopOutcome, String> {
        let taken = match self.child.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => return Err("Helper process lock poisoned.".to_string()),
        };
        let Some(mut child) = taken else {
            return Ok(StopOutcome::NotStarted);
        };

        self.strategy.stop_helper(&mut child)
    }

    pub(crate) fn liveness(&self) -> HelperLiveness {
        let Ok(mut guard) = self.child.lock() else {
            return HelperLiveness::Exited;
        };
        match guard.as_mut().map(Child::try_wait) {
            Some(Ok(None)) => HelperLiveness::Running,
            _ => HelperLiveness::Exited,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.liveness() == HelperLiveness::Running
    }

    pub(crate) fn readiness(&self) -> HelperReadiness {
        self.readiness
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(HelperReadiness::Pending)
    }

    pub(crate) fn set_readiness(&self, readiness: HelperReadiness) {
        if let Ok(mut guard) = self.readiness.lock() {
            *guard = readiness;
        }
    }
}

impl HelperControl for ProcessSupervisor {
    fn start_helper(&self) -> Result<Option<u32>, String> {
        self.start()
    }

    fn stop_helper(&self) -> Result<StopOutcome, String> {
        self.stop()
    }
}
