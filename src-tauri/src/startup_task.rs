use tauri::{AppHandle, Emitter, Manager};

use crate::{helper_readiness, ShellContext, HELPER_READINESS_EVENT};

/// Polls the helper in the background; the window does not wait for it.
/// The frontend learns the outcome from `helper://readiness` or the bridge state.
pub(crate) fn spawn_readiness_task<F>(app_handle: AppHandle, log: F)
where
    F: Fn(&str) + Send + Copy + 'static,
{
    tauri::async_runtime::spawn_blocking(move || {
        let Some(context) = app_handle.try_state::<ShellContext>() else {
            log("readiness check skipped: shell context unavailable");
            return;
        };
        let probe = context.readiness_probe();
        let readiness =
            helper_readiness::wait_for_helper(&probe, || context.supervisor.liveness(), log);
        context.supervisor.set_readiness(readiness.clone());

        if let Err(error) = app_handle.emit(HELPER_READINESS_EVENT, &readiness) {
            log(&format!("failed to emit helper readiness: {error}"));
        }
    });
}
