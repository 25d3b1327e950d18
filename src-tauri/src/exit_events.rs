use tauri::{AppHandle, ExitRequestApi, Manager};

use crate::{
    append_desktop_log, append_shutdown_log, main_window::TauriShellHost,
    shell_lifecycle::{AllClosedDecision, ShellLifecycle},
    ShellContext,
};

fn begin_quit(context: &ShellContext, reason: &str) {
    append_shutdown_log(reason);
    match context.lifecycle() {
        Ok(mut lifecycle) => {
            lifecycle.begin_quit(&context.supervisor, append_shutdown_log);
        }
        Err(error) => {
            append_shutdown_log(&format!("{error} stopping helper without lifecycle"));
            if let Err(error) = context.supervisor.stop() {
                append_shutdown_log(&format!("failed to stop helper process: {error}"));
            }
        }
    }
}

/// `code` is `None` when the runtime asks to exit because the last window closed.
/// An explicit exit code always quits; a missing lifecycle quits as well.
pub(crate) fn exit_request_decision(
    code: Option<i32>,
    lifecycle: Option<&mut ShellLifecycle>,
) -> AllClosedDecision {
    if code.is_some() {
        return AllClosedDecision::Quit;
    }
    lifecycle
        .map(|lifecycle| lifecycle.on_all_windows_closed())
        .unwrap_or(AllClosedDecision::Quit)
}

pub(crate) fn handle_exit_requested(
    app_handle: &AppHandle,
    code: Option<i32>,
    api: &ExitRequestApi,
) {
    let Some(context) = app_handle.try_state::<ShellContext>() else {
        return;
    };

    let decision = {
        let mut lifecycle = context.lifecycle();
        if let Err(error) = &lifecycle {
            append_shutdown_log(error);
        }
        exit_request_decision(code, lifecycle.as_deref_mut().ok())
    };
    match (decision, code) {
        (AllClosedDecision::KeepRunning, _) => {
            append_desktop_log("all windows closed; staying active until explicit quit");
            api.prevent_exit();
        }
        (AllClosedDecision::Quit, Some(code)) => {
            begin_quit(&context, &format!("exit requested with code {code}"))
        }
        (AllClosedDecision::Quit, None) => begin_quit(&context, "all windows closed; quitting"),
    }
}

pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    let Some(context) = app_handle.try_state::<ShellContext>() else {
        return;
    };
    begin_quit(&context, "desktop process exiting");
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn handle_activate(app_handle: &AppHandle) {
    let Some(context) = app_handle.try_state::<ShellContext>() else {
        return;
    };
    let host = TauriShellHost::new(app_handle, append_desktop_log);
    let result = context
        .lifecycle()
        .and_then(|mut lifecycle| lifecycle.on_activate(&host, &context.window_spec));
    match result {
        Ok(true) => append_desktop_log("activated with no open windows; main window recreated"),
        Ok(false) => {}
        Err(error) => append_desktop_log(&format!("failed to handle activate: {error}")),
    }
}
