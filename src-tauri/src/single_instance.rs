use tauri::{plugin::TauriPlugin, AppHandle, Manager, Wry};

use crate::{append_desktop_log, main_window::TauriShellHost, ShellContext};

/// Single-instance lock. A contending process forwards its arguments to the owner
/// and exits during plugin setup, before it creates a window or starts a helper.
pub(crate) fn plugin() -> TauriPlugin<Wry> {
    tauri_plugin_single_instance::init(|app_handle, argv, cwd| {
        append_desktop_log(&format!(
            "second instance detected: argv={argv:?} cwd={cwd}"
        ));
        handle_second_instance(app_handle);
    })
}

fn handle_second_instance(app_handle: &AppHandle) {
    let Some(context) = app_handle.try_state::<ShellContext>() else {
        append_desktop_log("second instance ignored: shell context not ready");
        return;
    };
    let host = TauriShellHost::new(app_handle, append_desktop_log);
    let result = context
        .lifecycle()
        .and_then(|mut lifecycle| lifecycle.on_second_instance(&host, &context.window_spec));
    match result {
        Ok(action) => append_desktop_log(&format!("second instance handled: {action:?}")),
        Err(error) => append_desktop_log(&format!("failed to handle second instance: {error}")),
    }
}
