use tauri::{AppHandle, Manager};

use crate::{ShellBridgeState, ShellContext};

#[tauri::command]
pub(crate) fn desktop_bridge_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_shell_state(
    app_handle: AppHandle,
) -> Result<ShellBridgeState, String> {
    let context = app_handle
        .try_state::<ShellContext>()
        .ok_or_else(|| "Shell context is not initialized.".to_string())?;
    Ok(context.bridge_state())
}
