use tauri::{AppHandle, Manager, WebviewWindow, WebviewWindowBuilder};

use crate::{
    shell_lifecycle::{MainWindowSpec, ShellHost},
    MAIN_WINDOW_LABEL,
};

pub(crate) fn create_main_window<F>(
    app_handle: &AppHandle,
    spec: &MainWindowSpec,
    log: F,
) -> Result<(), String>
where
    F: Fn(&str),
{
    if app_handle.get_webview_window(MAIN_WINDOW_LABEL).is_some() {
        log("create_main_window skipped: main window already exists");
        return Ok(());
    }

    let window = WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        spec.content.to_webview_url(),
    )
    .title(spec.title)
    .inner_size(spec.width, spec.height)
    .build()
    .map_err(|error| format!("Failed to create main window: {error}"))?;
    log(&format!(
        "main window created, loading {}",
        spec.content.describe()
    ));

    if spec.open_devtools {
        open_devtools(&window, &log);
    }

    Ok(())
}

#[cfg(any(debug_assertions, feature = "devtools"))]
fn open_devtools<F>(window: &WebviewWindow, _log: F)
where
    F: Fn(&str),
{
    window.open_devtools();
}

#[cfg(not(any(debug_assertions, feature = "devtools")))]
fn open_devtools<F>(_window: &WebviewWindow, log: F)
where
    F: Fn(&str),
{
    log("devtools requested but unavailable in this build");
}

pub(crate) fn focus_main_window<F>(app_handle: &AppHandle, log: F) -> Result<(), String>
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        return Err("Main window not found.".to_string());
    };

    match window.is_minimized() {
        Ok(true) => {
            if let Err(error) = window.unminimize() {
                log(&format!("failed to restore main window: {error}"));
            }
        }
        Ok(false) => {}
        Err(error) => log(&format!(
            "failed to read main window minimized state: {error}"
        )),
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    window
        .set_focus()
        .map_err(|error| format!("Failed to focus main window: {error}"))
}

/// `ShellHost` backed by the running Tauri application.
pub(crate) struct TauriShellHost<'a, F> {
    app_handle: &'a AppHandle,
    log: F,
}

impl<'a, F> TauriShellHost<'a, F>
where
    F: Fn(&str),
{
    pub(crate) fn new(app_handle: &'a AppHandle, log: F) -> Self {
        Self { app_handle, log }
    }
}

impl<F> ShellHost for TauriShellHost<'_, F>
where
    F: Fn(&str),
{
    fn open_window_count(&self) -> usize {
        self.app_handle.webview_windows().len()
    }

    fn create_main_window(&self, spec: &MainWindowSpec) -> Result<(), String> {
        create_main_window(self.app_handle, spec, &self.log)
    }

    fn focus_main_window(&self) -> Result<(), String> {
        focus_main_window(self.app_handle, &self.log)
    }

    // The single-instance plugin exits contending processes first, so this is a fallback.
    fn request_quit(&self, exit_code: i32) {
        self.app_handle.exit(exit_code);
    }
}
