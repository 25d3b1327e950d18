use tauri::{webview::PageLoadEvent, Manager, RunEvent};

use crate::{
    append_desktop_log, append_startup_log, exit_events,
    launch_strategy::select_strategy,
    logging,
    main_window::TauriShellHost,
    runtime_paths::{self, ShellPaths},
    shell_config::ShellConfig,
    shell_lifecycle::{InstanceLock, ReadyOutcome},
    single_instance, startup_task, ShellContext, DESKTOP_LOG_FILE,
};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(
            runtime_paths::resolve_log_dir(runtime_paths::default_packaged_root_dir()),
            DESKTOP_LOG_FILE,
        )
        .display()
    ));

    let config = ShellConfig::from_env(append_startup_log);
    let strategy = select_strategy(&config);
    append_startup_log(&format!(
        "build mode: {}, content source: {}",
        strategy.build_mode(),
        strategy.content_source().describe()
    ));

    tauri::Builder::default()
        // Must stay the first plugin so a contending process exits before anything else runs.
        .plugin(single_instance::plugin())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_is_desktop_runtime,
            crate::desktop_bridge_commands::desktop_bridge_get_shell_state,
        ])
        .on_page_load(|_webview, payload| match payload.event() {
            PageLoadEvent::Started => {
                append_desktop_log(&format!("page-load started: {}", payload.url()));
            }
            PageLoadEvent::Finished => {
                append_desktop_log(&format!("page-load finished: {}", payload.url()));
            }
        })
        .setup(move |app| {
            let app_handle = app.handle().clone();
            let resource_dir = match app_handle.path().resource_dir() {
                Ok(dir) => Some(dir),
                Err(error) => {
                    append_startup_log(&format!("failed to resolve resource dir: {error}"));
                    None
                }
            };
            app_handle.manage(ShellContext::new(
                config,
                strategy,
                ShellPaths::new(resource_dir),
            ));

            let context = app_handle.state::<ShellContext>();
            let host = TauriShellHost::new(&app_handle, append_desktop_log);
            // Setup only runs in the process that holds the single-instance lock.
            let outcome = context.lifecycle().and_then(|mut lifecycle| {
                lifecycle.on_ready(
                    InstanceLock::Acquired,
                    &host,
                    &context.supervisor,
                    &context.window_spec,
                    append_startup_log,
                )
            });

            match outcome {
                Ok(ReadyOutcome::WindowCreated {
                    helper_pid: Some(_),
                }) => startup_task::spawn_readiness_task(app_handle.clone(), append_startup_log),
                Ok(outcome) => append_startup_log(&format!("startup finished: {outcome:?}")),
                Err(error) => {
                    append_startup_log(&format!("startup failed: {error}"));
                    app_handle.exit(1);
                }
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                exit_events::handle_exit_requested(app_handle, code, &api);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen {
                has_visible_windows: false,
                ..
            } => {
                exit_events::handle_activate(app_handle);
            }
            _ => {}
        });
}
